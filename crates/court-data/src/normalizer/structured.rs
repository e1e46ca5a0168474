//! Public registry documents.
//!
//! Field mapping is direct. Category comes from the numeric class code,
//! status from the situation text, and the client from the first party of
//! the active pole.

use serde::Deserialize;

use crate::errors::NormalizeError;
use crate::models::{court_acronym, Case, CaseNumber, Client, Movement, Party, PartyRole};

use super::classification::{category_from_class_code, status_from_situation};
use super::dates::parse_timestamp;
use super::money::{claim_value, decimal_from_json};
use super::null_default;

/// Pole code of the active (claimant) side.
const ACTIVE_POLE: &str = "AT";
/// Pole code of the passive (respondent) side.
const PASSIVE_POLE: &str = "PA";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistryDocument {
    #[serde(default)]
    classe: Option<CodeName>,
    #[serde(default, deserialize_with = "null_default")]
    assuntos: Vec<CodeName>,
    #[serde(default)]
    valor_causa: Option<serde_json::Value>,
    #[serde(default)]
    data_ajuizamento: Option<String>,
    #[serde(default)]
    orgao_julgador: Option<CodeName>,
    #[serde(default)]
    situacao: Option<String>,
    #[serde(default)]
    tribunal: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    polos: Vec<Pole>,
    #[serde(default, deserialize_with = "null_default")]
    movimentos: Vec<RegistryMovement>,
}

#[derive(Debug, Deserialize)]
struct CodeName {
    #[serde(default)]
    codigo: Option<i64>,
    #[serde(default)]
    nome: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Pole {
    #[serde(default)]
    polo: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    partes: Vec<PoleParty>,
}

#[derive(Debug, Deserialize)]
struct PoleParty {
    #[serde(default)]
    pessoa: Option<Person>,
    #[serde(default, deserialize_with = "null_default")]
    advogados: Vec<CodeName>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Person {
    #[serde(default)]
    nome: Option<String>,
    #[serde(default)]
    numero_documento_principal: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistryMovement {
    #[serde(default)]
    data_hora: Option<String>,
    #[serde(default)]
    codigo: Option<i64>,
    #[serde(default)]
    nome: Option<String>,
    #[serde(default)]
    movimento_nacional: Option<NationalMovement>,
    #[serde(default)]
    movimento_local: Option<LocalMovement>,
    #[serde(default)]
    responsavel_movimento: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NationalMovement {
    #[serde(default)]
    codigo_nacional: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct LocalMovement {
    #[serde(default)]
    descricao: Option<String>,
}

impl Pole {
    fn role(&self) -> PartyRole {
        match self.polo.as_deref().map(str::trim) {
            Some(ACTIVE_POLE) => PartyRole::Plaintiff,
            Some(PASSIVE_POLE) => PartyRole::Defendant,
            _ => PartyRole::Other,
        }
    }
}

impl RegistryMovement {
    fn into_movement(self) -> Option<Movement> {
        let timestamp = parse_timestamp(self.data_hora.as_deref()?)?;
        let code = self
            .movimento_nacional
            .and_then(|m| m.codigo_nacional)
            .or(self.codigo);

        let kind = match code {
            Some(code) => format!("Movement {}", code),
            None => "Movement".to_string(),
        };
        let description = self
            .movimento_local
            .and_then(|m| non_blank(m.descricao))
            .or_else(|| non_blank(self.nome))
            .or_else(|| code.map(|c| c.to_string()))
            .unwrap_or_else(|| kind.clone());

        Some(Movement::new(
            timestamp,
            kind,
            description,
            self.responsavel_movimento.unwrap_or_default(),
        ))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Normalizes one registry `_source` document.
pub fn normalize_registry_hit(
    number: &CaseNumber,
    document: &serde_json::Value,
) -> Result<Case, NormalizeError> {
    if !document.is_object() {
        return Err(NormalizeError::Malformed {
            family: "registry",
            message: "document is not an object".to_string(),
        });
    }
    let doc: RegistryDocument =
        serde_json::from_value(document.clone()).map_err(|e| NormalizeError::Malformed {
            family: "registry",
            message: e.to_string(),
        })?;

    let mut case = Case::new(number.formatted());
    case.category = category_from_class_code(doc.classe.as_ref().and_then(|c| c.codigo));
    case.status = status_from_situation(doc.situacao.as_deref());
    case.court_class = doc.classe.and_then(|c| non_blank(c.nome));
    case.subject = doc.assuntos.into_iter().find_map(|a| non_blank(a.nome));
    case.situation = non_blank(doc.situacao);
    case.claim_value = claim_value(doc.valor_causa.as_ref().and_then(decimal_from_json));
    case.filing_date = doc.data_ajuizamento.as_deref().and_then(parse_timestamp);
    case.court = court_acronym(number)
        .or_else(|| non_blank(doc.tribunal))
        .unwrap_or_default();
    case.division = doc
        .orgao_julgador
        .and_then(|o| non_blank(o.nome))
        .unwrap_or_default();

    let mut client_set = false;
    for pole in doc.polos {
        let role = pole.role();
        for party in pole.partes {
            let Some(person) = party.pessoa else {
                continue;
            };
            let Some(name) = non_blank(person.nome) else {
                continue;
            };
            let tax_id = non_blank(person.numero_documento_principal);
            let attorney = party.advogados.into_iter().find_map(|a| non_blank(a.nome));

            if role == PartyRole::Plaintiff && !client_set {
                case.client = Client {
                    name: name.clone(),
                    tax_id: tax_id.clone().unwrap_or_default(),
                    email: None,
                    phone: None,
                };
                case.responsible_attorney = attorney.clone().unwrap_or_default();
                client_set = true;
            }

            case.parties.push(Party {
                name,
                role,
                tax_id,
                attorney,
            });
        }
    }

    case.activity_log = doc
        .movimentos
        .into_iter()
        .filter_map(RegistryMovement::into_movement)
        .collect();
    case.last_activity_date = case.latest_movement_at();

    Ok(case)
}
