//! Secondary registry records.
//!
//! The portal already answers in a flat process shape; only the category
//! has to be inferred, from keywords in the class name.

use serde::Deserialize;

use crate::errors::NormalizeError;
use crate::models::{court_acronym, Case, CaseCategory, CaseNumber, Client, Movement, Party, PartyRole};

use super::classification::{category_from_class_name, status_from_situation};
use super::dates::parse_timestamp;
use super::money::{claim_value, decimal_from_json};
use super::null_default;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PortalRecord {
    #[serde(default)]
    classe: Option<String>,
    #[serde(default)]
    assunto: Option<String>,
    #[serde(default)]
    valor_causa: Option<serde_json::Value>,
    #[serde(default)]
    data_distribuicao: Option<String>,
    #[serde(default)]
    data_ultima_movimentacao: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    partes: Vec<PortalParty>,
    #[serde(default, deserialize_with = "null_default")]
    movimentacoes: Vec<PortalMovement>,
    #[serde(default)]
    situacao: Option<String>,
    #[serde(default)]
    tribunal: Option<String>,
    #[serde(default)]
    vara: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PortalParty {
    nome: String,
    #[serde(default)]
    tipo: Option<String>,
    #[serde(default)]
    documento: Option<String>,
    #[serde(default)]
    advogado: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PortalMovement {
    data: String,
    #[serde(default)]
    tipo: Option<String>,
    #[serde(default)]
    descricao: Option<String>,
    #[serde(default)]
    usuario: Option<String>,
}

fn party_role(kind: Option<&str>) -> PartyRole {
    match kind.map(|k| k.trim().to_lowercase()).as_deref() {
        Some("autor" | "autora" | "plaintiff" | "reclamante" | "exequente") => {
            PartyRole::Plaintiff
        }
        Some("reu" | "réu" | "ré" | "defendant" | "reclamado" | "reclamada" | "executado") => {
            PartyRole::Defendant
        }
        _ => PartyRole::Other,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Normalizes one secondary registry record.
pub fn normalize_portal_record(
    number: &CaseNumber,
    record: &serde_json::Value,
) -> Result<Case, NormalizeError> {
    let record: PortalRecord =
        serde_json::from_value(record.clone()).map_err(|e| NormalizeError::Malformed {
            family: "portal",
            message: e.to_string(),
        })?;

    let mut case = Case::new(number.formatted());
    case.category = category_from_class_name(record.classe.as_deref()).unwrap_or_default();
    case.status = status_from_situation(record.situacao.as_deref());
    case.court_class = non_blank(record.classe);
    case.subject = non_blank(record.assunto);
    case.situation = non_blank(record.situacao);
    case.claim_value = claim_value(record.valor_causa.as_ref().and_then(decimal_from_json));
    case.filing_date = record.data_distribuicao.as_deref().and_then(parse_timestamp);
    case.court = non_blank(record.tribunal)
        .or_else(|| court_acronym(number))
        .unwrap_or_default();
    case.division = non_blank(record.vara).unwrap_or_default();

    case.parties = record
        .partes
        .into_iter()
        .filter_map(|p| {
            let name = non_blank(Some(p.nome))?;
            Some(Party {
                name,
                role: party_role(p.tipo.as_deref()),
                tax_id: non_blank(p.documento),
                attorney: non_blank(p.advogado),
            })
        })
        .collect();

    let first_plaintiff = case.plaintiffs().next().cloned();
    if let Some(plaintiff) = first_plaintiff {
        case.client = Client {
            name: plaintiff.name,
            tax_id: plaintiff.tax_id.unwrap_or_default(),
            email: None,
            phone: None,
        };
        case.responsible_attorney = plaintiff.attorney.unwrap_or_default();
    }

    case.activity_log = record
        .movimentacoes
        .into_iter()
        .filter_map(|m| {
            let timestamp = parse_timestamp(&m.data)?;
            let kind = non_blank(m.tipo).unwrap_or_else(|| "Movement".to_string());
            let description = non_blank(m.descricao).unwrap_or_else(|| kind.clone());
            Some(Movement::new(
                timestamp,
                kind,
                description,
                m.usuario.unwrap_or_default(),
            ))
        })
        .collect();

    case.last_activity_date = record
        .data_ultima_movimentacao
        .as_deref()
        .and_then(parse_timestamp)
        .or_else(|| case.latest_movement_at());

    if case.category == CaseCategory::Civil && case.court.starts_with("TRT") {
        case.category = CaseCategory::Labor;
    }

    Ok(case)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CaseStatus;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_labor_record() {
        let number = CaseNumber::parse("1000123-45.2023.5.02.0001").unwrap();
        let record = json!({
            "numero": "1000123-45.2023.5.02.0001",
            "classe": "Reclamação Trabalhista",
            "assunto": "Horas Extras",
            "valorCausa": "25.000,00",
            "dataDistribuicao": "2023-02-01",
            "partes": [
                { "nome": "Maria Santos", "tipo": "autor", "documento": "123.456.789-01", "advogado": "Ana Costa" },
                { "nome": "Empresa XYZ Ltda", "tipo": "reu" }
            ],
            "movimentacoes": [
                { "data": "2023-02-01T09:00:00Z", "tipo": "Distribuição", "descricao": "Reclamação distribuída", "usuario": "Sistema TRT2" },
                { "data": "not a date", "tipo": "Notificação" }
            ],
            "situacao": "Em andamento",
            "tribunal": "TRT2",
            "vara": "1ª Vara do Trabalho"
        });

        let case = normalize_portal_record(&number, &record).unwrap();

        assert_eq!(case.category, CaseCategory::Labor);
        assert_eq!(case.status, CaseStatus::Active);
        assert_eq!(case.claim_value, Some(dec!(25000)));
        assert_eq!(case.client.name, "Maria Santos");
        assert_eq!(case.client.tax_id, "123.456.789-01");
        assert_eq!(case.responsible_attorney, "Ana Costa");
        assert_eq!(case.parties[1].role, PartyRole::Defendant);
        assert_eq!(case.activity_log.len(), 1);
        assert_eq!(case.last_activity_date, Some(case.activity_log[0].timestamp));
        assert_eq!(case.division, "1ª Vara do Trabalho");
    }

    #[test]
    fn test_minimal_record() {
        let number = CaseNumber::parse("1017593-56.2022.8.26.0001").unwrap();
        let case = normalize_portal_record(&number, &json!({})).unwrap();

        assert_eq!(case.category, CaseCategory::Civil);
        assert_eq!(case.court, "TJSP");
        assert!(case.parties.is_empty());
        assert_eq!(case.client.name, "");
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        let number = CaseNumber::parse("1017593-56.2022.8.26.0001").unwrap();
        let err = normalize_portal_record(&number, &json!({ "partes": [ { "tipo": "autor" } ] }))
            .unwrap_err();
        assert!(matches!(err, NormalizeError::Malformed { family: "portal", .. }));
    }
}
