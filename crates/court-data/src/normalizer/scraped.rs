//! Court consultation pages.
//!
//! The page is flattened into its visible text lines. Each labeled field is
//! searched independently: the value either follows the label on the same
//! line (`Classe: Procedimento Comum`) or sits on the next line, which is how
//! table-based layouts render. A value that is empty or repeats the label is
//! rejected.
//!
//! [`ScrapedPage::validate`] rejects pages on which nothing was recognised,
//! so a layout change upstream shows up as an error instead of an empty case.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use scraper::{Html, Node};

use crate::errors::NormalizeError;
use crate::models::{Case, CaseCategory, CaseNumber, Client, Movement, Party, PartyRole};

use super::classification::{category_from_class_name, status_from_situation};
use super::dates::parse_timestamp;
use super::money::{claim_value, parse_money};

const CLASS_LABELS: &[&str] = &["Classe", "Class"];
const SUBJECT_LABELS: &[&str] = &["Assunto", "Subject"];
const DIVISION_LABELS: &[&str] = &["Vara", "Órgão Julgador", "Division"];
const FORUM_LABELS: &[&str] = &["Foro", "Comarca", "Forum"];
const JUDGE_LABELS: &[&str] = &["Juiz", "Juíza", "Judge"];
const VALUE_LABELS: &[&str] = &["Valor da ação", "Valor da causa", "Claim value"];
const SITUATION_LABELS: &[&str] = &["Situação", "Situation"];
const FILING_LABELS: &[&str] = &["Distribuição", "Filing date"];
const MOVEMENTS_HEADERS: &[&str] = &["Movimentações", "Movements"];

const PLAINTIFF_MARKERS: &[&str] = &[
    "Reqte", "Reqtes", "Autor", "Autora", "Exeqte", "Reclamante", "Impetrante", "Plaintiff",
];
const DEFENDANT_MARKERS: &[&str] = &[
    "Reqdo", "Reqda", "Reqdos", "Réu", "Ré", "Exectdo", "Executado", "Reclamado", "Reclamada",
    "Impetrado", "Defendant",
];
const ATTORNEY_MARKERS: &[&str] = &["Advogado", "Advogada", "Attorney"];

/// Shortest text accepted as a party name.
const MIN_NAME_LEN: usize = 4;
/// Shortest text accepted as a movement description.
const MIN_DESCRIPTION_LEN: usize = 4;

lazy_static! {
    static ref MOVEMENT_LINE: Regex =
        Regex::new(r"^(\d{2}/\d{2}/\d{4})\s*-\s*(.+)$").expect("Invalid regex pattern");
    static ref DATE_ONLY: Regex = Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("Invalid regex pattern");
    static ref DATE_ANYWHERE: Regex =
        Regex::new(r"\d{2}/\d{2}/\d{4}").expect("Invalid regex pattern");
}

/// Everything recognised on a consultation page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScrapedPage {
    pub court_class: Option<String>,
    pub subject: Option<String>,
    pub division: Option<String>,
    pub forum: Option<String>,
    pub judge: Option<String>,
    pub situation: Option<String>,
    pub claim_value: Option<Decimal>,
    pub filing_date: Option<DateTime<Utc>>,
    pub parties: Vec<Party>,
    pub movements: Vec<Movement>,
}

impl ScrapedPage {
    pub fn extract(html: &str) -> Self {
        let lines = visible_lines(html);

        ScrapedPage {
            court_class: labeled_value(&lines, CLASS_LABELS),
            subject: labeled_value(&lines, SUBJECT_LABELS),
            division: labeled_value(&lines, DIVISION_LABELS),
            forum: labeled_value(&lines, FORUM_LABELS),
            judge: labeled_value(&lines, JUDGE_LABELS),
            situation: labeled_value(&lines, SITUATION_LABELS),
            claim_value: claim_value(
                labeled_value(&lines, VALUE_LABELS).and_then(|v| parse_money(&v)),
            ),
            filing_date: labeled_value(&lines, FILING_LABELS).and_then(|v| {
                DATE_ANYWHERE
                    .find(&v)
                    .and_then(|m| parse_timestamp(m.as_str()))
            }),
            parties: extract_parties(&lines),
            movements: extract_movements(&lines),
        }
    }

    /// Whether at least one field was recognised.
    pub fn has_content(&self) -> bool {
        self.court_class.is_some()
            || self.subject.is_some()
            || self.division.is_some()
            || self.forum.is_some()
            || self.judge.is_some()
            || self.claim_value.is_some()
            || !self.parties.is_empty()
    }

    pub fn validate(&self, court: &str) -> Result<(), NormalizeError> {
        if self.has_content() {
            Ok(())
        } else {
            Err(NormalizeError::UnrecognisedPage {
                court: court.to_string(),
            })
        }
    }

    fn into_case(self, number: &CaseNumber, court: &str) -> Case {
        let mut case = Case::new(number.formatted());

        case.category = category_from_class_name(self.court_class.as_deref()).unwrap_or(
            if court.starts_with("TRT") {
                CaseCategory::Labor
            } else {
                CaseCategory::Civil
            },
        );
        case.status = status_from_situation(self.situation.as_deref());
        case.court_class = self.court_class;
        case.subject = self.subject;
        case.situation = self.situation;
        case.claim_value = self.claim_value;
        case.filing_date = self.filing_date;
        case.court = court.to_string();
        case.division = self.division.or(self.forum).unwrap_or_default();
        case.parties = self.parties;

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
        if let Some(judge) = self.judge {
            case.notes = Some(format!("Judge: {}", judge));
        }

        case.activity_log = self.movements;
        case.last_activity_date = case.latest_movement_at();
        case
    }
}

/// Normalizes a consultation page from `court`.
pub fn normalize_scraped_page(
    number: &CaseNumber,
    court: &str,
    html: &str,
) -> Result<Case, NormalizeError> {
    let page = ScrapedPage::extract(html);
    page.validate(court)?;
    Ok(page.into_case(number, court))
}

/// Visible text of the page, one trimmed non-empty line per text fragment.
fn visible_lines(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut lines = Vec::new();

    for node in document.tree.nodes() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|p| p.value().as_element().map(|e| e.name().to_string()))
            .is_some_and(|name| matches!(name.as_str(), "script" | "style" | "noscript" | "title"));
        if hidden {
            continue;
        }
        for line in text.lines() {
            let line = collapse_whitespace(line);
            if !line.is_empty() {
                lines.push(line);
            }
        }
    }

    lines
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text after `label` at the start of `line`, if the line starts with it as
/// a whole word.
fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let head = line.get(..label.len())?;
    if !head.eq_ignore_ascii_case(label) && head.to_lowercase() != label.to_lowercase() {
        return None;
    }
    let rest = &line[label.len()..];
    match rest.chars().next() {
        None => Some(""),
        Some(c) if c == ':' || c.is_whitespace() => {
            Some(rest.trim_start_matches(|c: char| c == ':' || c.is_whitespace()))
        }
        _ => None,
    }
}

/// Whether `text` is a label, alone or followed by a colon and a value.
fn opens_field(text: &str) -> bool {
    all_labels().any(|label| match strip_label(text, label) {
        Some("") => true,
        Some(_) => text[label.len()..].trim_start().starts_with(':'),
        None => false,
    })
}

fn is_known_label(text: &str) -> bool {
    all_labels().any(|label| strip_label(text, label) == Some(""))
}

fn all_labels() -> impl Iterator<Item = &'static str> {
    [
        CLASS_LABELS,
        SUBJECT_LABELS,
        DIVISION_LABELS,
        FORUM_LABELS,
        JUDGE_LABELS,
        VALUE_LABELS,
        SITUATION_LABELS,
        FILING_LABELS,
        PLAINTIFF_MARKERS,
        DEFENDANT_MARKERS,
        ATTORNEY_MARKERS,
    ]
    .into_iter()
    .flat_map(|labels| labels.iter().copied())
}

/// Value for a label found at `lines[i]` with `rest` left after the label.
///
/// A value is usable when it is not blank and is not itself a label. When
/// the label stands alone, the value is the next line unless that line opens
/// another labeled field.
fn value_after(lines: &[String], i: usize, rest: &str) -> Option<(String, usize)> {
    let (candidate, consumed) = if rest.is_empty() {
        let next = lines.get(i + 1)?;
        if opens_field(next) {
            return None;
        }
        (next.as_str(), 2)
    } else {
        (rest, 1)
    };

    let value = candidate.trim();
    if value.is_empty() || is_known_label(value) {
        return None;
    }
    Some((value.to_string(), consumed))
}

fn labeled_value(lines: &[String], labels: &[&str]) -> Option<String> {
    for (i, line) in lines.iter().enumerate() {
        for label in labels {
            let Some(rest) = strip_label(line, label) else {
                continue;
            };
            if let Some((value, _)) = value_after(lines, i, rest) {
                return Some(value);
            }
        }
    }
    None
}

fn marker_role(line: &str) -> Option<(PartyRole, &str)> {
    for marker in PLAINTIFF_MARKERS {
        if let Some(rest) = strip_label(line, marker) {
            return Some((PartyRole::Plaintiff, rest));
        }
    }
    for marker in DEFENDANT_MARKERS {
        if let Some(rest) = strip_label(line, marker) {
            return Some((PartyRole::Defendant, rest));
        }
    }
    None
}

fn attorney_marker(line: &str) -> Option<&str> {
    ATTORNEY_MARKERS
        .iter()
        .find_map(|marker| strip_label(line, marker))
}

fn party_name(lines: &[String], i: usize, rest: &str) -> Option<(String, usize)> {
    value_after(lines, i, rest).filter(|(name, _)| name.chars().count() >= MIN_NAME_LEN)
}

fn extract_parties(lines: &[String]) -> Vec<Party> {
    let mut parties: Vec<Party> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = &lines[i];

        if let Some((role, rest)) = marker_role(line) {
            if let Some((name, consumed)) = party_name(lines, i, rest) {
                parties.push(Party {
                    name,
                    role,
                    tax_id: None,
                    attorney: None,
                });
                i += consumed;
                continue;
            }
        } else if let Some(rest) = attorney_marker(line) {
            if let Some((name, consumed)) = party_name(lines, i, rest) {
                if let Some(party) = parties.last_mut().filter(|p| p.attorney.is_none()) {
                    party.attorney = Some(name);
                }
                i += consumed;
                continue;
            }
        }

        i += 1;
    }

    parties
}

fn extract_movements(lines: &[String]) -> Vec<Movement> {
    let mut movements = Vec::new();
    let mut in_movements = false;
    let mut i = 0;

    while i < lines.len() {
        let line = &lines[i];

        if MOVEMENTS_HEADERS
            .iter()
            .any(|h| strip_label(line, h) == Some(""))
        {
            in_movements = true;
            i += 1;
            continue;
        }

        if let Some(caps) = MOVEMENT_LINE.captures(line) {
            if let Some(movement) = movement_from(&caps[1], &caps[2]) {
                movements.push(movement);
            }
        } else if in_movements && DATE_ONLY.is_match(line) {
            if let Some(description) = lines.get(i + 1) {
                if let Some(movement) = movement_from(line, description) {
                    movements.push(movement);
                    i += 2;
                    continue;
                }
            }
        }

        i += 1;
    }

    movements
}

fn movement_from(date: &str, description: &str) -> Option<Movement> {
    let timestamp = parse_timestamp(date)?;
    let description = description.trim();
    if description.chars().count() < MIN_DESCRIPTION_LEN || DATE_ONLY.is_match(description) {
        return None;
    }
    Some(Movement::new(timestamp, "Movement", description, String::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    const TABLE_PAGE: &str = r#"
        <html><head><title>Consulta Processual</title>
        <script>var Classe = "ignored";</script></head>
        <body>
          <table>
            <tr><td><span class="label">Classe</span></td><td><span>Procedimento Comum Cível</span></td></tr>
            <tr><td>Assunto</td><td>Indenização por Dano Moral</td></tr>
            <tr><td>Foro</td><td>Foro Central Cível</td></tr>
            <tr><td>Vara</td><td>1ª Vara Cível</td></tr>
            <tr><td>Juiz</td><td>Maria Aparecida Souza</td></tr>
            <tr><td>Distribuição</td><td>15/03/2022 às 10:00 - Livre</td></tr>
            <tr><td>Valor da ação</td><td>R$ 35.000,50</td></tr>
          </table>
          <table id="partes">
            <tr><td>Reqte&nbsp;</td><td>Empresa ABC Ltda<br/><span>Advogado:&nbsp;</span>João Silva</td></tr>
            <tr><td>Reqdo&nbsp;</td><td>Carlos Oliveira</td></tr>
          </table>
          <h2>Movimentações</h2>
          <table>
            <tr><td>02/05/2022</td><td>Conclusos para Despacho</td></tr>
            <tr><td>15/03/2022</td><td>Distribuído Livremente (por Sorteio)</td></tr>
          </table>
        </body></html>
    "#;

    #[test]
    fn test_extract_table_layout() {
        let page = ScrapedPage::extract(TABLE_PAGE);

        assert_eq!(page.court_class.as_deref(), Some("Procedimento Comum Cível"));
        assert_eq!(page.subject.as_deref(), Some("Indenização por Dano Moral"));
        assert_eq!(page.division.as_deref(), Some("1ª Vara Cível"));
        assert_eq!(page.forum.as_deref(), Some("Foro Central Cível"));
        assert_eq!(page.judge.as_deref(), Some("Maria Aparecida Souza"));
        assert_eq!(page.claim_value, Some(dec!(35000.50)));
        assert_eq!(
            page.filing_date,
            Some(Utc.with_ymd_and_hms(2022, 3, 15, 0, 0, 0).unwrap())
        );

        assert_eq!(page.parties.len(), 2);
        assert_eq!(page.parties[0].name, "Empresa ABC Ltda");
        assert_eq!(page.parties[0].role, PartyRole::Plaintiff);
        assert_eq!(page.parties[0].attorney.as_deref(), Some("João Silva"));
        assert_eq!(page.parties[1].name, "Carlos Oliveira");
        assert_eq!(page.parties[1].role, PartyRole::Defendant);

        assert_eq!(page.movements.len(), 2);
        assert_eq!(page.movements[0].description, "Conclusos para Despacho");
    }

    #[test]
    fn test_label_without_value_is_rejected() {
        let html = "<div><p>Classe:</p><p>Assunto:</p><p>Vara: 2ª Vara Cível</p></div>";
        let page = ScrapedPage::extract(html);

        assert_eq!(page.court_class, None);
        assert_eq!(page.subject, None);
        assert_eq!(page.division.as_deref(), Some("2ª Vara Cível"));
    }

    #[test]
    fn test_value_repeating_label_is_rejected() {
        let html = "<p>Classe: Classe</p><p>Assunto: Assunto:</p>";
        let page = ScrapedPage::extract(html);

        assert_eq!(page.court_class, None);
        assert_eq!(page.subject, None);
    }

    #[test]
    fn test_inline_movements() {
        let html = "<pre>10/01/2024 - Petição inicial protocolada\n12/01/2024 - ok</pre>";
        let page = ScrapedPage::extract(html);

        assert_eq!(page.movements.len(), 1);
        assert_eq!(page.movements[0].description, "Petição inicial protocolada");
    }

    #[test]
    fn test_normalize_builds_case() {
        let number = CaseNumber::parse("1017593-56.2022.8.26.0001").unwrap();
        let case = normalize_scraped_page(&number, "TJSP", TABLE_PAGE).unwrap();

        assert_eq!(case.category, CaseCategory::Civil);
        assert_eq!(case.court, "TJSP");
        assert_eq!(case.division, "1ª Vara Cível");
        assert_eq!(case.client.name, "Empresa ABC Ltda");
        assert_eq!(case.responsible_attorney, "João Silva");
        assert_eq!(
            case.last_activity_date,
            Some(Utc.with_ymd_and_hms(2022, 5, 2, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_unrecognised_page_fails_loudly() {
        let number = CaseNumber::parse("1017593-56.2022.8.26.0001").unwrap();
        let err = normalize_scraped_page(&number, "TJRJ", "<html><body><h1>Manutenção</h1></body></html>")
            .unwrap_err();

        assert!(matches!(err, NormalizeError::UnrecognisedPage { court } if court == "TJRJ"));
    }

    #[test]
    fn test_labor_court_defaults_to_labor() {
        let number = CaseNumber::parse("1000123-45.2023.5.02.0001").unwrap();
        let case = normalize_scraped_page(&number, "TRT2", "<p>Vara: 1ª Vara do Trabalho</p>").unwrap();

        assert_eq!(case.category, CaseCategory::Labor);
    }
}
