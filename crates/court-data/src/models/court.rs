//! Court identification from the justice segment and court code of a case number.

use super::CaseNumber;

/// State courts indexed by their two-digit code in segment `8`.
const STATE_COURTS: &[(&str, &str)] = &[
    ("01", "TJAC"),
    ("02", "TJAL"),
    ("03", "TJAP"),
    ("04", "TJAM"),
    ("05", "TJBA"),
    ("06", "TJCE"),
    ("07", "TJDFT"),
    ("08", "TJES"),
    ("09", "TJGO"),
    ("10", "TJMA"),
    ("11", "TJMT"),
    ("12", "TJMS"),
    ("13", "TJMG"),
    ("14", "TJPA"),
    ("15", "TJPB"),
    ("16", "TJPR"),
    ("17", "TJPE"),
    ("18", "TJPI"),
    ("19", "TJRJ"),
    ("20", "TJRN"),
    ("21", "TJRS"),
    ("22", "TJRO"),
    ("23", "TJRR"),
    ("24", "TJSC"),
    ("25", "TJSE"),
    ("26", "TJSP"),
    ("27", "TJTO"),
];

/// Identifies the court acronym (`TJSP`, `TRT2`, `TRF1`, `STJ`, ...) a case
/// number belongs to.
pub fn court_acronym(number: &CaseNumber) -> Option<String> {
    let segment = number.justice_segment()?;
    let code = number.court_code()?;

    match segment {
        '1' => Some("STF".to_string()),
        '3' => Some("STJ".to_string()),
        '4' => regional_court("TRF", code, 6),
        '5' if code == "00" => Some("TST".to_string()),
        '5' => regional_court("TRT", code, 24),
        '8' => STATE_COURTS
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, acronym)| acronym.to_string()),
        _ => None,
    }
}

/// Name of the public registry index serving `acronym`.
pub fn registry_index(acronym: &str) -> String {
    format!("api_publica_{}", acronym.to_lowercase())
}

fn regional_court(prefix: &str, code: &str, max: u8) -> Option<String> {
    let region: u8 = code.parse().ok()?;
    (1..=max)
        .contains(&region)
        .then(|| format!("{}{}", prefix, region))
}
