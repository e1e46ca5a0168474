//! Category and status classification tables.

use crate::models::{CaseCategory, CaseStatus};

/// Numeric class-code buckets of the national class table.
const CLASS_CODE_BUCKETS: &[(i64, i64, CaseCategory)] = &[
    (1000, 2000, CaseCategory::Civil),
    (2000, 3000, CaseCategory::Criminal),
    (3000, 4000, CaseCategory::Labor),
    (4000, 5000, CaseCategory::Tax),
    (5000, 6000, CaseCategory::Administrative),
];

/// Keywords in a class name, checked in order.
const CLASS_NAME_KEYWORDS: &[(&[&str], CaseCategory)] = &[
    (&["trabalhista", "reclamação", "labor"], CaseCategory::Labor),
    (&["criminal", "penal"], CaseCategory::Criminal),
    (&["tributário", "tributaria", "fiscal", "tax"], CaseCategory::Tax),
    (&["administrativo", "administrative"], CaseCategory::Administrative),
];

/// Keywords in a situation text, checked in order. Anything else is active.
const SITUATION_KEYWORDS: &[(&[&str], CaseStatus)] = &[
    (
        &["archived", "filed-away", "filed away", "arquivado", "arquivamento", "baixado"],
        CaseStatus::Archived,
    ),
    (&["suspended", "suspenso", "suspensão"], CaseStatus::Suspended),
    (
        &["concluded", "finalized", "concluido", "concluído", "conclusão", "finalizado"],
        CaseStatus::Concluded,
    ),
];

/// Category from a numeric class code. Missing or out-of-range codes are civil.
pub fn category_from_class_code(code: Option<i64>) -> CaseCategory {
    let Some(code) = code else {
        return CaseCategory::Civil;
    };
    CLASS_CODE_BUCKETS
        .iter()
        .find(|(start, end, _)| (*start..*end).contains(&code))
        .map(|(_, _, category)| *category)
        .unwrap_or(CaseCategory::Civil)
}

/// Category from a free-text class name.
pub fn category_from_class_name(name: Option<&str>) -> Option<CaseCategory> {
    let lower = name?.to_lowercase();
    CLASS_NAME_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, category)| *category)
}

/// Status from the situation text reported by a source.
pub fn status_from_situation(situation: Option<&str>) -> CaseStatus {
    let Some(situation) = situation else {
        return CaseStatus::Active;
    };
    let lower = situation.to_lowercase();
    SITUATION_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, status)| *status)
        .unwrap_or(CaseStatus::Active)
}
