//! Brazilian taxpayer ids: CPF (individuals, 11 digits) and CNPJ
//! (companies, 14 digits), both with two mod-11 check digits.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaxIdKind {
    Cpf,
    Cnpj,
}

/// Keeps only the digits of `input`.
pub fn digits_of(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Returns the kind of a valid tax id, or `None` when the check digits,
/// the length, or the characters are wrong.
pub fn classify_tax_id(input: &str) -> Option<TaxIdKind> {
    let digits = digits_of(input);
    match digits.len() {
        11 if is_valid_cpf(&digits) => Some(TaxIdKind::Cpf),
        14 if is_valid_cnpj(&digits) => Some(TaxIdKind::Cnpj),
        _ => None,
    }
}

pub fn is_valid_tax_id(input: &str) -> bool {
    classify_tax_id(input).is_some()
}

fn to_numbers(digits: &str) -> Vec<u32> {
    digits.chars().filter_map(|c| c.to_digit(10)).collect()
}

fn all_same(numbers: &[u32]) -> bool {
    numbers.windows(2).all(|w| w[0] == w[1])
}

fn is_valid_cpf(digits: &str) -> bool {
    let n = to_numbers(digits);
    if n.len() != 11 || all_same(&n) {
        return false;
    }

    let check = |len: usize| -> u32 {
        let sum: u32 = n[..len]
            .iter()
            .enumerate()
            .map(|(i, d)| d * (len as u32 + 1 - i as u32))
            .sum();
        match 11 - sum % 11 {
            10 | 11 => 0,
            r => r,
        }
    };

    check(9) == n[9] && check(10) == n[10]
}

fn is_valid_cnpj(digits: &str) -> bool {
    let n = to_numbers(digits);
    if n.len() != 14 || all_same(&n) {
        return false;
    }

    // Weights run 2..=9 from the right and wrap.
    let check = |len: usize| -> u32 {
        let sum: u32 = n[..len]
            .iter()
            .rev()
            .enumerate()
            .map(|(i, d)| d * (2 + (i as u32 % 8)))
            .sum();
        match sum % 11 {
            r if r < 2 => 0,
            r => 11 - r,
        }
    };

    check(12) == n[12] && check(13) == n[13]
}
