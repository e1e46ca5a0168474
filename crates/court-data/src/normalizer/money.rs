//! Monetary amount parsing for scraped and loosely typed values.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Parses an amount such as `R$ 1.234,56`, `1234.56` or `1,234.56`.
///
/// Everything except digits, separators and a minus sign is dropped. The
/// right-most separator is the decimal one when it is followed by one or two
/// digits; every other separator groups thousands.
pub fn parse_money(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();
    let negative = cleaned.starts_with('-');
    // Scraped sentences often end in a period right after the amount.
    let body = cleaned.trim_start_matches('-').trim_end_matches([',', '.']);
    if !body.chars().any(|c| c.is_ascii_digit()) || body.contains('-') {
        return None;
    }

    let decimal_at = body
        .rfind([',', '.'])
        .filter(|&i| (1..=2).contains(&(body.len() - i - 1)));

    let mut normalized = String::with_capacity(body.len() + 1);
    if negative {
        normalized.push('-');
    }
    for (i, c) in body.char_indices() {
        match c {
            ',' | '.' if Some(i) == decimal_at => normalized.push('.'),
            ',' | '.' => {}
            _ => normalized.push(c),
        }
    }

    Decimal::from_str(&normalized).ok()
}

/// Reads an amount from a JSON number or string.
pub fn decimal_from_json(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Decimal::from)
            .or_else(|| n.as_f64().and_then(|f| Decimal::try_from(f).ok())),
        serde_json::Value::String(s) => parse_money(s),
        _ => None,
    }
}

/// Claim values are non-negative; anything else is treated as absent.
pub fn claim_value(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| !v.is_sign_negative())
}
