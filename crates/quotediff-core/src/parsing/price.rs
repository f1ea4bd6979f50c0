use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Literal price token for items included at no extra cost.
pub const STANDARD: &str = "Standard";

/// Normalize a price token to two decimals with thousands separators.
///
/// Handles formats like:
/// - "Standard" / "standard" -> "Standard"
/// - "4250" -> "4,250.00"
/// - "4,250.00" -> "4,250.00"
/// - "$1,316.5" -> "1,316.50"
/// - "-1200.00" -> "-1,200.00"
///
/// Returns None for anything that is not a number.
pub fn format_price(s: &str) -> Option<String> {
    let s = s.trim();
    if s.eq_ignore_ascii_case(STANDARD) {
        return Some(STANDARD.to_string());
    }

    let value = parse_amount(s)?;
    Some(format_amount(value))
}

/// Parse a price amount, tolerating a sign, a `$` and thousands separators.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let s = s.trim();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let digits: String = rest
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let value = Decimal::from_str(&digits).ok()?;
    Some(if negative { -value } else { value })
}

/// Render an amount as `-1,234.56`.
pub fn format_amount(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);

    let text = rounded.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{frac_part}")
}
