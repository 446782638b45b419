//! Amount parsing and formatting for Brazilian receipts.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use super::patterns::AMOUNT_PATTERN;

/// Parse the first Brazilian-formatted amount in `text` (e.g. "R$ 1.234,56").
///
/// Thousands separators are dots, the decimal separator is a comma. The result
/// is rounded to cents. Empty text, or text without a `digits,digits` group,
/// yields zero.
pub fn parse_brl_amount(text: &str) -> Decimal {
    let Some(caps) = AMOUNT_PATTERN.captures(text) else {
        return Decimal::ZERO;
    };

    let integer_part = caps[1].replace('.', "");
    let amount_str = format!("{}.{}", integer_part, &caps[2]);

    Decimal::from_str(&amount_str)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .unwrap_or(Decimal::ZERO)
}

/// Format an amount in Brazilian style (R$ 1.234,56).
pub fn format_brl_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let s = format!("{:.2}", rounded.abs());
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let chars: Vec<char> = integer_part.chars().collect();
    let mut grouped = String::new();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*c);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}R$ {},{}", sign, grouped, decimal_part)
}
