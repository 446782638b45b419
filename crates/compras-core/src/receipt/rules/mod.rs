//! Rule-based helpers for Brazilian NFC-e receipt pages.

pub mod amounts;
pub mod patterns;

pub use amounts::{format_brl_amount, parse_brl_amount};

use patterns::WHITESPACE;

/// Collapse runs of whitespace (including NBSP) and trim.
pub fn clean_text(s: &str) -> String {
    WHITESPACE.replace_all(s.trim(), " ").into_owned()
}

/// Whether a lowercased row name is a subtotal/total line rather than a product.
pub fn is_filler(name_lower: &str, filler_tokens: &[String]) -> bool {
    filler_tokens
        .iter()
        .any(|token| !token.is_empty() && name_lower.contains(token.as_str()))
}
