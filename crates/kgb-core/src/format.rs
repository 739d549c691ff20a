//! Display formatting for currency and date cells.
//!
//! Both formatters degrade to a placeholder rather than failing.

use crate::date::{format_long, parse_date_or_today};

/// Shown for empty or non-numeric salary cells.
pub const ZERO_RUPIAH: &str = "Rp 0";

/// Shown for empty date cells.
pub const NO_DATE: &str = "-";

/// Format a salary cell as Rupiah with dot-grouped thousands and no decimals.
///
/// All non-digit characters are stripped first, so "Rp 1.500.000,-" and
/// "1500000" both render as `Rp 1.500.000` (with a non-breaking space, as
/// the id-ID locale does).
pub fn format_currency(amount: Option<&str>) -> String {
    let Some(amount) = amount.filter(|a| !a.trim().is_empty()) else {
        return ZERO_RUPIAH.to_string();
    };

    let digits: String = amount.chars().filter(|c| c.is_ascii_digit()).collect();
    let Ok(value) = digits.parse::<u128>() else {
        return ZERO_RUPIAH.to_string();
    };

    format!("Rp\u{a0}{}", group_thousands(value))
}

/// Format a date cell in the long Indonesian form, or `-` when empty.
///
/// Unrecognised text follows the parser's fallback and renders as today.
pub fn format_date(text: &str) -> String {
    if text.trim().is_empty() {
        return NO_DATE.to_string();
    }
    format_long(parse_date_or_today(text))
}

fn group_thousands(value: u128) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, c) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}
