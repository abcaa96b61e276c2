//! Locale-aware price formatting.
//!
//! Menu prices are listed in Bulgarian leva with a euro counterpart. The
//! formats follow what diners expect in each language:
//!
//! | locale | BGN          | EUR       |
//! |--------|--------------|-----------|
//! | `bg`   | `12,50 лв.`  | `12,50 €` |
//! | `en`   | `BGN 12.50`  | `€12.50`  |
//!
//! The space between amount and currency is always a non-breaking space.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::Locale;

const NBSP: char = '\u{a0}';

/// Fixed conversion rate of the Bulgarian lev to the euro.
pub const BGN_PER_EUR: Decimal = Decimal::from_parts(195_583, 0, 0, false, 5);

/// Currencies shown on the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Bgn,
    Eur,
}

/// Convert a lev amount to euro at the fixed rate, rounded to cents.
pub fn bgn_to_eur(amount: Decimal) -> Decimal {
    (amount / BGN_PER_EUR).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a price for display in `locale`.
pub fn format_price(amount: Decimal, currency: Currency, locale: Locale) -> String {
    let number = format_number(amount, locale);

    match (locale, currency) {
        (Locale::Bg, Currency::Bgn) => format!("{number}{NBSP}лв."),
        (Locale::Bg, Currency::Eur) => format!("{number}{NBSP}€"),
        (Locale::En, Currency::Bgn) => with_sign(&number, |n| format!("BGN{NBSP}{n}")),
        (Locale::En, Currency::Eur) => with_sign(&number, |n| format!("€{n}")),
    }
}

/// Keep a leading minus sign in front of an English currency prefix.
fn with_sign(number: &str, prefix: impl Fn(&str) -> String) -> String {
    match number.strip_prefix('-') {
        Some(rest) => format!("-{}", prefix(rest)),
        None => prefix(number),
    }
}

/// Two decimals with locale separators and grouping.
fn format_number(amount: Decimal, locale: Locale) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.2}", rounded.abs());
    let (integer, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let (group_separator, decimal_separator, min_grouping_digits) = match locale {
        Locale::En => (',', '.', 4),
        // Bulgarian leaves four-digit amounts ungrouped
        Locale::Bg => (NBSP, ',', 5),
    };

    let integer = if integer.len() >= min_grouping_digits {
        group_thousands(integer, group_separator)
    } else {
        integer.to_string()
    };

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    format!("{sign}{integer}{decimal_separator}{fraction}")
}

fn group_thousands(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}
