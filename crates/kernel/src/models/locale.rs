//! Supported display locales.
//!
//! The menu is published in exactly two languages. Locale codes coming from
//! requests are resolved leniently: anything outside the supported set falls
//! back to the configured default instead of failing the request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error for locale codes outside the supported set.
#[derive(Debug, Error)]
#[error("unsupported locale '{0}': expected 'en' or 'bg'")]
pub struct UnsupportedLocale(pub String);

/// A supported display locale.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Bulgarian.
    #[default]
    Bg,
    /// English.
    En,
}

impl Locale {
    /// All supported locales, in storage order.
    pub const ALL: [Locale; 2] = [Locale::Bg, Locale::En];

    /// Language code as stored in translation tables.
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::Bg => "bg",
            Locale::En => "en",
        }
    }

    /// Parse a locale code, returning `None` for unsupported values.
    ///
    /// Matching is case-insensitive and ignores region subtags
    /// (`en-US` → `en`, `bg_BG` → `bg`).
    pub fn parse(code: &str) -> Option<Self> {
        let primary = code
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match primary.as_str() {
            "bg" => Some(Locale::Bg),
            "en" => Some(Locale::En),
            _ => None,
        }
    }

    /// Parse a locale code, falling back to `fallback` when unsupported.
    pub fn resolve(code: &str, fallback: Locale) -> Self {
        Self::parse(code).unwrap_or(fallback)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnsupportedLocale(s.to_string()))
    }
}

impl TryFrom<String> for Locale {
    type Error = UnsupportedLocale;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
