//! Locale negotiation.
//!
//! Resolves the locale for each request using a chain of negotiators.
//! Resolution order: `?locale=` query parameter → Accept-Language → default.
//! A negotiator that sees an unsupported value yields nothing, so resolution
//! falls through to the next one.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;

use crate::models::Locale;
use crate::state::AppState;

/// Trait for locale negotiation strategies.
pub trait LocaleNegotiator: Send + Sync {
    /// Attempt to negotiate a supported locale from the request.
    fn negotiate(&self, parts: &Parts) -> Option<Locale>;

    /// Priority of this negotiator (higher = checked first).
    fn priority(&self) -> i32;
}

#[derive(Debug, Deserialize)]
struct LocaleParam {
    locale: Option<String>,
}

/// Negotiates locale from the `locale` query parameter.
pub struct QueryParamNegotiator;

impl LocaleNegotiator for QueryParamNegotiator {
    fn negotiate(&self, parts: &Parts) -> Option<Locale> {
        let Query(param) = Query::<LocaleParam>::try_from_uri(&parts.uri).ok()?;
        Locale::parse(param.locale.as_deref()?)
    }

    fn priority(&self) -> i32 {
        100
    }
}

/// Negotiates locale from the Accept-Language HTTP header.
///
/// Returns the highest-quality entry whose primary subtag is supported.
pub struct AcceptLanguageNegotiator;

impl AcceptLanguageNegotiator {
    /// Parse Accept-Language header value into (language, quality) pairs,
    /// sorted by quality descending (stable sort preserves original order for ties).
    pub fn parse_accept_language(header: &str) -> Vec<(String, f32)> {
        let mut langs: Vec<(String, f32)> = header
            .split(',')
            .filter_map(|part| {
                let part = part.trim();
                if part.is_empty() {
                    return None;
                }

                let mut segments = part.split(';');
                let lang = segments.next()?.trim().to_lowercase();

                let quality = segments
                    .find_map(|s| {
                        let s = s.trim();
                        s.strip_prefix("q=")
                            .and_then(|q| q.trim().parse::<f32>().ok())
                    })
                    .unwrap_or(1.0)
                    .clamp(0.0, 1.0); // RFC 7231 §5.3.1: quality values are 0.000–1.000

                Some((lang, quality))
            })
            .collect();

        langs.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        langs
    }
}

impl LocaleNegotiator for AcceptLanguageNegotiator {
    fn negotiate(&self, parts: &Parts) -> Option<Locale> {
        let header = parts.headers.get("accept-language")?.to_str().ok()?;

        Self::parse_accept_language(header)
            .into_iter()
            // q=0 means "not acceptable"
            .filter(|(_, quality)| *quality > 0.0)
            .find_map(|(lang, _)| Locale::parse(&lang))
    }

    fn priority(&self) -> i32 {
        50
    }
}

/// Run the default negotiator chain, falling back to `default`.
pub fn negotiate_locale(parts: &Parts, default: Locale) -> Locale {
    let mut negotiators: [&dyn LocaleNegotiator; 2] =
        [&QueryParamNegotiator, &AcceptLanguageNegotiator];
    negotiators.sort_by_key(|n| std::cmp::Reverse(n.priority()));

    negotiators
        .iter()
        .find_map(|n| n.negotiate(parts))
        .unwrap_or(default)
}

/// The locale resolved for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLocale(pub Locale);

impl FromRequestParts<AppState> for RequestLocale {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(RequestLocale(negotiate_locale(parts, state.default_locale())))
    }
}
