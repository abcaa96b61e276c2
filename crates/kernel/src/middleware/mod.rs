//! HTTP request processing components.
//!
//! Provides locale negotiation for the JSON API.

pub mod language;

pub use language::{RequestLocale, negotiate_locale};
