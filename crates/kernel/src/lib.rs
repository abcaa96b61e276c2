//! Omakase Kernel Library
//!
//! Bilingual (Bulgarian/English) restaurant menu: storage, query services and
//! the JSON API. The main entry point for running the server is the `omakase`
//! binary.

pub mod config;
pub mod db;
pub mod error;
pub mod intl;
pub mod menu;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod seed;
pub mod state;
