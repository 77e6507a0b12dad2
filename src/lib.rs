//! # CBR Gateway Library
//!
//! REST gateway over the Bank of Russia public XML endpoints.
//! Issues and persists bearer tokens, fetches the currency-code catalog,
//! daily rate tables and per-code rate dynamics, and reshapes the upstream
//! XML into JSON.
//!
//! Modules:
//! - `config` — service configuration (YAML + env expansion)
//! - `auth` — JWT issuing/validation and the email-keyed token store
//! - `cbr` — upstream XML client, catalog resolver, daily/dynamics fetchers
//! - `server` — Axum routers and request validation

pub mod config;
pub mod auth;
pub mod cbr;
pub mod observability;
pub mod server;
pub mod helpers;
pub mod utils;
pub mod tests;

pub use crate::config::settings::ServiceConfig;
