//! Diversified maximum-demand calculator for electrical installations.
//!
//! Applies the IET On-Site Guide diversity allowances (Table 1B for domestic
//! premises, Table H2 for commercial and industrial) to a list of classified
//! circuit loads and reports the diversified current with its working.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod conversion;
/// Grouping engine, result types and compliance notes.
pub mod diversity;
pub mod errors;
pub mod io;
pub mod loads;
pub mod report;
pub mod rules;
pub mod session;
