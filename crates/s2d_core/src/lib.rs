//! S2D Core - Configuration engine for the Sports2D settings tool
//!
//! This crate owns everything between the Sports2D TOML config file and an
//! editing front end, with zero UI dependencies:
//! - `config`: loading and atomically saving the document, format preserved
//! - `schema`: the static catalog of editable fields
//! - `fields`: typed field values, projection/merge, coercion of raw input
//! - `session`: edit batches and the apply/cancel commit flow
//! - `logging`: tracing setup shared by front ends

pub mod config;
pub mod fields;
pub mod logging;
pub mod schema;
pub mod session;
