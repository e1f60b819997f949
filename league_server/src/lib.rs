//! HTTP server exposing tournament standings and PDF/XLSX reports.
//!
//! The binary in `main.rs` wires configuration, logging and the database
//! pool into the [`api`] router; the modules are public so integration tests
//! can drive the router directly.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
