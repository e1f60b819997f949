//! # League
//!
//! Standings computation and report generation for amateur sports
//! tournaments.
//!
//! Finished match results are folded into a ranked standings table, and that
//! table (together with team, roster and fixture listings) is rendered into
//! two formats from one shared data model: a paginated PDF document and a
//! styled XLSX workbook.
//!
//! ## Core Modules
//!
//! - [`tournament`]: Tournament, team, player and match models
//! - [`standings`]: Match aggregation and the tie-break ordering
//! - [`reports`]: Data gateway, PDF and XLSX renderers, orchestrator
//! - [`db`]: Connection pool and the report store (PostgreSQL or in-memory)
//! - [`auth`]: Password login and JWT access tokens
//!
//! ## Example
//!
//! ```
//! use league::db::{MemoryStore, ReportStore};
//! use league::reports::{FlowConfig, ReportOrchestrator, ReportRequest};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store: Arc<dyn ReportStore> = Arc::new(MemoryStore::new());
//! let orchestrator = ReportOrchestrator::new(store, FlowConfig::default());
//!
//! let request = ReportRequest::parse("tabla_posiciones", 1, "pdf").unwrap();
//! // Tournament 1 does not exist in an empty store
//! assert!(orchestrator.generate(&request).await.is_err());
//! # }
//! ```

/// Authentication: login and access tokens.
pub mod auth;

/// Database connection pool and report store.
pub mod db;

/// Report data gateway, renderers and orchestrator.
pub mod reports;

/// Standings aggregation and ordering.
pub mod standings;

/// Tournament domain models.
pub mod tournament;

pub use reports::{ReportBuffer, ReportError, ReportFormat, ReportKind, ReportOrchestrator, ReportRequest};
pub use standings::{StandingsRow, compute_standings};
