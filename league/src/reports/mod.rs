//! Report generation pipeline.
//!
//! A request names a report kind, the id of its root entity and an output
//! format. The [`ReportOrchestrator`] loads the data through the
//! [`ReportDataGateway`], computes standings when needed and hands the
//! resulting [`ReportData`] to one of two renderers:
//!
//! - [`FlowDocumentRenderer`]: paginated A4 PDF
//! - [`TabularWorkbookRenderer`]: single-sheet XLSX workbook
//!
//! Both renderers first build an in-memory layout (pages or a cell grid) and
//! only then encode it, so a failure never leaves a partial buffer behind.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

pub mod errors;
pub mod gateway;
pub mod orchestrator;
pub mod pdf;
pub mod style;
pub mod xlsx;

pub use errors::{RenderError, ReportError, ReportResult};
pub use gateway::{ReportDataGateway, StandingsSource};
pub use orchestrator::ReportOrchestrator;
pub use pdf::{FlowConfig, FlowDocument, FlowDocumentRenderer};
pub use style::{Alignment, Style, StylePreset};
pub use xlsx::{SheetLayout, TabularWorkbookRenderer};

use crate::standings::StandingsRow;
use crate::tournament::{FixtureEntry, Player, TeamProfile, TeamSummary, Tournament};

/// Report kinds, one per root entity listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Teams of a tournament
    Teams,
    /// Players of a team
    Roster,
    /// Matches of a tournament grouped by date
    Fixture,
    /// Ranked table of a tournament
    Standings,
}

impl ReportKind {
    /// Slug used as the filename prefix
    pub fn slug(&self) -> &'static str {
        match self {
            ReportKind::Teams => "equipos",
            ReportKind::Roster => "jugadores",
            ReportKind::Fixture => "fixture",
            ReportKind::Standings => "tabla_posiciones",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ReportKind {
    type Err = ReportError;

    /// Accepts the filename slugs and the route segments
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equipos" => Ok(ReportKind::Teams),
            "jugadores" => Ok(ReportKind::Roster),
            "fixture" => Ok(ReportKind::Fixture),
            "tabla_posiciones" | "tabla-posiciones" => Ok(ReportKind::Standings),
            other => Err(ReportError::UnsupportedFormat(format!(
                "unknown report type '{other}'"
            ))),
        }
    }
}

/// Output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    Pdf,
    Excel,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Excel => "xlsx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "application/pdf",
            ReportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Pdf => f.write_str("pdf"),
            ReportFormat::Excel => f.write_str("excel"),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(ReportFormat::Pdf),
            "excel" | "xlsx" => Ok(ReportFormat::Excel),
            other => Err(ReportError::UnsupportedFormat(format!(
                "unknown format '{other}'"
            ))),
        }
    }
}

/// Typed report request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRequest {
    pub kind: ReportKind,
    pub target_id: i64,
    pub format: ReportFormat,
}

impl ReportRequest {
    /// Validate raw request parameters
    ///
    /// # Errors
    ///
    /// * `ReportError::UnsupportedFormat` - Unknown kind or format
    /// * `ReportError::Validation` - Target id is not positive
    pub fn parse(kind: &str, target_id: i64, format: &str) -> ReportResult<Self> {
        let kind = kind.parse()?;
        let format = format.parse()?;

        Ok(Self {
            kind,
            target_id: validate_target_id(target_id)?,
            format,
        })
    }
}

/// Reject non-positive tournament or team ids
///
/// # Errors
///
/// * `ReportError::Validation` - `id` is zero or negative
pub fn validate_target_id(id: i64) -> ReportResult<i64> {
    if id <= 0 {
        return Err(ReportError::Validation(format!(
            "id must be a positive integer, got {id}"
        )));
    }
    Ok(id)
}

/// Everything a renderer needs for one report
#[derive(Debug, Clone, PartialEq)]
pub enum ReportData {
    Teams {
        tournament: Tournament,
        teams: Vec<TeamSummary>,
    },
    Roster {
        profile: TeamProfile,
        players: Vec<Player>,
    },
    Fixture {
        tournament: Tournament,
        matches: Vec<FixtureEntry>,
    },
    Standings {
        tournament: Tournament,
        rows: Vec<StandingsRow>,
    },
}

impl ReportData {
    pub fn kind(&self) -> ReportKind {
        match self {
            ReportData::Teams { .. } => ReportKind::Teams,
            ReportData::Roster { .. } => ReportKind::Roster,
            ReportData::Fixture { .. } => ReportKind::Fixture,
            ReportData::Standings { .. } => ReportKind::Standings,
        }
    }

    /// Name of the root entity, used in the filename
    pub fn entity_name(&self) -> &str {
        match self {
            ReportData::Teams { tournament, .. }
            | ReportData::Fixture { tournament, .. }
            | ReportData::Standings { tournament, .. } => &tournament.name,
            ReportData::Roster { profile, .. } => &profile.team.name,
        }
    }
}

/// Renders report data into a complete document
pub trait ReportRenderer: Send + Sync {
    fn format(&self) -> ReportFormat;

    /// Produce the whole document or fail; never a partial buffer
    fn render(&self, data: &ReportData, generated_at: DateTime<Utc>) -> Result<Vec<u8>, RenderError>;
}

/// Rendered report ready for the HTTP boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBuffer {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub filename: String,
}

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// `<kind>_<name>.<ext>`, each whitespace run in the name collapsed to `_`
pub fn report_filename(kind: ReportKind, entity_name: &str, format: ReportFormat) -> String {
    format!(
        "{}_{}.{}",
        kind.slug(),
        WHITESPACE_RUN.replace_all(entity_name, "_"),
        format.extension()
    )
}

/// `dd/mm/yyyy`, or `N/A` when absent
pub(crate) fn format_date(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub(crate) const NOT_AVAILABLE: &str = "N/A";

/// Number of leading standings rows rendered with emphasis
pub const PODIUM_SIZE: usize = 3;
