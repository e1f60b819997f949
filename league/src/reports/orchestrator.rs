//! Report orchestrator: gateway, standings and renderer per request.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};

use super::errors::{ReportError, ReportResult};
use super::gateway::ReportDataGateway;
use super::pdf::{FlowConfig, FlowDocumentRenderer};
use super::xlsx::TabularWorkbookRenderer;
use super::{ReportBuffer, ReportData, ReportFormat, ReportKind, ReportRenderer, ReportRequest, report_filename};
use crate::db::ReportStore;
use crate::standings::{StandingsRow, compute_standings};
use crate::tournament::{Tournament, TournamentId};

/// Composes the pipeline for each report request.
///
/// Holds no mutable state; one instance is shared by all requests.
#[derive(Clone)]
pub struct ReportOrchestrator {
    gateway: ReportDataGateway,
    renderers: Vec<Arc<dyn ReportRenderer>>,
}

impl ReportOrchestrator {
    /// Create an orchestrator with the default renderers
    ///
    /// # Arguments
    ///
    /// * `store` - Report data store
    /// * `flow` - Page geometry for PDF output
    pub fn new(store: Arc<dyn ReportStore>, flow: FlowConfig) -> Self {
        Self::with_renderers(
            ReportDataGateway::new(store),
            vec![
                Arc::new(FlowDocumentRenderer::new(flow)) as Arc<dyn ReportRenderer>,
                Arc::new(TabularWorkbookRenderer) as Arc<dyn ReportRenderer>,
            ],
        )
    }

    /// Create an orchestrator with custom renderers, one per format
    pub fn with_renderers(
        gateway: ReportDataGateway,
        renderers: Vec<Arc<dyn ReportRenderer>>,
    ) -> Self {
        Self { gateway, renderers }
    }

    /// Generate a report stamped with the current time
    ///
    /// # Errors
    ///
    /// * `ReportError::UnsupportedFormat` - No renderer for the format
    /// * `ReportError::NotFound` - Root entity does not exist
    /// * `ReportError::Store` - Data store failure
    /// * `ReportError::RenderFailure` - Renderer failed
    pub async fn generate(&self, request: &ReportRequest) -> ReportResult<ReportBuffer> {
        self.generate_at(request, Utc::now()).await
    }

    /// Generate a report stamped with `generated_at`
    pub async fn generate_at(
        &self,
        request: &ReportRequest,
        generated_at: DateTime<Utc>,
    ) -> ReportResult<ReportBuffer> {
        let started = Instant::now();
        if !self.renderers.iter().any(|r| r.format() == request.format) {
            return Err(ReportError::UnsupportedFormat(format!(
                "no renderer for {}",
                request.format
            )));
        }
        let data = self.load(request.kind, request.target_id).await?;
        let buffer = self.render(&data, request.format, generated_at)?;

        log::info!(
            "Generated {} {} report for id {} ({} bytes) in {:?}",
            request.kind,
            request.format,
            request.target_id,
            buffer.bytes.len(),
            started.elapsed()
        );
        Ok(buffer)
    }

    /// Tournament header and ranked standings, for the JSON endpoint
    pub async fn standings(
        &self,
        tournament_id: TournamentId,
    ) -> ReportResult<(Tournament, Vec<StandingsRow>)> {
        let source = self.gateway.standings_source(tournament_id).await?;
        let rows = compute_standings(tournament_id, &source.teams, &source.matches);
        Ok((source.tournament, rows))
    }

    async fn load(&self, kind: ReportKind, target_id: i64) -> ReportResult<ReportData> {
        match kind {
            ReportKind::Teams => self.gateway.team_listing(target_id).await,
            ReportKind::Roster => self.gateway.roster(target_id).await,
            ReportKind::Fixture => self.gateway.fixture(target_id).await,
            ReportKind::Standings => {
                let (tournament, rows) = self.standings(target_id).await?;
                Ok(ReportData::Standings { tournament, rows })
            }
        }
    }

    /// Render loaded data into a buffer with its filename and mime type
    pub fn render(
        &self,
        data: &ReportData,
        format: ReportFormat,
        generated_at: DateTime<Utc>,
    ) -> ReportResult<ReportBuffer> {
        let renderer = self
            .renderers
            .iter()
            .find(|r| r.format() == format)
            .ok_or_else(|| ReportError::UnsupportedFormat(format!("no renderer for {format}")))?;

        let bytes = renderer
            .render(data, generated_at)
            .map_err(|source| ReportError::RenderFailure { format, source })?;

        Ok(ReportBuffer {
            bytes,
            mime_type: format.mime_type(),
            filename: report_filename(data.kind(), data.entity_name(), format),
        })
    }
}
