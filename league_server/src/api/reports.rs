//! Report API handlers.
//!
//! Each binary route resolves to one [`ReportRequest`] and streams back the
//! finished buffer as an attachment. Nothing is written to the response until
//! the whole document has been rendered.
//!
//! ```bash
//! curl -H "Authorization: Bearer $TOKEN" -OJ \
//!   http://localhost:3000/api/v1/reportes/tabla-posiciones/torneo/1/pdf
//! ```

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use league::reports::{
    ReportBuffer, ReportError, ReportFormat, ReportKind, ReportRequest, ReportResult,
    validate_target_id,
};
use league::standings::StandingsRow;
use league::tournament::Tournament;
use serde::Serialize;
use std::time::Instant;

use super::{AppState, error_response, middleware::AuthenticatedUser};
use crate::{logging, metrics};

/// Tournament header of the standings view
#[derive(Debug, Serialize)]
pub struct TournamentHeader {
    pub id: i64,
    pub name: String,
    pub discipline: String,
}

#[derive(Debug, Serialize)]
pub struct StandingsResponse {
    pub success: bool,
    pub message: String,
    pub data: Vec<StandingsRow>,
    pub torneo: TournamentHeader,
}

/// `GET /reportes/equipos/torneo/{torneo_id}/{format}`
pub async fn team_listing(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((torneo_id, format)): Path<(String, String)>,
) -> Response {
    report(&state, &user, ReportKind::Teams, &torneo_id, &format).await
}

/// `GET /reportes/jugadores/equipo/{equipo_id}/{format}`
pub async fn team_roster(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((equipo_id, format)): Path<(String, String)>,
) -> Response {
    report(&state, &user, ReportKind::Roster, &equipo_id, &format).await
}

/// `GET /reportes/fixture/torneo/{torneo_id}/{format}`
pub async fn fixture(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((torneo_id, format)): Path<(String, String)>,
) -> Response {
    report(&state, &user, ReportKind::Fixture, &torneo_id, &format).await
}

/// `GET /reportes/tabla-posiciones/torneo/{torneo_id}/{format}`
pub async fn standings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((torneo_id, format)): Path<(String, String)>,
) -> Response {
    report(&state, &user, ReportKind::Standings, &torneo_id, &format).await
}

/// `GET /reportes/tabla-posiciones/torneo/{torneo_id}`
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "message": "Standings retrieved",
///   "data": [{ "team_id": 1, "team_name": "Leones", "points": 6, "...": "..." }],
///   "torneo": { "id": 1, "name": "Torneo Clausura 2025", "discipline": "Football" }
/// }
/// ```
pub async fn standings_json(
    State(state): State<AppState>,
    Path(torneo_id): Path<String>,
) -> Response {
    match load_standings(&state, &torneo_id).await {
        Ok((tournament, rows)) => Json(StandingsResponse {
            success: true,
            message: "Standings retrieved".to_string(),
            data: rows,
            torneo: TournamentHeader {
                id: tournament.id,
                name: tournament.name,
                discipline: tournament.discipline,
            },
        })
        .into_response(),
        Err(e) => report_error(&e),
    }
}

async fn report(
    state: &AppState,
    user: &AuthenticatedUser,
    kind: ReportKind,
    raw_id: &str,
    raw_format: &str,
) -> Response {
    let started = Instant::now();
    let result = generate(state, kind, raw_id, raw_format).await;

    let elapsed = started.elapsed();
    let outcome = outcome_label(&result);
    // Unknown formats share one label to bound metric cardinality
    let format = raw_format
        .parse::<ReportFormat>()
        .map_or_else(|_| "unknown".to_string(), |f| f.to_string());
    metrics::reports_generated_total(kind.slug(), &format, outcome);
    metrics::report_duration_ms(kind.slug(), &format, elapsed.as_secs_f64() * 1000.0);
    logging::log_report(
        &format!("{}/{}", kind.slug(), format),
        raw_id.trim().parse().unwrap_or_default(),
        elapsed.as_millis() as u64,
        outcome,
    );

    match result {
        Ok(buffer) => {
            tracing::info!(
                user_id = user.id,
                "Report {} sent ({} bytes)",
                buffer.filename,
                buffer.bytes.len()
            );
            attachment(buffer)
        }
        Err(e) => report_error(&e),
    }
}

async fn generate(
    state: &AppState,
    kind: ReportKind,
    raw_id: &str,
    raw_format: &str,
) -> ReportResult<ReportBuffer> {
    let request = ReportRequest::parse(kind.slug(), parse_id(raw_id)?, raw_format)?;
    state.orchestrator.generate(&request).await
}

async fn load_standings(
    state: &AppState,
    raw_id: &str,
) -> ReportResult<(Tournament, Vec<StandingsRow>)> {
    let id = validate_target_id(parse_id(raw_id)?)?;
    state.orchestrator.standings(id).await
}

fn parse_id(raw: &str) -> Result<i64, ReportError> {
    raw.trim()
        .parse()
        .map_err(|_| ReportError::Validation(format!("id must be a positive integer, got '{raw}'")))
}

fn outcome_label<T>(result: &Result<T, ReportError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(ReportError::NotFound { .. }) => "not_found",
        Err(e) if e.is_client_error() => "invalid",
        Err(_) => "error",
    }
}

fn report_error(error: &ReportError) -> Response {
    let status = match error {
        ReportError::NotFound { .. } => StatusCode::NOT_FOUND,
        e if e.is_client_error() => StatusCode::BAD_REQUEST,
        e => {
            tracing::error!("Report generation failed: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_response(status, error.client_message())
}

fn attachment(buffer: ReportBuffer) -> Response {
    let disposition = content_disposition(&buffer.filename);
    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(buffer.mime_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        buffer.bytes,
    )
        .into_response()
}

/// `attachment; filename="<name>"`, quotes and backslashes escaped
fn content_disposition(filename: &str) -> HeaderValue {
    let escaped = filename.replace('\\', "\\\\").replace('"', "\\\"");
    HeaderValue::from_bytes(format!("attachment; filename=\"{escaped}\"").as_bytes())
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use league::db::StoreError;
    use std::time::Duration;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("12").unwrap(), 12);
        assert_eq!(parse_id(" 7 ").unwrap(), 7);
        assert!(matches!(parse_id("abc"), Err(ReportError::Validation(_))));
        assert!(matches!(parse_id("1.5"), Err(ReportError::Validation(_))));
    }

    #[test]
    fn test_error_status_mapping() {
        let not_found = ReportError::NotFound {
            entity: "Tournament",
            id: 9,
        };
        assert_eq!(report_error(&not_found).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            report_error(&ReportError::UnsupportedFormat("docx".to_string())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            report_error(&ReportError::Validation("bad id".to_string())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            report_error(&ReportError::Store(StoreError::Timeout(Duration::from_secs(5)))).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(outcome_label::<()>(&Ok(())), "ok");
        assert_eq!(
            outcome_label::<()>(&Err(ReportError::NotFound { entity: "Team", id: 1 })),
            "not_found"
        );
        assert_eq!(
            outcome_label::<()>(&Err(ReportError::UnsupportedFormat("csv".to_string()))),
            "invalid"
        );
        assert_eq!(outcome_label::<()>(&Err(ReportError::Store(StoreError::Timeout(Duration::from_secs(5))))), "error");
    }

    #[test]
    fn test_content_disposition_escapes_quotes() {
        assert_eq!(
            content_disposition("fixture_Copa_2025.pdf"),
            "attachment; filename=\"fixture_Copa_2025.pdf\""
        );
        assert_eq!(
            content_disposition("equipos_Liga_\"A\".xlsx"),
            "attachment; filename=\"equipos_Liga_\\\"A\\\".xlsx\""
        );
        assert_eq!(
            content_disposition("jugadores_Cóndores.pdf").as_bytes(),
            "attachment; filename=\"jugadores_Cóndores.pdf\"".as_bytes()
        );
    }
}
