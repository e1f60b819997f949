//! HTTP API for the tournament report server.
//!
//! # Modules
//!
//! - [`auth`]: Login with email and password
//! - [`reports`]: PDF/XLSX report downloads and the standings JSON view
//! - [`middleware`]: Bearer token verification for protected endpoints
//! - [`request_id`]: Request correlation and HTTP metrics
//!
//! # Endpoints Overview
//!
//! ```text
//! GET  /health                                                  - Health check (public)
//! POST /api/v1/auth/login                                       - Login (public)
//! GET  /api/v1/reportes/equipos/torneo/{id}/{pdf|excel}         - Team listing
//! GET  /api/v1/reportes/jugadores/equipo/{id}/{pdf|excel}       - Team roster
//! GET  /api/v1/reportes/fixture/torneo/{id}/{pdf|excel}         - Fixture
//! GET  /api/v1/reportes/tabla-posiciones/torneo/{id}            - Standings (JSON)
//! GET  /api/v1/reportes/tabla-posiciones/torneo/{id}/{pdf|excel} - Standings
//! ```
//!
//! Every `/reportes` route requires `Authorization: Bearer <token>`.
//!
//! # CORS
//!
//! CORS is configured permissively. In production, configure appropriate
//! origins, methods, and headers.

pub mod auth;
pub mod middleware;
pub mod reports;
pub mod request_id;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use league::{auth::AuthManager, db::Database, reports::ReportOrchestrator};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub auth_manager: Arc<AuthManager>,
    pub orchestrator: Arc<ReportOrchestrator>,
    pub database: Database,
}

/// Uniform error body: `{ "success": false, "message": ... }`
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "success": false,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Create the complete API router with all endpoints and middleware.
///
/// # Arguments
///
/// - `state`: Application state
///
/// # Returns
///
/// Configured Axum router ready to serve requests
///
/// # Example
///
/// ```rust,no_run
/// # use league_server::api::{create_router, AppState};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// # let state: AppState = unimplemented!();
/// let app = create_router(state);
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```
pub fn create_router(state: AppState) -> Router {
    let v1_routes = create_v1_router(state.clone());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", v1_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API v1 routes
fn create_v1_router(state: AppState) -> Router<AppState> {
    let public_routes = Router::new().route("/auth/login", post(auth::login));

    let report_routes = Router::new()
        .route(
            "/equipos/torneo/{torneo_id}/{format}",
            get(reports::team_listing),
        )
        .route(
            "/jugadores/equipo/{equipo_id}/{format}",
            get(reports::team_roster),
        )
        .route(
            "/fixture/torneo/{torneo_id}/{format}",
            get(reports::fixture),
        )
        .route(
            "/tabla-posiciones/torneo/{torneo_id}",
            get(reports::standings_json),
        )
        .route(
            "/tabla-posiciones/torneo/{torneo_id}/{format}",
            get(reports::standings),
        )
        .layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .nest("/reportes", report_routes)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` when the database answers, `503 Service Unavailable`
/// otherwise.
///
/// ```bash
/// curl http://localhost:3000/health
/// # {"status":"healthy","version":"1.0.0","database":true,"timestamp":"2025-08-15T20:00:00Z"}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_healthy = match state.database.health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Database health check failed: {}", e);
            false
        }
    };

    let status_code = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if db_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_healthy,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
