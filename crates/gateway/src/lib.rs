//! HTTP gateway for Speechlet.
//!
//! Delivers inbound skill events over HTTP and returns the single response
//! envelope (or a failure) for each one.
//!
//! Routes:
//! - `GET /health` — liveness probe
//! - `POST /skill` — execute one turn
//!
//! Built on Axum.

use axum::extract::DefaultBodyLimit;
use axum::extract::rejection::JsonRejection;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use speechlet_config::SkillConfig;
use speechlet_core::error::SkillError;
use speechlet_dispatch::Skill;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub skill: Skill,
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/skill", post(skill_handler))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
pub async fn start(config: SkillConfig, skill: Skill) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let state = Arc::new(GatewayState { skill });
    let app = build_router(state, config.gateway.max_body_bytes);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn skill_handler(
    State(state): State<SharedState>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response, SkillFailure> {
    let Json(event) = payload.map_err(|rejection| {
        warn!(
            status = %rejection.status(),
            error = %rejection.body_text(),
            "Rejected skill event body"
        );
        SkillFailure::Body(rejection)
    })?;

    match state.skill.execute_json(event).await {
        Ok(Some(envelope)) => Ok(Json(envelope).into_response()),
        Ok(None) => Ok(StatusCode::NO_CONTENT.into_response()),
        Err(e) => Err(SkillFailure::Skill(e)),
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

/// A failed turn rendered as an HTTP error with a JSON body.
enum SkillFailure {
    /// The skill rejected or failed the event.
    Skill(SkillError),
    /// The body never became an event: not JSON, wrong content type, or too large.
    Body(JsonRejection),
}

impl IntoResponse for SkillFailure {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Skill(e) => {
                let status = match &e {
                    SkillError::IdentityMismatch { .. } => StatusCode::FORBIDDEN,
                    SkillError::UnsupportedIntent(_) | SkillError::InvalidEvent(_) => {
                        StatusCode::BAD_REQUEST
                    }
                    SkillError::HandlerFault { .. } | SkillError::ResponseNotSent => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                let body = ErrorBody {
                    error: e.kind(),
                    message: e.to_string(),
                };
                (status, body)
            }
            Self::Body(rejection) => (
                rejection.status(),
                ErrorBody {
                    error: "invalid_event",
                    message: rejection.body_text(),
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}
