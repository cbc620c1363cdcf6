//! # HTTP API
//!
//! Routes, shared state and error mapping for the crew service.

pub mod crew;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use sitecrew_core::crew::PipelineFacade;
use sitecrew_core::error::CrewError;
use sitecrew_core::models::ModelConfig;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

/// Application state, cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub facade: Arc<PipelineFacade>,
    /// Endpoint settings, reported by `/health`
    pub model: Arc<ModelConfig>,
}

impl AppState {
    pub fn new(facade: PipelineFacade, model: ModelConfig) -> Self {
        Self {
            facade: Arc::new(facade),
            model: Arc::new(model),
        }
    }
}

/// Error body; never carries a `result` key
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    error: String,
}

/// A crew failure surfaced over HTTP
#[derive(Debug)]
pub struct ApiError(CrewError);

impl From<CrewError> for ApiError {
    fn from(err: CrewError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        if status.is_server_error() {
            tracing::error!("Crew request failed: {}", self.0);
        } else {
            tracing::warn!("Crew request rejected: {}", self.0);
        }
        (
            status,
            Json(ErrorBody {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(crew::run_crew, crew::run_agent_task, crew::list_agents, crew::health),
    components(schemas(
        crew::CrewRequest,
        crew::CrewResponse,
        crew::AgentTaskRequest,
        crew::AgentTaskResponse,
        crew::AgentSummary,
        crew::AgentsResponse,
        crew::HealthResponse,
        ErrorBody
    )),
    info(title = "SiteCrew API", description = "Four-agent webpage crew")
)]
pub struct ApiDoc;

async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Full application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(crew::crew_routes())
        .route("/openapi.json", get(serve_openapi))
        .with_state(state)
}
