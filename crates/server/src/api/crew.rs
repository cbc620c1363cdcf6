//! # Crew API
//!
//! `POST /crewai` runs the full crew. The remaining routes are what the
//! browser connector probes: health, the agent roster, and one-off tasks
//! for a single agent.

use axum::{
    body::Bytes,
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ApiError, AppState, ErrorBody};

/// Request to run the crew
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CrewRequest {
    /// Webpage topic; the default topic is used when absent
    #[serde(default)]
    pub prompt: Option<String>,
}

impl CrewRequest {
    /// Parse a body leniently: anything unreadable counts as `{}`
    fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_else(|e| {
            if !body.is_empty() {
                tracing::debug!("Unreadable crew request body, using default topic: {}", e);
            }
            Self::default()
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CrewResponse {
    pub result: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AgentTaskRequest {
    pub agent_id: String,
    pub task: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AgentTaskResponse {
    pub success: bool,
    pub result: String,
    pub agent: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AgentSummary {
    pub id: String,
    pub role: String,
    pub goal: String,
    pub backstory: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AgentsResponse {
    pub agents: Vec<AgentSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub base_url: String,
}

pub fn crew_routes() -> Router<AppState> {
    Router::new()
        .route("/crewai", post(run_crew))
        .route("/agent/task", post(run_agent_task))
        .route("/agents", get(list_agents))
        .route("/health", get(health))
}

/// Run architect → coder → tester → documenter on a topic
#[utoipa::path(
    post,
    path = "/crewai",
    request_body = CrewRequest,
    responses(
        (status = 200, description = "Final crew output", body = CrewResponse),
        (status = 500, description = "A task failed", body = ErrorBody)
    )
)]
pub async fn run_crew(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CrewResponse>, ApiError> {
    let request = CrewRequest::from_body(&body);
    let output = state.facade.kickoff(request.prompt).await?;
    Ok(Json(CrewResponse { result: output.raw }))
}

/// Run one free-form task with a single agent
#[utoipa::path(
    post,
    path = "/agent/task",
    request_body = AgentTaskRequest,
    responses(
        (status = 200, description = "Agent output", body = AgentTaskResponse),
        (status = 404, description = "Unknown agent", body = ErrorBody),
        (status = 500, description = "The task failed", body = ErrorBody)
    )
)]
pub async fn run_agent_task(
    State(state): State<AppState>,
    Json(req): Json<AgentTaskRequest>,
) -> Result<Json<AgentTaskResponse>, ApiError> {
    let output = state.facade.run_single(&req.agent_id, &req.task).await?;
    Ok(Json(AgentTaskResponse {
        success: true,
        result: output.raw,
        agent: output.agent,
    }))
}

/// Agents in pipeline order
#[utoipa::path(
    get,
    path = "/agents",
    responses((status = 200, description = "Agent roster", body = AgentsResponse))
)]
pub async fn list_agents(State(state): State<AppState>) -> Json<AgentsResponse> {
    let agents = state
        .facade
        .roster()
        .into_iter()
        .map(|(id, persona)| AgentSummary {
            id: id.to_string(),
            role: persona.role.clone(),
            goal: persona.goal.clone(),
            backstory: persona.backstory.clone(),
        })
        .collect();
    Json(AgentsResponse { agents })
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model: state.model.model.clone(),
        base_url: state.model.base_url.clone(),
    })
}
