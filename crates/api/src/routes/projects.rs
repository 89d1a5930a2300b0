//! Project and planning row routes.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{delete, get, post},
};
use tracing::info;

use palco_core::planning::{CommunicationItem, NewCommunicationItem, NewTeamMember, TeamMember};
use palco_core::project::{Project, ProjectDetail, ProjectFields, UpdateProjectInput};
use palco_shared::types::{CommunicationItemId, ProjectId, TeamMemberId};

use crate::{AppState, error::ApiError};

/// Creates the project routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/{project_id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/projects/{project_id}/team-members", post(add_team_member))
        .route(
            "/projects/{project_id}/communication-items",
            post(add_communication_item),
        )
        .route("/team-members/{id}", delete(delete_team_member))
        .route("/communication-items/{id}", delete(delete_communication_item))
}

/// GET `/projects`
async fn list_projects(State(state): State<AppState>) -> Result<Json<Vec<Project>>, ApiError> {
    Ok(Json(state.projects().list_projects().await?))
}

/// POST `/projects`
async fn create_project(
    State(state): State<AppState>,
    payload: Result<Json<ProjectFields>, JsonRejection>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let Json(fields) = payload?;
    let project = state.projects().create_project(fields).await?;

    info!(project_id = %project.id, "project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET `/projects/{project_id}`
async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<ProjectDetail>, ApiError> {
    Ok(Json(state.projects().get_project(project_id).await?))
}

/// PUT `/projects/{project_id}`
async fn update_project(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    payload: Result<Json<UpdateProjectInput>, JsonRejection>,
) -> Result<Json<Project>, ApiError> {
    let Json(input) = payload?;
    let project = state.projects().update_project(project_id, input).await?;

    info!(project_id = %project.id, status = project.status.as_str(), "project updated");
    Ok(Json(project))
}

/// DELETE `/projects/{project_id}`
async fn delete_project(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> Result<StatusCode, ApiError> {
    state.projects().delete_project(project_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/projects/{project_id}/team-members`
async fn add_team_member(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    payload: Result<Json<NewTeamMember>, JsonRejection>,
) -> Result<(StatusCode, Json<TeamMember>), ApiError> {
    let Json(input) = payload?;
    let member = state.projects().add_team_member(project_id, input).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// POST `/projects/{project_id}/communication-items`
async fn add_communication_item(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    payload: Result<Json<NewCommunicationItem>, JsonRejection>,
) -> Result<(StatusCode, Json<CommunicationItem>), ApiError> {
    let Json(input) = payload?;
    let item = state
        .projects()
        .add_communication_item(project_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// DELETE `/team-members/{id}`
async fn delete_team_member(
    State(state): State<AppState>,
    Path(id): Path<TeamMemberId>,
) -> Result<StatusCode, ApiError> {
    state.projects().delete_team_member(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE `/communication-items/{id}`
async fn delete_communication_item(
    State(state): State<AppState>,
    Path(id): Path<CommunicationItemId>,
) -> Result<StatusCode, ApiError> {
    state.projects().delete_communication_item(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
