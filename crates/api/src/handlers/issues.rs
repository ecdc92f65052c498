//! Handlers for the issue resource.
//!
//! Thin adapters between HTTP and [`IssueService`](crate::service::IssueService):
//! extract, delegate, pick the status code.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use issuetrack_core::issue::{CreateIssue, TechnicianUpdate, UpdateIssue};

use crate::error::AppResult;
use crate::extractors::{AppJson, IssueId};
use crate::query::IssueListQuery;
use crate::response::MessageResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /issues
// ---------------------------------------------------------------------------

/// List issues with pagination, search and resolution filter.
pub async fn list_issues(
    State(state): State<AppState>,
    Query(params): Query<IssueListQuery>,
) -> AppResult<impl IntoResponse> {
    let (filter, page) = params.into_parts();
    let result = state.issues.list(&filter, page).await?;
    Ok(Json(result))
}

// ---------------------------------------------------------------------------
// GET /issues/{id}
// ---------------------------------------------------------------------------

pub async fn get_issue(
    State(state): State<AppState>,
    IssueId(id): IssueId,
) -> AppResult<impl IntoResponse> {
    let issue = state.issues.get(id).await?;
    Ok(Json(issue))
}

// ---------------------------------------------------------------------------
// POST /issues
// ---------------------------------------------------------------------------

/// Submit a new issue.
pub async fn create_issue(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateIssue>,
) -> AppResult<impl IntoResponse> {
    let issue = state.issues.create(input).await?;
    Ok((StatusCode::CREATED, Json(issue)))
}

// ---------------------------------------------------------------------------
// PUT /issues/{id}
// ---------------------------------------------------------------------------

/// Full update. Omitted fields keep their stored values.
pub async fn update_issue(
    State(state): State<AppState>,
    IssueId(id): IssueId,
    AppJson(input): AppJson<UpdateIssue>,
) -> AppResult<impl IntoResponse> {
    let issue = state.issues.update(id, input).await?;
    Ok(Json(issue))
}

// ---------------------------------------------------------------------------
// PATCH /issues/{id}/tech
// ---------------------------------------------------------------------------

/// Technician update: name, notes and resolution flag together.
pub async fn update_technician_fields(
    State(state): State<AppState>,
    IssueId(id): IssueId,
    AppJson(input): AppJson<TechnicianUpdate>,
) -> AppResult<impl IntoResponse> {
    let issue = state.issues.update_technician(id, input).await?;
    Ok(Json(issue))
}

// ---------------------------------------------------------------------------
// DELETE /issues/{id}
// ---------------------------------------------------------------------------

pub async fn delete_issue(
    State(state): State<AppState>,
    IssueId(id): IssueId,
) -> AppResult<impl IntoResponse> {
    state.issues.delete(id).await?;
    Ok(Json(MessageResponse {
        message: "Issue deleted successfully",
    }))
}
