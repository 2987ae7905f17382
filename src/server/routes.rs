//! Request handlers - one handler per endpoint, each a single store call

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::Error;
use crate::bug::{Bug, BugPriority, BugStatus, NewBug};
use crate::server::AppState;
use crate::user::Role;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportBugRequest {
    pub title: String,
    pub description: String,
    pub status: Option<BugStatus>,
    pub priority: Option<BugPriority>,
    pub assigned_to: Option<i64>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssignBugRequest {
    pub assigned_to: i64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddCommentRequest {
    pub user_id: i64,
    pub text: String,
}

#[derive(Deserialize)]
pub struct ListBugsParams {
    pub status: Option<BugStatus>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Row shape returned by `GET /bugs`
#[derive(Serialize)]
pub struct BugSummary {
    pub id: i64,
    pub title: String,
    pub status: BugStatus,
    pub priority: BugPriority,
    pub assigned_to: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

impl From<Bug> for BugSummary {
    fn from(bug: Bug) -> Self {
        Self {
            id: bug.id,
            title: bug.title,
            status: bug.status,
            priority: bug.priority,
            assigned_to: bug.assigned_to,
            updated_at: bug.updated_at,
        }
    }
}

/// Row shape returned by `GET /bugs/{bug_id}/comments`
#[derive(Serialize)]
pub struct CommentView {
    pub user_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

fn error_response(err: Error) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        // Exact body shape callers rely on
        Error::BugNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Bug not found".to_string(),
            }),
        ),
        Error::DuplicateEmail(_) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: err.to_string(),
            }),
        ),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: other.to_string(),
            }),
        ),
    }
}

pub async fn home() -> &'static str {
    "Bug Tracker API is Running!"
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    let store = state.store.lock().await;
    let user = store
        .create_user(&req.name, &req.email, req.role)
        .map_err(error_response)?;

    tracing::debug!("created user {} ({})", user.id, user.email);
    Ok(Json(serde_json::json!({"message": "User created"})))
}

pub async fn report_bug(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReportBugRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    let report = NewBug {
        title: req.title,
        description: req.description,
        status: req.status,
        priority: req.priority,
        assigned_to: req.assigned_to,
    };

    let store = state.store.lock().await;
    let bug = store.create_bug(&report).map_err(error_response)?;

    tracing::debug!("reported bug {} ({})", bug.id, bug.title);
    Ok(Json(serde_json::json!({"message": "Bug reported"})))
}

pub async fn list_bugs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListBugsParams>,
) -> Result<Json<Vec<BugSummary>>, (StatusCode, Json<ErrorResponse>)> {
    let store = state.store.lock().await;
    let bugs = store.list_bugs(params.status).map_err(error_response)?;

    Ok(Json(bugs.into_iter().map(BugSummary::from).collect()))
}

pub async fn assign_bug(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<AssignBugRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    let store = state.store.lock().await;
    let bug = store
        .assign_bug(id, req.assigned_to)
        .map_err(error_response)?;

    tracing::debug!("assigned bug {} to user {}", bug.id, req.assigned_to);
    Ok(Json(serde_json::json!({"message": "Bug assigned"})))
}

pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    Path(bug_id): Path<i64>,
    Json(req): Json<AddCommentRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    let store = state.store.lock().await;
    store
        .create_comment(bug_id, req.user_id, &req.text)
        .map_err(error_response)?;

    Ok(Json(serde_json::json!({"message": "Comment added"})))
}

pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(bug_id): Path<i64>,
) -> Result<Json<Vec<CommentView>>, (StatusCode, Json<ErrorResponse>)> {
    let store = state.store.lock().await;
    let comments = store.list_comments(bug_id).map_err(error_response)?;

    let views = comments
        .into_iter()
        .map(|c| CommentView {
            user_id: c.user_id,
            text: c.text,
            created_at: c.created_at,
        })
        .collect();

    Ok(Json(views))
}
