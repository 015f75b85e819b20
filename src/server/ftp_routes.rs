use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use super::extract::ApiJson;
use super::response::{require_text, success};
use super::AppState;
use crate::auth::AuthUser;
use crate::domain::ProjectSummary;
use crate::error::Result;
use crate::ftp::FtpConfig;

#[derive(Debug, Deserialize)]
pub struct ReadRequest {
    pub project_id: Uuid,
    pub file_path: String,
}

#[derive(Debug, Deserialize)]
pub struct WriteRequest {
    pub project_id: Uuid,
    pub file_path: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ListRequest {
    pub project_id: Uuid,
    #[serde(default)]
    pub dir: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReadResponse {
    pub success: bool,
    pub content: String,
}

/// Projects visible to the caller: all of them for admins, assigned ones otherwise.
pub async fn list_projects(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ProjectSummary>>> {
    let projects = if user.is_admin() {
        state.storage.list_projects().await?
    } else {
        state.storage.list_projects_for_user(user.id).await?
    };
    Ok(Json(projects.iter().map(ProjectSummary::from).collect()))
}

pub async fn read_file(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(req): ApiJson<ReadRequest>,
) -> Result<Json<ReadResponse>> {
    require_text(&req.file_path, "file_path")?;
    let project = user
        .ensure_project_access(state.storage.as_ref(), req.project_id)
        .await?;

    let content = state
        .files
        .read_file(&FtpConfig::from(&project), &req.file_path)
        .await?;
    Ok(Json(ReadResponse {
        success: true,
        content,
    }))
}

pub async fn write_file(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(req): ApiJson<WriteRequest>,
) -> Result<Json<Value>> {
    require_text(&req.file_path, "file_path")?;
    let project = user
        .ensure_project_access(state.storage.as_ref(), req.project_id)
        .await?;

    state
        .files
        .write_file(&FtpConfig::from(&project), &req.file_path, &req.content)
        .await?;
    info!("User {} saved {} on project {}", user.profile.email, req.file_path, project.name);
    Ok(success())
}

pub async fn list_files(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(req): ApiJson<ListRequest>,
) -> Result<Json<Value>> {
    let project = user
        .ensure_project_access(state.storage.as_ref(), req.project_id)
        .await?;

    let files = state
        .files
        .list_files(&FtpConfig::from(&project), req.dir.as_deref())
        .await?;
    Ok(Json(json!({ "success": true, "files": files })))
}
