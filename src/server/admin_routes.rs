//! Administrator-only management of profiles, projects and assignments.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

use super::extract::ApiJson;
use super::response::{parse_id, require_text, success};
use super::AppState;
use crate::auth::{issue_token, AuthUser};
use crate::constants::{DEFAULT_FTP_PATH, DEFAULT_FTP_PORT};
use crate::domain::{Profile, ProfileSummary, Project, ProjectSummary, Role, UserProject};
use crate::error::{EditorError, Result};
use crate::ftp::FtpConfig;

type Params = Query<HashMap<String, String>>;

fn param<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
    params.get(key).map(String::as_str)
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub success: bool,
    pub user: ProfileSummary,
    /// Shown once; only its hash is stored.
    pub token: String,
}

/// Project fields shared by create and update. Empty optional values fall
/// back to the defaults.
#[derive(Debug, Deserialize)]
pub struct ProjectRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    pub ftp_host: String,
    pub ftp_user: String,
    #[serde(default)]
    pub ftp_password: Option<String>,
    #[serde(default)]
    pub ftp_port: Option<u16>,
    #[serde(default)]
    pub ftp_path: Option<String>,
    #[serde(default)]
    pub public_url: Option<String>,
    #[serde(default)]
    pub target_files: Vec<String>,
}

impl ProjectRequest {
    fn validate(&self) -> Result<()> {
        require_text(&self.name, "name")?;
        require_text(&self.ftp_host, "ftp_host")?;
        require_text(&self.ftp_user, "ftp_user")
    }

    fn password(&self) -> Option<&str> {
        self.ftp_password.as_deref().filter(|p| !p.is_empty())
    }

    fn apply(self, project: &mut Project) {
        project.name = self.name;
        project.ftp_host = self.ftp_host;
        project.ftp_user = self.ftp_user;
        project.ftp_port = self.ftp_port.filter(|p| *p != 0).unwrap_or(DEFAULT_FTP_PORT);
        project.ftp_path = self
            .ftp_path
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_FTP_PATH.to_string());
        project.public_url = self.public_url.filter(|u| !u.trim().is_empty());
        project.target_files = self.target_files;
    }
}

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub project_id: Uuid,
    pub user_id: Uuid,
}

/// Either a stored project or credentials typed into the project form.
#[derive(Debug, Deserialize)]
pub struct TestConnectionRequest {
    #[serde(default)]
    pub project_id: Option<Uuid>,
    #[serde(default)]
    pub ftp_host: Option<String>,
    #[serde(default)]
    pub ftp_user: Option<String>,
    #[serde(default)]
    pub ftp_password: Option<String>,
    #[serde(default)]
    pub ftp_port: Option<u16>,
    #[serde(default)]
    pub ftp_path: Option<String>,
}

pub async fn list_users(State(state): State<AppState>, user: AuthUser) -> Result<Json<Vec<ProfileSummary>>> {
    user.require_admin()?;
    let profiles = state.storage.list_profiles().await?;
    Ok(Json(profiles.iter().map(ProfileSummary::from).collect()))
}

pub async fn create_user(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<Json<CreateUserResponse>> {
    user.require_admin()?;
    require_text(&req.email, "email")?;

    let (token, token_hash) = issue_token();
    let mut profile = Profile::new(req.email.trim().to_string(), req.role, token_hash);
    state.storage.create_profile(&mut profile).await?;

    info!("Admin {} created user {}", user.profile.email, profile.email);
    Ok(Json(CreateUserResponse {
        success: true,
        user: ProfileSummary::from(&profile),
        token,
    }))
}

pub async fn delete_user(State(state): State<AppState>, user: AuthUser, params: Params) -> Result<Json<Value>> {
    user.require_admin()?;
    let id = parse_id(param(&params, "id"), "id")?;
    if id == user.id {
        return Err(EditorError::Validation("you cannot delete your own account".to_string()));
    }

    state.storage.delete_profile(id).await?;
    info!("Admin {} deleted user {}", user.profile.email, id);
    Ok(success())
}

pub async fn create_project(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(req): ApiJson<ProjectRequest>,
) -> Result<Json<Value>> {
    user.require_admin()?;
    req.validate()?;
    let password = req
        .password()
        .ok_or_else(|| EditorError::Validation("ftp_password is required".to_string()))?;

    let encrypted = state.cipher.encrypt(password)?;
    let mut project = Project::new(String::new(), String::new(), String::new(), encrypted);
    req.apply(&mut project);
    state.storage.create_project(&mut project).await?;

    info!("Admin {} created project {}", user.profile.email, project.name);
    Ok(Json(json!({ "success": true, "project": ProjectSummary::from(&project) })))
}

pub async fn update_project(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(req): ApiJson<ProjectRequest>,
) -> Result<Json<Value>> {
    user.require_admin()?;
    req.validate()?;
    let id = req
        .id
        .ok_or_else(|| EditorError::Validation("id is required".to_string()))?;

    let mut project = state
        .storage
        .get_project(id)
        .await?
        .ok_or_else(|| EditorError::NotFound(format!("project {id}")))?;
    if let Some(password) = req.password() {
        project.ftp_password_encrypted = state.cipher.encrypt(password)?;
    }
    req.apply(&mut project);
    state.storage.update_project(&project).await?;

    info!("Admin {} updated project {}", user.profile.email, project.name);
    Ok(Json(json!({ "success": true, "project": ProjectSummary::from(&project) })))
}

pub async fn delete_project(State(state): State<AppState>, user: AuthUser, params: Params) -> Result<Json<Value>> {
    user.require_admin()?;
    let id = parse_id(param(&params, "id"), "id")?;
    state.storage.delete_project(id).await?;
    info!("Admin {} deleted project {}", user.profile.email, id);
    Ok(success())
}

pub async fn list_assignments(State(state): State<AppState>, user: AuthUser) -> Result<Json<Vec<UserProject>>> {
    user.require_admin()?;
    Ok(Json(state.storage.list_assignments().await?))
}

pub async fn assign_project(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(req): ApiJson<AssignRequest>,
) -> Result<Json<Value>> {
    user.require_admin()?;
    let mut assignment = UserProject::new(req.user_id, req.project_id);
    state.storage.assign_project(&mut assignment).await?;
    Ok(success())
}

pub async fn unassign_project(State(state): State<AppState>, user: AuthUser, params: Params) -> Result<Json<Value>> {
    user.require_admin()?;
    let project_id = parse_id(param(&params, "project_id"), "project_id")?;
    let user_id = parse_id(param(&params, "user_id"), "user_id")?;
    state.storage.unassign_project(user_id, project_id).await?;
    Ok(success())
}

pub async fn test_connection(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(req): ApiJson<TestConnectionRequest>,
) -> Result<Json<Value>> {
    user.require_admin()?;

    let config = match req.project_id {
        Some(id) => {
            let project = state
                .storage
                .get_project(id)
                .await?
                .ok_or_else(|| EditorError::NotFound(format!("project {id}")))?;
            FtpConfig::from(&project)
        }
        None => {
            let host = req.ftp_host.unwrap_or_default();
            let ftp_user = req.ftp_user.unwrap_or_default();
            let password = req.ftp_password.unwrap_or_default();
            require_text(&host, "ftp_host")?;
            require_text(&ftp_user, "ftp_user")?;
            require_text(&password, "ftp_password")?;
            FtpConfig {
                host,
                user: ftp_user,
                encrypted_password: state.cipher.encrypt(&password)?,
                port: req.ftp_port.filter(|p| *p != 0).unwrap_or(DEFAULT_FTP_PORT),
                path: req
                    .ftp_path
                    .filter(|p| !p.is_empty())
                    .unwrap_or_else(|| DEFAULT_FTP_PATH.to_string()),
            }
        }
    };

    let ok = state.files.test_connection(&config).await;
    Ok(Json(json!({ "success": ok })))
}
