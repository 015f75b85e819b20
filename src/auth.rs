//! Bearer-token identity and project access checks.
//!
//! Tokens are random 32-byte hex strings handed out once when a profile is
//! created. Only their SHA-256 digest is stored.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{Profile, Project};
use crate::error::{EditorError, Result};
use crate::server::AppState;
use crate::storage::Storage;

pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Returns `(token, token_hash)`.
pub fn issue_token() -> (String, String) {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    let token = hex::encode(bytes);
    let hash = hash_token(&token);
    (token, hash)
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// The authenticated caller of a request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub profile: Profile,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.profile.is_admin()
    }

    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(EditorError::Forbidden("administrator privileges are required".to_string()))
        }
    }

    /// Load `project_id` if the caller is an admin or has been assigned to it.
    pub async fn ensure_project_access(&self, storage: &dyn Storage, project_id: Uuid) -> Result<Project> {
        if !self.is_admin() && storage.find_assignment(self.id, project_id).await?.is_none() {
            debug!("User {} denied access to project {}", self.id, project_id);
            return Err(EditorError::Forbidden("no access to this project".to_string()));
        }
        storage
            .get_project(project_id)
            .await?
            .ok_or_else(|| EditorError::NotFound(format!("project {project_id}")))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = EditorError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token = bearer_token(parts).ok_or(EditorError::Unauthorized)?;
        let profile = state
            .storage
            .find_profile_by_token_hash(&hash_token(token))
            .await?
            .ok_or(EditorError::Unauthorized)?;
        let id = profile.id.ok_or(EditorError::Unauthorized)?;
        Ok(AuthUser { id, profile })
    }
}
