use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{DEFAULT_FTP_PATH, DEFAULT_FTP_PORT, DEFAULT_TARGET_FILE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Option<Uuid>,
    pub email: String,
    pub role: Role,
    /// SHA-256 hex of the bearer token issued at creation.
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(email: String, role: Role, token_hash: String) -> Self {
        Self {
            id: None,
            email,
            role,
            token_hash,
            created_at: Utc::now(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// A site reachable over FTP together with the files users may edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Option<Uuid>,
    pub name: String,
    pub ftp_host: String,
    pub ftp_user: String,
    pub ftp_password_encrypted: String,
    pub ftp_port: u16,
    pub ftp_path: String,
    pub target_files: Vec<String>,
    pub public_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: String, ftp_host: String, ftp_user: String, ftp_password_encrypted: String) -> Self {
        Self {
            id: None,
            name,
            ftp_host,
            ftp_user,
            ftp_password_encrypted,
            ftp_port: DEFAULT_FTP_PORT,
            ftp_path: DEFAULT_FTP_PATH.to_string(),
            target_files: Vec::new(),
            public_url: None,
            created_at: Utc::now(),
        }
    }

    /// `index.html` when listed, otherwise the first target file.
    pub fn default_file(&self) -> Option<&str> {
        self.target_files
            .iter()
            .find(|f| f.as_str() == DEFAULT_TARGET_FILE)
            .or_else(|| self.target_files.first())
            .map(String::as_str)
    }
}

/// Profile as returned to administrators, without the token hash.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummary {
    pub id: Option<Uuid>,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<&Profile> for ProfileSummary {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            email: profile.email.clone(),
            role: profile.role,
            created_at: profile.created_at,
        }
    }
}

/// Projection of a project safe to hand to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    pub id: Option<Uuid>,
    pub name: String,
    pub ftp_host: String,
    pub ftp_user: String,
    pub ftp_port: u16,
    pub ftp_path: String,
    pub target_files: Vec<String>,
    pub public_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            ftp_host: project.ftp_host.clone(),
            ftp_user: project.ftp_user.clone(),
            ftp_port: project.ftp_port,
            ftp_path: project.ftp_path.clone(),
            target_files: project.target_files.clone(),
            public_url: project.public_url.clone(),
            created_at: project.created_at,
        }
    }
}

/// Grants one user access to one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProject {
    pub id: Option<Uuid>,
    pub user_id: Uuid,
    pub project_id: Uuid,
    pub assigned_at: DateTime<Utc>,
}

impl UserProject {
    pub fn new(user_id: Uuid, project_id: Uuid) -> Self {
        Self {
            id: None,
            user_id,
            project_id,
            assigned_at: Utc::now(),
        }
    }
}
