//! Persistence of profiles, projects and project assignments.

mod in_memory;

pub use in_memory::InMemoryStorage;

use crate::domain::{Profile, Project, UserProject};
use crate::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Storage trait for dashboard records
#[async_trait]
pub trait Storage: Send + Sync {
    // Profile operations
    async fn create_profile(&self, profile: &mut Profile) -> Result<()>;
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>>;
    async fn find_profile_by_token_hash(&self, token_hash: &str) -> Result<Option<Profile>>;
    async fn list_profiles(&self) -> Result<Vec<Profile>>;
    /// Removes the profile together with its assignments.
    async fn delete_profile(&self, id: Uuid) -> Result<()>;

    // Project operations
    async fn create_project(&self, project: &mut Project) -> Result<()>;
    async fn update_project(&self, project: &Project) -> Result<()>;
    async fn get_project(&self, id: Uuid) -> Result<Option<Project>>;
    async fn list_projects(&self) -> Result<Vec<Project>>;
    /// Removes the project together with its assignments.
    async fn delete_project(&self, id: Uuid) -> Result<()>;

    // Assignment operations
    async fn assign_project(&self, assignment: &mut UserProject) -> Result<()>;
    async fn unassign_project(&self, user_id: Uuid, project_id: Uuid) -> Result<()>;
    async fn find_assignment(&self, user_id: Uuid, project_id: Uuid) -> Result<Option<UserProject>>;
    async fn list_assignments(&self) -> Result<Vec<UserProject>>;
    async fn list_projects_for_user(&self, user_id: Uuid) -> Result<Vec<Project>>;
}
