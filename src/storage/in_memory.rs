use super::Storage;
use crate::domain::{Profile, Project, UserProject};
use crate::error::{EditorError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    profiles: HashMap<Uuid, Profile>,
    projects: HashMap<Uuid, Project>,
    assignments: HashMap<Uuid, UserProject>,
}

/// In-memory storage, optionally mirrored to a JSON snapshot file that is
/// rewritten after every mutation.
pub struct InMemoryStorage {
    state: Mutex<Snapshot>,
    snapshot_path: Option<PathBuf>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(Snapshot::default()),
            snapshot_path: None,
        }
    }

    /// Load the snapshot at `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let snapshot = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            Snapshot::default()
        };

        info!(
            "Opened storage at {} ({} profiles, {} projects)",
            path.display(),
            snapshot.profiles.len(),
            snapshot.projects.len()
        );
        Ok(Self {
            state: Mutex::new(snapshot),
            snapshot_path: Some(path),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Snapshot>> {
        self.state
            .lock()
            .map_err(|_| EditorError::Storage("storage lock poisoned".to_string()))
    }

    fn persist(&self, snapshot: &Snapshot) -> Result<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(snapshot)?)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

fn sorted_by<T: Clone, K: Ord>(items: &HashMap<Uuid, T>, key: impl Fn(&T) -> K) -> Vec<T> {
    let mut out: Vec<T> = items.values().cloned().collect();
    out.sort_by_key(key);
    out
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn create_profile(&self, profile: &mut Profile) -> Result<()> {
        let mut state = self.lock()?;
        let email = profile.email.trim().to_lowercase();
        if state.profiles.values().any(|p| p.email.to_lowercase() == email) {
            return Err(EditorError::Conflict(format!(
                "email {} is already registered",
                profile.email
            )));
        }

        let id = Uuid::new_v4();
        profile.id = Some(id);
        state.profiles.insert(id, profile.clone());
        self.persist(&state)?;

        debug!("Created profile: {} with id {}", profile.email, id);
        Ok(())
    }

    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>> {
        Ok(self.lock()?.profiles.get(&id).cloned())
    }

    async fn find_profile_by_token_hash(&self, token_hash: &str) -> Result<Option<Profile>> {
        let state = self.lock()?;
        Ok(state
            .profiles
            .values()
            .find(|p| p.token_hash == token_hash)
            .cloned())
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>> {
        Ok(sorted_by(&self.lock()?.profiles, |p| p.created_at))
    }

    async fn delete_profile(&self, id: Uuid) -> Result<()> {
        let mut state = self.lock()?;
        if state.profiles.remove(&id).is_none() {
            return Err(EditorError::NotFound(format!("profile {id}")));
        }
        state.assignments.retain(|_, a| a.user_id != id);
        self.persist(&state)?;

        debug!("Deleted profile {} and its assignments", id);
        Ok(())
    }

    async fn create_project(&self, project: &mut Project) -> Result<()> {
        let mut state = self.lock()?;
        let id = Uuid::new_v4();
        project.id = Some(id);
        state.projects.insert(id, project.clone());
        self.persist(&state)?;

        debug!("Created project: {} with id {}", project.name, id);
        Ok(())
    }

    async fn update_project(&self, project: &Project) -> Result<()> {
        let project_id = project
            .id
            .ok_or_else(|| EditorError::Validation("Cannot update project without ID".to_string()))?;

        let mut state = self.lock()?;
        if !state.projects.contains_key(&project_id) {
            return Err(EditorError::NotFound(format!("project {project_id}")));
        }
        state.projects.insert(project_id, project.clone());
        self.persist(&state)?;

        debug!("Updated project: {} with id {}", project.name, project_id);
        Ok(())
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>> {
        Ok(self.lock()?.projects.get(&id).cloned())
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(sorted_by(&self.lock()?.projects, |p| p.created_at))
    }

    async fn delete_project(&self, id: Uuid) -> Result<()> {
        let mut state = self.lock()?;
        if state.projects.remove(&id).is_none() {
            return Err(EditorError::NotFound(format!("project {id}")));
        }
        state.assignments.retain(|_, a| a.project_id != id);
        self.persist(&state)?;

        debug!("Deleted project {} and its assignments", id);
        Ok(())
    }

    async fn assign_project(&self, assignment: &mut UserProject) -> Result<()> {
        let mut state = self.lock()?;
        if !state.profiles.contains_key(&assignment.user_id) {
            return Err(EditorError::NotFound(format!("profile {}", assignment.user_id)));
        }
        if !state.projects.contains_key(&assignment.project_id) {
            return Err(EditorError::NotFound(format!("project {}", assignment.project_id)));
        }
        if state
            .assignments
            .values()
            .any(|a| a.user_id == assignment.user_id && a.project_id == assignment.project_id)
        {
            return Err(EditorError::Conflict("project is already assigned to this user".to_string()));
        }

        let id = Uuid::new_v4();
        assignment.id = Some(id);
        state.assignments.insert(id, assignment.clone());
        self.persist(&state)?;

        debug!(
            "Assigned project {} to user {}",
            assignment.project_id, assignment.user_id
        );
        Ok(())
    }

    async fn unassign_project(&self, user_id: Uuid, project_id: Uuid) -> Result<()> {
        let mut state = self.lock()?;
        let before = state.assignments.len();
        state
            .assignments
            .retain(|_, a| !(a.user_id == user_id && a.project_id == project_id));
        if state.assignments.len() == before {
            return Err(EditorError::NotFound("assignment".to_string()));
        }
        self.persist(&state)?;

        debug!("Unassigned project {} from user {}", project_id, user_id);
        Ok(())
    }

    async fn find_assignment(&self, user_id: Uuid, project_id: Uuid) -> Result<Option<UserProject>> {
        let state = self.lock()?;
        Ok(state
            .assignments
            .values()
            .find(|a| a.user_id == user_id && a.project_id == project_id)
            .cloned())
    }

    async fn list_assignments(&self) -> Result<Vec<UserProject>> {
        Ok(sorted_by(&self.lock()?.assignments, |a| a.assigned_at))
    }

    async fn list_projects_for_user(&self, user_id: Uuid) -> Result<Vec<Project>> {
        let state = self.lock()?;
        let mut projects: Vec<Project> = state
            .assignments
            .values()
            .filter(|a| a.user_id == user_id)
            .filter_map(|a| state.projects.get(&a.project_id).cloned())
            .collect();
        projects.sort_by_key(|p| p.created_at);
        Ok(projects)
    }
}
