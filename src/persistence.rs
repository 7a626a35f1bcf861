use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::project::Project;

/// Errors that can occur during project persistence operations
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Project not found: {0}")]
    NotFound(Uuid),

    #[error("Project file {path} holds project {found}, expected {expected}")]
    IdMismatch {
        path: String,
        expected: Uuid,
        found: Uuid,
    },
}

/// Persistence session for project records.
///
/// Constructed once by the host and passed by reference to whatever needs it.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn load(&self, id: Uuid) -> Result<Option<Project>, PersistenceError>;

    async fn save(&self, project: &Project) -> Result<(), PersistenceError>;

    /// Deletes the whole project. Returns whether anything was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, PersistenceError>;

    async fn list(&self) -> Result<Vec<Project>, PersistenceError>;
}

#[derive(Debug, Default)]
pub struct InMemoryProjectStore {
    projects: RwLock<HashMap<Uuid, Project>>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn load(&self, id: Uuid) -> Result<Option<Project>, PersistenceError> {
        Ok(self.projects.read().await.get(&id).cloned())
    }

    async fn save(&self, project: &Project) -> Result<(), PersistenceError> {
        self.projects
            .write()
            .await
            .insert(project.id, project.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, PersistenceError> {
        Ok(self.projects.write().await.remove(&id).is_some())
    }

    async fn list(&self) -> Result<Vec<Project>, PersistenceError> {
        let mut projects: Vec<_> = self.projects.read().await.values().cloned().collect();
        projects.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(projects)
    }
}

/// One pretty-printed JSON file per project under a directory.
pub struct JsonFileProjectStore {
    directory: PathBuf,
}

impl JsonFileProjectStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &std::path::Path {
        &self.directory
    }

    fn project_file_path(&self, id: Uuid) -> PathBuf {
        self.directory.join(format!("{id}.json"))
    }

    async fn read_project(&self, path: &std::path::Path) -> Result<Project, PersistenceError> {
        let contents = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[async_trait]
impl ProjectStore for JsonFileProjectStore {
    async fn load(&self, id: Uuid) -> Result<Option<Project>, PersistenceError> {
        let path = self.project_file_path(id);
        if !fs::try_exists(&path).await? {
            debug!(project_id = %id, file = ?path, "No project file found");
            return Ok(None);
        }

        let project = self.read_project(&path).await?;
        if project.id != id {
            return Err(PersistenceError::IdMismatch {
                path: path.display().to_string(),
                expected: id,
                found: project.id,
            });
        }
        Ok(Some(project))
    }

    async fn save(&self, project: &Project) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.directory).await?;

        let path = self.project_file_path(project.id);
        let serialized = serde_json::to_string_pretty(project)?;

        // Write to temporary file first, then rename
        let temp_file = path.with_extension("json.tmp");
        fs::write(&temp_file, serialized).await?;
        fs::rename(&temp_file, &path).await?;

        info!(
            project_id = %project.id,
            name = %project.name,
            file = ?path,
            "Project saved"
        );
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, PersistenceError> {
        let path = self.project_file_path(id);
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!(project_id = %id, "Project deleted");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self) -> Result<Vec<Project>, PersistenceError> {
        if !fs::try_exists(&self.directory).await? {
            return Ok(Vec::new());
        }

        let mut projects = Vec::new();
        let mut entries = fs::read_dir(&self.directory).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match self.read_project(&path).await {
                Ok(project) => projects.push(project),
                Err(e) => warn!(file = ?path, error = %e, "Skipping unreadable project file"),
            }
        }
        projects.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(projects)
    }
}
