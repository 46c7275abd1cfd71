use super::backend::{MemoryBackend, StorageBackend};
use super::types::{Meeting, Project};
use crate::{Result, StudioError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const PROJECTS_KEY: &str = "studio_lite_projects";
pub const MEETINGS_KEY: &str = "studio_lite_meetings";

/// Project and meeting collections persisted as two JSON arrays
///
/// Every mutation reads the whole collection, edits it in memory and
/// replaces it. Reads never fail: a missing or malformed collection is
/// logged and treated as empty.
#[derive(Clone)]
pub struct LocalStore {
    backend: Arc<dyn StorageBackend>,
}

impl std::fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStore").finish_non_exhaustive()
    }
}

impl LocalStore {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Store that forgets everything when dropped
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    pub fn list_projects(&self) -> Vec<Project> {
        self.read_or_empty(PROJECTS_KEY, "projects")
    }

    pub fn get_project(&self, project_id: &str) -> Option<Project> {
        self.list_projects().into_iter().find(|p| p.id == project_id)
    }

    /// Prepend a project
    pub fn create_project(&self, project: Project) -> Result<()> {
        let mut projects = self.list_projects();
        info!("Creating project '{}' ({})", project.name, project.id);
        projects.insert(0, project);

        self.write_collection(PROJECTS_KEY, &projects)
            .inspect_err(|e| error!("Error saving project: {}", e))
    }

    /// Remove a project together with every meeting that references it
    ///
    /// Both collections are read before anything is written, so a corrupt
    /// collection aborts the deletion without touching either.
    pub fn delete_project(&self, project_id: &str) -> Result<()> {
        let result = (|| -> Result<()> {
            let projects: Vec<Project> = self.read_collection(PROJECTS_KEY)?;
            let meetings: Option<Vec<Meeting>> = match self.backend.get_item(MEETINGS_KEY)? {
                Some(data) => Some(serde_json::from_str(&data)?),
                None => None,
            };

            let remaining: Vec<Project> =
                projects.into_iter().filter(|p| p.id != project_id).collect();
            self.write_collection(PROJECTS_KEY, &remaining)?;

            if let Some(meetings) = meetings {
                let before = meetings.len();
                let kept: Vec<Meeting> = meetings
                    .into_iter()
                    .filter(|m| m.project_id != project_id)
                    .collect();
                debug!(
                    "Removing {} meeting(s) of project {}",
                    before - kept.len(),
                    project_id
                );
                self.write_collection(MEETINGS_KEY, &kept)?;
            }

            Ok(())
        })();

        match &result {
            Ok(()) => info!("Deleted project {}", project_id),
            Err(e) => error!("Error deleting project {}: {}", project_id, e),
        }
        result
    }

    /// Meetings of one project, newest first
    pub fn list_meetings(&self, project_id: &str) -> Vec<Meeting> {
        let mut meetings: Vec<Meeting> = self
            .read_or_empty::<Meeting>(MEETINGS_KEY, "meetings")
            .into_iter()
            .filter(|m| m.project_id == project_id)
            .collect();
        meetings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        meetings
    }

    /// Prepend a meeting. A corrupt meeting collection is left untouched.
    pub fn create_meeting(&self, meeting: Meeting) -> Result<()> {
        let result = self
            .read_collection::<Meeting>(MEETINGS_KEY)
            .and_then(|mut meetings| {
                info!("Saving meeting '{}' ({})", meeting.title, meeting.id);
                meetings.insert(0, meeting);
                self.write_collection(MEETINGS_KEY, &meetings)
            });

        if let Err(e) = &result {
            error!("Error saving meeting: {}", e);
        }
        result
    }

    fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        match self.backend.get_item(key)? {
            Some(data) => Ok(serde_json::from_str(&data)?),
            None => Ok(Vec::new()),
        }
    }

    fn read_or_empty<T: DeserializeOwned>(&self, key: &str, what: &str) -> Vec<T> {
        self.read_collection(key).unwrap_or_else(|e| {
            warn!("Error reading {}: {}", what, e);
            Vec::new()
        })
    }

    fn write_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        let data = serde_json::to_string(items)?;
        self.backend
            .set_item(key, &data)
            .map_err(|e| StudioError::Storage(format!("failed to write {key}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn store_with_backend() -> (LocalStore, MemoryBackend) {
        let backend = MemoryBackend::new();
        (LocalStore::new(backend.clone()), backend)
    }

    #[test]
    fn test_projects_are_listed_newest_first() {
        let store = LocalStore::in_memory();
        for name in ["first", "second", "third"] {
            store.create_project(Project::new(name, "")).unwrap();
        }

        let names: Vec<_> = store.list_projects().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["third", "second", "first"]);
    }

    #[test]
    fn test_corrupt_projects_read_as_empty() {
        let (store, backend) = store_with_backend();
        backend.set_item(PROJECTS_KEY, "{not json").unwrap();

        assert!(store.list_projects().is_empty());
        assert!(store.get_project("anything").is_none());
    }

    #[test]
    fn test_meetings_sorted_by_creation_time_regardless_of_storage_order() {
        let store = LocalStore::in_memory();
        let now = Utc::now();
        let older = Meeting::new("p", "older", "").with_created_at(now - Duration::hours(2));
        let newer = Meeting::new("p", "newer", "").with_created_at(now);

        // Inserted newest first, so storage order is [older, newer]
        store.create_meeting(newer).unwrap();
        store.create_meeting(older).unwrap();

        let titles: Vec<_> = store.list_meetings("p").into_iter().map(|m| m.title).collect();
        assert_eq!(titles, vec!["newer", "older"]);
    }

    #[test]
    fn test_list_meetings_filters_by_project() {
        let store = LocalStore::in_memory();
        store.create_meeting(Meeting::new("a", "mine", "")).unwrap();
        store.create_meeting(Meeting::new("b", "theirs", "")).unwrap();

        let meetings = store.list_meetings("a");
        assert_eq!(meetings.len(), 1);
        assert_eq!(meetings[0].title, "mine");
    }

    #[test]
    fn test_delete_cascades_to_meetings() {
        let store = LocalStore::in_memory();
        let keep = Project::new("keep", "");
        let drop = Project::new("drop", "");
        store.create_project(keep.clone()).unwrap();
        store.create_project(drop.clone()).unwrap();
        store.create_meeting(Meeting::new(&drop.id, "gone", "")).unwrap();
        store.create_meeting(Meeting::new(&keep.id, "stays", "")).unwrap();

        store.delete_project(&drop.id).unwrap();

        assert_eq!(store.list_projects(), vec![keep.clone()]);
        assert!(store.list_meetings(&drop.id).is_empty());
        assert_eq!(store.list_meetings(&keep.id).len(), 1);
    }

    #[test]
    fn test_delete_with_corrupt_meetings_leaves_state_intact() {
        let (store, backend) = store_with_backend();
        let project = Project::new("p", "");
        store.create_project(project.clone()).unwrap();
        backend.set_item(MEETINGS_KEY, "garbage").unwrap();

        assert!(store.delete_project(&project.id).is_err());
        assert_eq!(store.list_projects().len(), 1);
        assert_eq!(
            backend.get_item(MEETINGS_KEY).unwrap().as_deref(),
            Some("garbage")
        );
    }

    #[test]
    fn test_create_meeting_does_not_overwrite_corrupt_collection() {
        let (store, backend) = store_with_backend();
        backend.set_item(MEETINGS_KEY, "[{").unwrap();

        assert!(store.create_meeting(Meeting::new("p", "t", "")).is_err());
        assert_eq!(backend.get_item(MEETINGS_KEY).unwrap().as_deref(), Some("[{"));
    }
}
