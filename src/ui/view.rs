//! Which screen is showing and which project it is about

use tracing::debug;

/// The single active screen
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Screen {
    /// All projects, with the creation form
    #[default]
    ProjectList,
    /// One project's meetings and workspace
    ProjectDetails { project_id: String },
}

#[derive(Debug, Clone, Default)]
pub struct ViewController {
    screen: Screen,
}

impl ViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Project shown on the details screen, if any
    pub fn active_project_id(&self) -> Option<&str> {
        match &self.screen {
            Screen::ProjectDetails { project_id } => Some(project_id),
            Screen::ProjectList => None,
        }
    }

    /// Switch to the details screen of `project_id`
    ///
    /// Callers pass ids read from the store.
    pub fn open_project(&mut self, project_id: impl Into<String>) {
        let project_id = project_id.into();
        debug!("Opening project {}", project_id);
        self.screen = Screen::ProjectDetails { project_id };
    }

    pub fn back_to_projects(&mut self) {
        self.screen = Screen::ProjectList;
    }

    pub fn reset(&mut self) {
        self.screen = Screen::default();
    }

    pub fn is_project_list(&self) -> bool {
        self.screen == Screen::ProjectList
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_project_list() {
        let view = ViewController::new();
        assert!(view.is_project_list());
        assert_eq!(view.active_project_id(), None);
    }

    #[test]
    fn test_open_and_back() {
        let mut view = ViewController::new();
        view.open_project("p1");
        assert_eq!(
            view.screen(),
            &Screen::ProjectDetails {
                project_id: "p1".to_string()
            }
        );
        assert_eq!(view.active_project_id(), Some("p1"));

        view.back_to_projects();
        assert!(view.is_project_list());
        assert_eq!(view.active_project_id(), None);
    }

    #[test]
    fn test_open_replaces_active_project() {
        let mut view = ViewController::new();
        view.open_project("p1");
        view.open_project("p2");
        assert_eq!(view.active_project_id(), Some("p2"));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut view = ViewController::new();
        view.open_project("p1");
        view.reset();
        view.reset();
        assert_eq!(view.screen(), &Screen::ProjectList);
    }
}
