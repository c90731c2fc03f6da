use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub project_key: String,
    pub project_name: String,
}

impl ProjectMetadata {
    pub fn new(project_key: impl Into<String>, project_name: impl Into<String>) -> Self {
        Self {
            project_key: project_key.into(),
            project_name: project_name.into(),
        }
    }

    /// Metadata whose display name is derived from the key.
    pub fn for_key(project_key: impl Into<String>) -> Self {
        let project_key = project_key.into();
        let project_name = format!("{project_key} project");
        Self {
            project_key,
            project_name,
        }
    }

    pub fn start_event_name(&self) -> String {
        format!("Project {} start", self.project_name)
    }

    pub fn end_event_name(&self) -> String {
        format!("Project {} end", self.project_name)
    }
}

impl Default for ProjectMetadata {
    fn default() -> Self {
        Self::for_key("PROJECT")
    }
}
