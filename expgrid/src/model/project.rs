//! Project context attached to context-menu payloads.

use serde::Deserialize;
use serde::Serialize;

use super::Record;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub workspace_id: u64,
    #[serde(default)]
    pub workspace_name: String,
}

/// A record together with the project it is shown in.
///
/// This is the domain entity handed to the context menu.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRecord {
    pub record: Record,
    pub project_id: Option<u64>,
    pub project_name: Option<String>,
    pub workspace_id: Option<u64>,
}

impl ProjectRecord {
    pub fn new(record: Record, project: Option<&Project>) -> Self {
        Self {
            record,
            project_id: project.map(|p| p.id),
            project_name: project.map(|p| p.name.clone()),
            workspace_id: project.map(|p| p.workspace_id),
        }
    }
}
