//! Catalog of predefined columns.
//!
//! These ids never consult the runtime schema.

use crate::model::DataPath;

use super::ColumnDef;
use super::NAME_COLUMN;
use super::Renderer;
use super::SELECTION_COLUMN;

fn experiment(field: &str) -> DataPath {
    DataPath::new(format!("experiment.{}", field))
}

/// Title and renderer for a predefined column id.
fn lookup(id: &str) -> Option<(&'static str, Renderer)> {
    let entry = match id {
        SELECTION_COLUMN => ("", Renderer::Selection),
        NAME_COLUMN => (
            "Name",
            Renderer::Name {
                path: experiment("name"),
            },
        ),
        "id" => (
            "ID",
            Renderer::Number {
                path: Some(experiment("id")),
            },
        ),
        "description" => (
            "Description",
            Renderer::Text {
                path: Some(experiment("description")),
            },
        ),
        "tags" => (
            "Tags",
            Renderer::Tags {
                path: experiment("labels"),
            },
        ),
        "forkedFrom" => (
            "Forked",
            Renderer::ForkedFrom {
                path: experiment("forkedFrom"),
            },
        ),
        "startTime" => (
            "Start Time",
            Renderer::Date {
                path: Some(experiment("startTime")),
            },
        ),
        "state" => (
            "State",
            Renderer::State {
                path: experiment("state"),
            },
        ),
        "searcherType" => (
            "Searcher Type",
            Renderer::Text {
                path: Some(experiment("searcherType")),
            },
        ),
        "user" => (
            "User",
            Renderer::User {
                path: experiment("userId"),
            },
        ),
        "numTrials" => (
            "Trials",
            Renderer::Number {
                path: Some(experiment("numTrials")),
            },
        ),
        "resourcePool" => (
            "Resource Pool",
            Renderer::Text {
                path: Some(experiment("resourcePool")),
            },
        ),
        "checkpointSize" => (
            "Checkpoint Size",
            Renderer::Number {
                path: Some(experiment("checkpointSize")),
            },
        ),
        "checkpointCount" => (
            "Checkpoints",
            Renderer::Number {
                path: Some(experiment("checkpointCount")),
            },
        ),
        _ => return None,
    };
    Some(entry)
}

/// Whether `id` has a predefined definition.
pub fn is_builtin(id: &str) -> bool {
    lookup(id).is_some()
}

/// Predefined definition for `id` at `width`.
pub fn definition(id: &str, width: u32) -> Option<ColumnDef> {
    lookup(id).map(|(title, renderer)| ColumnDef::new(id, title, width, renderer))
}
