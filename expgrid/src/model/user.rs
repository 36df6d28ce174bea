//! User display metadata, used only by renderers.

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

/// Fallback shown when a user id cannot be resolved.
pub const UNKNOWN_USER: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl User {
    pub fn new(id: u64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Display name, falling back to the username.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.username)
    }
}

/// Id → user lookup supplied by the identity collaborator.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: HashMap<u64, User>,
}

impl UserDirectory {
    pub fn new(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
        }
    }

    pub fn get(&self, id: u64) -> Option<&User> {
        self.users.get(&id)
    }

    /// Label for a user id, or [`UNKNOWN_USER`].
    pub fn label(&self, id: Option<u64>) -> &str {
        id.and_then(|id| self.get(id))
            .map(User::label)
            .unwrap_or(UNKNOWN_USER)
    }
}
