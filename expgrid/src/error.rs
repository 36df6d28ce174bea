//! Error types

/// Errors raised at the edges of the grid: configuration, decoding of
/// externally supplied records and schemas, and theme tokens.
///
/// Interaction handling never produces these. Events that cannot be honoured
/// (not-loaded rows, absent schema entries) degrade to no-ops instead.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// A configuration value is out of range.
    #[error("Invalid config value for '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// A JSON document could not be decoded.
    #[error("Failed to decode JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// A record has no usable identity at the expected path.
    #[error("Record has no integer id at '{path}'")]
    MissingRecordId { path: String },

    /// A color token is not a valid `#rrggbb` hex string.
    #[error("Invalid color '{0}'")]
    InvalidColor(String),
}

impl GridError {
    /// Creates a new invalid config error.
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

/// Convenience result alias.
pub type Result<T> = std::result::Result<T, GridError>;
