//! Grid configuration

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::error::GridError;
use crate::error::Result;

/// Number of renders with a live grid handle needed before the scroll
/// position is considered set.
pub const SCROLL_SET_COUNT_NEEDED: usize = 2;

/// Delay between closing an existing context menu and opening the next one.
pub const CONTEXT_MENU_DELAY: Duration = Duration::from_millis(50);

/// Configuration for one grid instance.
///
/// # Example
///
/// ```
/// use expgrid::GridConfig;
///
/// let config = GridConfig::default()
///     .with_page_size(20)
///     .with_column_width("name", 220);
/// assert_eq!(config.page_size, 20);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Rows per fetched page. Used to translate a page number into a row offset.
    ///
    /// Default: 100
    pub page_size: usize,

    /// Initial programmatic scrolls applied before external scroll reports are trusted.
    ///
    /// Default: 2
    pub settle_threshold: usize,

    /// Delay before a context menu opens after the previous one was closed.
    ///
    /// Default: 50ms
    pub context_menu_delay_ms: u64,

    /// Distance the context menu is pulled up and left from the pointer.
    ///
    /// Default: 4
    pub context_menu_pointer_offset: i32,

    /// Height of a data row in pixels.
    pub row_height: u32,

    /// Height of the header row in pixels.
    pub header_height: u32,

    /// Width used for columns that have no entry in `column_widths`.
    pub default_column_width: u32,

    /// Initial per-column widths.
    pub column_widths: HashMap<String, u32>,
}

impl Default for GridConfig {
    fn default() -> Self {
        let column_widths = [
            ("selected", 40),
            ("name", 150),
            ("id", 60),
            ("description", 148),
            ("tags", 106),
            ("forkedFrom", 86),
            ("startTime", 118),
            ("state", 106),
            ("searcherType", 129),
            ("user", 85),
            ("numTrials", 50),
            ("resourcePool", 140),
            ("checkpointSize", 110),
            ("checkpointCount", 105),
        ]
        .into_iter()
        .map(|(id, width)| (id.to_string(), width))
        .collect();

        Self {
            page_size: 100,
            settle_threshold: SCROLL_SET_COUNT_NEEDED,
            context_menu_delay_ms: 50,
            context_menu_pointer_offset: 4,
            row_height: 40,
            header_height: 36,
            default_column_width: 140,
            column_widths,
        }
    }
}

impl GridConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a (possibly partial) JSON document and validates it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the settle threshold.
    pub fn with_settle_threshold(mut self, threshold: usize) -> Self {
        self.settle_threshold = threshold;
        self
    }

    /// Sets the context menu delay.
    pub fn with_context_menu_delay(mut self, delay: Duration) -> Self {
        self.context_menu_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the initial width of one column.
    pub fn with_column_width(mut self, column: impl Into<String>, width: u32) -> Self {
        self.column_widths.insert(column.into(), width);
        self
    }

    /// Returns the context menu delay as a [`Duration`].
    pub fn context_menu_delay(&self) -> Duration {
        Duration::from_millis(self.context_menu_delay_ms)
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(GridError::invalid_config("pageSize", "must be at least 1"));
        }
        if self.settle_threshold == 0 {
            return Err(GridError::invalid_config(
                "settleThreshold",
                "must be at least 1",
            ));
        }
        if self.row_height == 0 {
            return Err(GridError::invalid_config("rowHeight", "must be at least 1"));
        }
        if self.header_height == 0 {
            return Err(GridError::invalid_config(
                "headerHeight",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GridConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.settle_threshold, SCROLL_SET_COUNT_NEEDED);
        assert_eq!(config.context_menu_delay(), CONTEXT_MENU_DELAY);
        assert_eq!(config.column_widths.get("selected"), Some(&40));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GridConfig::from_json(r#"{"pageSize": 20, "contextMenuDelayMs": 10}"#)
            .unwrap();
        assert_eq!(config.page_size, 20);
        assert_eq!(config.context_menu_delay(), Duration::from_millis(10));
        assert_eq!(config.row_height, 40);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = GridConfig::from_json(r#"{"pageSize": 0}"#).unwrap_err();
        assert!(matches!(
            err,
            GridError::InvalidConfig {
                field: "pageSize",
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_json_is_decode_error() {
        let err = GridConfig::from_json("{").unwrap_err();
        assert!(matches!(err, GridError::Decode(_)));
    }
}
