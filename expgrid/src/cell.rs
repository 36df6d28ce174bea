//! Cell content handed to the rendering primitive.

use chrono::DateTime;
use chrono::Utc;

/// Format used for date cells.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Content of a single rendered cell.
///
/// This is a closed set: renderers produce one of these and consumers match
/// exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    Text { text: String },
    /// Numeric value, `None` when the record has no value at the column's path.
    Number { value: Option<f64> },
    /// Date value, `None` when missing or unparseable.
    Date { value: Option<DateTime<Utc>> },
    /// Navigable link. Clicking it navigates instead of toggling selection.
    Link { title: String, href: String },
    /// Row selection checkbox.
    Checkbox { checked: bool },
    /// Placeholder for a row that has not been fetched yet.
    Loading,
    Custom(CustomCell),
}

/// Cells drawn by custom renderers.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomCell {
    User { label: String, initials: String },
    State { state: String },
    Tags { tags: Vec<String> },
}

impl CellContent {
    /// Empty text cell, used when a value cannot be found.
    pub fn empty() -> Self {
        Self::Text {
            text: String::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn link(title: impl Into<String>, href: impl Into<String>) -> Self {
        Self::Link {
            title: title.into(),
            href: href.into(),
        }
    }

    /// Link target, if this cell carries a non-empty one.
    pub fn link_target(&self) -> Option<&str> {
        match self {
            Self::Link { href, .. } if !href.is_empty() => Some(href),
            _ => None,
        }
    }

    pub fn is_link(&self) -> bool {
        self.link_target().is_some()
    }

    /// Plain text form, used for copy data and tooltips.
    pub fn display_text(&self) -> String {
        match self {
            Self::Text { text } => text.clone(),
            Self::Number { value } => value.map(format_number).unwrap_or_default(),
            Self::Date { value } => value
                .map(|v| v.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            Self::Link { title, .. } => title.clone(),
            Self::Checkbox { .. } | Self::Loading => String::new(),
            Self::Custom(custom) => match custom {
                CustomCell::User { label, .. } => label.clone(),
                CustomCell::State { state } => state.clone(),
                CustomCell::Tags { tags } => tags.join(", "),
            },
        }
    }
}

/// Integers print without a fractional part, everything else as-is.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Up to two uppercase initials from a user label.
pub fn initials(label: &str) -> String {
    label
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}
