//! Column definitions and renderers.

use chrono::DateTime;
use chrono::Utc;
use serde_json::Value;

use crate::cell::CellContent;
use crate::cell::CustomCell;
use crate::cell::initials;
use crate::model::ColumnSchema;
use crate::model::DataPath;
use crate::model::Record;
use crate::model::UserDirectory;
use crate::selection::SelectionModel;

use super::ColumnId;

/// Everything a renderer may read besides the record itself.
///
/// Passed at render time so definitions never capture selection or users.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub selection: &'a SelectionModel,
    pub users: &'a UserDirectory,
}

/// How a column turns a record into cell content.
#[derive(Debug, Clone, PartialEq)]
pub enum Renderer {
    /// Selection checkbox.
    Selection,
    /// Record label linking to its detail page.
    Name { path: DataPath },
    /// Link to the record this one was forked from, empty when not forked.
    ForkedFrom { path: DataPath },
    /// User avatar resolved through the user directory.
    User { path: DataPath },
    State { path: DataPath },
    Tags { path: DataPath },
    Number { path: Option<DataPath> },
    Date { path: Option<DataPath> },
    Text { path: Option<DataPath> },
}

impl Renderer {
    /// Render `record` shown at `row`.
    ///
    /// Missing values render as empty content, never as an error.
    pub fn render(&self, record: &Record, row: usize, cx: &RenderContext<'_>) -> CellContent {
        match self {
            Self::Selection => CellContent::Checkbox {
                checked: cx.selection.is_checked(row),
            },
            Self::Name { path } => {
                let title = record
                    .get(path)
                    .map(value_text)
                    .unwrap_or_else(|| record.id().to_string());
                CellContent::link(title, detail_path(&record.id().to_string()))
            }
            Self::ForkedFrom { path } => match record.get(path).map(value_text) {
                Some(parent) if !parent.is_empty() => {
                    let href = detail_path(&parent);
                    CellContent::link(parent, href)
                }
                _ => CellContent::empty(),
            },
            Self::User { path } => {
                let label = cx.users.label(record.get_u64(path)).to_string();
                CellContent::Custom(CustomCell::User {
                    initials: initials(&label),
                    label,
                })
            }
            Self::State { path } => CellContent::Custom(CustomCell::State {
                state: record.get_str(path).unwrap_or_default().to_string(),
            }),
            Self::Tags { path } => {
                let tags = record
                    .get(path)
                    .and_then(Value::as_array)
                    .map(|items| items.iter().map(value_text).collect())
                    .unwrap_or_default();
                CellContent::Custom(CustomCell::Tags { tags })
            }
            Self::Number { path } => CellContent::Number {
                value: path.as_ref().and_then(|p| record.get_f64(p)),
            },
            Self::Date { path } => CellContent::Date {
                value: path
                    .as_ref()
                    .and_then(|p| record.get_str(p))
                    .and_then(parse_date),
            },
            Self::Text { path } => match path.as_ref().and_then(|p| record.get(p)) {
                Some(value) => CellContent::text(value_text(value)),
                None => CellContent::empty(),
            },
        }
    }
}

/// Rendering definition for one column id.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub id: ColumnId,
    pub title: String,
    pub width: u32,
    pub renderer: Renderer,
    /// Schema entry this definition was derived from. `None` for built-ins.
    pub source: Option<ColumnSchema>,
}

impl ColumnDef {
    pub fn new(id: impl Into<ColumnId>, title: impl Into<String>, width: u32, renderer: Renderer) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            width,
            renderer,
            source: None,
        }
    }

    pub fn render(&self, record: &Record, row: usize, cx: &RenderContext<'_>) -> CellContent {
        self.renderer.render(record, row, cx)
    }
}

/// Route of a record's detail page.
pub fn detail_path(id: &str) -> String {
    format!("/experiments/{}", id)
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}
