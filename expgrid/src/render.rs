//! Seam to the native rendering primitive.
//!
//! The grid never draws. It hands headers, layout settings and per-cell
//! content to a [`RenderAdapter`].

use crate::cell::CellContent;
use crate::columns::ColumnDef;
use crate::columns::ColumnId;
use crate::columns::NAME_COLUMN;
use crate::columns::STATIC_COLUMN_COUNT;
use crate::config::GridConfig;
use crate::model::Loadable;
use crate::rows::RowSlots;
use crate::theme::ColorMap;
use crate::theme::RowTheme;
use crate::theme::Theme;

/// Header of one shown column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
    pub id: ColumnId,
    pub title: String,
    pub width: u32,
    /// Stays in place during horizontal scroll.
    pub frozen: bool,
    /// Draw a vertical border after this column.
    pub border_right: bool,
}

impl ColumnHeader {
    pub fn new(def: &ColumnDef, index: usize) -> Self {
        Self {
            id: def.id.clone(),
            title: def.title.clone(),
            width: def.width,
            frozen: index < STATIC_COLUMN_COUNT,
            border_right: has_vertical_border(&def.id),
        }
    }
}

/// Grid-wide settings for the native grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    /// Virtual row count, loaded or not.
    pub rows: usize,
    pub freeze_columns: usize,
    pub row_height: u32,
    pub header_height: u32,
}

impl RenderSettings {
    pub fn new(config: &GridConfig, rows: usize) -> Self {
        Self {
            rows,
            freeze_columns: STATIC_COLUMN_COUNT,
            row_height: config.row_height,
            header_height: config.header_height,
        }
    }
}

/// Drawing backend.
pub trait RenderAdapter {
    /// Called once per paint, before any cell.
    fn begin(&mut self, settings: &RenderSettings, headers: &[ColumnHeader]);

    fn draw_cell(&mut self, col: usize, row: usize, cell: &CellContent, theme: Option<&RowTheme>);

    /// Called once per paint, after the last cell.
    fn finish(&mut self) {}
}

/// Whether a vertical border follows column `id`.
pub fn has_vertical_border(id: &str) -> bool {
    id == NAME_COLUMN
}

/// Per-row theme override.
///
/// Every row of the dataset gets the border color, loaded or not. Loaded rows
/// also get an accent when their record has an entry in `colors`. The row
/// just past the data gets only the border so the last row has a bottom edge.
/// Anything further gets no override.
pub fn row_theme(rows: &RowSlots, row: usize, theme: &Theme, colors: &ColorMap) -> Option<RowTheme> {
    let border = RowTheme {
        border_color: Some(theme.stage_strong),
        accent_color: None,
    };
    if row > rows.len() {
        return None;
    }
    match rows.get(row) {
        Loadable::Loaded(record) => Some(RowTheme {
            accent_color: colors.get(&record.id()).copied(),
            ..border
        }),
        Loadable::NotLoaded => Some(border),
    }
}
