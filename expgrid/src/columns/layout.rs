//! Column ordering and widths for one grid instance.

use log::debug;

use super::ColumnId;
use super::ColumnWidths;
use super::STATIC_COLUMNS;
use super::is_resizable;
use super::is_static;

/// The user-controlled part of the column set: dynamic order plus widths.
///
/// Static columns always lead and cannot be moved.
#[derive(Debug, Clone, Default)]
pub struct ColumnLayout {
    dynamic: Vec<ColumnId>,
    widths: ColumnWidths,
}

impl ColumnLayout {
    pub fn new(dynamic: Vec<ColumnId>, widths: ColumnWidths) -> Self {
        let mut layout = Self {
            dynamic: Vec::new(),
            widths,
        };
        layout.set_dynamic(dynamic);
        layout
    }

    /// Dynamic column ids in display order.
    pub fn dynamic_ids(&self) -> &[ColumnId] {
        &self.dynamic
    }

    /// Static ids followed by dynamic ids.
    pub fn all_ids(&self) -> Vec<ColumnId> {
        STATIC_COLUMNS
            .iter()
            .map(|id| id.to_string())
            .chain(self.dynamic.iter().cloned())
            .collect()
    }

    /// Replace the dynamic order. Static ids in the input are dropped.
    pub fn set_dynamic(&mut self, ids: Vec<ColumnId>) {
        self.dynamic = ids.into_iter().filter(|id| !is_static(id)).collect();
    }

    /// Position of `id` within the dynamic order.
    pub fn dynamic_position(&self, id: &str) -> Option<usize> {
        self.dynamic.iter().position(|c| c == id)
    }

    /// Move the dynamic entry at `from` so it ends up at `to`.
    ///
    /// `to` is clamped to the end. Returns false when `from` is out of range
    /// or nothing moves.
    pub fn move_dynamic(&mut self, from: usize, to: usize) -> bool {
        if from >= self.dynamic.len() {
            return false;
        }
        let to = to.min(self.dynamic.len() - 1);
        if from == to {
            return false;
        }
        let moved = self.dynamic.remove(from);
        debug!("ColumnLayout: moving '{}' from {} to {}", moved, from, to);
        self.dynamic.insert(to, moved);
        true
    }

    pub fn widths(&self) -> &ColumnWidths {
        &self.widths
    }

    /// Resize `id`. Returns false for non-resizable columns and unchanged widths.
    pub fn resize(&mut self, id: &str, width: u32) -> bool {
        if !is_resizable(id) {
            return false;
        }
        self.widths.set(id, width)
    }
}
