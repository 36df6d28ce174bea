//! Per-column width map.

use std::collections::HashMap;
use std::sync::Arc;

use super::ColumnId;

/// Column widths with copy-on-write sharing.
///
/// Cloning is cheap. A write that does not change a width leaves the map
/// untouched, so [`ColumnWidths::ptr_eq`] stays true across no-op resizes.
#[derive(Debug, Clone, Default)]
pub struct ColumnWidths {
    map: Arc<HashMap<ColumnId, u32>>,
    default_width: u32,
}

impl ColumnWidths {
    pub fn new(map: HashMap<ColumnId, u32>, default_width: u32) -> Self {
        Self {
            map: Arc::new(map),
            default_width,
        }
    }

    /// Width of `id`, or the default width.
    pub fn get(&self, id: &str) -> u32 {
        self.map.get(id).copied().unwrap_or(self.default_width)
    }

    /// Explicit width of `id`, if one was set.
    pub fn explicit(&self, id: &str) -> Option<u32> {
        self.map.get(id).copied()
    }

    /// Set the width of `id`. Returns false (and leaves the map shared) if unchanged.
    pub fn set(&mut self, id: &str, width: u32) -> bool {
        if self.map.get(id) == Some(&width) {
            return false;
        }
        Arc::make_mut(&mut self.map).insert(id.to_string(), width);
        true
    }

    /// Whether both handles share the same underlying map.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.map, &other.map)
    }

    /// Shared snapshot for outward persistence.
    pub fn snapshot(&self) -> Arc<HashMap<ColumnId, u32>> {
        Arc::clone(&self.map)
    }

    pub fn default_width(&self) -> u32 {
        self.default_width
    }
}
