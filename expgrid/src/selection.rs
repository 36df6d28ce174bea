//! Row selection state.
//!
//! Two independent facts are tracked: an ordered set of explicitly selected
//! row indices and a "select all" flag. Toggling one never touches the other.
//! Consumers treat the flag as authoritative when it is set and fall back to
//! the explicit set otherwise.

use std::collections::BTreeSet;
use std::sync::Arc;

use log::debug;

use crate::model::RecordId;
use crate::rows::RowSlots;

/// Edge detector for the host's incrementing "clear selection" signal.
///
/// A clear fires only when the observed value changes away from what was
/// last seen and is not the initial value `0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearTrigger {
    last: u64,
}

impl ClearTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current signal value. Returns true if a clear should happen.
    pub fn observe(&mut self, value: u64) -> bool {
        if value == self.last {
            return false;
        }
        self.last = value;
        value != 0
    }
}

/// Cached output of [`SelectionModel::materialize`].
#[derive(Debug, Clone, Default)]
struct Materialized {
    ids: Arc<Vec<RecordId>>,
    /// (selection revision, dataset generation) the ids were computed for.
    computed_for: Option<(u64, u64)>,
}

/// Selected row indices plus the select-all flag.
#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    rows: BTreeSet<usize>,
    select_all: bool,
    revision: u64,
    trigger: ClearTrigger,
    materialized: Materialized,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Select all
    // -------------------------------------------------------------------------

    /// Flip the select-all flag. Returns the new value.
    pub fn toggle_select_all(&mut self) -> bool {
        self.select_all = !self.select_all;
        debug!("SelectionModel: select all = {}", self.select_all);
        self.select_all
    }

    /// Set the select-all flag directly (host-controlled state).
    pub fn set_select_all(&mut self, value: bool) {
        self.select_all = value;
    }

    pub fn is_select_all(&self) -> bool {
        self.select_all
    }

    // -------------------------------------------------------------------------
    // Explicit rows
    // -------------------------------------------------------------------------

    /// Add the row if absent, remove it if present. Returns whether it is now selected.
    pub fn toggle_row(&mut self, row: usize) -> bool {
        let selected = if self.rows.remove(&row) {
            false
        } else {
            self.rows.insert(row);
            true
        };
        self.revision = self.revision.wrapping_add(1);
        selected
    }

    /// Whether `row` is in the explicit set.
    pub fn contains(&self, row: usize) -> bool {
        self.rows.contains(&row)
    }

    /// Whether the checkbox for `row` renders as checked.
    pub fn is_checked(&self, row: usize) -> bool {
        self.select_all || self.rows.contains(&row)
    }

    /// Explicitly selected indices in ascending order.
    pub fn rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    // -------------------------------------------------------------------------
    // Clearing
    // -------------------------------------------------------------------------

    /// Empty the row set and drop the select-all flag.
    pub fn clear(&mut self) {
        if !self.rows.is_empty() {
            self.rows.clear();
            self.revision = self.revision.wrapping_add(1);
        }
        self.select_all = false;
    }

    /// Feed the host's clear signal. Clears on a change edge. Returns true if cleared.
    pub fn sync_clear_trigger(&mut self, value: u64) -> bool {
        if self.trigger.observe(value) {
            debug!("SelectionModel: cleared by trigger {}", value);
            self.clear();
            return true;
        }
        false
    }

    // -------------------------------------------------------------------------
    // Materialization
    // -------------------------------------------------------------------------

    /// Translate selected indices into record ids.
    ///
    /// Indices whose slot is not loaded, or that no longer exist after a
    /// reload, are skipped. The returned `Arc` is the same allocation as the
    /// previous call whenever the id list did not change.
    pub fn materialize(&mut self, rows: &RowSlots) -> Arc<Vec<RecordId>> {
        let key = (self.revision, rows.generation());
        if self.materialized.computed_for == Some(key) {
            return Arc::clone(&self.materialized.ids);
        }

        let ids: Vec<RecordId> = self
            .rows
            .iter()
            .filter_map(|&row| rows.record(row))
            .map(|record| record.id())
            .collect();

        if *self.materialized.ids != ids {
            self.materialized.ids = Arc::new(ids);
        }
        self.materialized.computed_for = Some(key);
        Arc::clone(&self.materialized.ids)
    }
}
