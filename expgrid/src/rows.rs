//! Row data accessor over a sparse, partially fetched dataset.

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use log::trace;

use crate::model::Loadable;
use crate::model::Record;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// One slot per virtual row, each either loaded or still pending.
///
/// The length is the full known dataset size, so scrollbars reflect the true
/// size even while most pages are unfetched. Every dataset and every change to
/// one gets a process-unique generation, which downstream memos use to notice
/// that row indices may now point at different records.
#[derive(Debug, Clone)]
pub struct RowSlots {
    slots: Vec<Loadable<Record>>,
    generation: u64,
}

impl Default for RowSlots {
    fn default() -> Self {
        Self::from_slots(Vec::new())
    }
}

impl RowSlots {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `total` pending slots.
    pub fn with_len(total: usize) -> Self {
        Self {
            slots: vec![Loadable::NotLoaded; total],
            generation: next_generation(),
        }
    }

    /// Create a fully loaded dataset.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        Self {
            slots: records.into_iter().map(Loadable::Loaded).collect(),
            generation: next_generation(),
        }
    }

    /// Create from raw slots.
    pub fn from_slots(slots: Vec<Loadable<Record>>) -> Self {
        Self {
            slots,
            generation: next_generation(),
        }
    }

    /// Number of virtual rows, loaded or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Get the slot at `row`. Rows past the end are `NotLoaded`.
    pub fn get(&self, row: usize) -> Loadable<&Record> {
        self.slots
            .get(row)
            .map(Loadable::as_ref)
            .unwrap_or(Loadable::NotLoaded)
    }

    /// Get the loaded record at `row`, if any.
    pub fn record(&self, row: usize) -> Option<&Record> {
        self.get(row).loaded()
    }

    /// Count of loaded slots.
    pub fn loaded_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_loaded()).count()
    }

    /// Identity of the current dataset contents.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace every slot.
    pub fn replace(&mut self, slots: Vec<Loadable<Record>>) {
        self.slots = slots;
        self.bump();
    }

    /// Resize to `total` rows, padding with pending slots.
    pub fn set_total(&mut self, total: usize) {
        if total == self.slots.len() {
            return;
        }
        self.slots.resize(total, Loadable::NotLoaded);
        self.bump();
    }

    /// Place a fetched page. Grows the dataset if the page ends past it.
    /// An empty page leaves the dataset untouched.
    pub fn set_page(&mut self, page: usize, page_size: usize, records: Vec<Record>) {
        if records.is_empty() {
            trace!("RowSlots: page {} is empty", page);
            return;
        }
        let start = page.saturating_mul(page_size);
        let end = start.saturating_add(records.len());
        if end > self.slots.len() {
            self.slots.resize(end, Loadable::NotLoaded);
        }
        for (slot, record) in self.slots[start..end].iter_mut().zip(records) {
            *slot = Loadable::Loaded(record);
        }
        trace!("RowSlots: page {} placed at rows {}..{}", page, start, end);
        self.bump();
    }

    /// Mark every slot pending again, keeping the length.
    pub fn invalidate(&mut self) {
        self.slots.fill(Loadable::NotLoaded);
        self.bump();
    }

    fn bump(&mut self) {
        self.generation = next_generation();
    }
}
