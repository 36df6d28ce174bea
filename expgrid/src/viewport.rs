//! Initial scroll positioning and visible-region reporting.
//!
//! On mount the grid must jump to the persisted page. The native grid
//! reports its visible region while it initialises, and an early report would
//! look like a user scroll back to the top. The controller therefore applies
//! the programmatic scroll on a fixed number of renders and only then starts
//! forwarding region changes.

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use log::debug;
use log::trace;
use serde::Deserialize;
use serde::Serialize;

use crate::config::GridConfig;

/// Seam to the native grid primitive.
pub trait GridHandle {
    /// Scroll so that (`col`, `row`) is in view.
    fn scroll_to(&mut self, col: usize, row: usize);
}

/// Visible cell range, in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VisibleRegion {
    /// First visible column.
    pub x: usize,
    /// First visible row.
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl VisibleRegion {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Page containing the first visible row.
    pub fn page(&self, page_size: usize) -> usize {
        self.y / page_size.max(1)
    }
}

/// Shared count of applied initial scrolls.
///
/// The host keeps a clone so its own scroll handling can tell whether the
/// position has been set yet.
#[derive(Debug, Clone, Default)]
pub struct SettleCounter(Arc<AtomicUsize>);

impl SettleCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn increment(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Start over, e.g. when the host remounts the grid for a new query.
    pub fn reset(&self) {
        self.0.store(0, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportState {
    /// Still applying the initial scroll.
    Unsettled,
    /// Initial scroll done; external scroll reports are trusted.
    Settled,
}

#[derive(Debug, Clone)]
pub struct ViewportController {
    counter: SettleCounter,
    threshold: usize,
    page: usize,
    page_size: usize,
}

impl ViewportController {
    pub fn new(config: &GridConfig, page: usize, counter: SettleCounter) -> Self {
        Self {
            counter,
            threshold: config.settle_threshold,
            page,
            page_size: config.page_size,
        }
    }

    pub fn state(&self) -> ViewportState {
        if self.counter.get() >= self.threshold {
            ViewportState::Settled
        } else {
            ViewportState::Unsettled
        }
    }

    pub fn is_settled(&self) -> bool {
        self.state() == ViewportState::Settled
    }

    pub fn counter(&self) -> &SettleCounter {
        &self.counter
    }

    /// Row the initial scroll targets.
    pub fn target_row(&self) -> usize {
        self.page.saturating_mul(self.page_size)
    }

    /// Run once per render.
    ///
    /// While unsettled and with a live handle, scrolls to the target row and
    /// counts the attempt. Returns the row scrolled to, if any. Inert once
    /// settled.
    pub fn on_render(&mut self, handle: Option<&mut dyn GridHandle>) -> Option<usize> {
        if self.is_settled() {
            return None;
        }
        let handle = handle?;
        let row = self.target_row();
        handle.scroll_to(0, row);
        let count = self.counter.increment();
        debug!(
            "ViewportController: scrolled to row {} ({}/{})",
            row, count, self.threshold
        );
        Some(row)
    }

    /// Filter a visible-region report from the native grid.
    ///
    /// Reports are forwarded verbatim once settled and dropped before that.
    pub fn on_visible_region_changed(&self, region: VisibleRegion) -> Option<VisibleRegion> {
        if !self.is_settled() {
            trace!("ViewportController: dropping region {:?} while unsettled", region);
            return None;
        }
        Some(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(usize, usize)>,
    }

    impl GridHandle for Recorder {
        fn scroll_to(&mut self, col: usize, row: usize) {
            self.calls.push((col, row));
        }
    }

    fn controller(page: usize) -> ViewportController {
        let config = GridConfig::default().with_page_size(20);
        ViewportController::new(&config, page, SettleCounter::new())
    }

    #[test]
    fn test_settles_after_threshold() {
        let mut viewport = controller(3);
        let mut grid = Recorder::default();

        assert_eq!(viewport.on_render(Some(&mut grid)), Some(60));
        assert_eq!(viewport.counter().get(), 1);
        assert_eq!(viewport.on_render(Some(&mut grid)), Some(60));
        assert_eq!(viewport.counter().get(), 2);
        assert_eq!(viewport.on_render(Some(&mut grid)), None);

        assert_eq!(grid.calls, vec![(0, 60), (0, 60)]);
        assert_eq!(viewport.state(), ViewportState::Settled);
    }

    #[test]
    fn test_no_handle_does_not_count() {
        let mut viewport = controller(1);
        assert_eq!(viewport.on_render(None), None);
        assert_eq!(viewport.counter().get(), 0);
    }

    #[test]
    fn test_regions_forwarded_only_when_settled() {
        let mut viewport = controller(0);
        let region = VisibleRegion::new(0, 40, 5, 10);
        assert_eq!(viewport.on_visible_region_changed(region), None);

        let mut grid = Recorder::default();
        viewport.on_render(Some(&mut grid));
        viewport.on_render(Some(&mut grid));
        assert_eq!(viewport.on_visible_region_changed(region), Some(region));
        assert_eq!(region.page(20), 2);
    }
}
