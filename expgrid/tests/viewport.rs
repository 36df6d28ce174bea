use expgrid::Grid;
use expgrid::GridAction;
use expgrid::GridConfig;
use expgrid::viewport::GridHandle;
use expgrid::viewport::SettleCounter;
use expgrid::viewport::ViewportState;
use expgrid::viewport::VisibleRegion;

#[derive(Default)]
struct NativeGrid {
    scrolls: Vec<(usize, usize)>,
}

impl GridHandle for NativeGrid {
    fn scroll_to(&mut self, col: usize, row: usize) {
        self.scrolls.push((col, row));
    }
}

fn grid(page: usize, counter: SettleCounter) -> Grid {
    let config = GridConfig::default().with_page_size(20);
    Grid::new(config, page, counter).unwrap()
}

// =============================================================================
// Initial scroll
// =============================================================================

#[test]
fn test_scrolls_to_page_until_settled() {
    let counter = SettleCounter::new();
    let mut grid = grid(3, counter.clone());
    let mut native = NativeGrid::default();

    grid.render(Some(&mut native));
    assert_eq!(counter.get(), 1);
    grid.render(Some(&mut native));
    assert_eq!(counter.get(), 2);
    grid.render(Some(&mut native));

    assert_eq!(native.scrolls, vec![(0, 60), (0, 60)]);
    assert_eq!(grid.viewport_state(), ViewportState::Settled);
}

#[test]
fn test_render_without_handle_does_not_count() {
    let counter = SettleCounter::new();
    let mut grid = grid(1, counter.clone());
    grid.render(None);
    grid.render(None);
    assert_eq!(counter.get(), 0);
    assert_eq!(grid.viewport_state(), ViewportState::Unsettled);

    let mut native = NativeGrid::default();
    grid.render(Some(&mut native));
    assert_eq!(native.scrolls, vec![(0, 20)]);
}

#[test]
fn test_shared_counter_survives_remount() {
    let counter = SettleCounter::new();
    let mut native = NativeGrid::default();
    {
        let mut first = grid(2, counter.clone());
        first.render(Some(&mut native));
        first.render(Some(&mut native));
    }
    let mut second = grid(5, counter.clone());
    second.render(Some(&mut native));
    assert_eq!(native.scrolls.len(), 2);

    counter.reset();
    second.render(Some(&mut native));
    assert_eq!(native.scrolls.last(), Some(&(0, 100)));
}

// =============================================================================
// Region reporting
// =============================================================================

#[test]
fn test_region_reports_wait_for_settle() {
    let mut grid = grid(0, SettleCounter::new());
    let region = VisibleRegion::new(0, 0, 8, 12);

    grid.on_visible_region_changed(region);
    assert!(grid.take_actions().is_empty());

    let mut native = NativeGrid::default();
    grid.render(Some(&mut native));
    grid.render(Some(&mut native));
    grid.on_visible_region_changed(region);
    assert_eq!(
        grid.take_actions(),
        vec![GridAction::VisibleRegionChanged { region }]
    );
}

#[test]
fn test_render_settings_cover_virtual_rows() {
    let mut grid = grid(0, SettleCounter::new());
    grid.set_total(250);
    let settings = grid.render(None);
    assert_eq!(settings.rows, 250);
    assert_eq!(settings.freeze_columns, 2);
    assert_eq!(grid.rows().loaded_count(), 0);
}
