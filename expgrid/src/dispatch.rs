//! Interaction dispatch.
//!
//! Raw events arrive tagged with grid coordinates. The dispatcher classifies
//! them, keeps the overlay state (header menu, context menu, tooltip) and
//! returns a [`Command`] for everything that must change state it does not
//! own. Any event that references a row which is not loaded is dropped.

use std::time::Duration;

use log::debug;
use log::trace;

use crate::cell::CellContent;
use crate::columns::ColumnId;
use crate::columns::SELECTION_COLUMN;
use crate::columns::STATIC_COLUMN_COUNT;
use crate::columns::is_resizable;
use crate::config::GridConfig;
use crate::menu::ContextMenu;
use crate::menu::ContextMenuProps;
use crate::menu::HeaderMenu;
use crate::menu::PendingContextMenu;
use crate::menu::Tooltip;
use crate::model::Loadable;
use crate::model::Project;
use crate::model::ProjectRecord;
use crate::model::Record;

/// Screen rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Modifier keys held during a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Default::default()
        }
    }

    pub fn meta() -> Self {
        Self {
            meta: true,
            ..Default::default()
        }
    }
}

/// Pointer position relative to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerEvent {
    /// Screen bounds of the cell under the pointer.
    pub bounds: Rect,
    /// Offset of the pointer inside `bounds`.
    pub local_x: i32,
    pub local_y: i32,
    pub button: MouseButton,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn at(bounds: Rect, local_x: i32, local_y: i32) -> Self {
        Self {
            bounds,
            local_x,
            local_y,
            ..Default::default()
        }
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Whether a link followed by this event should open in a new tab.
    pub fn opens_new_tab(&self) -> bool {
        self.modifiers.ctrl || self.modifiers.meta || self.button == MouseButton::Middle
    }

    fn screen_x(&self) -> i32 {
        self.bounds.x + self.local_x
    }

    fn screen_y(&self) -> i32 {
        self.bounds.y + self.local_y
    }
}

/// Raw event from the native grid, in grid coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    HeaderClicked { col: usize, bounds: Rect },
    CellClicked { col: usize, row: usize, pointer: PointerEvent },
    /// Pointer moved over a cell.
    CellHovered { col: usize, row: usize, pointer: PointerEvent },
    /// Pointer moved over a header, an empty area, or left the grid.
    HoverCleared,
    CellContextMenu { col: usize, row: usize, pointer: PointerEvent },
    /// Drag-reorder, in grid column indices.
    ColumnMoved { from: usize, to: usize },
    ColumnResized { col: usize, width: u32 },
    ColumnResizeEnded,
    Wheel,
}

/// State change requested by the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ToggleSelectAll,
    ToggleRow(usize),
    Navigate { path: String, new_tab: bool },
    /// Move within the dynamic column order.
    MoveColumn { from: usize, to: usize },
    ResizeColumn { column: ColumnId, width: u32 },
    CommitColumnWidths,
    /// A context menu is pending. The host suppresses the native menu and
    /// completes the open after `delay`.
    ScheduleContextMenu { delay: Duration },
}

/// Read access to the grid the dispatcher works against.
pub trait CellLookup {
    /// Id of the column shown at grid index `col`.
    fn column_id(&self, col: usize) -> Option<&str>;

    /// Current width of a shown column.
    fn column_width(&self, id: &str) -> Option<u32>;

    /// Position of grid column `col` within the dynamic order. `None` for
    /// static columns and out-of-range indices.
    fn dynamic_index(&self, col: usize) -> Option<usize>;

    /// Number of dynamic columns.
    fn dynamic_len(&self) -> usize;

    fn row(&self, row: usize) -> Loadable<&Record>;

    /// Rendered content of a cell, `None` when the column is not shown.
    fn cell(&self, col: usize, row: usize) -> Option<CellContent>;

    /// Project the grid is showing, if known.
    fn project(&self) -> Option<&Project>;
}

#[derive(Debug)]
pub struct InteractionDispatcher {
    header_menu: HeaderMenu,
    context_menu: ContextMenu,
    tooltip: Option<Tooltip>,
    context_menu_delay: Duration,
    pointer_offset: i32,
}

impl InteractionDispatcher {
    pub fn new(config: &GridConfig) -> Self {
        Self {
            header_menu: HeaderMenu::default(),
            context_menu: ContextMenu::new(),
            tooltip: None,
            context_menu_delay: config.context_menu_delay(),
            pointer_offset: config.context_menu_pointer_offset,
        }
    }

    pub fn header_menu(&self) -> &HeaderMenu {
        &self.header_menu
    }

    pub fn context_menu(&self) -> &ContextMenu {
        &self.context_menu
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn context_menu_delay(&self) -> Duration {
        self.context_menu_delay
    }

    pub fn dispatch(&mut self, event: GridEvent, grid: &dyn CellLookup) -> Option<Command> {
        match event {
            GridEvent::HeaderClicked { col, bounds } => self.on_header_clicked(col, bounds, grid),
            GridEvent::CellClicked { col, row, pointer } => {
                self.on_cell_clicked(col, row, &pointer, grid)
            }
            GridEvent::CellHovered { col, row, pointer } => {
                self.on_cell_hovered(col, row, &pointer, grid);
                None
            }
            GridEvent::HoverCleared => {
                self.tooltip = None;
                None
            }
            GridEvent::CellContextMenu { col, row, pointer } => {
                self.on_cell_context_menu(col, row, &pointer, grid)
            }
            GridEvent::ColumnMoved { from, to } => self.on_column_moved(from, to, grid),
            GridEvent::ColumnResized { col, width } => self.on_column_resized(col, width, grid),
            GridEvent::ColumnResizeEnded => Some(Command::CommitColumnWidths),
            GridEvent::Wheel => {
                self.context_menu.close();
                self.tooltip = None;
                None
            }
        }
    }

    fn on_header_clicked(&mut self, col: usize, bounds: Rect, grid: &dyn CellLookup) -> Option<Command> {
        let id = grid.column_id(col)?;
        if id == SELECTION_COLUMN {
            return Some(Command::ToggleSelectAll);
        }
        self.context_menu.close();
        self.tooltip = None;
        self.header_menu
            .open_at(id, bounds.x, bounds.y + bounds.height);
        debug!("InteractionDispatcher: header menu for '{}'", id);
        None
    }

    fn on_cell_clicked(
        &mut self,
        col: usize,
        row: usize,
        pointer: &PointerEvent,
        grid: &dyn CellLookup,
    ) -> Option<Command> {
        if grid.row(row).is_not_loaded() {
            trace!("InteractionDispatcher: click on unloaded row {}", row);
            return None;
        }
        let cell = grid.cell(col, row)?;
        match cell.link_target() {
            Some(href) => Some(Command::Navigate {
                path: href.to_string(),
                new_tab: pointer.opens_new_tab(),
            }),
            None => Some(Command::ToggleRow(row)),
        }
    }

    fn on_cell_hovered(&mut self, col: usize, row: usize, pointer: &PointerEvent, grid: &dyn CellLookup) {
        let text = match grid.row(row) {
            Loadable::Loaded(_) => grid.cell(col, row).map(|cell| cell.display_text()),
            Loadable::NotLoaded => None,
        };
        self.tooltip = match text {
            Some(text) if !text.is_empty() => Some(Tooltip {
                col,
                row,
                text,
                x: pointer.screen_x(),
                y: pointer.screen_y(),
            }),
            _ => None,
        };
    }

    fn on_cell_context_menu(
        &mut self,
        col: usize,
        row: usize,
        pointer: &PointerEvent,
        grid: &dyn CellLookup,
    ) -> Option<Command> {
        if grid.row(row).is_not_loaded() {
            trace!("InteractionDispatcher: context menu on unloaded row {}", row);
            return None;
        }
        self.header_menu.close();
        self.tooltip = None;
        self.context_menu.request_open(PendingContextMenu {
            col,
            row,
            x: (pointer.screen_x() - self.pointer_offset).max(0),
            y: (pointer.screen_y() - self.pointer_offset).max(0),
        });
        Some(Command::ScheduleContextMenu {
            delay: self.context_menu_delay,
        })
    }

    /// Open the pending context menu, re-resolving the cell first.
    ///
    /// Returns false when nothing was pending or the row stopped being
    /// loaded during the delay.
    pub fn complete_pending_context_menu(&mut self, grid: &dyn CellLookup) -> bool {
        let Some(pending) = self.context_menu.take_pending() else {
            return false;
        };
        let Loadable::Loaded(record) = grid.row(pending.row) else {
            debug!(
                "InteractionDispatcher: row {} unloaded before context menu opened",
                pending.row
            );
            return false;
        };
        let link = grid
            .cell(pending.col, pending.row)
            .and_then(|cell| cell.link_target().map(str::to_string));
        self.context_menu.show(ContextMenuProps {
            entity: ProjectRecord::new(record.clone(), grid.project()),
            link,
            x: pending.x,
            y: pending.y,
        });
        true
    }

    fn on_column_moved(&mut self, from: usize, to: usize, grid: &dyn CellLookup) -> Option<Command> {
        let Some(from) = grid.dynamic_index(from) else {
            trace!("InteractionDispatcher: ignoring drag from static column {}", from);
            return None;
        };
        let to = if to < STATIC_COLUMN_COUNT {
            0
        } else {
            grid.dynamic_index(to)
                .unwrap_or_else(|| grid.dynamic_len().saturating_sub(1))
        };
        Some(Command::MoveColumn { from, to })
    }

    fn on_column_resized(&mut self, col: usize, width: u32, grid: &dyn CellLookup) -> Option<Command> {
        let id = grid.column_id(col)?;
        if !is_resizable(id) || grid.column_width(id) == Some(width) {
            return None;
        }
        Some(Command::ResizeColumn {
            column: id.to_string(),
            width,
        })
    }

    /// Close the context menu. Returns true if it was open.
    pub fn close_context_menu(&mut self) -> bool {
        self.context_menu.close()
    }

    /// Close the header menu. Returns true if it was open.
    pub fn close_header_menu(&mut self) -> bool {
        self.header_menu.close()
    }

    pub fn close_tooltip(&mut self) {
        self.tooltip = None;
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    /// Columns `selected`, `name`, `x`, `y` over two rows, the second unloaded.
    struct Fixture {
        ids: Vec<&'static str>,
        widths: Vec<u32>,
        record: Record,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                ids: vec!["selected", "name", "x", "y"],
                widths: vec![40, 150, 100, 100],
                record: Record::new(7, json!({"experiment": {"id": 7, "name": "run"}})),
            }
        }
    }

    impl CellLookup for Fixture {
        fn column_id(&self, col: usize) -> Option<&str> {
            self.ids.get(col).copied()
        }

        fn column_width(&self, id: &str) -> Option<u32> {
            let col = self.ids.iter().position(|c| *c == id)?;
            self.widths.get(col).copied()
        }

        fn dynamic_index(&self, col: usize) -> Option<usize> {
            (STATIC_COLUMN_COUNT..self.ids.len())
                .contains(&col)
                .then(|| col - STATIC_COLUMN_COUNT)
        }

        fn dynamic_len(&self) -> usize {
            self.ids.len() - STATIC_COLUMN_COUNT
        }

        fn row(&self, row: usize) -> Loadable<&Record> {
            match row {
                0 => Loadable::Loaded(&self.record),
                _ => Loadable::NotLoaded,
            }
        }

        fn cell(&self, col: usize, _row: usize) -> Option<CellContent> {
            match self.ids.get(col)? {
                &"selected" => Some(CellContent::Checkbox { checked: false }),
                &"name" => Some(CellContent::link("run", "/experiments/7")),
                _ => Some(CellContent::text("0.1")),
            }
        }

        fn project(&self) -> Option<&Project> {
            None
        }
    }

    fn dispatcher() -> InteractionDispatcher {
        InteractionDispatcher::new(&GridConfig::default())
    }

    fn pointer() -> PointerEvent {
        PointerEvent::at(Rect::new(100, 200, 150, 40), 10, 12)
    }

    #[test]
    fn test_selection_header_toggles_select_all() {
        let grid = Fixture::new();
        let mut dispatcher = dispatcher();
        let command = dispatcher.dispatch(
            GridEvent::HeaderClicked {
                col: 0,
                bounds: Rect::default(),
            },
            &grid,
        );
        assert_eq!(command, Some(Command::ToggleSelectAll));
        assert!(!dispatcher.header_menu().open);
    }

    #[test]
    fn test_other_header_opens_menu_below() {
        let grid = Fixture::new();
        let mut dispatcher = dispatcher();
        let command = dispatcher.dispatch(
            GridEvent::HeaderClicked {
                col: 2,
                bounds: Rect::new(300, 0, 100, 36),
            },
            &grid,
        );
        assert_eq!(command, None);
        let menu = dispatcher.header_menu();
        assert!(menu.open);
        assert_eq!(menu.column_id.as_deref(), Some("x"));
        assert_eq!((menu.x, menu.y), (300, 36));
    }

    #[test]
    fn test_link_click_navigates() {
        let grid = Fixture::new();
        let mut dispatcher = dispatcher();
        let click = |pointer| GridEvent::CellClicked {
            col: 1,
            row: 0,
            pointer,
        };
        assert_eq!(
            dispatcher.dispatch(click(pointer()), &grid),
            Some(Command::Navigate {
                path: "/experiments/7".into(),
                new_tab: false
            })
        );
        let middle = pointer().with_button(MouseButton::Middle);
        assert_eq!(
            dispatcher.dispatch(click(middle), &grid),
            Some(Command::Navigate {
                path: "/experiments/7".into(),
                new_tab: true
            })
        );
    }

    #[test]
    fn test_plain_click_toggles_row() {
        let grid = Fixture::new();
        let mut dispatcher = dispatcher();
        let command = dispatcher.dispatch(
            GridEvent::CellClicked {
                col: 2,
                row: 0,
                pointer: pointer(),
            },
            &grid,
        );
        assert_eq!(command, Some(Command::ToggleRow(0)));
    }

    #[test]
    fn test_unloaded_row_is_ignored() {
        let grid = Fixture::new();
        let mut dispatcher = dispatcher();
        for event in [
            GridEvent::CellClicked {
                col: 2,
                row: 1,
                pointer: pointer(),
            },
            GridEvent::CellContextMenu {
                col: 2,
                row: 1,
                pointer: pointer(),
            },
        ] {
            assert_eq!(dispatcher.dispatch(event, &grid), None);
        }
        assert!(!dispatcher.context_menu().has_pending());
    }

    #[test]
    fn test_context_menu_position_is_offset_and_clamped() {
        let grid = Fixture::new();
        let mut dispatcher = dispatcher();
        let command = dispatcher.dispatch(
            GridEvent::CellContextMenu {
                col: 1,
                row: 0,
                pointer: PointerEvent::at(Rect::new(0, 0, 150, 40), 2, 30),
            },
            &grid,
        );
        assert!(matches!(command, Some(Command::ScheduleContextMenu { .. })));
        assert!(dispatcher.complete_pending_context_menu(&grid));

        let props = dispatcher.context_menu().props().unwrap();
        assert_eq!((props.x, props.y), (0, 26));
        assert_eq!(props.link.as_deref(), Some("/experiments/7"));
        assert_eq!(props.entity.record.id().0, 7);
    }

    #[test]
    fn test_drag_translation() {
        let grid = Fixture::new();
        let mut dispatcher = dispatcher();
        assert_eq!(
            dispatcher.dispatch(GridEvent::ColumnMoved { from: 3, to: 2 }, &grid),
            Some(Command::MoveColumn { from: 1, to: 0 })
        );
        assert_eq!(
            dispatcher.dispatch(GridEvent::ColumnMoved { from: 2, to: 0 }, &grid),
            Some(Command::MoveColumn { from: 0, to: 0 })
        );
        assert_eq!(
            dispatcher.dispatch(GridEvent::ColumnMoved { from: 1, to: 3 }, &grid),
            None
        );
    }

    #[test]
    fn test_resize_skips_selection_and_unchanged() {
        let grid = Fixture::new();
        let mut dispatcher = dispatcher();
        let resize = |col, width| GridEvent::ColumnResized { col, width };
        assert_eq!(dispatcher.dispatch(resize(0, 80), &grid), None);
        assert_eq!(dispatcher.dispatch(resize(2, 100), &grid), None);
        assert_eq!(
            dispatcher.dispatch(resize(2, 150), &grid),
            Some(Command::ResizeColumn {
                column: "x".into(),
                width: 150
            })
        );
    }

    #[test]
    fn test_hover_and_wheel() {
        let grid = Fixture::new();
        let mut dispatcher = dispatcher();
        dispatcher.dispatch(
            GridEvent::CellHovered {
                col: 2,
                row: 0,
                pointer: pointer(),
            },
            &grid,
        );
        assert_eq!(dispatcher.tooltip().map(|t| t.text.as_str()), Some("0.1"));

        dispatcher.dispatch(GridEvent::Wheel, &grid);
        assert!(dispatcher.tooltip().is_none());

        dispatcher.dispatch(
            GridEvent::CellHovered {
                col: 0,
                row: 0,
                pointer: pointer(),
            },
            &grid,
        );
        assert!(dispatcher.tooltip().is_none());
    }
}
