//! Header menu, per-cell context menu and hover tooltip state.
//!
//! At most one overlay is open at a time. The context menu reopens in two
//! steps: a request closes the current menu and parks the new one as
//! pending (CLOSING); completing the request after the configured delay
//! opens it (OPEN). The two menus are never open together.

use log::debug;
use serde::Deserialize;
use serde::Serialize;

use crate::columns::ColumnId;
use crate::model::ProjectRecord;
use crate::model::RecordId;
use crate::observable::Observable;

/// Column action menu opened from a header click.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeaderMenu {
    pub open: bool,
    pub column_id: Option<ColumnId>,
    pub title: String,
    pub x: i32,
    pub y: i32,
}

impl HeaderMenu {
    /// Open for `column_id` at (`x`, `y`).
    pub fn open_at(&mut self, column_id: &str, x: i32, y: i32) {
        self.title = format!("{} menu", column_id);
        self.column_id = Some(column_id.to_string());
        self.x = x;
        self.y = y;
        self.open = true;
    }

    /// Close. Returns true if it was open. Safe to call repeatedly.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }
}

/// A context menu request waiting for the previous menu to finish closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingContextMenu {
    pub col: usize,
    pub row: usize,
    /// Menu position, already offset and clamped.
    pub x: i32,
    pub y: i32,
}

/// What an open context menu shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenuProps {
    /// The row's domain entity.
    pub entity: ProjectRecord,
    /// Link target when the right-clicked cell is a link.
    pub link: Option<String>,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextMenuPhase {
    #[default]
    Idle,
    /// Previous menu closed, new one waiting for the delay.
    Closing(PendingContextMenu),
    Open,
}

/// Context menu state machine.
///
/// The open flag is an [`Observable`] so hosts can
/// subscribe to it instead of polling.
#[derive(Debug, Default)]
pub struct ContextMenu {
    open: Observable<bool>,
    phase: ContextMenuPhase,
    props: Option<ContextMenuProps>,
}

impl ContextMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close whatever is open and park `pending`. A later request replaces
    /// an earlier pending one.
    pub fn request_open(&mut self, pending: PendingContextMenu) {
        self.open.set(false);
        self.phase = ContextMenuPhase::Closing(pending);
        debug!(
            "ContextMenu: closing, pending row {} col {}",
            pending.row, pending.col
        );
    }

    /// Take the pending request, leaving the menu idle.
    pub fn take_pending(&mut self) -> Option<PendingContextMenu> {
        match self.phase {
            ContextMenuPhase::Closing(pending) => {
                self.phase = ContextMenuPhase::Idle;
                Some(pending)
            }
            _ => None,
        }
    }

    /// Open with `props`.
    pub fn show(&mut self, props: ContextMenuProps) {
        debug!("ContextMenu: open at ({}, {})", props.x, props.y);
        self.props = Some(props);
        self.phase = ContextMenuPhase::Open;
        self.open.set(true);
    }

    /// Close and drop any pending request. Returns true if a menu was open,
    /// in which case the host should stop the closing click from propagating.
    pub fn close(&mut self) -> bool {
        let was_open = self.is_open();
        self.phase = ContextMenuPhase::Idle;
        self.open.set(false);
        was_open
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub fn has_pending(&self) -> bool {
        matches!(self.phase, ContextMenuPhase::Closing(_))
    }

    pub fn phase(&self) -> ContextMenuPhase {
        self.phase
    }

    /// Last shown props. Kept after closing so a close animation can still read them.
    pub fn props(&self) -> Option<&ContextMenuProps> {
        self.props.as_ref()
    }

    pub fn open_flag(&self) -> &Observable<bool> {
        &self.open
    }
}

/// Bulk operation a context menu can run on its entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BatchAction {
    Activate,
    Archive,
    Cancel,
    Delete,
    Kill,
    Move,
    OpenTensorBoard,
    Pause,
    Unarchive,
}

/// How a context menu finished, reported back by the menu collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextMenuOutcome {
    /// The action changed data; the host should fetch again.
    Refetch,
    BatchAction {
        action: BatchAction,
        successful_ids: Vec<RecordId>,
    },
    /// Closed without doing anything.
    Dismissed,
}

/// Hover tooltip over a cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub col: usize,
    pub row: usize,
    pub text: String,
    pub x: i32,
    pub y: i32,
}
