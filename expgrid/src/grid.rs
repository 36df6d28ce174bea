//! One grid instance.
//!
//! [`Grid`] owns the row slots, schema, column layout and memo, selection,
//! viewport controller and interaction dispatcher. Hosts feed it data and raw
//! events; it queues [`GridAction`]s for the outside world, which the host
//! drains with [`Grid::take_actions`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use serde::Serialize;
use tokio::time::Sleep;

use crate::cell::CellContent;
use crate::columns::ColumnId;
use crate::columns::ColumnLayout;
use crate::columns::ColumnResolver;
use crate::columns::ColumnWidths;
use crate::columns::RenderContext;
use crate::columns::is_static;
use crate::config::GridConfig;
use crate::dispatch::CellLookup;
use crate::dispatch::Command;
use crate::dispatch::GridEvent;
use crate::dispatch::InteractionDispatcher;
use crate::error::Result;
use crate::menu::BatchAction;
use crate::menu::ContextMenuOutcome;
use crate::menu::ContextMenuProps;
use crate::menu::HeaderMenu;
use crate::menu::Tooltip;
use crate::model::Loadable;
use crate::model::Project;
use crate::model::Record;
use crate::model::RecordId;
use crate::model::SchemaMap;
use crate::model::UserDirectory;
use crate::observable::Observable;
use crate::render::ColumnHeader;
use crate::render::RenderAdapter;
use crate::render::RenderSettings;
use crate::render::row_theme;
use crate::rows::RowSlots;
use crate::selection::SelectionModel;
use crate::theme::ColorMap;
use crate::theme::RowTheme;
use crate::theme::Theme;
use crate::viewport::GridHandle;
use crate::viewport::SettleCounter;
use crate::viewport::ViewportController;
use crate::viewport::ViewportState;
use crate::viewport::VisibleRegion;

/// Outward notification produced by a grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GridAction {
    /// Selected record ids changed. The list is shared until it changes again.
    SelectionChanged { ids: Arc<Vec<RecordId>> },
    SelectAllChanged { value: bool },
    Navigate { path: String, new_tab: bool },
    /// New dynamic column order.
    ColumnOrderChanged { order: Vec<ColumnId> },
    ColumnWidthChanged { column: ColumnId, width: u32 },
    /// A resize gesture ended; the full width map, for persistence.
    ColumnWidthsCommitted { widths: Arc<HashMap<ColumnId, u32>> },
    HeaderMenuOpened { column_id: ColumnId, x: i32, y: i32 },
    HeaderMenuClosed,
    /// Suppress the native context menu and call
    /// [`Grid::complete_pending_context_menu`] after `delay`.
    ContextMenuScheduled { delay: Duration },
    ContextMenuOpened {
        record_id: RecordId,
        link: Option<String>,
        x: i32,
        y: i32,
    },
    ContextMenuClosed,
    VisibleRegionChanged { region: VisibleRegion },
    Refetch,
    BatchActionPerformed {
        action: BatchAction,
        successful_ids: Vec<RecordId>,
    },
}

/// Everything cell rendering and event classification read.
#[derive(Debug)]
struct GridState {
    rows: RowSlots,
    schema: Loadable<SchemaMap>,
    layout: ColumnLayout,
    resolver: ColumnResolver,
    /// Ids of the columns currently shown, in grid index order.
    shown: Vec<ColumnId>,
    selection: SelectionModel,
    users: UserDirectory,
    project: Option<Project>,
    theme: Theme,
    colors: ColorMap,
}

impl GridState {
    /// Re-resolve every column id, dropping those without a definition.
    fn refresh_columns(&mut self) {
        let mut shown = Vec::new();
        for id in self.layout.all_ids() {
            if self
                .resolver
                .resolve(&id, &self.schema, self.layout.widths())
                .is_some()
            {
                shown.push(id);
            }
        }
        if shown != self.shown {
            debug!("Grid: showing {} columns", shown.len());
            self.shown = shown;
        }
    }

    fn headers(&self) -> Vec<ColumnHeader> {
        self.shown
            .iter()
            .filter_map(|id| self.resolver.definition(id))
            .enumerate()
            .map(|(index, def)| ColumnHeader::new(def, index))
            .collect()
    }
}

impl CellLookup for GridState {
    fn column_id(&self, col: usize) -> Option<&str> {
        self.shown.get(col).map(String::as_str)
    }

    fn column_width(&self, id: &str) -> Option<u32> {
        self.resolver.definition(id).map(|def| def.width)
    }

    fn dynamic_index(&self, col: usize) -> Option<usize> {
        let id = self.shown.get(col)?;
        if is_static(id) {
            return None;
        }
        self.layout.dynamic_position(id)
    }

    fn dynamic_len(&self) -> usize {
        self.layout.dynamic_ids().len()
    }

    fn row(&self, row: usize) -> Loadable<&Record> {
        self.rows.get(row)
    }

    fn cell(&self, col: usize, row: usize) -> Option<CellContent> {
        let def = self.resolver.definition(self.shown.get(col)?)?;
        let content = match self.rows.get(row) {
            Loadable::Loaded(record) => {
                let cx = RenderContext {
                    selection: &self.selection,
                    users: &self.users,
                };
                def.render(record, row, &cx)
            }
            Loadable::NotLoaded => CellContent::Loading,
        };
        Some(content)
    }

    fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }
}

/// A virtualized, interactive grid over partially loaded rows.
#[derive(Debug)]
pub struct Grid {
    config: GridConfig,
    state: GridState,
    selected_ids: Arc<Vec<RecordId>>,
    viewport: ViewportController,
    dispatcher: InteractionDispatcher,
    actions: Vec<GridAction>,
}

impl Grid {
    /// Create a grid that starts scrolled to `page`.
    ///
    /// `counter` is shared with the host so it can tell when the initial
    /// scroll has settled.
    pub fn new(config: GridConfig, page: usize, counter: SettleCounter) -> Result<Self> {
        config.validate()?;
        let widths = ColumnWidths::new(config.column_widths.clone(), config.default_column_width);
        let mut state = GridState {
            rows: RowSlots::new(),
            schema: Loadable::NotLoaded,
            layout: ColumnLayout::new(Vec::new(), widths),
            resolver: ColumnResolver::new(),
            shown: Vec::new(),
            selection: SelectionModel::new(),
            users: UserDirectory::default(),
            project: None,
            theme: Theme::default(),
            colors: ColorMap::new(),
        };
        state.refresh_columns();
        let selected_ids = state.selection.materialize(&state.rows);

        Ok(Self {
            viewport: ViewportController::new(&config, page, counter),
            dispatcher: InteractionDispatcher::new(&config),
            config,
            state,
            selected_ids,
            actions: Vec::new(),
        })
    }

    pub fn with_columns(mut self, ids: Vec<ColumnId>) -> Self {
        self.set_columns(ids);
        self
    }

    pub fn with_rows(mut self, rows: RowSlots) -> Self {
        self.set_rows(rows);
        self
    }

    pub fn with_schema(mut self, schema: Loadable<SchemaMap>) -> Self {
        self.set_schema(schema);
        self
    }

    pub fn with_users(mut self, users: UserDirectory) -> Self {
        self.state.users = users;
        self
    }

    pub fn with_project(mut self, project: Project) -> Self {
        self.state.project = Some(project);
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.set_theme(theme);
        self
    }

    pub fn with_color_map(mut self, colors: ColorMap) -> Self {
        self.state.colors = colors;
        self
    }

    // -------------------------------------------------------------------------
    // Inputs from the host
    // -------------------------------------------------------------------------

    /// Replace the row data. The selection survives; its ids are recomputed.
    pub fn set_rows(&mut self, rows: RowSlots) {
        self.state.rows = rows;
        self.sync_selection();
    }

    /// Place one fetched page.
    pub fn set_page(&mut self, page: usize, records: Vec<Record>) {
        self.state
            .rows
            .set_page(page, self.config.page_size, records);
        self.sync_selection();
    }

    /// Set the virtual row count.
    pub fn set_total(&mut self, total: usize) {
        self.state.rows.set_total(total);
        self.sync_selection();
    }

    pub fn set_schema(&mut self, schema: Loadable<SchemaMap>) {
        self.state.schema = schema;
        self.state.refresh_columns();
    }

    /// Replace the dynamic column order.
    pub fn set_columns(&mut self, ids: Vec<ColumnId>) {
        self.state.layout.set_dynamic(ids);
        self.state.refresh_columns();
    }

    /// Swap theme tokens. A change drops the definition memo.
    pub fn set_theme(&mut self, theme: Theme) {
        if theme != self.state.theme {
            self.state.theme = theme;
            self.state.resolver.reset();
            self.state.refresh_columns();
        }
    }

    pub fn set_color_map(&mut self, colors: ColorMap) {
        self.state.colors = colors;
    }

    pub fn set_users(&mut self, users: UserDirectory) {
        self.state.users = users;
    }

    pub fn set_project(&mut self, project: Option<Project>) {
        self.state.project = project;
    }

    /// Feed the host's incrementing clear signal.
    ///
    /// A clear drops select-all as well as the row set, and reports both.
    pub fn set_clear_trigger(&mut self, value: u64) {
        let was_select_all = self.state.selection.is_select_all();
        if self.state.selection.sync_clear_trigger(value) {
            if was_select_all {
                self.actions.push(GridAction::SelectAllChanged { value: false });
            }
            self.sync_selection();
        }
    }

    pub fn set_select_all(&mut self, value: bool) {
        if self.state.selection.is_select_all() != value {
            self.state.selection.set_select_all(value);
            self.actions.push(GridAction::SelectAllChanged { value });
        }
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Run one render pass.
    ///
    /// Resolves columns, applies the initial scroll while unsettled and
    /// returns the settings the native grid needs.
    pub fn render(&mut self, handle: Option<&mut dyn GridHandle>) -> RenderSettings {
        self.state.refresh_columns();
        self.viewport.on_render(handle);
        self.sync_selection();
        RenderSettings::new(&self.config, self.state.rows.len())
    }

    /// Draw `region` through `adapter`.
    pub fn paint(&self, region: VisibleRegion, adapter: &mut dyn RenderAdapter) {
        let settings = RenderSettings::new(&self.config, self.state.rows.len());
        adapter.begin(&settings, &self.state.headers());

        let rows = region.y..region.y.saturating_add(region.height).min(self.state.rows.len());
        let cols = region.x..region.x.saturating_add(region.width).min(self.state.shown.len());
        for row in rows {
            let theme = self.row_theme(row);
            for col in cols.clone() {
                if let Some(cell) = self.state.cell(col, row) {
                    adapter.draw_cell(col, row, &cell, theme.as_ref());
                }
            }
        }
        adapter.finish();
    }

    /// Content of one cell. Unloaded rows render as [`CellContent::Loading`];
    /// unknown columns as an empty cell.
    pub fn cell_content(&self, col: usize, row: usize) -> CellContent {
        self.state.cell(col, row).unwrap_or_else(CellContent::empty)
    }

    pub fn row_theme(&self, row: usize) -> Option<RowTheme> {
        row_theme(
            &self.state.rows,
            row,
            &self.state.theme,
            &self.state.colors,
        )
    }

    pub fn headers(&self) -> Vec<ColumnHeader> {
        self.state.headers()
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Handle one raw event from the native grid.
    pub fn handle_event(&mut self, event: GridEvent) {
        let header_before = self.dispatcher.header_menu().clone();
        let context_was_open = self.dispatcher.context_menu().is_open();

        let command = self.dispatcher.dispatch(event, &self.state);

        if context_was_open && !self.dispatcher.context_menu().is_open() {
            self.actions.push(GridAction::ContextMenuClosed);
        }
        self.report_header_menu(&header_before);

        if let Some(command) = command {
            self.apply(command);
        }
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::ToggleSelectAll => {
                let value = self.state.selection.toggle_select_all();
                self.actions.push(GridAction::SelectAllChanged { value });
            }
            Command::ToggleRow(row) => {
                self.state.selection.toggle_row(row);
                self.sync_selection();
            }
            Command::Navigate { path, new_tab } => {
                debug!("Grid: navigate to {} (new tab: {})", path, new_tab);
                self.actions.push(GridAction::Navigate { path, new_tab });
            }
            Command::MoveColumn { from, to } => {
                if self.state.layout.move_dynamic(from, to) {
                    self.state.refresh_columns();
                    self.actions.push(GridAction::ColumnOrderChanged {
                        order: self.state.layout.dynamic_ids().to_vec(),
                    });
                }
            }
            Command::ResizeColumn { column, width } => {
                if self.state.layout.resize(&column, width) {
                    self.state.resolver.update_width(&column, width);
                    self.actions
                        .push(GridAction::ColumnWidthChanged { column, width });
                }
            }
            Command::CommitColumnWidths => {
                self.actions.push(GridAction::ColumnWidthsCommitted {
                    widths: self.state.layout.widths().snapshot(),
                });
            }
            Command::ScheduleContextMenu { delay } => {
                self.actions.push(GridAction::ContextMenuScheduled { delay });
            }
        }
    }

    fn report_header_menu(&mut self, before: &HeaderMenu) {
        let after = self.dispatcher.header_menu().clone();
        if after == *before {
            return;
        }
        if after.open {
            if let Some(column_id) = after.column_id.clone() {
                self.actions.push(GridAction::HeaderMenuOpened {
                    column_id,
                    x: after.x,
                    y: after.y,
                });
            }
        } else if before.open {
            self.actions.push(GridAction::HeaderMenuClosed);
        }
    }

    /// Open the pending context menu now. Returns true if one opened.
    pub fn complete_pending_context_menu(&mut self) -> bool {
        if !self.dispatcher.complete_pending_context_menu(&self.state) {
            return false;
        }
        if let Some(props) = self.dispatcher.context_menu().props() {
            self.actions.push(GridAction::ContextMenuOpened {
                record_id: props.entity.record.id(),
                link: props.link.clone(),
                x: props.x,
                y: props.y,
            });
        }
        true
    }

    /// Delay between a context-menu request and its opening.
    pub fn context_menu_delay(&self) -> Duration {
        self.dispatcher.context_menu_delay()
    }

    /// Timer for the pending context menu, or `None` if nothing is pending.
    ///
    /// The timer does not borrow the grid, so events and closes can still
    /// arrive while it runs. Await it, then call
    /// [`Grid::complete_pending_context_menu`]; a close in between leaves
    /// nothing to open. Must be called inside a tokio runtime.
    pub fn context_menu_timer(&self) -> Option<Sleep> {
        self.dispatcher
            .context_menu()
            .has_pending()
            .then(|| tokio::time::sleep(self.context_menu_delay()))
    }

    /// Close the context menu. Returns true if it was open, in which case
    /// the host should stop the closing click from propagating.
    pub fn close_context_menu(&mut self) -> bool {
        let was_open = self.dispatcher.close_context_menu();
        if was_open {
            self.actions.push(GridAction::ContextMenuClosed);
        }
        was_open
    }

    pub fn close_header_menu(&mut self) -> bool {
        let was_open = self.dispatcher.close_header_menu();
        if was_open {
            self.actions.push(GridAction::HeaderMenuClosed);
        }
        was_open
    }

    pub fn close_tooltip(&mut self) {
        self.dispatcher.close_tooltip();
    }

    /// Report from the context menu collaborator.
    pub fn on_context_menu_outcome(&mut self, outcome: ContextMenuOutcome) {
        self.close_context_menu();
        match outcome {
            ContextMenuOutcome::Refetch => self.actions.push(GridAction::Refetch),
            ContextMenuOutcome::BatchAction {
                action,
                successful_ids,
            } => self.actions.push(GridAction::BatchActionPerformed {
                action,
                successful_ids,
            }),
            ContextMenuOutcome::Dismissed => {}
        }
    }

    /// Visible region reported by the native grid.
    pub fn on_visible_region_changed(&mut self, region: VisibleRegion) {
        if let Some(region) = self.viewport.on_visible_region_changed(region) {
            self.actions.push(GridAction::VisibleRegionChanged { region });
        }
    }

    /// Drain queued outward actions.
    pub fn take_actions(&mut self) -> Vec<GridAction> {
        std::mem::take(&mut self.actions)
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    fn sync_selection(&mut self) -> Arc<Vec<RecordId>> {
        let ids = self.state.selection.materialize(&self.state.rows);
        if !Arc::ptr_eq(&ids, &self.selected_ids) {
            self.selected_ids = Arc::clone(&ids);
            self.actions.push(GridAction::SelectionChanged {
                ids: Arc::clone(&ids),
            });
        }
        ids
    }

    /// Selected record ids. Same allocation as long as the ids do not change.
    pub fn selected_ids(&mut self) -> Arc<Vec<RecordId>> {
        self.sync_selection()
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.state.selection
    }

    pub fn is_select_all(&self) -> bool {
        self.state.selection.is_select_all()
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn rows(&self) -> &RowSlots {
        &self.state.rows
    }

    /// Ids of the columns currently shown, in grid order.
    pub fn column_ids(&self) -> &[ColumnId] {
        &self.state.shown
    }

    /// Dynamic column order, including columns not shown yet.
    pub fn dynamic_columns(&self) -> &[ColumnId] {
        self.state.layout.dynamic_ids()
    }

    pub fn column_widths(&self) -> &ColumnWidths {
        self.state.layout.widths()
    }

    pub fn resolver(&self) -> &ColumnResolver {
        &self.state.resolver
    }

    pub fn header_menu(&self) -> &HeaderMenu {
        self.dispatcher.header_menu()
    }

    pub fn context_menu_props(&self) -> Option<&ContextMenuProps> {
        self.dispatcher.context_menu().props()
    }

    pub fn is_context_menu_open(&self) -> bool {
        self.dispatcher.context_menu().is_open()
    }

    pub fn has_pending_context_menu(&self) -> bool {
        self.dispatcher.context_menu().has_pending()
    }

    /// Observable context-menu open flag.
    pub fn context_menu_open(&self) -> Observable<bool> {
        self.dispatcher.context_menu().open_flag().clone()
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.dispatcher.tooltip()
    }

    pub fn viewport_state(&self) -> ViewportState {
        self.viewport.state()
    }

    pub fn settle_counter(&self) -> &SettleCounter {
        self.viewport.counter()
    }
}
