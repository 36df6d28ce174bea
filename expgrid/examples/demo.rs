//! Drives a grid through a short scripted session and prints what a native
//! grid would draw. Logs go to `expgrid-demo.log`.

use std::fs::File;

use expgrid::Grid;
use expgrid::GridConfig;
use expgrid::cell::CellContent;
use expgrid::dispatch::GridEvent;
use expgrid::dispatch::PointerEvent;
use expgrid::dispatch::Rect;
use expgrid::model::Loadable;
use expgrid::model::Record;
use expgrid::model::SchemaMap;
use expgrid::model::User;
use expgrid::model::UserDirectory;
use expgrid::render::ColumnHeader;
use expgrid::render::RenderAdapter;
use expgrid::render::RenderSettings;
use expgrid::rows::RowSlots;
use expgrid::theme::RowTheme;
use expgrid::viewport::GridHandle;
use expgrid::viewport::SettleCounter;
use expgrid::viewport::VisibleRegion;
use simplelog::{Config, LevelFilter, WriteLogger};

const SCHEMA: &str = r#"[
    {"column": "hp.lr", "type": "COLUMN_TYPE_NUMBER", "location": "LOCATION_TYPE_HYPERPARAMETERS"},
    {"column": "validation.accuracy", "type": "COLUMN_TYPE_NUMBER", "location": "LOCATION_TYPE_VALIDATIONS"}
]"#;

const ROWS: &str = r#"[
    {"experiment": {"id": 1, "name": "baseline", "userId": 1, "state": "COMPLETED",
        "config": {"hyperparameters": {"lr": {"val": 0.1}}}},
     "bestTrial": {"bestValidationMetric": {"metrics": {"accuracy": 0.91}}}},
    {"experiment": {"id": 2, "name": "lower-lr", "userId": 2, "state": "RUNNING", "forkedFrom": 1,
        "config": {"hyperparameters": {"lr": {"val": 0.01}}}},
     "bestTrial": {"bestValidationMetric": {"metrics": {"accuracy": 0.93}}}}
]"#;

/// Prints cells as a plain text table.
#[derive(Default)]
struct TextTable {
    line: Vec<String>,
    row: Option<usize>,
}

impl TextTable {
    fn flush(&mut self) {
        if !self.line.is_empty() {
            println!("{}", self.line.join(" | "));
            self.line.clear();
        }
    }
}

impl RenderAdapter for TextTable {
    fn begin(&mut self, settings: &RenderSettings, headers: &[ColumnHeader]) {
        println!(
            "{} rows, {} frozen columns",
            settings.rows, settings.freeze_columns
        );
        let titles: Vec<_> = headers.iter().map(|h| h.title.as_str()).collect();
        println!("{}", titles.join(" | "));
    }

    fn draw_cell(&mut self, _col: usize, row: usize, cell: &CellContent, _theme: Option<&RowTheme>) {
        if self.row != Some(row) {
            self.flush();
            self.row = Some(row);
        }
        let text = match cell {
            CellContent::Checkbox { checked: true } => "[x]".to_string(),
            CellContent::Checkbox { checked: false } => "[ ]".to_string(),
            CellContent::Loading => "...".to_string(),
            other => other.display_text(),
        };
        self.line.push(text);
    }

    fn finish(&mut self) {
        self.flush();
        self.row = None;
    }
}

struct NativeGrid;

impl GridHandle for NativeGrid {
    fn scroll_to(&mut self, col: usize, row: usize) {
        println!("scroll to ({}, {})", col, row);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let log_file = File::create("expgrid-demo.log").expect("Failed to create log file");
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let config = GridConfig::default().with_page_size(2);
    let mut rows = RowSlots::with_len(4);
    rows.set_page(
        0,
        config.page_size,
        Record::list_from_json(ROWS).expect("Failed to decode rows"),
    );

    let mut grid = Grid::new(config, 0, SettleCounter::new())
        .expect("Invalid config")
        .with_columns(vec![
            "state".into(),
            "user".into(),
            "forkedFrom".into(),
            "hp.lr".into(),
            "validation.accuracy".into(),
        ])
        .with_schema(Loadable::Loaded(
            SchemaMap::from_json(SCHEMA).expect("Failed to decode schema"),
        ))
        .with_users(UserDirectory::new([
            User::new(1, "ada").with_display_name("Ada Lovelace"),
            User::new(2, "alan"),
        ]))
        .with_rows(rows);

    let mut native = NativeGrid;
    grid.render(Some(&mut native));
    grid.render(Some(&mut native));

    let pointer = PointerEvent::at(Rect::new(0, 40, 140, 40), 12, 8);
    grid.handle_event(GridEvent::CellClicked {
        col: 2,
        row: 1,
        pointer,
    });
    grid.handle_event(GridEvent::CellContextMenu {
        col: 1,
        row: 0,
        pointer,
    });
    if let Some(timer) = grid.context_menu_timer() {
        timer.await;
        grid.complete_pending_context_menu();
    }
    grid.handle_event(GridEvent::ColumnMoved { from: 6, to: 2 });

    grid.paint(VisibleRegion::new(0, 0, 7, 4), &mut TextTable::default());

    for action in grid.take_actions() {
        match serde_json::to_string(&action) {
            Ok(json) => println!("action: {}", json),
            Err(e) => eprintln!("Error: {}", e),
        }
    }
}
