use expgrid::Grid;
use expgrid::GridAction;
use expgrid::GridConfig;
use expgrid::cell::CellContent;
use expgrid::columns::ColumnLayout;
use expgrid::columns::ColumnResolver;
use expgrid::columns::ColumnWidths;
use expgrid::columns::Renderer;
use expgrid::dispatch::GridEvent;
use expgrid::model::ColumnSchema;
use expgrid::model::ColumnType;
use expgrid::model::Loadable;
use expgrid::model::LocationType;
use expgrid::model::Record;
use expgrid::model::SchemaMap;
use expgrid::rows::RowSlots;
use expgrid::viewport::SettleCounter;
use serde_json::json;

const SCHEMA: &str = r#"[
    {"column": "hp.lr", "type": "COLUMN_TYPE_NUMBER", "location": "LOCATION_TYPE_HYPERPARAMETERS", "displayName": "Learning rate"},
    {"column": "validation.loss", "type": "COLUMN_TYPE_NUMBER", "location": "LOCATION_TYPE_VALIDATIONS"},
    {"column": "endTime", "type": "COLUMN_TYPE_DATE", "location": "LOCATION_TYPE_EXPERIMENT"},
    {"column": "mystery", "type": "COLUMN_TYPE_TEXT", "location": "LOCATION_TYPE_UNSPECIFIED"}
]"#;

fn record() -> Record {
    Record::from_value(json!({
        "experiment": {
            "id": 11,
            "name": "mnist",
            "endTime": "2024-05-06T07:08:09Z",
            "config": { "hyperparameters": { "lr": { "val": 0.01 } } }
        },
        "bestTrial": { "bestValidationMetric": { "metrics": { "loss": 0.25 } } }
    }))
    .unwrap()
}

fn grid() -> Grid {
    Grid::new(GridConfig::default(), 0, SettleCounter::new())
        .unwrap()
        .with_columns(vec![
            "hp.lr".into(),
            "validation.loss".into(),
            "endTime".into(),
            "mystery".into(),
        ])
        .with_schema(Loadable::Loaded(SchemaMap::from_json(SCHEMA).unwrap()))
        .with_rows(RowSlots::from_records([record()]))
}

// =============================================================================
// Resolution
// =============================================================================

#[test]
fn test_schema_columns_read_their_paths() {
    let grid = grid();
    assert_eq!(
        grid.column_ids(),
        ["selected", "name", "hp.lr", "validation.loss", "endTime", "mystery"]
    );
    assert_eq!(grid.cell_content(2, 0), CellContent::Number { value: Some(0.01) });
    assert_eq!(grid.cell_content(3, 0), CellContent::Number { value: Some(0.25) });
    assert_eq!(grid.cell_content(4, 0).display_text(), "2024-05-06 07:08:09");
    assert_eq!(grid.cell_content(5, 0), CellContent::empty());
}

#[test]
fn test_display_name_is_title() {
    let grid = grid();
    let titles: Vec<_> = grid.headers().into_iter().map(|h| h.title).collect();
    assert_eq!(titles[2], "Learning rate");
    assert_eq!(titles[3], "validation.loss");
}

#[test]
fn test_one_definition_per_id() {
    let mut resolver = ColumnResolver::new();
    let schema = Loadable::Loaded(SchemaMap::from_json(SCHEMA).unwrap());
    let widths = ColumnWidths::default();
    for _ in 0..3 {
        for id in ["selected", "name", "hp.lr", "endTime"] {
            resolver.resolve(id, &schema, &widths);
        }
    }
    assert_eq!(resolver.len(), 4);
    assert!(matches!(
        resolver.definition("endTime").map(|d| &d.renderer),
        Some(Renderer::Date { .. })
    ));
}

// =============================================================================
// Resize
// =============================================================================

#[test]
fn test_resize_to_same_width_keeps_map() {
    let widths = ColumnWidths::new([("A".to_string(), 100)].into(), 140);
    let mut layout = ColumnLayout::new(vec!["A".into(), "B".into()], widths.clone());

    assert!(!layout.resize("A", 100));
    assert!(layout.widths().ptr_eq(&widths));

    assert!(layout.resize("A", 150));
    assert!(!layout.widths().ptr_eq(&widths));
    assert_eq!(layout.widths().get("A"), 150);
    assert_eq!(layout.widths().explicit("B"), None);
}

#[test]
fn test_grid_resize_updates_header_and_commits() {
    let mut grid = grid();
    grid.take_actions();

    grid.handle_event(GridEvent::ColumnResized { col: 2, width: 210 });
    grid.handle_event(GridEvent::ColumnResized { col: 2, width: 210 });
    grid.handle_event(GridEvent::ColumnResized { col: 0, width: 90 });
    grid.handle_event(GridEvent::ColumnResizeEnded);

    assert_eq!(grid.headers()[2].width, 210);
    let actions = grid.take_actions();
    assert_eq!(actions.len(), 2);
    assert_eq!(
        actions[0],
        GridAction::ColumnWidthChanged {
            column: "hp.lr".into(),
            width: 210
        }
    );
    match &actions[1] {
        GridAction::ColumnWidthsCommitted { widths } => assert_eq!(widths.get("hp.lr"), Some(&210)),
        other => panic!("unexpected action {:?}", other),
    }
}

// =============================================================================
// Reorder
// =============================================================================

#[test]
fn test_drag_dynamic_column() {
    let mut grid = Grid::new(GridConfig::default(), 0, SettleCounter::new())
        .unwrap()
        .with_columns(vec!["id".into(), "user".into(), "state".into()]);
    grid.take_actions();

    grid.handle_event(GridEvent::ColumnMoved { from: 2, to: 4 });
    assert_eq!(grid.dynamic_columns(), ["user", "state", "id"]);
    assert_eq!(
        grid.take_actions(),
        vec![GridAction::ColumnOrderChanged {
            order: vec!["user".into(), "state".into(), "id".into()]
        }]
    );
}

#[test]
fn test_drag_static_column_is_noop() {
    let mut grid = Grid::new(GridConfig::default(), 0, SettleCounter::new())
        .unwrap()
        .with_columns(vec!["id".into(), "user".into()]);

    grid.handle_event(GridEvent::ColumnMoved { from: 1, to: 3 });
    grid.handle_event(GridEvent::ColumnMoved { from: 0, to: 2 });
    assert_eq!(grid.dynamic_columns(), ["id", "user"]);
    assert!(grid.take_actions().is_empty());
}

#[test]
fn test_schema_entry_for_column_arrives_later() {
    let mut grid = Grid::new(GridConfig::default(), 0, SettleCounter::new())
        .unwrap()
        .with_columns(vec!["hp.lr".into(), "id".into()])
        .with_rows(RowSlots::from_records([record()]));
    assert_eq!(grid.column_ids(), ["selected", "name", "id"]);

    grid.set_schema(Loadable::Loaded(SchemaMap::from_json(SCHEMA).unwrap()));
    assert_eq!(grid.column_ids(), ["selected", "name", "hp.lr", "id"]);

    // Reloading the schema keeps the column on screen.
    grid.set_schema(Loadable::NotLoaded);
    assert_eq!(grid.column_ids(), ["selected", "name", "hp.lr", "id"]);
}
