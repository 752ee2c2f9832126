mod common;

use std::cell::Cell;

use common::{FIELD_ID, catalog, grid_definition, render, sized_catalog};
use gridform::{
    BindError, Catalog, ControlKind, Field, FieldKind, GridBinder, Line, MemoryCatalog,
    MemoryFormEngine, RegisterOptions, RequiredRule, SubmitError, bind_grid,
};

#[test]
fn returns_the_field_information() {
    let catalog = catalog(false);
    let engine = MemoryFormEngine::new();
    let grid = bind_grid(&catalog, &engine, FIELD_ID).expect("binds");

    assert_eq!(grid.field(), &grid_definition(false));
    assert_eq!(grid.id(), FIELD_ID);
    assert_eq!(grid.label(), "Grid Field Question");
    assert!(!grid.required());
}

#[test]
fn renders_the_columns() {
    let catalog = catalog(false);
    let engine = MemoryFormEngine::new();
    let rendered = render(&catalog, &engine, None);

    assert_eq!(
        rendered.headers,
        ["Column 1", "Column 2", "Column 3", "Column 4"]
    );
}

#[test]
fn renders_the_lines_in_order() {
    let catalog = catalog(false);
    let engine = MemoryFormEngine::new();
    let rendered = render(&catalog, &engine, None);

    let labels: Vec<_> = rendered.rows.iter().map(|row| row.label.as_str()).collect();
    assert_eq!(labels, ["Line 1", "Line 2", "Line 3", "Line 4"]);
    assert!(rendered.rows.iter().all(|row| row.controls.len() == 4));
}

#[test]
fn non_square_grid_renders_lines_as_rows_and_columns_as_controls() {
    let catalog = sized_catalog(true, 3, 2);
    let engine = MemoryFormEngine::new();
    let grid = bind_grid(&catalog, &engine, FIELD_ID).expect("binds");
    assert_eq!(grid.columns().len(), 2);
    assert_eq!(grid.lines().len(), 3);

    let rendered = render(&catalog, &engine, None);
    assert_eq!(rendered.headers, ["Column 1", "Column 2"]);
    assert_eq!(rendered.rows.len(), 3);
    assert!(rendered.rows.iter().all(|row| row.controls.len() == 2));
    assert_eq!(
        rendered.rows[2].controls[1].id.as_str(),
        "grid_field-line_3-column_2"
    );

    engine.select("grid_field-line_2-column_2").expect("click");
    let err = engine.submit().expect_err("lines 1 and 3 missing");
    assert_eq!(err.report().len(), 2);

    let answers = grid.answers(&engine.values());
    assert_eq!(
        serde_json::to_string(&answers).expect("answers serialize"),
        r#"{"line_1":null,"line_2":"Column 2","line_3":null}"#
    );
    let errors = grid.errors().expect("errors present");
    assert_eq!(errors.line_ids().collect::<Vec<_>>(), ["line_1", "line_3"]);
}

#[test]
fn single_cell_grid_binds_and_submits() {
    let catalog = sized_catalog(true, 1, 1);
    let engine = MemoryFormEngine::new();
    let rendered = render(&catalog, &engine, None);
    assert_eq!(rendered.headers, ["Column 1"]);
    assert_eq!(rendered.rows.len(), 1);
    assert_eq!(rendered.rows[0].controls.len(), 1);

    engine.submit().expect_err("the only line is required");
    engine.select("grid_field-line_1-column_1").expect("click");
    let values = engine.submit().expect("complete");

    let grid = bind_grid(&catalog, &engine, FIELD_ID).expect("binds");
    assert_eq!(
        serde_json::to_string(&grid.answers(&values)).expect("answers serialize"),
        r#"{"line_1":"Column 1"}"#
    );
    assert!(grid.errors().is_none());
}

#[test]
fn line_binding_reports_its_current_selection() {
    let catalog = catalog(false);
    let engine = MemoryFormEngine::new();
    render(&catalog, &engine, None);
    engine.select("grid_field-line_3-column_4").expect("click");

    let grid = bind_grid(&catalog, &engine, FIELD_ID).expect("binds");
    let selections: Vec<_> = grid.traverse_lines(|line| line.selection()).collect();
    assert_eq!(selections, [None, None, Some("Column 4".to_string()), None]);
}

#[test]
fn only_traversed_lines_are_validated() {
    let catalog = catalog(true);
    let engine = MemoryFormEngine::new();
    let grid = bind_grid(&catalog, &engine, FIELD_ID).expect("binds");

    let registered: Vec<_> = grid
        .traverse_lines(|line| {
            line.traverse_columns(|column| column.register_column(None))
                .count()
        })
        .take(1)
        .collect();
    assert_eq!(registered, [4]);

    let err = engine.submit().expect_err("first line missing");
    let groups: Vec<_> = err.report().keys().map(|key| key.as_str()).collect();
    assert_eq!(groups, ["grid_field-line_1"]);
}

#[test]
fn columns_of_a_line_share_one_group_and_keep_distinct_ids() {
    let catalog = catalog(false);
    let engine = MemoryFormEngine::new();
    let rendered = render(&catalog, &engine, None);

    let first_row = &rendered.rows[0].controls;
    assert!(
        first_row
            .iter()
            .all(|reg| reg.name.as_str() == "grid_field-line_1")
    );
    let ids: Vec<_> = first_row.iter().map(|reg| reg.id.as_str()).collect();
    assert_eq!(
        ids,
        [
            "grid_field-line_1-column_1",
            "grid_field-line_1-column_2",
            "grid_field-line_1-column_3",
            "grid_field-line_1-column_4",
        ]
    );
    let values: Vec<_> = first_row.iter().map(|reg| reg.value.as_str()).collect();
    assert_eq!(values, ["Column 1", "Column 2", "Column 3", "Column 4"]);
    assert!(first_row.iter().all(|reg| reg.control == ControlKind::Radio));

    assert_ne!(rendered.rows[0].controls[0].name, rendered.rows[1].controls[0].name);
}

#[test]
fn registers_the_field_correctly() {
    let catalog = catalog(false);
    let engine = MemoryFormEngine::new();
    render(&catalog, &engine, None);

    engine.select("grid_field-line_1-column_4").expect("click");
    engine.select("grid_field-line_4-column_1").expect("click");

    let values = engine.submit().expect("optional grid submits");
    let grid = bind_grid(&catalog, &engine, FIELD_ID).expect("binds");
    let answers = grid.answers(&values);

    assert_eq!(
        serde_json::to_string(&answers).expect("answers serialize"),
        r#"{"line_1":"Column 4","line_2":null,"line_3":null,"line_4":"Column 1"}"#
    );
    assert_eq!(answers.selection("line_1"), Some("Column 4"));
    assert_eq!(answers.selection("line_2"), None);

    let rerendered = render(&catalog, &engine, None);
    assert!(rerendered.errors.is_none());
}

#[test]
fn selecting_another_column_replaces_the_previous_one() {
    let catalog = catalog(false);
    let engine = MemoryFormEngine::new();
    render(&catalog, &engine, None);

    engine.select("grid_field-line_2-column_1").expect("click A");
    engine.select("grid_field-line_2-column_3").expect("click B");

    assert!(!engine.is_selected("grid_field-line_2-column_1"));
    assert!(engine.is_selected("grid_field-line_2-column_3"));

    let values = engine.submit().expect("submits");
    let grid = bind_grid(&catalog, &engine, FIELD_ID).expect("binds");
    let answers = grid.answers(&values);
    assert_eq!(answers.selection("line_2"), Some("Column 3"));
    assert_eq!(answers.len(), 4);
}

#[test]
fn untouched_lines_submit_null() {
    let catalog = catalog(false);
    let engine = MemoryFormEngine::new();
    render(&catalog, &engine, None);

    let values = engine.submit().expect("no selection is fine when optional");
    let grid = bind_grid(&catalog, &engine, FIELD_ID).expect("binds");
    let answers = grid.answers(&values);

    let ids: Vec<_> = answers.line_ids().collect();
    assert_eq!(ids, ["line_1", "line_2", "line_3", "line_4"]);
    assert!(answers.iter().all(|(_, value)| value.is_none()));
    assert!(grid.errors().is_none());
}

#[test]
fn required_grid_reports_unselected_lines() {
    let catalog = catalog(true);
    let engine = MemoryFormEngine::new();
    render(&catalog, &engine, None);

    engine.select("grid_field-line_1-column_4").expect("click");

    let err = engine.submit().expect_err("required lines missing");
    let SubmitError::Invalid(report) = &err;
    assert_eq!(report.len(), 3);

    let rendered = render(&catalog, &engine, None);
    assert_eq!(
        rendered.errors.expect("errors shown"),
        [
            "Error line_2 required",
            "Error line_3 required",
            "Error line_4 required",
        ]
    );

    let grid = bind_grid(&catalog, &engine, FIELD_ID).expect("binds");
    let errors = grid.errors().expect("errors present");
    assert!(!errors.contains("line_1"));
    insta::assert_json_snapshot!(errors, @r#"
    {
      "line_2": {
        "type": "required"
      },
      "line_3": {
        "type": "required"
      },
      "line_4": {
        "type": "required"
      }
    }
    "#);

    let line_errors: Vec<_> = grid
        .traverse_lines(|line| line.error().map(|e| e.kind.to_string()))
        .collect();
    assert_eq!(
        line_errors,
        [
            None,
            Some("required".to_string()),
            Some("required".to_string()),
            Some("required".to_string()),
        ]
    );
}

#[test]
fn explicit_required_option_overrides_field() {
    let catalog = catalog(true);
    let engine = MemoryFormEngine::new();
    let options = RegisterOptions::new().with_required(RequiredRule::Flag(false));
    render(&catalog, &engine, Some(options));

    engine.submit().expect("caller switched required off");
}

#[test]
fn optional_field_honours_required_option_with_message() {
    let catalog = catalog(false);
    let engine = MemoryFormEngine::new();
    let options = RegisterOptions::new().with_required(RequiredRule::from("Pick one"));
    render(&catalog, &engine, Some(options));

    for line in 1..=3 {
        engine
            .select(&format!("grid_field-line_{line}-column_2"))
            .expect("click");
    }
    engine.submit().expect_err("line 4 missing");

    let grid = bind_grid(&catalog, &engine, FIELD_ID).expect("binds");
    let errors = grid.errors().expect("errors present");
    assert_eq!(errors.len(), 1);
    let error = errors.get("line_4").expect("line 4 flagged");
    assert_eq!(error.message.as_deref(), Some("Pick one"));
}

#[test]
fn unknown_field_is_a_bind_error() {
    let catalog = catalog(false);
    let engine = MemoryFormEngine::new();
    let err = match bind_grid(&catalog, &engine, "missing") {
        Ok(_) => panic!("expected missing field error"),
        Err(err) => err,
    };
    assert_eq!(
        err,
        BindError::FieldNotFound {
            id: "missing".to_string()
        }
    );
    assert_eq!(err.to_string(), "field `missing` not found in catalog");
}

#[test]
fn non_grid_field_is_a_type_mismatch() {
    let mut definition = grid_definition(false);
    definition.id = "checkbox_grid".to_string();
    let catalog = MemoryCatalog::from_fields([Field::CheckboxGrid(definition)]);
    let engine = MemoryFormEngine::new();

    let err = match bind_grid(&catalog, &engine, "checkbox_grid") {
        Ok(_) => panic!("expected type mismatch"),
        Err(err) => err,
    };
    match &err {
        BindError::FieldTypeMismatch {
            id,
            expected,
            found,
        } => {
            assert_eq!(id, "checkbox_grid");
            assert_eq!(*expected, FieldKind::MultipleChoiceGrid);
            assert_eq!(*found, FieldKind::CheckboxGrid);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "field `checkbox_grid` is a CHECKBOX_GRID field, expected MULTIPLE_CHOICE_GRID"
    );
}

#[test]
fn rebinding_is_deterministic() {
    let catalog = catalog(false);
    let engine = MemoryFormEngine::new();
    let binder = GridBinder::new(&catalog, &engine);

    let collect_cells = || {
        let grid = binder.bind(FIELD_ID).expect("binds");
        let cells: Vec<Vec<String>> = grid
            .traverse_lines(|line| {
                line.traverse_columns(|column| column.id().to_string())
                    .collect()
            })
            .collect();
        (grid.columns().to_vec(), cells)
    };

    assert_eq!(collect_cells(), collect_cells());
}

#[test]
fn selections_survive_a_rerender() {
    let catalog = catalog(true);
    let engine = MemoryFormEngine::new();
    render(&catalog, &engine, None);
    engine.select("grid_field-line_3-column_2").expect("click");

    render(&catalog, &engine, None);
    assert!(engine.is_selected("grid_field-line_3-column_2"));
}

#[test]
fn traversals_are_lazy() {
    let catalog = catalog(false);
    let engine = MemoryFormEngine::new();
    let grid = bind_grid(&catalog, &engine, FIELD_ID).expect("binds");
    let visited = Cell::new(0);

    let mut lines = grid.traverse_lines(|line| {
        visited.set(visited.get() + 1);
        line.id().to_string()
    });
    assert_eq!(visited.get(), 0);
    assert_eq!(lines.next().as_deref(), Some("line_1"));
    assert_eq!(visited.get(), 1);
    drop(lines);

    assert!(engine.values().is_empty(), "nothing registers until asked");
    let first: Vec<_> = grid.traverse_lines(|line| line.id().to_string()).take(2).collect();
    assert_eq!(first, ["line_1", "line_2"]);
}

#[test]
fn binds_from_a_catalog_document() {
    let yaml = r#"
spec: gridform
spec_version: "0.2.0"
fields:
  - type: SHORT_ANSWER
    id: name
    label: Name
  - type: MULTIPLE_CHOICE_GRID
    id: coffee
    label: Coffee preferences
    required: true
    lines:
      - id: Morning Cup
        label: Morning
      - id: Evening Cup
        label: Evening
    columns:
      - label: Espresso
      - label: Flat White
"#;
    let document = Catalog::from_yaml_str(yaml).expect("parses");
    let catalog = MemoryCatalog::from_catalog(document.clone()).expect("valid");
    let engine = MemoryFormEngine::new();

    let grid = bind_grid(&document, &engine, "coffee").expect("binds from document");
    let lines: Vec<&Line> = grid.lines().iter().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(grid.group_key("Morning Cup").as_str(), "coffee-morning_cup");

    let registrations: Vec<_> = grid
        .traverse_lines(|line| {
            line.traverse_columns(|column| column.register_column(None))
                .collect::<Vec<_>>()
        })
        .flatten()
        .collect();
    assert_eq!(registrations.len(), 4);
    assert_eq!(
        registrations[3].id.as_str(),
        "coffee-evening_cup-flat_white"
    );

    engine.select("coffee-morning_cup-flat_white").expect("click");
    let err = engine.submit().expect_err("evening missing");
    assert_eq!(err.report().len(), 1);

    let rebound = bind_grid(&catalog, &engine, "coffee").expect("binds from memory catalog");
    let errors = rebound.errors().expect("errors present");
    assert_eq!(errors.line_ids().collect::<Vec<_>>(), ["Evening Cup"]);

    assert!(matches!(
        bind_grid(&catalog, &engine, "name"),
        Err(BindError::FieldTypeMismatch { .. })
    ));
}
