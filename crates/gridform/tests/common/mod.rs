#![allow(dead_code)]

use gridform::{
    Column, Field, FormEngine, GridFieldDefinition, Line, MemoryCatalog, RegisterOptions,
    Registration, bind_grid,
};

pub const FIELD_ID: &str = "grid_field";

pub fn grid_definition(required: bool) -> GridFieldDefinition {
    sized_grid_definition(required, 4, 4)
}

/// Grid with `lines` rows (`line_n` / `Line n`) and `columns` columns (`Column n`).
pub fn sized_grid_definition(required: bool, lines: usize, columns: usize) -> GridFieldDefinition {
    GridFieldDefinition {
        id: FIELD_ID.to_string(),
        label: "Grid Field Question".to_string(),
        description: None,
        required,
        lines: (1..=lines)
            .map(|n| Line {
                id: format!("line_{n}"),
                label: format!("Line {n}"),
            })
            .collect(),
        columns: (1..=columns)
            .map(|n| Column {
                label: format!("Column {n}"),
            })
            .collect(),
    }
}

pub fn catalog(required: bool) -> MemoryCatalog {
    MemoryCatalog::from_fields([Field::MultipleChoiceGrid(grid_definition(required))])
}

pub fn sized_catalog(required: bool, lines: usize, columns: usize) -> MemoryCatalog {
    MemoryCatalog::from_fields([Field::MultipleChoiceGrid(sized_grid_definition(
        required, lines, columns,
    ))])
}

/// What a caller would put on screen for one bind/render pass.
#[derive(Debug)]
pub struct RenderedGrid {
    pub headers: Vec<String>,
    pub rows: Vec<RenderedRow>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct RenderedRow {
    pub label: String,
    pub controls: Vec<Registration>,
}

/// Bind the grid and register every cell with `options`, like a render pass.
pub fn render<E: FormEngine>(
    catalog: &MemoryCatalog,
    engine: &E,
    options: Option<RegisterOptions>,
) -> RenderedGrid {
    let grid = bind_grid(catalog, engine, FIELD_ID).expect("grid field binds");
    let headers = grid.columns().iter().map(|c| c.label.clone()).collect();
    let rows = grid
        .traverse_lines(|line| RenderedRow {
            label: line.label().to_string(),
            controls: line
                .traverse_columns(|column| column.register_column(options.clone()))
                .collect(),
        })
        .collect();
    let errors = grid.errors().map(|errors| {
        errors
            .iter()
            .map(|(line_id, error)| format!("Error {line_id} {}", error.kind))
            .collect()
    });
    RenderedGrid {
        headers,
        rows,
        errors,
    }
}
