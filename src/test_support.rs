//! Rows, columns, and a recording grid shared by the unit tests.

use gpui::SharedString;

use crate::column::{Column, TextFormatter, finalize_columns};
use crate::editors::text::TextEditor;
use crate::events::{CellActions, EditorActions, GroupActions};
use crate::state::GroupId;

#[derive(Clone, Debug, PartialEq)]
pub struct Person {
    pub id: u32,
    pub name: String,
}

impl Person {
    pub fn new(id: u32, name: &str) -> Self {
        Self { id, name: name.to_string() }
    }
}

#[derive(Debug, PartialEq)]
pub enum Call {
    Select { row: u32, column: usize, open_editor: Option<bool> },
    CellChange { column: usize, row: Person },
    Toggle(GroupId),
    EditorChange { row: Person, commit: bool },
    CloseEditor,
}

/// Stands in for the owning grid: records every callback and keeps the draft
/// row an editor works on.
#[derive(Default)]
pub struct RecordingGrid {
    pub calls: Vec<Call>,
    pub draft: Option<Person>,
}

impl RecordingGrid {
    pub fn with_draft(row: Person) -> Self {
        Self {
            calls: Vec::new(),
            draft: Some(row),
        }
    }

    pub fn commits(&self) -> Vec<&Person> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::EditorChange { row, commit: true } => Some(row),
                _ => None,
            })
            .collect()
    }

    pub fn selects(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, Call::Select { .. })).count()
    }
}

impl CellActions<Person> for RecordingGrid {
    fn select_cell(&mut self, row: &Person, column: &Column<Person>, open_editor: Option<bool>) {
        self.calls.push(Call::Select {
            row: row.id,
            column: column.idx,
            open_editor,
        });
    }

    fn row_change(&mut self, column: &Column<Person>, new_row: Person) {
        self.calls.push(Call::CellChange {
            column: column.idx,
            row: new_row,
        });
    }
}

impl GroupActions for RecordingGrid {
    fn toggle_group(&mut self, id: &GroupId) {
        self.calls.push(Call::Toggle(id.clone()));
    }
}

impl EditorActions<Person> for RecordingGrid {
    fn row_change(&mut self, row: Person, commit: bool) {
        self.draft = Some(row.clone());
        self.calls.push(Call::EditorChange { row, commit });
    }

    fn close_editor(&mut self) {
        self.calls.push(Call::CloseEditor);
    }
}

pub fn name_column(idx: usize) -> Column<Person> {
    Column::new(
        "name",
        "Name",
        idx,
        TextFormatter::new(|p: &Person| SharedString::from(p.name.clone())),
    )
    .editor(TextEditor::new(
        |p: &Person| p.name.clone(),
        |p: &Person, name: String| Person { name, ..p.clone() },
    ))
}

pub fn id_column(idx: usize) -> Column<Person> {
    Column::new(
        "id",
        "ID",
        idx,
        TextFormatter::new(|p: &Person| SharedString::from(p.id.to_string())),
    )
}

/// `count` columns alternating id/name, indexed and flagged.
pub fn columns(count: usize) -> Vec<Column<Person>> {
    let mut columns: Vec<Column<Person>> = (0..count)
        .map(|idx| if idx % 2 == 0 { id_column(idx) } else { name_column(idx) })
        .collect();
    finalize_columns(&mut columns);
    columns
}
