//! Grid placement and class composition for cells and rows.

use std::fmt;

use gpui::SharedString;

use crate::column::Column;

pub const CELL: &str = "cell";
pub const CELL_FROZEN: &str = "cell-frozen";
pub const CELL_FROZEN_LAST: &str = "cell-frozen-last";
pub const CELL_COPIED: &str = "cell-copied";
pub const CELL_DRAGGED_OVER: &str = "cell-dragged-over";
pub const CELL_EDITING: &str = "cell-editing";
pub const EDITOR_CONTAINER: &str = "editor-container";
pub const GROUP_CELL: &str = "group-cell";

/// Named offset a frozen cell is pinned to, keyed by column index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrozenOffset(pub usize);

impl FrozenOffset {
    pub fn var_name(&self) -> String {
        format!("--frozen-left-{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellPlacement {
    /// 1-based grid column.
    pub column_start: usize,
    pub column_span: Option<usize>,
    pub frozen_offset: Option<FrozenOffset>,
}

pub fn cell_grid_placement<R>(column: &Column<R>, col_span: Option<usize>) -> CellPlacement {
    CellPlacement {
        column_start: column.idx + 1,
        column_span: col_span,
        frozen_offset: column.frozen.then_some(FrozenOffset(column.idx)),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowPlacement {
    pub row_start: usize,
    pub row_height: Option<f32>,
}

pub fn row_grid_placement(row_index: usize, height: Option<f32>) -> RowPlacement {
    RowPlacement {
        row_start: row_index,
        row_height: height,
    }
}

/// Ordered, de-duplicated set of class names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassList(Vec<SharedString>);

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, class: impl Into<SharedString>) {
        let class = class.into();
        if class.trim().is_empty() || self.contains(&class) {
            return;
        }
        self.0.push(class);
    }

    pub fn add_if(&mut self, condition: bool, class: impl Into<SharedString>) {
        if condition {
            self.add(class);
        }
    }

    pub fn contains(&self, class: &str) -> bool {
        self.0.iter().any(|c| c.as_ref() == class)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|c| c.as_ref())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        f.write_str(&joined.join(" "))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellStateFlags {
    pub copied: bool,
    pub dragged_over: bool,
}

pub fn cell_class_names<R>(
    column: &Column<R>,
    row: Option<&R>,
    flags: CellStateFlags,
    extra: &[&str],
) -> ClassList {
    let mut classes = ClassList::new();
    classes.add(CELL);
    classes.add_if(column.frozen, CELL_FROZEN);
    classes.add_if(column.is_last_frozen_column, CELL_FROZEN_LAST);
    classes.add_if(flags.copied, CELL_COPIED);
    classes.add_if(flags.dragged_over, CELL_DRAGGED_OVER);
    if let Some(class) = row.and_then(|row| column.row_class(row)) {
        classes.add(class);
    }
    for class in extra {
        classes.add(class.to_string());
    }
    classes
}

/// Resolves placements into pixel geometry from column widths.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridTracks {
    widths: Vec<f32>,
    frozen: Vec<bool>,
}

impl GridTracks {
    pub fn from_columns<R>(columns: &[Column<R>]) -> Self {
        Self {
            widths: columns.iter().map(|c| c.width).collect(),
            frozen: columns.iter().map(|c| c.frozen).collect(),
        }
    }

    pub fn x_for(&self, placement: &CellPlacement) -> f32 {
        let idx = placement.column_start.saturating_sub(1);
        self.widths.iter().take(idx).sum()
    }

    pub fn width_for(&self, placement: &CellPlacement) -> f32 {
        let start = placement.column_start.saturating_sub(1);
        let span = placement.column_span.unwrap_or(1).max(1);
        self.widths.iter().skip(start).take(span).sum()
    }

    /// Value of the frozen offset variable: widths of frozen columns before `idx`.
    pub fn frozen_left(&self, offset: FrozenOffset) -> f32 {
        self.widths
            .iter()
            .zip(&self.frozen)
            .take(offset.0)
            .filter(|(_, frozen)| **frozen)
            .map(|(width, _)| width)
            .sum()
    }

    pub fn total_width(&self) -> f32 {
        self.widths.iter().sum()
    }
}
