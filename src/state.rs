use gpui::SharedString;

/// Deepest row grouping the cell renderers know how to band.
pub const MAX_GROUP_DEPTH: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellPosition {
    pub row: usize,
    pub col: usize,
}

impl CellPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Edit,
}

/// The active group span for a row: the anchor column and how many nested
/// group levels are in effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GroupSpan {
    pub primary_index: usize,
    pub length: usize,
}

/// Where a column sits relative to the group anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpanPosition {
    Behind,
    Anchor,
    After,
}

impl GroupSpan {
    /// Builds a span, clamping the depth to [`MAX_GROUP_DEPTH`].
    pub fn new(primary_index: usize, length: usize) -> Self {
        Self {
            primary_index,
            length: length.min(MAX_GROUP_DEPTH),
        }
    }

    /// No grouping in effect.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_grouped(&self) -> bool {
        self.length > 0
    }

    pub fn position_of(&self, column_idx: usize) -> SpanPosition {
        match column_idx.cmp(&self.primary_index) {
            std::cmp::Ordering::Less => SpanPosition::Behind,
            std::cmp::Ordering::Equal => SpanPosition::Anchor,
            std::cmp::Ordering::Greater => SpanPosition::After,
        }
    }

    pub fn is_anchor(&self, column_idx: usize) -> bool {
        column_idx == self.primary_index
    }
}

/// Per-render visual state of a cell, owned by the grid's selection layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellState {
    pub is_selected: bool,
    pub is_copied: bool,
    pub is_dragged_over: bool,
}

impl CellState {
    pub fn selected() -> Self {
        Self {
            is_selected: true,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GroupId(pub SharedString);

impl From<&str> for GroupId {
    fn from(id: &str) -> Self {
        Self(SharedString::from(id.to_string()))
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A synthetic row standing for a bucket of child rows sharing one value of
/// the grouped field.
#[derive(Clone, Debug)]
pub struct GroupRow<R> {
    pub id: GroupId,
    /// Name of the grouped field, shown as the summary title.
    pub field: SharedString,
    /// The shared value; `None` when the children have no value for the field.
    pub key: Option<SharedString>,
    pub child_rows: Vec<R>,
    pub is_expanded: bool,
    /// 1-based nesting depth this bucket was formed at.
    pub level: usize,
}

impl<R> GroupRow<R> {
    pub fn new(id: impl Into<GroupId>, field: impl Into<SharedString>, key: Option<SharedString>, level: usize) -> Self {
        Self {
            id: id.into(),
            field: field.into(),
            key,
            child_rows: Vec::new(),
            is_expanded: false,
            level: level.clamp(1, MAX_GROUP_DEPTH),
        }
    }

    pub fn with_children(mut self, child_rows: Vec<R>) -> Self {
        self.child_rows = child_rows;
        self
    }

    pub fn expanded(mut self, is_expanded: bool) -> Self {
        self.is_expanded = is_expanded;
        self
    }

    /// Text shown for the key; missing keys read as `(Empty)`.
    pub fn display_key(&self) -> SharedString {
        self.key.clone().unwrap_or_else(|| EMPTY_GROUP_KEY.into())
    }
}

impl From<String> for GroupId {
    fn from(id: String) -> Self {
        Self(id.into())
    }
}

pub const EMPTY_GROUP_KEY: &str = "(Empty)";
