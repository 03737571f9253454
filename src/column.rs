//! Column Definition
//!
//! Columns carry their identity, pinning flags, and the capabilities used to
//! format, group-format and edit their cells.

use std::rc::Rc;

use gpui::SharedString;

use crate::events::{EditorContext, KeyInput, NavigationPredicate};
use crate::state::GroupRow;
use crate::view::ViewNode;

/// Renders a cell's value.
pub trait Formatter<R> {
    fn format(&self, props: &FormatterProps<'_, R>) -> ViewNode;

    /// The formatter's own interaction (a checkbox, a stepper) proposing a
    /// replacement row. The cell forwards it to the grid with its column.
    fn activate(&self, _row: &R) -> Option<R> {
        None
    }
}

pub struct FormatterProps<'a, R> {
    pub column: &'a Column<R>,
    pub row: &'a R,
    pub is_cell_selected: bool,
}

/// Renders one cell of a group header row.
pub trait GroupFormatter<R> {
    fn format(&self, props: &GroupFormatterProps<'_, R>) -> ViewNode;
}

pub struct GroupFormatterProps<'a, R> {
    pub column: &'a Column<R>,
    pub group: &'a GroupRow<R>,
    /// 1-based depth of the group row being rendered.
    pub group_column_index: usize,
    pub is_cell_selected: bool,
}

/// Creates an editing session for a cell.
pub trait Editor<R> {
    fn open(&self, column: &Column<R>, row: &R) -> Box<dyn EditorSession<R>>;
}

/// A live editor. It never owns the row; every change is proposed back.
pub trait EditorSession<R> {
    fn render(&self, row: &R) -> ViewNode;

    fn key_down(&mut self, input: &KeyInput, row: &R) -> EditorResponse<R>;
}

pub enum EditorResponse<R> {
    /// The key means nothing to the editor.
    Ignored,
    /// Consumed without changing the row (caret movement, selection).
    Handled,
    /// Replace the draft row.
    Change(R),
    /// The editor closed itself, e.g. after a pick from a list.
    Close { commit: bool },
}

pub struct EditorOptions {
    pub edit_on_click: bool,
    pub commit_on_outside_click: bool,
    pub render_formatter: bool,
    pub on_navigation: Option<NavigationPredicate>,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            edit_on_click: false,
            commit_on_outside_click: true,
            render_formatter: false,
            on_navigation: None,
        }
    }
}

impl Clone for EditorOptions {
    fn clone(&self) -> Self {
        Self {
            edit_on_click: self.edit_on_click,
            commit_on_outside_click: self.commit_on_outside_click,
            render_formatter: self.render_formatter,
            on_navigation: self.on_navigation.clone(),
        }
    }
}

impl EditorOptions {
    pub fn edit_on_click(mut self) -> Self {
        self.edit_on_click = true;
        self
    }

    pub fn keep_open_on_outside_click(mut self) -> Self {
        self.commit_on_outside_click = false;
        self
    }

    pub fn render_formatter(mut self) -> Self {
        self.render_formatter = true;
        self
    }

    pub fn on_navigation(mut self, predicate: impl Fn(&KeyInput, &EditorContext) -> bool + 'static) -> Self {
        self.on_navigation = Some(Rc::new(predicate));
        self
    }
}

pub type RowClassResolver<R> = Rc<dyn Fn(&R) -> Option<SharedString>>;
pub type RowPredicate<R> = Rc<dyn Fn(&R) -> bool>;

/// Column definition, immutable for the duration of a render pass.
pub struct Column<R> {
    pub key: SharedString,
    pub name: SharedString,
    /// Position in the visible column order.
    pub idx: usize,
    pub width: f32,
    pub frozen: bool,
    pub is_last_frozen_column: bool,
    pub is_last_group_column: bool,
    pub is_last_column: bool,
    /// Grid-track filler that renders nothing.
    pub is_no_styling: bool,
    pub cell_class: Option<RowClassResolver<R>>,
    pub editable: Option<RowPredicate<R>>,
    pub editor_options: EditorOptions,
    pub formatter: Rc<dyn Formatter<R>>,
    pub editor: Option<Rc<dyn Editor<R>>>,
    pub group_formatter: Option<Rc<dyn GroupFormatter<R>>>,
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            name: self.name.clone(),
            idx: self.idx,
            width: self.width,
            frozen: self.frozen,
            is_last_frozen_column: self.is_last_frozen_column,
            is_last_group_column: self.is_last_group_column,
            is_last_column: self.is_last_column,
            is_no_styling: self.is_no_styling,
            cell_class: self.cell_class.clone(),
            editable: self.editable.clone(),
            editor_options: self.editor_options.clone(),
            formatter: self.formatter.clone(),
            editor: self.editor.clone(),
            group_formatter: self.group_formatter.clone(),
        }
    }
}

pub const DEFAULT_COLUMN_WIDTH: f32 = 140.0;

impl<R: 'static> Column<R> {
    pub fn new(
        key: impl Into<SharedString>,
        name: impl Into<SharedString>,
        idx: usize,
        formatter: impl Formatter<R> + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            idx,
            width: DEFAULT_COLUMN_WIDTH,
            frozen: false,
            is_last_frozen_column: false,
            is_last_group_column: false,
            is_last_column: false,
            is_no_styling: false,
            cell_class: None,
            editable: None,
            editor_options: EditorOptions::default(),
            formatter: Rc::new(formatter),
            editor: None,
            group_formatter: None,
        }
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn frozen(mut self) -> Self {
        self.frozen = true;
        self
    }

    pub fn no_styling(mut self) -> Self {
        self.is_no_styling = true;
        self
    }

    pub fn last_group_column(mut self) -> Self {
        self.is_last_group_column = true;
        self
    }

    pub fn cell_class(mut self, resolver: impl Fn(&R) -> Option<SharedString> + 'static) -> Self {
        self.cell_class = Some(Rc::new(resolver));
        self
    }

    pub fn editable_when(mut self, predicate: impl Fn(&R) -> bool + 'static) -> Self {
        self.editable = Some(Rc::new(predicate));
        self
    }

    pub fn editor(mut self, editor: impl Editor<R> + 'static) -> Self {
        self.editor = Some(Rc::new(editor));
        self
    }

    pub fn editor_options(mut self, options: EditorOptions) -> Self {
        self.editor_options = options;
        self
    }

    pub fn group_formatter(mut self, formatter: impl GroupFormatter<R> + 'static) -> Self {
        self.group_formatter = Some(Rc::new(formatter));
        self
    }
}

impl<R> Column<R> {
    pub fn is_editable(&self, row: &R) -> bool {
        self.editor.is_some() && self.editable.as_ref().is_none_or(|editable| editable(row))
    }

    pub fn row_class(&self, row: &R) -> Option<SharedString> {
        self.cell_class.as_ref().and_then(|resolve| resolve(row))
    }

    pub fn format(&self, row: &R, is_cell_selected: bool) -> ViewNode {
        self.formatter.format(&FormatterProps {
            column: self,
            row,
            is_cell_selected,
        })
    }
}

/// Finalises a column order: assigns indexes and the trailing/frozen flags.
pub fn finalize_columns<R>(columns: &mut [Column<R>]) {
    let last_frozen = columns.iter().rposition(|c| c.frozen);
    let count = columns.len();
    for (idx, column) in columns.iter_mut().enumerate() {
        column.idx = idx;
        column.is_last_frozen_column = Some(idx) == last_frozen;
        column.is_last_column = idx + 1 == count;
    }
}

/// Formats a value read from the row as plain text.
pub struct TextFormatter<R> {
    read: Rc<dyn Fn(&R) -> SharedString>,
}

impl<R> TextFormatter<R> {
    pub fn new(read: impl Fn(&R) -> SharedString + 'static) -> Self {
        Self { read: Rc::new(read) }
    }
}

impl<R> Formatter<R> for TextFormatter<R> {
    fn format(&self, props: &FormatterProps<'_, R>) -> ViewNode {
        ViewNode::text((self.read)(props.row))
    }
}

/// Renders nothing; used by filler columns.
pub struct EmptyFormatter;

impl<R> Formatter<R> for EmptyFormatter {
    fn format(&self, _props: &FormatterProps<'_, R>) -> ViewNode {
        ViewNode::container()
    }
}
