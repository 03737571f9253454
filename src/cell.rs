//! Ordinary data cells and the group-environment composition shared with the
//! edit cell.

use gpui::rgb;
use tracing::debug;

use crate::column::Column;
use crate::events::{CellActions, CellEvent, CellEventHandler, CellInterceptors};
use crate::palette::{self, ConnectorStrip};
use crate::roving::{RovingCell, RovingFocus, RovingTabIndex};
use crate::state::{CellState, GroupSpan, SpanPosition};
use crate::style::{CellStateFlags, cell_class_names, cell_grid_placement};
use crate::theme::{BORDER, state_background};
use crate::view::{Aria, NodeKind, ViewNode, Width};

/// How a cell relates to the active group span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum GroupEnvironment {
    Ungrouped,
    /// Left of the anchor: painted with the outermost band.
    Behind,
    /// The anchor: shrunk to make room for connector strips.
    Anchor,
    /// Right of the anchor, a plain cell.
    After,
    /// The column closing the span.
    TrailingFiller,
}

pub(crate) fn group_environment<R>(column: &Column<R>, group: GroupSpan) -> GroupEnvironment {
    if !group.is_grouped() {
        return GroupEnvironment::Ungrouped;
    }
    if column.is_last_group_column {
        return GroupEnvironment::TrailingFiller;
    }
    match group.position_of(column.idx) {
        SpanPosition::Behind => GroupEnvironment::Behind,
        SpanPosition::Anchor => GroupEnvironment::Anchor,
        SpanPosition::After => GroupEnvironment::After,
    }
}

pub(crate) fn strip_node(strip: &ConnectorStrip) -> ViewNode {
    ViewNode::new(NodeKind::ConnectorStrip).with_style(|style| {
        style.background = Some(strip.color);
        style.absolute_left_rem = Some(strip.left_rem);
        style.width = Width::Rem(1.);
        style.border_right = Some(rgb(BORDER));
        style.border_top = Some(strip.color);
        style.border_bottom = Some(strip.color);
    })
}

/// Applies banding, anchor geometry and connector strips to a cell node.
/// Strips are prepended so they paint beneath the cell content.
pub(crate) fn apply_group_environment(node: &mut ViewNode, env: GroupEnvironment, group: GroupSpan) {
    match env {
        GroupEnvironment::Behind | GroupEnvironment::TrailingFiller => {
            let band = palette::darkest();
            node.style.background = Some(band);
            node.style.border_bottom = Some(band);
        }
        GroupEnvironment::Anchor => {
            node.style.no_padding_x = true;
            node.style.width = Width::FullMinusRem(group.length.saturating_sub(1) as f32);
            node.style.margin_left_auto = true;
            node.style.overflow_visible = true;
            let mut children: Vec<ViewNode> = palette::connector_strips(group.length)
                .iter()
                .map(strip_node)
                .collect();
            children.append(&mut node.children);
            node.children = children;
        }
        GroupEnvironment::Ungrouped | GroupEnvironment::After => {}
    }
}

/// Renders one data cell and turns its pointer input into grid callbacks.
pub struct CellRenderer<'a, R> {
    column: &'a Column<R>,
    row: &'a R,
    col_span: Option<usize>,
    state: CellState,
    group: GroupSpan,
    drag_handle: Option<ViewNode>,
    interceptors: CellInterceptors<R>,
    roving: RovingCell,
}

impl<'a, R> CellRenderer<'a, R> {
    pub fn new(column: &'a Column<R>, row: &'a R) -> Self {
        Self {
            column,
            row,
            col_span: None,
            state: CellState::default(),
            group: GroupSpan::none(),
            drag_handle: None,
            interceptors: CellInterceptors::default(),
            roving: RovingTabIndex::default().cell(false),
        }
    }

    pub fn col_span(mut self, col_span: Option<usize>) -> Self {
        self.col_span = col_span;
        self
    }

    pub fn state(mut self, state: CellState) -> Self {
        self.state = state;
        self.roving = RovingTabIndex::default().cell(state.is_selected);
        self
    }

    pub fn group(mut self, group: GroupSpan) -> Self {
        self.group = group;
        self
    }

    pub fn drag_handle(mut self, handle: Option<ViewNode>) -> Self {
        self.drag_handle = handle;
        self
    }

    pub fn interceptors(mut self, interceptors: &CellInterceptors<R>) -> Self {
        self.interceptors = interceptors.clone();
        self
    }

    pub fn roving(mut self, focus: &dyn RovingFocus) -> Self {
        self.roving = focus.cell(self.state.is_selected);
        self
    }

    pub fn render(&self) -> Option<ViewNode> {
        let column = self.column;
        if column.is_no_styling {
            return None;
        }
        let env = group_environment(column, self.group);

        let mut node = ViewNode::new(NodeKind::Cell);
        node.aria = Aria::grid_cell(column.idx);
        node.aria.col_span = self.col_span;
        node.aria.selected = Some(match env {
            GroupEnvironment::Behind | GroupEnvironment::TrailingFiller => false,
            _ => self.state.is_selected,
        });
        node.aria.readonly = (!column.is_editable(self.row)).then_some(true);
        node.classes = cell_class_names(
            column,
            Some(self.row),
            CellStateFlags {
                copied: self.state.is_copied,
                dragged_over: self.state.is_dragged_over,
            },
            &[],
        );
        node.placement = Some(cell_grid_placement(column, self.col_span));
        node.tab_index = Some(self.roving.tab_index);
        node.style.background = state_background(self.state.is_copied, self.state.is_dragged_over);
        node.style.shadow_left = Some(rgb(BORDER));

        if env == GroupEnvironment::TrailingFiller {
            node.children.push(ViewNode::new(NodeKind::Placeholder));
        } else {
            node.children.push(column.format(self.row, self.state.is_selected));
        }
        apply_group_environment(&mut node, env, self.group);

        if let Some(handle) = &self.drag_handle {
            node.children.push(handle.clone());
        }
        Some(node)
    }

    /// Primary click: interceptor first, then select (opening the editor
    /// only for edit-on-click columns).
    pub fn click(&self, grid: &mut dyn CellActions<R>) {
        if self.intercept(self.interceptors.on_click.as_ref(), grid) {
            return;
        }
        let open_editor = self.column.editor_options.edit_on_click.then_some(true);
        grid.select_cell(self.row, self.column, open_editor);
    }

    pub fn double_click(&self, grid: &mut dyn CellActions<R>) {
        if self.intercept(self.interceptors.on_double_click.as_ref(), grid) {
            return;
        }
        grid.select_cell(self.row, self.column, Some(true));
    }

    /// Context menu selects but never edits.
    pub fn context_menu(&self, grid: &mut dyn CellActions<R>) {
        if self.intercept(self.interceptors.on_context_menu.as_ref(), grid) {
            return;
        }
        grid.select_cell(self.row, self.column, None);
    }

    pub fn row_change(&self, new_row: R, grid: &mut dyn CellActions<R>) {
        grid.row_change(self.column, new_row);
    }

    /// Lets the formatter's own control propose a new row.
    pub fn activate(&self, grid: &mut dyn CellActions<R>) {
        if let Some(new_row) = self.column.formatter.activate(self.row) {
            self.row_change(new_row, grid);
        }
    }

    /// Runs an interception callback. Returns true when it prevented the
    /// grid's default behaviour.
    fn intercept(&self, handler: Option<&CellEventHandler<R>>, grid: &mut dyn CellActions<R>) -> bool {
        let Some(handler) = handler else {
            return false;
        };
        let mut event = CellEvent::new(self.row, self.column);
        handler(&mut event);
        for open_editor in event.take_select_requests() {
            grid.select_cell(self.row, self.column, open_editor);
        }
        let prevented = event.is_grid_default_prevented();
        if prevented {
            debug!(column = %self.column.key, "cell default prevented by interceptor");
        }
        prevented
    }
}
