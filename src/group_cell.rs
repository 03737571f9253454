//! Cells of a group header row.
//!
//! The formatter is chosen by position, not by the column: the anchor shows
//! the summary, columns after it continue the group's box, and columns before
//! it carry the outermost band only.

use gpui::rgb;
use tracing::debug;

use crate::column::{Column, GroupFormatter, GroupFormatterProps};
use crate::events::{GroupActions, Key, KeyInput, Propagation};
use crate::formatters::{FillerFormatter, SummaryFormatter};
use crate::palette::{self, BandVariant, band_color};
use crate::roving::{RovingFocus, RovingTabIndex};
use crate::state::{GroupRow, GroupSpan, SpanPosition};
use crate::style::{CellStateFlags, GROUP_CELL, cell_class_names, cell_grid_placement};
use crate::theme::BORDER;
use crate::view::{Aria, NodeKind, ViewNode};

pub struct GroupCellRenderer<'a, R> {
    column: &'a Column<R>,
    group: &'a GroupRow<R>,
    span: GroupSpan,
    is_selected: bool,
    tab_index: i32,
}

impl<'a, R> GroupCellRenderer<'a, R> {
    pub fn new(column: &'a Column<R>, group: &'a GroupRow<R>, span: GroupSpan) -> Self {
        Self {
            column,
            group,
            span,
            is_selected: false,
            tab_index: -1,
        }
    }

    pub fn selected(mut self, is_selected: bool) -> Self {
        self.is_selected = is_selected;
        self.tab_index = RovingTabIndex::default().cell(is_selected).tab_index;
        self
    }

    pub fn roving(mut self, focus: &dyn RovingFocus) -> Self {
        self.tab_index = focus.cell(self.is_selected).tab_index;
        self
    }

    /// Only the anchor column toggles the group.
    pub fn is_level_matching(&self) -> bool {
        self.span.is_anchor(self.column.idx)
    }

    pub fn render(&self) -> Option<ViewNode> {
        let column = self.column;
        if column.is_no_styling {
            return None;
        }

        let mut node = ViewNode::new(NodeKind::Cell);
        node.aria = Aria::grid_cell(column.idx);
        node.aria.selected = Some(self.is_selected);
        node.classes = cell_class_names(column, None, CellStateFlags::default(), &[GROUP_CELL]);
        node.placement = Some(cell_grid_placement(column, None));
        node.tab_index = Some(self.tab_index);
        node.style.pointer_cursor = self.is_level_matching();

        let props = GroupFormatterProps {
            column,
            group: self.group,
            group_column_index: self.group_column_index(),
            is_cell_selected: self.is_selected,
        };
        match self.span.position_of(column.idx) {
            SpanPosition::Behind => {
                node.style.background = Some(palette::darkest());
            }
            SpanPosition::Anchor => {
                node.style.background = Some(self.band());
                node.children.push(SummaryFormatter.format(&props));
            }
            SpanPosition::After => {
                node.style.background = Some(self.band());
                let filler = FillerFormatter::new(column.group_formatter.clone());
                node.children.push(filler.format(&props));
            }
        }

        if (column.is_last_column || column.is_last_group_column) && self.span.length >= 2 {
            node.style.border_right = Some(rgb(BORDER));
            node.style.rounded_right = true;
        }
        Some(node)
    }

    /// Depth of this column inside the group box: the group's level at the
    /// anchor, one deeper per column after it.
    fn group_column_index(&self) -> usize {
        self.group.level + self.column.idx.saturating_sub(self.span.primary_index)
    }

    fn band(&self) -> gpui::Rgba {
        band_color(self.span.length, self.group_column_index(), BandVariant::Content)
    }

    pub fn click(&self, grid: &mut dyn GroupActions) {
        if self.is_level_matching() {
            debug!(group = %self.group.id, expanded = self.group.is_expanded, "toggle group");
            grid.toggle_group(&self.group.id);
        }
    }

    /// Enter on the anchor's disclosure toggles like a click.
    pub fn key_down(&self, input: &KeyInput, grid: &mut dyn GroupActions) -> Propagation {
        if input.key == Key::Enter && self.is_level_matching() {
            self.click(grid);
            return Propagation::Stop;
        }
        Propagation::Continue
    }
}
