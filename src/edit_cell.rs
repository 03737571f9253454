//! The in-place editor overlay for the selected cell.
//!
//! An `EditCell` lives while its cell is in edit mode. It never owns the
//! row: the grid keeps the draft and hands it back on every call, and every
//! outcome is reported through [`EditorActions`].

use gpui::rgb;
use tracing::debug;

use crate::cell::{apply_group_environment, group_environment};
use crate::column::{Column, EditorResponse, EditorSession};
use crate::events::{EditorActions, EditorContext, Key, KeyInput, Propagation, default_editor_navigation};
use crate::outside_click::{FrameTicket, OutsideClickGuard};
use crate::roving::{RovingFocus, RovingTabIndex};
use crate::state::GroupSpan;
use crate::style::{CELL_EDITING, CellStateFlags, EDITOR_CONTAINER, cell_class_names, cell_grid_placement};
use crate::theme::BORDER;
use crate::view::{Aria, NodeKind, ViewNode};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EditState {
    Editing,
    Closed,
}

pub struct EditCell<R> {
    column: Column<R>,
    col_span: Option<usize>,
    group: GroupSpan,
    session: Box<dyn EditorSession<R>>,
    guard: OutsideClickGuard,
    state: EditState,
}

impl<R: Clone> EditCell<R> {
    /// Opens the column's editor on `row`. Columns without an editor cannot
    /// enter edit mode.
    pub fn new(column: &Column<R>, row: &R, col_span: Option<usize>, group: GroupSpan) -> Option<Self> {
        let editor = column.editor.as_ref()?;
        let session = editor.open(column, row);
        debug!(column = %column.key, "editor opened");
        Some(Self {
            column: column.clone(),
            col_span,
            group,
            session,
            guard: OutsideClickGuard::new(column.editor_options.commit_on_outside_click),
            state: EditState::Editing,
        })
    }

    pub fn column(&self) -> &Column<R> {
        &self.column
    }

    pub fn set_group(&mut self, group: GroupSpan) {
        self.group = group;
    }

    pub fn is_open(&self) -> bool {
        self.state == EditState::Editing
    }

    /// Whether the window capture listener should stay registered.
    pub fn is_listening(&self) -> bool {
        self.guard.is_listening()
    }

    fn renders_formatter(&self) -> bool {
        self.column.editor_options.render_formatter
    }

    pub fn render(&self, row: &R) -> ViewNode {
        let column = &self.column;
        let env = group_environment(column, self.group);

        let mut extra = vec![EDITOR_CONTAINER];
        if !self.renders_formatter() {
            extra.push(CELL_EDITING);
        }

        let mut node = ViewNode::new(NodeKind::Cell);
        node.aria = Aria::grid_cell(column.idx);
        node.aria.col_span = self.col_span;
        node.aria.selected = Some(true);
        node.classes = cell_class_names(column, Some(row), CellStateFlags::default(), &extra);
        node.placement = Some(cell_grid_placement(column, self.col_span));
        node.tab_index = Some(RovingTabIndex::default().cell(true).tab_index);
        node.style.shadow_left = Some(rgb(BORDER));

        node.children.push(self.session.render(row));
        if self.renders_formatter() {
            node.children.push(column.format(row, true));
        }
        apply_group_environment(&mut node, env, self.group);
        node
    }

    pub fn key_down(&mut self, input: &KeyInput, row: &R, grid: &mut dyn EditorActions<R>) -> Propagation {
        if !self.is_open() {
            return Propagation::Continue;
        }
        match input.key {
            Key::Escape => {
                self.discard(grid);
                return Propagation::Stop;
            }
            Key::Enter => {
                self.commit(row, grid);
                return Propagation::Stop;
            }
            _ => {}
        }

        match self.session.key_down(input, row) {
            EditorResponse::Change(next) => grid.row_change(next, false),
            EditorResponse::Close { commit: true } => {
                self.commit(row, grid);
                return Propagation::Stop;
            }
            EditorResponse::Close { commit: false } => {
                self.discard(grid);
                return Propagation::Stop;
            }
            EditorResponse::Handled | EditorResponse::Ignored => {}
        }

        if self.is_navigation(input) {
            Propagation::Continue
        } else {
            Propagation::Stop
        }
    }

    fn is_navigation(&self, input: &KeyInput) -> bool {
        let context = EditorContext {
            editor_is_only_child: !self.renders_formatter(),
        };
        match &self.column.editor_options.on_navigation {
            Some(predicate) => predicate(input, &context),
            None => default_editor_navigation(input, &context),
        }
    }

    /// Window-level capture listener. The host schedules
    /// [`EditCell::animation_frame`] with the returned ticket.
    pub fn window_pointer_down_capture(&mut self) -> Option<FrameTicket> {
        if !self.is_open() {
            return None;
        }
        self.guard.on_capture_pointer_down()
    }

    /// A pointer-down reached the editor's own subtree.
    pub fn pointer_down_inside(&mut self) {
        self.guard.cancel();
    }

    /// Next-frame check. Commits when the ticket survived; returns whether
    /// it did.
    pub fn animation_frame(&mut self, ticket: FrameTicket, row: &R, grid: &mut dyn EditorActions<R>) -> bool {
        if !self.is_open() || !self.guard.confirm(ticket) {
            return false;
        }
        self.commit(row, grid);
        true
    }

    fn commit(&mut self, row: &R, grid: &mut dyn EditorActions<R>) {
        debug!(column = %self.column.key, "editor closed, committing");
        self.close();
        grid.row_change(row.clone(), true);
    }

    fn discard(&mut self, grid: &mut dyn EditorActions<R>) {
        debug!(column = %self.column.key, "editor closed, discarding");
        self.close();
        grid.close_editor();
    }

    /// Moves to the closed state and drops any pending outside-click check.
    pub fn close(&mut self) {
        self.state = EditState::Closed;
        self.guard.detach();
    }
}

impl<R> Drop for EditCell<R> {
    fn drop(&mut self) {
        self.guard.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::EditorOptions;
    use crate::test_support::{Call, Person, RecordingGrid, id_column, name_column};

    fn open(column: &Column<Person>, grid: &RecordingGrid) -> EditCell<Person> {
        let draft = grid.draft.clone().unwrap();
        EditCell::new(column, &draft, None, GroupSpan::none()).unwrap()
    }

    fn press(cell: &mut EditCell<Person>, grid: &mut RecordingGrid, input: KeyInput) -> Propagation {
        let draft = grid.draft.clone().unwrap();
        cell.key_down(&input, &draft, grid)
    }

    fn outside_click(cell: &mut EditCell<Person>, grid: &mut RecordingGrid, inside: bool) -> bool {
        let Some(ticket) = cell.window_pointer_down_capture() else {
            return false;
        };
        if inside {
            cell.pointer_down_inside();
        }
        let draft = grid.draft.clone().unwrap();
        cell.animation_frame(ticket, &draft, grid)
    }

    #[test]
    fn columns_without_an_editor_stay_closed() {
        let row = Person::new(1, "a");
        assert!(EditCell::new(&id_column(0), &row, None, GroupSpan::none()).is_none());
    }

    #[test]
    fn escape_discards_without_a_row_change() {
        let column = name_column(1);
        let mut grid = RecordingGrid::with_draft(Person::new(1, "a"));
        let mut cell = open(&column, &grid);
        press(&mut cell, &mut grid, KeyInput::new(Key::Character('x')));
        grid.calls.clear();

        assert_eq!(press(&mut cell, &mut grid, KeyInput::new(Key::Escape)), Propagation::Stop);
        assert_eq!(grid.calls, vec![Call::CloseEditor]);
        assert!(!cell.is_open());
    }

    #[test]
    fn enter_commits_exactly_once() {
        let column = name_column(1);
        let mut grid = RecordingGrid::with_draft(Person::new(1, "a"));
        let mut cell = open(&column, &grid);
        press(&mut cell, &mut grid, KeyInput::new(Key::Enter));
        press(&mut cell, &mut grid, KeyInput::new(Key::Enter));
        assert_eq!(grid.commits(), vec![&Person::new(1, "a")]);
        assert!(!outside_click(&mut cell, &mut grid, false));
        assert_eq!(grid.commits().len(), 1);
    }

    #[test]
    fn typing_b_then_clicking_outside_commits_once() {
        let column = name_column(1);
        let mut grid = RecordingGrid::with_draft(Person::new(1, "a"));
        let mut cell = open(&column, &grid);

        press(&mut cell, &mut grid, KeyInput::new(Key::Backspace));
        press(&mut cell, &mut grid, KeyInput::new(Key::Character('b')));
        assert_eq!(grid.draft, Some(Person::new(1, "b")));
        assert!(grid.commits().is_empty());

        assert!(outside_click(&mut cell, &mut grid, false));
        assert_eq!(grid.commits(), vec![&Person::new(1, "b")]);
        assert!(!cell.is_open());
        assert!(!cell.is_listening());
    }

    #[test]
    fn in_tree_click_then_outside_click_commits_once() {
        let column = name_column(1);
        let mut grid = RecordingGrid::with_draft(Person::new(1, "a"));
        let mut cell = open(&column, &grid);

        assert!(!outside_click(&mut cell, &mut grid, true));
        assert!(cell.is_open());
        assert!(outside_click(&mut cell, &mut grid, false));
        assert!(!outside_click(&mut cell, &mut grid, false));
        assert_eq!(grid.commits().len(), 1);
    }

    #[test]
    fn disabled_outside_commit_never_commits() {
        let column = name_column(1).editor_options(EditorOptions::default().keep_open_on_outside_click());
        let mut grid = RecordingGrid::with_draft(Person::new(1, "a"));
        let mut cell = open(&column, &grid);
        assert!(!cell.is_listening());
        assert!(!outside_click(&mut cell, &mut grid, false));
        assert!(grid.commits().is_empty());
        assert!(cell.is_open());
    }

    #[test]
    fn a_ticket_from_before_unmount_never_fires() {
        let column = name_column(1);
        let mut grid = RecordingGrid::with_draft(Person::new(1, "a"));
        let mut cell = open(&column, &grid);
        let ticket = cell.window_pointer_down_capture().unwrap();
        cell.close();
        let draft = grid.draft.clone().unwrap();
        assert!(!cell.animation_frame(ticket, &draft, &mut grid));
        assert!(grid.calls.is_empty());
    }

    #[test]
    fn superseded_ticket_is_ignored() {
        let column = name_column(1);
        let mut grid = RecordingGrid::with_draft(Person::new(1, "a"));
        let mut cell = open(&column, &grid);
        let stale = cell.window_pointer_down_capture().unwrap();
        let fresh = cell.window_pointer_down_capture().unwrap();
        let draft = grid.draft.clone().unwrap();
        assert!(!cell.animation_frame(stale, &draft, &mut grid));
        assert!(cell.animation_frame(fresh, &draft, &mut grid));
        assert_eq!(grid.commits().len(), 1);
    }

    #[test]
    fn every_pointer_down_inside_keeps_the_editor_open() {
        let column = name_column(1);
        let mut grid = RecordingGrid::with_draft(Person::new(1, "a"));
        let mut cell = open(&column, &grid);
        let draft = grid.draft.clone().unwrap();

        // primary then secondary press, both landing in the editor
        let primary = cell.window_pointer_down_capture().unwrap();
        cell.pointer_down_inside();
        let secondary = cell.window_pointer_down_capture().unwrap();
        cell.pointer_down_inside();

        assert!(!cell.animation_frame(primary, &draft, &mut grid));
        assert!(!cell.animation_frame(secondary, &draft, &mut grid));
        assert!(cell.is_open());
        assert!(grid.commits().is_empty());
    }

    #[test]
    fn a_previous_editors_ticket_cannot_commit_the_next_one() {
        let column = name_column(1);
        let mut grid = RecordingGrid::with_draft(Person::new(1, "a"));
        let draft = grid.draft.clone().unwrap();

        let mut previous = open(&column, &grid);
        let stale = previous.window_pointer_down_capture().unwrap();
        drop(previous);

        let mut next = open(&column, &grid);
        let own = next.window_pointer_down_capture().unwrap();
        assert!(!next.animation_frame(stale, &draft, &mut grid));
        assert!(next.is_open());
        assert!(next.animation_frame(own, &draft, &mut grid));
        assert_eq!(grid.commits().len(), 1);
    }

    #[test]
    fn editor_keys_stay_in_the_editor() {
        let column = name_column(1);
        let mut grid = RecordingGrid::with_draft(Person::new(1, "a"));
        let mut cell = open(&column, &grid);
        assert_eq!(press(&mut cell, &mut grid, KeyInput::new(Key::ArrowLeft)), Propagation::Stop);
        assert_eq!(press(&mut cell, &mut grid, KeyInput::new(Key::ArrowUp)), Propagation::Stop);
        assert_eq!(press(&mut cell, &mut grid, KeyInput::new(Key::Tab)), Propagation::Continue);

        let previewing = name_column(1).editor_options(EditorOptions::default().render_formatter());
        let mut cell = open(&previewing, &grid);
        assert_eq!(press(&mut cell, &mut grid, KeyInput::new(Key::Tab)), Propagation::Stop);
    }

    #[test]
    fn custom_navigation_predicate_wins() {
        let column = name_column(1)
            .editor_options(EditorOptions::default().on_navigation(|input, _| input.key == Key::ArrowUp));
        let mut grid = RecordingGrid::with_draft(Person::new(1, "a"));
        let mut cell = open(&column, &grid);
        assert_eq!(press(&mut cell, &mut grid, KeyInput::new(Key::ArrowUp)), Propagation::Continue);
        assert_eq!(press(&mut cell, &mut grid, KeyInput::new(Key::Tab)), Propagation::Stop);
    }

    #[test]
    fn render_marks_the_editing_container() {
        let column = name_column(1);
        let row = Person::new(1, "a");
        let cell = EditCell::new(&column, &row, Some(2), GroupSpan::none()).unwrap();
        let node = cell.render(&row);
        assert_eq!(node.aria.selected, Some(true));
        assert_eq!(node.aria.col_span, Some(2));
        assert!(node.classes.contains(EDITOR_CONTAINER));
        assert!(node.classes.contains(CELL_EDITING));
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.count_kind(NodeKind::Editor), 1);
    }

    #[test]
    fn formatter_preview_renders_alongside_the_editor() {
        let column = name_column(1).editor_options(EditorOptions::default().render_formatter());
        let row = Person::new(1, "a");
        let cell = EditCell::new(&column, &row, None, GroupSpan::none()).unwrap();
        let node = cell.render(&row);
        assert!(node.classes.contains(EDITOR_CONTAINER));
        assert!(!node.classes.contains(CELL_EDITING));
        assert_eq!(node.children.len(), 2);
        assert_eq!(node.children[1].text.as_ref().map(AsRef::<str>::as_ref), Some("a"));
    }

    #[test]
    fn grouped_edit_cell_keeps_the_connector_strips() {
        let column = name_column(1);
        let row = Person::new(1, "a");
        let cell = EditCell::new(&column, &row, None, GroupSpan::new(1, 3)).unwrap();
        let node = cell.render(&row);
        assert_eq!(node.count_kind(NodeKind::ConnectorStrip), 2);
        assert_eq!(node.aria.selected, Some(true));
    }
}
