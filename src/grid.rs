use std::collections::HashSet;

use gpui::prelude::FluentBuilder;
use gpui::*;
use tracing::{debug, info};

use gridcells::cell::CellRenderer;
use gridcells::column::{Column, EditorOptions, EmptyFormatter, Formatter, FormatterProps, TextFormatter, finalize_columns};
use gridcells::edit_cell::EditCell;
use gridcells::editors::TextEditor;
use gridcells::events::{CellActions, CellEvent, CellInterceptors, EditorActions, GroupActions, Key, KeyInput, KeyModifiers, Propagation};
use gridcells::group_cell::GroupCellRenderer;
use gridcells::outside_click::FrameTicket;
use gridcells::render::{RenderContext, lower};
use gridcells::roving::{RovingFocus, RovingTabIndex};
use gridcells::settings::GridSettings;
use gridcells::state::{CellPosition, CellState, GroupId, GroupRow, GroupSpan, Mode};
use gridcells::style::{GridTracks, cell_grid_placement, row_grid_placement};
use gridcells::theme::Theme;
use gridcells::view::ViewNode;

pub const COLUMN_HEADER_HEIGHT: f32 = 28.0;
pub const HEADER_HEIGHT: f32 = 32.0;
pub const FOOTER_HEIGHT: f32 = 24.0;
const SPACER_WIDTH: f32 = 40.0;

pub const MIN_WINDOW_WIDTH: f32 = 480.0;
pub const MIN_WINDOW_HEIGHT: f32 = HEADER_HEIGHT + COLUMN_HEADER_HEIGHT + 3.0 * 35.0 + FOOTER_HEIGHT;

actions!(
    normal_mode,
    [
        MoveUp,
        MoveDown,
        MoveLeft,
        MoveRight,
        EnterEditMode,
        ActivateCell,
    ]
);

actions!(grouped_grid, [Quit]);

#[derive(Clone, Debug, PartialEq)]
pub struct Task {
    pub id: u32,
    pub title: String,
    pub team: String,
    pub status: String,
    pub owner: Option<String>,
    pub done: bool,
}

impl Task {
    fn new(id: u32, title: &str, team: &str, status: &str, owner: Option<&str>) -> Self {
        Self {
            id,
            title: title.to_string(),
            team: team.to_string(),
            status: status.to_string(),
            owner: owner.map(str::to_string),
            done: status == "done",
        }
    }
}

fn sample_tasks() -> Vec<Task> {
    vec![
        Task::new(1, "Draft release notes", "core", "open", Some("ana")),
        Task::new(2, "Fix scroll jitter", "core", "open", None),
        Task::new(3, "Profile layout pass", "core", "review", Some("ben")),
        Task::new(4, "Bump toolchain", "core", "done", Some("ana")),
        Task::new(5, "Keyboard shortcuts page", "docs", "open", Some("cy")),
        Task::new(6, "Screenshots for grouping", "docs", "review", None),
        Task::new(7, "Proofread API guide", "docs", "done", Some("cy")),
        Task::new(8, "Login flake", "infra", "open", Some("dee")),
        Task::new(9, "Rotate certificates", "infra", "open", Some("dee")),
        Task::new(10, "Cache build artifacts", "infra", "review", None),
        Task::new(11, "Nightly dashboards", "infra", "done", Some("ben")),
    ]
}

/// The fields rows can be grouped by, outermost first.
const GROUP_FIELDS: [(&str, &str); 3] = [("team", "Team"), ("status", "Status"), ("owner", "Owner")];

fn group_key(task: &Task, field: &str) -> Option<SharedString> {
    match field {
        "team" => Some(task.team.clone().into()),
        "status" => Some(task.status.clone().into()),
        "owner" => task.owner.clone().map(SharedString::from),
        _ => None,
    }
}

/// Checkbox cell: space toggles it.
struct DoneFormatter;

impl Formatter<Task> for DoneFormatter {
    fn format(&self, props: &FormatterProps<'_, Task>) -> ViewNode {
        ViewNode::text(if props.row.done { "☑" } else { "☐" })
    }

    fn activate(&self, row: &Task) -> Option<Task> {
        Some(Task {
            done: !row.done,
            ..row.clone()
        })
    }
}

fn field_column(key: &'static str, name: &'static str) -> Column<Task> {
    let column = Column::new(
        key,
        name,
        0,
        TextFormatter::new(move |task: &Task| group_key(task, key).unwrap_or_default()),
    );
    match key {
        "status" => column
            .editor(TextEditor::new(
                |t: &Task| t.status.clone(),
                |t: &Task, status: String| Task { status, ..t.clone() },
            ))
            .editor_options(EditorOptions::default().edit_on_click()),
        "owner" => column
            .editor(TextEditor::new(
                |t: &Task| t.owner.clone().unwrap_or_default(),
                |t: &Task, owner: String| Task {
                    owner: (!owner.is_empty()).then_some(owner),
                    ..t.clone()
                },
            ))
            .editor_options(EditorOptions::default().render_formatter()),
        _ => column,
    }
}

/// Grouped fields move to the front; the last of them closes the group box.
fn build_columns(depth: usize, settings: &GridSettings) -> Vec<Column<Task>> {
    let mut columns: Vec<Column<Task>> = GROUP_FIELDS[..depth]
        .iter()
        .map(|&(key, name)| field_column(key, name).width(110.))
        .collect();
    if let Some(last) = columns.pop() {
        columns.push(last.last_group_column());
    }

    columns.push(Column::new("id", "ID", 0, TextFormatter::new(|t: &Task| t.id.to_string().into())).width(60.));
    columns.push(
        Column::new("title", "Title", 0, TextFormatter::new(|t: &Task| t.title.clone().into()))
            .width(240.)
            .editor(TextEditor::new(
                |t: &Task| t.title.clone(),
                |t: &Task, title: String| Task { title, ..t.clone() },
            ))
            .editable_when(|t: &Task| !t.done)
            .cell_class(|t: &Task| t.done.then(|| "task-done".into())),
    );
    columns.push(Column::new("done", "Done", 0, DoneFormatter).width(60.));
    columns.extend(GROUP_FIELDS[depth..].iter().map(|&(key, name)| field_column(key, name)));

    if settings.column_widths.is_some() {
        let widths = settings.column_widths(columns.len());
        for (column, width) in columns.iter_mut().zip(widths) {
            column.width = width;
        }
    }
    columns.push(Column::new("spacer", "", 0, EmptyFormatter).width(SPACER_WIDTH).no_styling());
    finalize_columns(&mut columns);
    columns
}

#[derive(Clone)]
enum GridRow {
    Group { group: GroupRow<Task>, span: GroupSpan },
    Task { index: usize, span: GroupSpan },
}

fn build_rows(tasks: &[Task], depth: usize, expanded: &HashSet<GroupId>) -> Vec<GridRow> {
    let mut rows = Vec::new();
    let all: Vec<usize> = (0..tasks.len()).collect();
    push_level(&mut rows, tasks, &all, 1, depth, "", expanded);
    rows
}

fn push_level(
    rows: &mut Vec<GridRow>,
    tasks: &[Task],
    members: &[usize],
    level: usize,
    depth: usize,
    parent: &str,
    expanded: &HashSet<GroupId>,
) {
    if level > depth {
        let span = if depth == 0 { GroupSpan::none() } else { GroupSpan::new(depth, depth) };
        rows.extend(members.iter().map(|&index| GridRow::Task { index, span }));
        return;
    }

    let (field, name) = GROUP_FIELDS[level - 1];
    let mut buckets: Vec<(Option<SharedString>, Vec<usize>)> = Vec::new();
    for &index in members {
        let key = group_key(&tasks[index], field);
        match buckets.iter_mut().find(|(k, _)| *k == key) {
            Some((_, bucket)) => bucket.push(index),
            None => buckets.push((key, vec![index])),
        }
    }

    for (key, bucket) in buckets {
        let id = format!("{}/{}={}", parent, field, key.as_ref().map_or("", |k| k.as_ref()));
        let group_id = GroupId::from(id.clone());
        let is_expanded = expanded.contains(&group_id);
        let group = GroupRow::new(group_id, name, key, level)
            .with_children(bucket.iter().map(|&i| tasks[i].clone()).collect())
            .expanded(is_expanded);
        rows.push(GridRow::Group {
            group,
            span: GroupSpan::new(level - 1, depth),
        });
        if is_expanded {
            push_level(rows, tasks, &bucket, level + 1, depth, &id, expanded);
        }
    }
}

/// The main application component
pub struct GridApp {
    grid: Entity<GroupedGrid>,
}

impl GridApp {
    pub fn new(settings: GridSettings, cx: &mut Context<Self>) -> Self {
        let grid = cx.new(|cx| GroupedGrid::new(settings, cx));
        Self { grid }
    }

    pub fn grid(&self) -> &Entity<GroupedGrid> {
        &self.grid
    }
}

impl Render for GridApp {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.global::<Theme>();

        div()
            .flex()
            .flex_col()
            .size_full()
            .bg(theme.base)
            .text_color(theme.text)
            .text_size(px(14.))
            .child(self.grid.clone())
    }
}

pub struct GroupedGrid {
    focus_handle: FocusHandle,
    settings: GridSettings,
    tasks: Vec<Task>,
    depth: usize,
    columns: Vec<Column<Task>>,
    tracks: GridTracks,
    rows: Vec<GridRow>,
    expanded: HashSet<GroupId>,
    interceptors: CellInterceptors<Task>,
    selected: CellPosition,
    scroll_row: usize,
    visible_rows: usize,
    mode: Mode,
    editing: Option<EditCell<Task>>,
    draft: Option<Task>,
}

impl GroupedGrid {
    pub fn new(settings: GridSettings, cx: &mut Context<Self>) -> Self {
        let depth = settings.max_group_depth();
        let columns = build_columns(depth, &settings);
        let tasks = sample_tasks();
        let expanded = HashSet::new();
        let rows = build_rows(&tasks, depth, &expanded);

        // checkbox cells never open an editor
        let interceptors = CellInterceptors::default().on_double_click(|event: &mut CellEvent<'_, Task>| {
            if event.column.key.as_ref() == "done" {
                event.select_cell(None);
                event.prevent_grid_default();
            }
        });

        Self {
            focus_handle: cx.focus_handle(),
            tracks: GridTracks::from_columns(&columns),
            settings,
            tasks,
            depth,
            columns,
            rows,
            expanded,
            interceptors,
            selected: CellPosition::new(0, 0),
            scroll_row: 0,
            visible_rows: 20,
            mode: Mode::Normal,
            editing: None,
            draft: None,
        }
    }

    fn last_col(&self) -> usize {
        // the spacer is never selectable
        self.columns.len().saturating_sub(2)
    }

    fn row_index_of(&self, task_id: u32) -> Option<usize> {
        self.rows.iter().position(|row| match row {
            GridRow::Task { index, .. } => self.tasks[*index].id == task_id,
            GridRow::Group { .. } => false,
        })
    }

    fn rebuild_rows(&mut self) {
        self.rows = build_rows(&self.tasks, self.depth, &self.expanded);
        self.selected.row = self.selected.row.min(self.rows.len().saturating_sub(1));
        let span = self
            .draft
            .as_ref()
            .and_then(|draft| self.row_index_of(draft.id))
            .and_then(|ix| match &self.rows[ix] {
                GridRow::Task { span, .. } => Some(*span),
                GridRow::Group { .. } => None,
            });
        if let (Some(editing), Some(span)) = (self.editing.as_mut(), span) {
            editing.set_group(span);
        }
        self.ensure_visible();
    }

    fn replace_task(&mut self, task: Task) {
        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) {
            *slot = task;
        }
        self.rebuild_rows();
    }

    fn move_up(&mut self, _: &MoveUp, window: &mut Window, cx: &mut Context<Self>) {
        self.move_selection(-1, 0, window, cx);
    }

    fn move_down(&mut self, _: &MoveDown, window: &mut Window, cx: &mut Context<Self>) {
        self.move_selection(1, 0, window, cx);
    }

    fn move_left(&mut self, _: &MoveLeft, window: &mut Window, cx: &mut Context<Self>) {
        self.move_selection(0, -1, window, cx);
    }

    fn move_right(&mut self, _: &MoveRight, window: &mut Window, cx: &mut Context<Self>) {
        self.move_selection(0, 1, window, cx);
    }

    fn move_selection(&mut self, delta_row: isize, delta_col: isize, _window: &mut Window, cx: &mut Context<Self>) {
        let max_row = self.rows.len().saturating_sub(1) as isize;
        let new_row = (self.selected.row as isize + delta_row).clamp(0, max_row) as usize;
        let new_col = (self.selected.col as isize + delta_col).clamp(0, self.last_col() as isize) as usize;

        self.selected = CellPosition::new(new_row, new_col);
        self.ensure_visible();
        cx.notify();
    }

    /// Enter: toggles a group from its anchor, or opens the editor.
    fn enter_edit_mode(&mut self, _: &EnterEditMode, _window: &mut Window, cx: &mut Context<Self>) {
        match self.rows.get(self.selected.row).cloned() {
            Some(GridRow::Group { group, span }) => {
                let column = self.columns[self.selected.col].clone();
                GroupCellRenderer::new(&column, &group, span).key_down(&KeyInput::new(Key::Enter), self);
            }
            Some(GridRow::Task { .. }) => self.open_editor(),
            None => {}
        }
        cx.notify();
    }

    fn activate_cell(&mut self, _: &ActivateCell, _window: &mut Window, cx: &mut Context<Self>) {
        if let Some(GridRow::Task { index, span }) = self.rows.get(self.selected.row).cloned() {
            let column = self.columns[self.selected.col].clone();
            let task = self.tasks[index].clone();
            CellRenderer::new(&column, &task).group(span).activate(self);
            cx.notify();
        }
    }

    fn open_editor(&mut self) {
        let Some(GridRow::Task { index, span }) = self.rows.get(self.selected.row).cloned() else {
            return;
        };
        let column = self.columns[self.selected.col].clone();
        let task = self.tasks[index].clone();
        if !column.is_editable(&task) {
            return;
        }
        self.commit_editing();
        if let Some(editing) = EditCell::new(&column, &task, None, span) {
            self.editing = Some(editing);
            self.draft = Some(task);
            self.mode = Mode::Edit;
        }
    }

    /// Commits an open editor before another one replaces it.
    fn commit_editing(&mut self) {
        let Some(mut editing) = self.editing.take() else {
            return;
        };
        editing.close();
        if let Some(draft) = self.draft.take() {
            EditorActions::row_change(self, draft, true);
        }
    }

    fn on_key_down(&mut self, event: &KeyDownEvent, _window: &mut Window, cx: &mut Context<Self>) {
        if self.mode != Mode::Edit {
            return;
        }
        let (Some(mut editing), Some(draft)) = (self.editing.take(), self.draft.clone()) else {
            return;
        };

        let keystroke = &event.keystroke;
        let input = KeyInput {
            key: Key::from_name(&keystroke.key, keystroke.key_char.as_deref()),
            modifiers: KeyModifiers {
                shift: keystroke.modifiers.shift,
                control: keystroke.modifiers.control,
                alt: keystroke.modifiers.alt,
                platform: keystroke.modifiers.platform,
            },
        };

        let propagation = editing.key_down(&input, &draft, self);
        if editing.is_open() {
            self.editing = Some(editing);
        }
        match propagation {
            Propagation::Stop => cx.stop_propagation(),
            Propagation::Continue if input.key == Key::Tab => {
                self.commit_editing();
                let delta = if input.modifiers.shift { -1 } else { 1 };
                let col = (self.selected.col as isize + delta).clamp(0, self.last_col() as isize);
                self.selected.col = col as usize;
                cx.stop_propagation();
            }
            Propagation::Continue => {}
        }
        cx.notify();
    }

    fn cell_mouse_down(
        &mut self,
        row_ix: usize,
        col_ix: usize,
        event: &MouseDownEvent,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if self.roving().cell(true).wants_focus {
            self.focus_handle.focus(window);
        }
        let column = self.columns[col_ix].clone();
        match self.rows.get(row_ix).cloned() {
            Some(GridRow::Task { index, span }) => {
                let task = self.tasks[index].clone();
                let cell = CellRenderer::new(&column, &task)
                    .group(span)
                    .interceptors(&self.interceptors);
                if event.button == MouseButton::Right {
                    cell.context_menu(self);
                } else if event.click_count == 2 {
                    cell.double_click(self);
                } else {
                    cell.click(self);
                }
            }
            Some(GridRow::Group { group, span }) => {
                self.selected = CellPosition::new(row_ix, col_ix);
                GroupCellRenderer::new(&column, &group, span).click(self);
            }
            None => {}
        }
        cx.notify();
    }

    /// Runs from the window capture phase, ahead of every handler in the tree.
    fn capture_pointer_down(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let Some(ticket) = self.editing.as_mut().and_then(|e| e.window_pointer_down_capture()) else {
            return;
        };
        let entity = cx.entity();
        window.on_next_frame(move |_window, cx| {
            entity.update(cx, |grid, cx| grid.outside_click_frame(ticket, cx));
        });
        window.refresh();
    }

    fn outside_click_frame(&mut self, ticket: FrameTicket, cx: &mut Context<Self>) {
        let (Some(mut editing), Some(draft)) = (self.editing.take(), self.draft.clone()) else {
            return;
        };
        editing.animation_frame(ticket, &draft, self);
        if editing.is_open() {
            self.editing = Some(editing);
        }
        cx.notify();
    }

    fn pointer_down_inside_editor(&mut self, _: &MouseDownEvent, _window: &mut Window, _cx: &mut Context<Self>) {
        if let Some(editing) = self.editing.as_mut() {
            editing.pointer_down_inside();
        }
    }

    /// An open editor holds focus inside its cell.
    fn roving(&self) -> RovingTabIndex {
        RovingTabIndex {
            child_focused: self.editing.is_some(),
        }
    }

    fn ensure_visible(&mut self) {
        if self.selected.row < self.scroll_row {
            self.scroll_row = self.selected.row;
        } else if self.selected.row >= self.scroll_row + self.visible_rows {
            self.scroll_row = self.selected.row.saturating_sub(self.visible_rows - 1);
        }
    }

    fn render_context<'a>(&self, theme: &'a Theme) -> RenderContext<'a> {
        RenderContext {
            theme,
            rem_size: self.settings.rem_size(),
        }
    }

    fn render_header(&self, cx: &Context<Self>) -> impl IntoElement {
        let theme = cx.global::<Theme>();
        let grouped: Vec<&str> = GROUP_FIELDS[..self.depth].iter().map(|&(_, name)| name).collect();

        div()
            .flex()
            .flex_row()
            .w_full()
            .h(px(HEADER_HEIGHT))
            .bg(theme.header)
            .border_b_1()
            .border_color(theme.border)
            .items_center()
            .px(px(8.))
            .gap(px(8.))
            .text_color(theme.subtext)
            .child("Grouped by")
            .child(div().text_color(theme.text).child(grouped.join(" › ")))
    }

    fn render_column_headers(&self, cx: &Context<Self>) -> impl IntoElement {
        let theme = cx.global::<Theme>();

        div()
            .flex()
            .flex_row()
            .h(px(COLUMN_HEADER_HEIGHT))
            .bg(theme.header)
            .border_b_1()
            .border_color(theme.border)
            .children(self.columns.iter().map(|column| {
                let is_selected = column.idx == self.selected.col;
                div()
                    .w(px(column.width))
                    .h_full()
                    .flex_none()
                    .flex()
                    .items_center()
                    .px(px(8.))
                    .when(!column.is_no_styling, |d| d.border_r_1())
                    .border_color(theme.border)
                    .text_size(px(12.))
                    .text_color(if is_selected { theme.accent } else { theme.subtext })
                    .font_weight(if is_selected { FontWeight::BOLD } else { FontWeight::NORMAL })
                    .child(column.name.clone())
            }))
    }

    fn render_slot(&self, row_ix: usize, column: &Column<Task>, cx: &Context<Self>) -> AnyElement {
        let theme = cx.global::<Theme>();
        let rcx = self.render_context(theme);
        let is_selected = self.selected == CellPosition::new(row_ix, column.idx);
        let slot_id = ElementId::Name(format!("cell-{}-{}", row_ix, column.idx).into());
        let roving = self.roving();

        let (node, editing) = match &self.rows[row_ix] {
            GridRow::Task { index, span } => {
                let task = &self.tasks[*index];
                match (&self.editing, &self.draft) {
                    (Some(editing), Some(draft)) if draft.id == task.id && editing.column().idx == column.idx => {
                        (Some(editing.render(draft)), true)
                    }
                    _ => {
                        let state = CellState {
                            is_selected,
                            ..CellState::default()
                        };
                        let node = CellRenderer::new(column, task)
                            .state(state)
                            .roving(&roving)
                            .group(*span)
                            .interceptors(&self.interceptors)
                            .render();
                        (node, false)
                    }
                }
            }
            GridRow::Group { group, span } => (
                GroupCellRenderer::new(column, group, *span)
                    .selected(is_selected)
                    .roving(&roving)
                    .render(),
                false,
            ),
        };

        let placement = node
            .as_ref()
            .and_then(|n| n.placement)
            .unwrap_or_else(|| cell_grid_placement(column, None));
        let width = self.tracks.width_for(&placement);
        let row = row_ix;
        let col = column.idx;

        let slot = div().id(slot_id).w(px(width)).h_full().flex_none().flex();
        match node {
            None => slot.into_any_element(),
            // any button reaching the editor keeps it open
            Some(node) if editing => slot
                .on_any_mouse_down(cx.listener(Self::pointer_down_inside_editor))
                .child(lower(&node, width, rcx))
                .into_any_element(),
            Some(node) => slot
                .on_mouse_down(
                    MouseButton::Left,
                    cx.listener(move |grid, event: &MouseDownEvent, window, cx| {
                        grid.cell_mouse_down(row, col, event, window, cx)
                    }),
                )
                .on_mouse_down(
                    MouseButton::Right,
                    cx.listener(move |grid, event: &MouseDownEvent, window, cx| {
                        grid.cell_mouse_down(row, col, event, window, cx)
                    }),
                )
                .child(lower(&node, width, rcx))
                .into_any_element(),
        }
    }

    fn render_grid(&self, cx: &Context<Self>) -> impl IntoElement {
        let theme = cx.global::<Theme>();
        let end_row = (self.scroll_row + self.visible_rows).min(self.rows.len());
        let row_height = self.settings.row_height();

        div()
            .flex()
            .flex_col()
            .flex_1()
            .overflow_hidden()
            .children((self.scroll_row..end_row).map(|row_ix| {
                let placement = row_grid_placement(row_ix, Some(row_height));
                div()
                    .id(ElementId::Name(format!("row-{}", placement.row_start).into()))
                    .flex()
                    .flex_row()
                    .h(px(placement.row_height.unwrap_or(row_height)))
                    .border_b_1()
                    .border_color(theme.border)
                    .children(self.columns.iter().map(|column| self.render_slot(row_ix, column, cx)))
            }))
    }

    /// Registers the window capture-phase pointer listener while an editor
    /// commits on outside clicks. Listeners are per frame, so an unmounted
    /// editor stops listening on the next paint.
    fn render_capture_listener(&self, cx: &Context<Self>) -> impl IntoElement {
        let entity = cx.entity();
        canvas(
            |_bounds, _window, _cx| {},
            move |_bounds, _, window, _cx| {
                window.on_mouse_event(move |_: &MouseDownEvent, phase, window, cx| {
                    if phase == DispatchPhase::Capture {
                        entity.update(cx, |grid, cx| grid.capture_pointer_down(window, cx));
                    }
                });
            },
        )
        .absolute()
        .size_0()
    }

    fn render_footer(&self, cx: &Context<Self>) -> impl IntoElement {
        let theme = cx.global::<Theme>();
        let mode_text = match self.mode {
            Mode::Normal => "-- NORMAL --",
            Mode::Edit => "-- EDIT --",
        };

        div()
            .flex()
            .flex_row()
            .w_full()
            .h(px(FOOTER_HEIGHT))
            .bg(theme.header)
            .border_t_1()
            .border_color(theme.border)
            .items_center()
            .justify_between()
            .px(px(8.))
            .text_size(px(12.))
            .text_color(theme.subtext)
            .child(div().font_weight(FontWeight::BOLD).child(mode_text))
            .child(format!("{} tasks", self.tasks.len()))
    }
}

impl CellActions<Task> for GroupedGrid {
    fn select_cell(&mut self, row: &Task, column: &Column<Task>, open_editor: Option<bool>) {
        if let Some(row_ix) = self.row_index_of(row.id) {
            self.selected = CellPosition::new(row_ix, column.idx);
            self.ensure_visible();
        }
        if open_editor == Some(true) {
            self.open_editor();
        }
    }

    fn row_change(&mut self, column: &Column<Task>, new_row: Task) {
        debug!(column = %column.key, task = new_row.id, "cell changed row");
        self.replace_task(new_row);
    }
}

impl GroupActions for GroupedGrid {
    fn toggle_group(&mut self, id: &GroupId) {
        if !self.expanded.remove(id) {
            self.expanded.insert(id.clone());
        }
        self.rebuild_rows();
    }
}

impl EditorActions<Task> for GroupedGrid {
    fn row_change(&mut self, row: Task, commit: bool) {
        if !commit {
            self.draft = Some(row);
            return;
        }
        info!(task = row.id, "edit committed");
        self.editing = None;
        self.draft = None;
        self.mode = Mode::Normal;
        self.replace_task(row);
    }

    fn close_editor(&mut self) {
        self.editing = None;
        self.draft = None;
        self.mode = Mode::Normal;
    }
}

impl Render for GroupedGrid {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let content_bounds = window.viewport_size();
        let grid_height = f32::from(content_bounds.height) - HEADER_HEIGHT - COLUMN_HEADER_HEIGHT - FOOTER_HEIGHT;
        self.visible_rows = ((grid_height / self.settings.row_height()).ceil() as usize).max(1);
        self.ensure_visible();

        let key_context = if self.mode == Mode::Edit { "EditMode" } else { "NormalMode" };
        let listening = self.editing.as_ref().is_some_and(|e| e.is_listening());

        div()
            .relative()
            .flex()
            .flex_col()
            .size_full()
            .key_context(key_context)
            .track_focus(&self.focus_handle)
            .on_action(cx.listener(Self::move_up))
            .on_action(cx.listener(Self::move_down))
            .on_action(cx.listener(Self::move_left))
            .on_action(cx.listener(Self::move_right))
            .on_action(cx.listener(Self::enter_edit_mode))
            .on_action(cx.listener(Self::activate_cell))
            .on_key_down(cx.listener(Self::on_key_down))
            .child(self.render_header(cx))
            .child(self.render_column_headers(cx))
            .child(self.render_grid(cx))
            .child(self.render_footer(cx))
            .when(listening, |d| d.child(self.render_capture_listener(cx)))
    }
}

impl Focusable for GroupedGrid {
    fn focus_handle(&self, _: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

#[cfg(test)]
mod tests {
    // explicit imports: the gpui glob would shadow #[test]
    use std::collections::HashSet;

    use gridcells::column::Formatter;
    use gridcells::settings::GridSettings;
    use gridcells::state::{GroupId, GroupSpan};

    use super::{DoneFormatter, GridRow, Task, build_columns, build_rows, sample_tasks};

    fn expand_all(tasks: &[Task], depth: usize) -> HashSet<GroupId> {
        let mut expanded = HashSet::new();
        loop {
            let rows = build_rows(tasks, depth, &expanded);
            let before = expanded.len();
            for row in rows {
                if let GridRow::Group { group, .. } = row {
                    expanded.insert(group.id);
                }
            }
            if expanded.len() == before {
                return expanded;
            }
        }
    }

    #[test]
    fn collapsed_grid_shows_top_level_groups() {
        let tasks = sample_tasks();
        let rows = build_rows(&tasks, 2, &HashSet::new());
        assert_eq!(rows.len(), 3);
        for row in &rows {
            match row {
                GridRow::Group { group, span } => {
                    assert_eq!(group.level, 1);
                    assert_eq!(*span, GroupSpan::new(0, 2));
                }
                GridRow::Task { .. } => panic!("collapsed groups hide their tasks"),
            }
        }
    }

    #[test]
    fn expanded_tasks_anchor_after_the_group_columns() {
        let tasks = sample_tasks();
        let expanded = expand_all(&tasks, 3);
        let rows = build_rows(&tasks, 3, &expanded);
        let task_rows = rows.iter().filter(|r| matches!(r, GridRow::Task { .. })).count();
        assert_eq!(task_rows, tasks.len());
        for row in &rows {
            match row {
                GridRow::Task { span, .. } => assert_eq!(*span, GroupSpan::new(3, 3)),
                GridRow::Group { group, span } => assert_eq!(span.primary_index, group.level - 1),
            }
        }
    }

    #[test]
    fn missing_owner_groups_under_an_empty_key() {
        let tasks = sample_tasks();
        let expanded = expand_all(&tasks, 3);
        let rows = build_rows(&tasks, 3, &expanded);
        assert!(rows.iter().any(|row| matches!(
            row,
            GridRow::Group { group, .. } if group.level == 3 && group.key.is_none()
        )));
    }

    #[test]
    fn group_columns_lead_and_the_spacer_trails() {
        let columns = build_columns(2, &GridSettings::default());
        assert_eq!(columns[0].key.as_ref(), "team");
        assert!(columns[1].is_last_group_column);
        assert!(!columns[0].is_last_group_column);
        let spacer = columns.last().unwrap();
        assert!(spacer.is_no_styling);
        assert!(spacer.is_last_column);
    }

    #[test]
    fn ungrouped_rows_carry_no_span() {
        let tasks = sample_tasks();
        let rows = build_rows(&tasks, 0, &HashSet::new());
        assert_eq!(rows.len(), tasks.len());
        assert!(rows.iter().all(|r| matches!(r, GridRow::Task { span, .. } if !span.is_grouped())));
    }

    #[test]
    fn done_toggles_through_its_formatter() {
        let task = Task::new(1, "t", "core", "open", None);
        let toggled = DoneFormatter.activate(&task).unwrap();
        assert!(toggled.done);
    }
}
