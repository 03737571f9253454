//! Keyboard input, cancellable cell events, and the callbacks the owning grid
//! implements.

use std::rc::Rc;

use crate::column::Column;
use crate::state::GroupId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Tab,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Backspace,
    Delete,
    Character(char),
    Other(String),
}

impl Key {
    /// Maps a gpui keystroke name (`"enter"`, `"left"`, `"a"`) onto a key.
    pub fn from_name(name: &str, key_char: Option<&str>) -> Self {
        match name {
            "enter" => Key::Enter,
            "escape" => Key::Escape,
            "tab" => Key::Tab,
            "up" => Key::ArrowUp,
            "down" => Key::ArrowDown,
            "left" => Key::ArrowLeft,
            "right" => Key::ArrowRight,
            "home" => Key::Home,
            "end" => Key::End,
            "pageup" => Key::PageUp,
            "pagedown" => Key::PageDown,
            "backspace" => Key::Backspace,
            "delete" => Key::Delete,
            _ => {
                let mut chars = key_char.unwrap_or(name).chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Character(c),
                    _ => Key::Other(name.to_string()),
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
    pub platform: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: KeyModifiers,
}

impl KeyInput {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::default(),
        }
    }

    pub fn shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }

    pub fn platform(mut self) -> Self {
        self.modifiers.platform = true;
        self
    }
}

/// Whether an event may continue to the grid's own handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Propagation {
    Stop,
    Continue,
}

/// Decides whether a key pressed inside an editor is grid navigation.
pub type NavigationPredicate = Rc<dyn Fn(&KeyInput, &EditorContext) -> bool>;

/// What a navigation predicate may know about the editor container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditorContext {
    /// The editor is the container's sole child (no formatter preview).
    pub editor_is_only_child: bool,
}

/// Tab leaves the editor only when nothing else shares its container; every
/// other key belongs to the editor.
pub fn default_editor_navigation(input: &KeyInput, context: &EditorContext) -> bool {
    input.key == Key::Tab && context.editor_is_only_child
}

/// Mouse interaction on a cell, handed to interception callbacks before the
/// cell applies its default selection behaviour.
pub struct CellEvent<'a, R> {
    pub row: &'a R,
    pub column: &'a Column<R>,
    grid_default_prevented: bool,
    select_requests: Vec<Option<bool>>,
}

impl<'a, R> CellEvent<'a, R> {
    pub fn new(row: &'a R, column: &'a Column<R>) -> Self {
        Self {
            row,
            column,
            grid_default_prevented: false,
            select_requests: Vec::new(),
        }
    }

    /// Selects this cell once the callback returns, optionally opening its editor.
    pub fn select_cell(&mut self, open_editor: Option<bool>) {
        self.select_requests.push(open_editor);
    }

    pub fn prevent_grid_default(&mut self) {
        self.grid_default_prevented = true;
    }

    pub fn is_grid_default_prevented(&self) -> bool {
        self.grid_default_prevented
    }

    pub(crate) fn take_select_requests(&mut self) -> Vec<Option<bool>> {
        std::mem::take(&mut self.select_requests)
    }
}

pub type CellEventHandler<R> = Rc<dyn Fn(&mut CellEvent<'_, R>)>;

pub struct CellInterceptors<R> {
    pub on_click: Option<CellEventHandler<R>>,
    pub on_double_click: Option<CellEventHandler<R>>,
    pub on_context_menu: Option<CellEventHandler<R>>,
}

impl<R> Default for CellInterceptors<R> {
    fn default() -> Self {
        Self {
            on_click: None,
            on_double_click: None,
            on_context_menu: None,
        }
    }
}

impl<R> Clone for CellInterceptors<R> {
    fn clone(&self) -> Self {
        Self {
            on_click: self.on_click.clone(),
            on_double_click: self.on_double_click.clone(),
            on_context_menu: self.on_context_menu.clone(),
        }
    }
}

impl<R> CellInterceptors<R> {
    pub fn on_click(mut self, handler: impl Fn(&mut CellEvent<'_, R>) + 'static) -> Self {
        self.on_click = Some(Rc::new(handler));
        self
    }

    pub fn on_double_click(mut self, handler: impl Fn(&mut CellEvent<'_, R>) + 'static) -> Self {
        self.on_double_click = Some(Rc::new(handler));
        self
    }

    pub fn on_context_menu(mut self, handler: impl Fn(&mut CellEvent<'_, R>) + 'static) -> Self {
        self.on_context_menu = Some(Rc::new(handler));
        self
    }
}

/// Callbacks an ordinary cell raises on the owning grid.
pub trait CellActions<R> {
    fn select_cell(&mut self, row: &R, column: &Column<R>, open_editor: Option<bool>);
    fn row_change(&mut self, column: &Column<R>, new_row: R);
}

pub trait GroupActions {
    fn toggle_group(&mut self, id: &GroupId);
}

/// Callbacks an edit cell raises on the owning grid.
pub trait EditorActions<R> {
    /// Replaces the draft row; `commit` asks the grid to apply it and close.
    fn row_change(&mut self, row: R, commit: bool);
    /// Closes the editor, discarding the draft.
    fn close_editor(&mut self);
}
