// Single-line text editor used for in-place editing of string fields

use std::ops::Range;
use std::rc::Rc;

use unicode_segmentation::*;

use crate::column::{Column, Editor, EditorResponse, EditorSession};
use crate::events::{Key, KeyInput};
use crate::view::{NodeKind, ViewNode};

/// Editable text with a grapheme-aware caret and selection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextBuffer {
    content: String,
    selected_range: Range<usize>,
    selection_reversed: bool,
}

impl TextBuffer {
    /// Starts with the caret at the end, like entering edit mode on a cell.
    pub fn new(text: impl Into<String>) -> Self {
        let content = text.into();
        let len = content.len();
        Self {
            content,
            selected_range: len..len,
            selection_reversed: false,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn selected_range(&self) -> Range<usize> {
        self.selected_range.clone()
    }

    pub fn cursor_offset(&self) -> usize {
        if self.selection_reversed {
            self.selected_range.start
        } else {
            self.selected_range.end
        }
    }

    pub fn left(&mut self) {
        if self.selected_range.is_empty() {
            self.move_to(self.previous_boundary(self.cursor_offset()));
        } else {
            self.move_to(self.selected_range.start)
        }
    }

    pub fn right(&mut self) {
        if self.selected_range.is_empty() {
            self.move_to(self.next_boundary(self.selected_range.end));
        } else {
            self.move_to(self.selected_range.end)
        }
    }

    pub fn select_left(&mut self) {
        self.select_to(self.previous_boundary(self.cursor_offset()));
    }

    pub fn select_right(&mut self) {
        self.select_to(self.next_boundary(self.cursor_offset()));
    }

    pub fn select_all(&mut self) {
        self.move_to(0);
        self.select_to(self.content.len())
    }

    pub fn home(&mut self) {
        self.move_to(0);
    }

    pub fn end(&mut self) {
        self.move_to(self.content.len());
    }

    pub fn word_left(&mut self) {
        self.move_to(self.previous_word_boundary(self.cursor_offset()));
    }

    pub fn word_right(&mut self) {
        self.move_to(self.next_word_boundary(self.cursor_offset()));
    }

    pub fn backspace(&mut self) {
        if self.selected_range.is_empty() {
            self.select_to(self.previous_boundary(self.cursor_offset()))
        }
        self.replace_selection("")
    }

    pub fn delete(&mut self) {
        if self.selected_range.is_empty() {
            self.select_to(self.next_boundary(self.cursor_offset()))
        }
        self.replace_selection("")
    }

    pub fn delete_word_backward(&mut self) {
        if self.selected_range.is_empty() {
            self.select_to(self.previous_word_boundary(self.cursor_offset()))
        }
        self.replace_selection("")
    }

    pub fn insert(&mut self, text: &str) {
        self.replace_selection(text)
    }

    fn replace_selection(&mut self, new_text: &str) {
        let range = self.selected_range.clone();
        self.content = self.content[0..range.start].to_owned() + new_text + &self.content[range.end..];
        let caret = range.start + new_text.len();
        self.selected_range = caret..caret;
        self.selection_reversed = false;
    }

    fn move_to(&mut self, offset: usize) {
        self.selected_range = offset..offset;
        self.selection_reversed = false;
    }

    fn select_to(&mut self, offset: usize) {
        if self.selection_reversed {
            self.selected_range.start = offset
        } else {
            self.selected_range.end = offset
        };
        if self.selected_range.end < self.selected_range.start {
            self.selection_reversed = !self.selection_reversed;
            self.selected_range = self.selected_range.end..self.selected_range.start;
        }
    }

    fn previous_boundary(&self, offset: usize) -> usize {
        self.content
            .grapheme_indices(true)
            .rev()
            .find_map(|(idx, _)| (idx < offset).then_some(idx))
            .unwrap_or(0)
    }

    fn next_boundary(&self, offset: usize) -> usize {
        self.content
            .grapheme_indices(true)
            .find_map(|(idx, _)| (idx > offset).then_some(idx))
            .unwrap_or(self.content.len())
    }

    fn previous_word_boundary(&self, offset: usize) -> usize {
        let mut prev_offset = offset;
        let mut found_word = false;

        for (idx, grapheme) in self.content.grapheme_indices(true).rev() {
            if idx >= offset {
                continue;
            }
            if is_word_grapheme(grapheme) {
                found_word = true;
                prev_offset = idx;
            } else if found_word {
                break;
            } else {
                prev_offset = idx;
            }
        }

        if found_word { prev_offset } else { 0 }
    }

    fn next_word_boundary(&self, offset: usize) -> usize {
        let mut in_word = false;

        for (idx, grapheme) in self.content.grapheme_indices(true) {
            if idx <= offset {
                continue;
            }
            if is_word_grapheme(grapheme) {
                in_word = true;
            } else if in_word {
                return idx;
            }
        }

        self.content.len()
    }

    /// Applies an editing key. Returns false for keys a text field ignores.
    pub fn apply(&mut self, input: &KeyInput) -> bool {
        let m = input.modifiers;
        match &input.key {
            Key::ArrowLeft if m.alt && m.shift => {
                let target = self.previous_word_boundary(self.cursor_offset());
                self.select_to(target);
            }
            Key::ArrowRight if m.alt && m.shift => {
                let target = self.next_word_boundary(self.cursor_offset());
                self.select_to(target);
            }
            Key::ArrowLeft if m.shift => self.select_left(),
            Key::ArrowRight if m.shift => self.select_right(),
            Key::ArrowLeft if m.alt => self.word_left(),
            Key::ArrowRight if m.alt => self.word_right(),
            Key::ArrowLeft if m.platform => self.home(),
            Key::ArrowRight if m.platform => self.end(),
            Key::ArrowLeft => self.left(),
            Key::ArrowRight => self.right(),
            Key::Home => self.home(),
            Key::End => self.end(),
            Key::Backspace if m.alt => self.delete_word_backward(),
            Key::Backspace => self.backspace(),
            Key::Delete => self.delete(),
            Key::Character('a') if m.platform || m.control => self.select_all(),
            Key::Character(c) if !m.platform && !m.control => {
                let mut buf = [0u8; 4];
                self.insert(c.encode_utf8(&mut buf));
            }
            _ => return false,
        }
        true
    }
}

fn is_word_grapheme(grapheme: &str) -> bool {
    grapheme
        .chars()
        .next()
        .map(|c| c.is_alphanumeric() || c == '_')
        .unwrap_or(false)
}

/// Edits a string field of the row through a getter and a setter.
pub struct TextEditor<R> {
    read: Rc<dyn Fn(&R) -> String>,
    write: Rc<dyn Fn(&R, String) -> R>,
}

impl<R> TextEditor<R> {
    pub fn new(read: impl Fn(&R) -> String + 'static, write: impl Fn(&R, String) -> R + 'static) -> Self {
        Self {
            read: Rc::new(read),
            write: Rc::new(write),
        }
    }
}

impl<R: 'static> Editor<R> for TextEditor<R> {
    fn open(&self, _column: &Column<R>, row: &R) -> Box<dyn EditorSession<R>> {
        Box::new(TextEditorSession {
            buffer: TextBuffer::new((self.read)(row)),
            write: self.write.clone(),
        })
    }
}

pub struct TextEditorSession<R> {
    buffer: TextBuffer,
    write: Rc<dyn Fn(&R, String) -> R>,
}

impl<R> TextEditorSession<R> {
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }
}

impl<R> EditorSession<R> for TextEditorSession<R> {
    fn render(&self, _row: &R) -> ViewNode {
        let caret = self.buffer.cursor_offset();
        let content = self.buffer.content();
        ViewNode::new(NodeKind::Editor)
            .child(ViewNode::text(content[..caret].to_string()))
            .child(ViewNode::new(NodeKind::Caret))
            .child(ViewNode::text(content[caret..].to_string()))
    }

    fn key_down(&mut self, input: &KeyInput, row: &R) -> EditorResponse<R> {
        let before = self.buffer.content().to_string();
        if !self.buffer.apply(input) {
            return EditorResponse::Ignored;
        }
        if self.buffer.content() == before {
            EditorResponse::Handled
        } else {
            EditorResponse::Change((self.write)(row, self.buffer.content().to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Person, name_column};

    fn key(c: char) -> KeyInput {
        KeyInput::new(Key::Character(c))
    }

    #[test]
    fn caret_starts_at_the_end() {
        let buffer = TextBuffer::new("héllo");
        assert_eq!(buffer.cursor_offset(), "héllo".len());
    }

    #[test]
    fn backspace_removes_whole_graphemes() {
        let mut buffer = TextBuffer::new("ae\u{301}");
        buffer.backspace();
        assert_eq!(buffer.content(), "a");
    }

    #[test]
    fn typing_replaces_the_selection() {
        let mut buffer = TextBuffer::new("hello world");
        buffer.select_all();
        buffer.insert("b");
        assert_eq!(buffer.content(), "b");
        assert_eq!(buffer.selected_range(), 1..1);
    }

    #[test]
    fn word_navigation() {
        let mut buffer = TextBuffer::new("one two_three four");
        buffer.word_left();
        assert_eq!(buffer.cursor_offset(), 14);
        buffer.word_left();
        assert_eq!(buffer.cursor_offset(), 4);
        buffer.word_right();
        assert_eq!(buffer.cursor_offset(), 13);
        buffer.home();
        buffer.delete();
        assert_eq!(buffer.content(), "ne two_three four");
    }

    #[test]
    fn shift_selection_can_reverse() {
        let mut buffer = TextBuffer::new("abc");
        buffer.select_left();
        buffer.select_left();
        assert_eq!(buffer.selected_range(), 1..3);
        buffer.left();
        assert_eq!(buffer.cursor_offset(), 1);
        assert!(buffer.apply(&KeyInput::new(Key::ArrowRight).shift()));
        assert_eq!(buffer.selected_range(), 1..2);
    }

    #[test]
    fn apply_ignores_grid_keys() {
        let mut buffer = TextBuffer::new("x");
        assert!(!buffer.apply(&KeyInput::new(Key::Tab)));
        assert!(!buffer.apply(&KeyInput::new(Key::ArrowUp)));
        assert!(!buffer.apply(&KeyInput::new(Key::Enter)));
        assert!(buffer.apply(&KeyInput::new(Key::Backspace).alt()));
        assert_eq!(buffer.content(), "");
    }

    #[test]
    fn session_proposes_rows_and_keeps_the_caret() {
        let column = name_column(1);
        let row = Person::new(1, "a");
        let editor = TextEditor::new(|p: &Person| p.name.clone(), |p: &Person, name| Person { name, ..p.clone() });
        let mut session = editor.open(&column, &row);

        assert!(matches!(session.key_down(&KeyInput::new(Key::ArrowLeft), &row), EditorResponse::Handled));
        match session.key_down(&key('z'), &row) {
            EditorResponse::Change(next) => assert_eq!(next, Person::new(1, "za")),
            _ => panic!("typing should change the row"),
        }
        assert!(matches!(session.key_down(&KeyInput::new(Key::Escape), &row), EditorResponse::Ignored));

        let view = session.render(&row);
        assert_eq!(view.kind, NodeKind::Editor);
        assert_eq!(view.children[0].text.as_ref().map(AsRef::<str>::as_ref), Some("z"));
        assert_eq!(view.text_content(), "za");
    }
}
