pub mod text;

pub use text::{TextBuffer, TextEditor};
