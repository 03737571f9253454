//! Cell composition and edit-commit engine for a groupable data grid.
//!
//! Renderers produce `ViewNode` trees and report interaction through the host
//! traits in [`events`]; [`render`] lowers the trees into gpui elements.

pub mod cell;
pub mod column;
pub mod edit_cell;
pub mod editors;
pub mod error;
pub mod events;
pub mod formatters;
pub mod group_cell;
pub mod outside_click;
pub mod palette;
pub mod render;
pub mod roving;
pub mod settings;
pub mod state;
pub mod style;
pub mod theme;
pub mod view;

#[cfg(test)]
mod test_support;

pub use cell::CellRenderer;
pub use column::{Column, Editor, EditorOptions, EditorResponse, EditorSession, Formatter, GroupFormatter};
pub use edit_cell::EditCell;
pub use error::SettingsError;
pub use events::{CellActions, CellEvent, CellInterceptors, EditorActions, GroupActions, KeyInput, Propagation};
pub use group_cell::GroupCellRenderer;
pub use settings::GridSettings;
pub use state::{GroupRow, GroupSpan};
pub use view::ViewNode;
