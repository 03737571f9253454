//! Roving tab index: only the selected cell sits in the tab order.

/// What a cell needs from the focus manager for one render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RovingCell {
    pub tab_index: i32,
    /// The cell should take DOM/window focus once mounted.
    pub wants_focus: bool,
}

pub trait RovingFocus {
    fn cell(&self, is_selected: bool) -> RovingCell;
}

/// The grid keeps focus on the selected cell unless one of the cell's
/// children already holds it.
#[derive(Clone, Copy, Debug, Default)]
pub struct RovingTabIndex {
    pub child_focused: bool,
}

impl RovingFocus for RovingTabIndex {
    fn cell(&self, is_selected: bool) -> RovingCell {
        RovingCell {
            tab_index: if is_selected && !self.child_focused { 0 } else { -1 },
            wants_focus: is_selected && !self.child_focused,
        }
    }
}
