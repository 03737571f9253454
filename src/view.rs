//! Render model produced by the cell renderers and formatters.
//!
//! A `ViewNode` tree is toolkit-agnostic; `render.rs` lowers it into gpui
//! elements.

use gpui::{Rgba, SharedString};

use crate::style::{CellPlacement, ClassList};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// A grid cell (`role="gridcell"`).
    Cell,
    /// Absolutely positioned strip bridging an enclosing group level.
    ConnectorStrip,
    Container,
    Text,
    /// Disclosure triangle; rotation follows the expand state.
    Disclosure,
    /// Stand-in content that closes a group span without formatter output.
    Placeholder,
    /// Editor surface mounted inside an edit cell.
    Editor,
    /// Text caret drawn by an editor.
    Caret,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Aria {
    pub role: Option<&'static str>,
    pub col_index: Option<usize>,
    pub col_span: Option<usize>,
    pub selected: Option<bool>,
    pub readonly: Option<bool>,
    pub hidden: bool,
}

impl Aria {
    pub fn grid_cell(column_idx: usize) -> Self {
        Self {
            role: Some("gridcell"),
            // 1-based
            col_index: Some(column_idx + 1),
            ..Self::default()
        }
    }
}

/// Width of a node relative to its track.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Width {
    #[default]
    Full,
    /// `100% - n rem`; the anchor cell leaves room for connector strips.
    FullMinusRem(f32),
    Rem(f32),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeStyle {
    pub background: Option<Rgba>,
    pub border_top: Option<Rgba>,
    pub border_right: Option<Rgba>,
    pub border_bottom: Option<Rgba>,
    /// Hairline drawn just outside the left edge.
    pub shadow_left: Option<Rgba>,
    pub width: Width,
    pub margin_left_auto: bool,
    pub overflow_visible: bool,
    pub no_padding_x: bool,
    pub padding_left_rem: Option<f32>,
    /// Absolute offset from the parent's left edge, in rem.
    pub absolute_left_rem: Option<f32>,
    pub rotation_deg: Option<f32>,
    pub font_size_px: Option<f32>,
    pub pointer_cursor: bool,
    pub rounded_right: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewNode {
    pub kind: NodeKind,
    pub aria: Aria,
    pub classes: ClassList,
    pub style: NodeStyle,
    pub placement: Option<CellPlacement>,
    pub tab_index: Option<i32>,
    pub text: Option<SharedString>,
    pub children: Vec<ViewNode>,
}

impl ViewNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            aria: Aria::default(),
            classes: ClassList::default(),
            style: NodeStyle::default(),
            placement: None,
            tab_index: None,
            text: None,
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<SharedString>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(NodeKind::Text)
        }
    }

    pub fn container() -> Self {
        Self::new(NodeKind::Container)
    }

    pub fn child(mut self, child: ViewNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = ViewNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn with_style(mut self, f: impl FnOnce(&mut NodeStyle)) -> Self {
        f(&mut self.style);
        self
    }

    /// Depth-first walk over this node and its descendants.
    pub fn descendants(&self) -> Vec<&ViewNode> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.descendants());
        }
        out
    }

    pub fn count_kind(&self, kind: NodeKind) -> usize {
        self.descendants().iter().filter(|n| n.kind == kind).count()
    }

    /// All text in document order, joined without separators.
    pub fn text_content(&self) -> String {
        self.descendants()
            .iter()
            .filter_map(|n| n.text.as_ref())
            .map(|t| t.as_ref())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_content_follows_document_order() {
        let node = ViewNode::container()
            .child(ViewNode::text("team"))
            .child(ViewNode::container().child(ViewNode::text(": core")));
        assert_eq!(node.text_content(), "team: core");
        assert_eq!(node.count_kind(NodeKind::Text), 2);
    }
}
