//! Cells after the anchor in a group header row continue the group's box.

use std::rc::Rc;

use gpui::rgb;

use crate::column::{GroupFormatter, GroupFormatterProps};
use crate::palette::{BandVariant, band_color};
use crate::theme::BORDER;
use crate::view::ViewNode;

/// Paints the band and the box edges; renders text only through the
/// column's own group formatter, if it has one.
pub struct FillerFormatter<R> {
    inner: Option<Rc<dyn GroupFormatter<R>>>,
}

impl<R> FillerFormatter<R> {
    pub fn new(inner: Option<Rc<dyn GroupFormatter<R>>>) -> Self {
        Self { inner }
    }
}

impl<R> GroupFormatter<R> for FillerFormatter<R> {
    fn format(&self, props: &GroupFormatterProps<'_, R>) -> ViewNode {
        let is_expanded = props.group.is_expanded;
        let mut node = ViewNode::container().with_style(|style| {
            style.background = Some(band_color(0, props.group_column_index, BandVariant::Table));
            style.border_top = Some(rgb(BORDER));
            style.border_bottom = (!is_expanded).then(|| rgb(BORDER));
        });
        node.tab_index = Some(-1);
        if let Some(inner) = &self.inner {
            node.children.push(inner.format(props));
        }
        node
    }
}
