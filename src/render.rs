//! Lowers `ViewNode` trees into gpui elements.

use gpui::prelude::FluentBuilder;
use gpui::*;

use crate::theme::Theme;
use crate::view::{NodeKind, NodeStyle, ViewNode, Width};

const CELL_PADDING_X: f32 = 8.0;
const CARET_WIDTH: f32 = 1.0;
const CORNER_RADIUS: f32 = 4.0;

/// Everything lowering needs besides the node itself.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub theme: &'a Theme,
    /// Pixels per rem.
    pub rem_size: f32,
}

impl RenderContext<'_> {
    fn rems(&self, rem: f32) -> Pixels {
        px(rem * self.rem_size)
    }
}

/// Lowers a node laid out in a track `track_width` pixels wide.
pub fn lower(node: &ViewNode, track_width: f32, cx: RenderContext<'_>) -> AnyElement {
    let style = &node.style;
    let base = match node.kind {
        NodeKind::Text => div().whitespace_nowrap().when_some(node.text.clone(), |d, text| d.child(text)),
        NodeKind::Disclosure => div().child(disclosure_glyph(style.rotation_deg)),
        NodeKind::Caret => div().w(px(CARET_WIDTH)).h(px(16.)).bg(cx.theme.text),
        NodeKind::Placeholder => div(),
        NodeKind::Editor => div().flex().flex_row().items_center().size_full().px(px(4.)).bg(cx.theme.base),
        NodeKind::Cell => div()
            .relative()
            .h_full()
            .flex()
            .flex_row()
            .items_center()
            .when(!style.no_padding_x, |d| d.px(px(CELL_PADDING_X)))
            .when(!style.overflow_visible, |d| d.overflow_hidden()),
        NodeKind::ConnectorStrip => div().top_0().h_full(),
        NodeKind::Container => div().flex().flex_row().items_center().gap(px(4.)).h_full(),
    };

    let width = match style.width {
        // sized by their content
        Width::Full if matches!(node.kind, NodeKind::Text | NodeKind::Disclosure | NodeKind::Caret | NodeKind::Editor) => None,
        Width::Full => Some(px(track_width)),
        Width::FullMinusRem(rem) => Some(px((track_width - rem * cx.rem_size).max(0.))),
        Width::Rem(rem) => Some(cx.rems(rem)),
    };
    let inner_width = width.map(f32::from).unwrap_or(track_width);

    let selected = node.kind == NodeKind::Cell && node.aria.selected == Some(true);
    apply_style(base, style, cx)
        .when_some(width, |d, w| d.w(w))
        .children(node.children.iter().map(|child| lower(child, inner_width, cx)))
        .when(selected, |d| d.child(selection_outline(cx)))
        .into_any_element()
}

fn apply_style(div: Div, style: &NodeStyle, cx: RenderContext<'_>) -> Div {
    let edge = |color: Option<Rgba>| color.filter(|c| Some(*c) != style.background);
    let top = edge(style.border_top);
    let right = edge(style.border_right);
    let bottom = edge(style.border_bottom);
    let left = edge(style.shadow_left);
    let border = right.or(bottom).or(top).or(left);

    div.when_some(style.background, |d, bg| d.bg(bg))
        .when(top.is_some(), |d| d.border_t_1())
        .when(right.is_some(), |d| d.border_r_1())
        .when(bottom.is_some(), |d| d.border_b_1())
        .when(left.is_some(), |d| d.border_l_1())
        .when_some(border, |d, color| d.border_color(color))
        .when(style.margin_left_auto, |d| d.ml_auto())
        .when_some(style.padding_left_rem, |d, rem| d.pl(cx.rems(rem)))
        .when_some(style.absolute_left_rem, |d, rem| d.absolute().left(cx.rems(rem)))
        .when_some(style.font_size_px, |d, size| d.text_size(px(size)))
        .when(style.pointer_cursor, |d| d.cursor_pointer())
        .when(style.rounded_right, |d| d.rounded_r(px(CORNER_RADIUS)))
}

/// The expand-state rotation picks between a down and a right pointing glyph.
fn disclosure_glyph(rotation_deg: Option<f32>) -> &'static str {
    match rotation_deg {
        Some(deg) if (deg - 270.).abs() < f32::EPSILON => "▾",
        _ => "▸",
    }
}

fn selection_outline(cx: RenderContext<'_>) -> Div {
    div()
        .absolute()
        .top_0()
        .left_0()
        .size_full()
        .border_2()
        .border_color(cx.theme.accent)
}
