//! Banding colors for nested row groups.
//!
//! Three shades run from darkest (outermost group, index 1) to lightest
//! (innermost, index 3). The offsets below are a fixed table: a 2-level and a
//! 3-level grouping anchor their summary cell at different relative depths,
//! and span strips sit one level shallower than the content they bridge.

use gpui::{Rgba, rgb};

use crate::state::MAX_GROUP_DEPTH;
use crate::theme::{BAND_SHADES, TABLE_FALLBACK};

/// Which surface a band color is painted on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BandVariant {
    /// The cell body itself.
    Content,
    /// Connector strips drawn behind the anchor cell.
    Span,
    /// Table-wide background behind filler cells of a group header row.
    Table,
}

/// Shade at a 1-based nesting index, if the index is in the table.
pub fn shade(index: usize) -> Option<Rgba> {
    index
        .checked_sub(1)
        .and_then(|i| BAND_SHADES.get(i))
        .map(|&hex| rgb(hex))
}

pub fn lightest() -> Rgba {
    rgb(BAND_SHADES[MAX_GROUP_DEPTH - 1])
}

pub fn darkest() -> Rgba {
    rgb(BAND_SHADES[0])
}

pub fn band_color(group_length: usize, group_column_index: usize, variant: BandVariant) -> Rgba {
    match variant {
        BandVariant::Table => shade(group_column_index).unwrap_or_else(|| rgb(TABLE_FALLBACK)),
        BandVariant::Content | BandVariant::Span => {
            let is_span = variant == BandVariant::Span;
            let index = match group_length {
                2 if is_span => Some(group_column_index),
                2 => group_column_index.checked_add(1),
                3 if is_span => group_column_index.checked_sub(1),
                3 => Some(group_column_index),
                _ => Some(MAX_GROUP_DEPTH),
            };
            index.and_then(shade).unwrap_or_else(lightest)
        }
    }
}

/// A 1 rem wide strip drawn to the left of the anchor cell, bridging one
/// enclosing group level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectorStrip {
    pub level: usize,
    pub left_rem: f32,
    pub color: Rgba,
}

/// Strips for the anchor cell: none below two levels, one at two, two at three.
pub fn connector_strips(group_length: usize) -> Vec<ConnectorStrip> {
    if !(2..=MAX_GROUP_DEPTH).contains(&group_length) {
        return Vec::new();
    }
    (1..group_length)
        .map(|level| ConnectorStrip {
            level,
            left_rem: -((group_length - level) as f32),
            // span strips are read one column deeper at three levels
            color: band_color(group_length, level + group_length - 2, BandVariant::Span),
        })
        .collect()
}
