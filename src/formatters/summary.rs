//! The summary shown at a group header's anchor column: disclosure
//! triangle, grouped field name, and the group key.

use crate::column::{GroupFormatter, GroupFormatterProps};
use crate::view::{NodeKind, ViewNode};

const TITLE_FONT_SIZE: f32 = 11.;
const VALUE_FONT_SIZE: f32 = 14.;

pub struct SummaryFormatter;

impl<R> GroupFormatter<R> for SummaryFormatter {
    fn format(&self, props: &GroupFormatterProps<'_, R>) -> ViewNode {
        let indent = props.group_column_index as f32;
        let group = props.group;

        let mut disclosure = ViewNode::new(NodeKind::Disclosure).with_style(|style| {
            style.rotation_deg = Some(if group.is_expanded { 270. } else { 0. });
            style.pointer_cursor = true;
        });
        disclosure.aria.hidden = true;

        let title = ViewNode::text(group.field.clone()).with_style(|style| {
            style.font_size_px = Some(TITLE_FONT_SIZE);
        });
        let value = ViewNode::text(group.display_key()).with_style(|style| {
            style.font_size_px = Some(VALUE_FONT_SIZE);
        });
        let label = ViewNode::container()
            .with_style(|style| style.absolute_left_rem = Some(indent + 1.))
            .child(title)
            .child(value);

        let mut content = ViewNode::container()
            .with_style(|style| style.padding_left_rem = Some(indent))
            .child(disclosure)
            .child(label);
        // focusable by script only; Enter on it toggles the group
        content.tab_index = Some(-1);
        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::GroupRow;
    use crate::test_support::{Person, columns};

    fn summary(group: &GroupRow<Person>) -> ViewNode {
        let columns = columns(1);
        SummaryFormatter.format(&GroupFormatterProps {
            column: &columns[0],
            group,
            group_column_index: group.level,
            is_cell_selected: false,
        })
    }

    #[test]
    fn shows_field_and_key() {
        let group = GroupRow::new("g1", "team", Some("core".into()), 2);
        let node = summary(&group);
        assert_eq!(node.text_content(), "teamcore");
        assert_eq!(node.style.padding_left_rem, Some(2.));
        let label = &node.children[1];
        assert_eq!(label.style.absolute_left_rem, Some(3.));
        assert_eq!(label.children[0].style.font_size_px, Some(11.));
        assert_eq!(label.children[1].style.font_size_px, Some(14.));
    }

    #[test]
    fn null_key_reads_empty() {
        let group = GroupRow::new("g1", "team", None, 3);
        assert!(summary(&group).text_content().ends_with("(Empty)"));
    }

    #[test]
    fn disclosure_rotates_with_expand_state() {
        let collapsed = GroupRow::new("g1", "team", None, 1);
        let expanded = GroupRow::new("g1", "team", None, 1).expanded(true);
        let rotation = |node: &ViewNode| node.children[0].style.rotation_deg;
        assert_eq!(rotation(&summary(&collapsed)), Some(0.));
        assert_eq!(rotation(&summary(&expanded)), Some(270.));
    }
}
