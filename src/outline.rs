//! Hierarchical document outline
//!
//! The outline is a tree of immutable value records. Which sections show
//! their children lives in a separate [`ExpansionState`], so flattening the
//! tree into display rows ([`visible_rows`]) stays a pure function of the
//! two and can be tested without a terminal.

use std::collections::BTreeSet;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState},
};
use unicode_width::UnicodeWidthStr;

use crate::theme::Base16Palette;
use crate::widget::truncate_to_width;

/// Columns of indentation added per nesting level below the top.
pub const INDENT_PER_LEVEL: usize = 2;

/// One entry in the document's table of contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineNode {
    pub id: String,
    pub title: String,
    pub level: u8,
    pub page: u32,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn leaf(id: &str, title: &str, level: u8, page: u32) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            level,
            page,
            children: Vec::new(),
        }
    }

    pub fn section(id: &str, title: &str, level: u8, page: u32, children: Vec<OutlineNode>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            level,
            page,
            children,
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Set of outline node ids whose children are currently shown.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: BTreeSet<String>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expanded<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            expanded: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Flip membership of `id`. Descendants keep their own state, so a
    /// collapsed parent remembers which children were open.
    pub fn toggle(&mut self, id: &str) {
        if !self.expanded.remove(id) {
            self.expanded.insert(id.to_string());
        }
    }
}

/// A single visible line of the outline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineRow {
    pub id: String,
    pub title: String,
    pub level: u8,
    pub page: u32,
    pub indent: usize,
    pub has_children: bool,
    pub expanded: bool,
}

impl OutlineRow {
    /// Disclosure glyph, present only for nodes with children.
    pub fn disclosure(&self) -> Option<&'static str> {
        match (self.has_children, self.expanded) {
            (false, _) => None,
            (true, true) => Some("▼"),
            (true, false) => Some("▶"),
        }
    }
}

/// Flatten the tree into the rows that are currently visible.
pub fn visible_rows(roots: &[OutlineNode], expansion: &ExpansionState) -> Vec<OutlineRow> {
    let mut rows = Vec::new();
    collect_rows(roots, expansion, &mut rows);
    rows
}

fn collect_rows(nodes: &[OutlineNode], expansion: &ExpansionState, rows: &mut Vec<OutlineRow>) {
    for node in nodes {
        let expanded = expansion.is_expanded(&node.id);
        rows.push(OutlineRow {
            id: node.id.clone(),
            title: node.title.clone(),
            level: node.level,
            page: node.page,
            indent: usize::from(node.level.saturating_sub(1)) * INDENT_PER_LEVEL,
            has_children: node.has_children(),
            expanded,
        });
        if node.has_children() && expanded {
            collect_rows(&node.children, expansion, rows);
        }
    }
}

/// Outline bundled with the sample research paper.
pub fn sample_outline() -> Vec<OutlineNode> {
    vec![
        OutlineNode::section(
            "1",
            "Introduction",
            1,
            1,
            vec![
                OutlineNode::leaf("1.1", "Overview", 2, 1),
                OutlineNode::leaf("1.2", "Objectives", 2, 2),
            ],
        ),
        OutlineNode::section(
            "2",
            "Methodology",
            1,
            3,
            vec![
                OutlineNode::leaf("2.1", "Data Collection", 2, 3),
                OutlineNode::leaf("2.2", "Analysis Framework", 2, 5),
            ],
        ),
        OutlineNode::leaf("3", "Results", 1, 7),
    ]
}

pub fn default_expansion() -> ExpansionState {
    ExpansionState::with_expanded(["1", "2"])
}

/// Cursor-driven list view over an outline.
pub struct OutlineTree {
    roots: Vec<OutlineNode>,
    expansion: ExpansionState,
    pub selected_index: usize,
    pub list_state: ListState,
}

impl OutlineTree {
    pub fn new(roots: Vec<OutlineNode>, expansion: ExpansionState) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            roots,
            expansion,
            selected_index: 0,
            list_state,
        }
    }

    pub fn sample() -> Self {
        Self::new(sample_outline(), default_expansion())
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn rows(&self) -> Vec<OutlineRow> {
        visible_rows(&self.roots, &self.expansion)
    }

    pub fn toggle(&mut self, id: &str) {
        self.expansion.toggle(id);
        self.clamp_selection();
    }

    /// The disclosure control. Leaves have none, so this does nothing on them.
    pub fn toggle_selected(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        if row.has_children {
            self.toggle(&row.id);
        }
    }

    pub fn selected_row(&self) -> Option<OutlineRow> {
        self.rows().into_iter().nth(self.selected_index)
    }

    pub fn move_selection_down(&mut self) {
        let total = self.rows().len();
        if self.selected_index + 1 < total {
            self.select(self.selected_index + 1);
        }
    }

    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.select(self.selected_index - 1);
        }
    }

    pub fn select_first(&mut self) {
        self.select(0);
    }

    pub fn select_last(&mut self) {
        let total = self.rows().len();
        self.select(total.saturating_sub(1));
    }

    fn select(&mut self, index: usize) {
        self.selected_index = index;
        self.list_state.select(Some(index));
    }

    fn clamp_selection(&mut self) {
        let total = self.rows().len();
        if self.selected_index >= total {
            self.select(total.saturating_sub(1));
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, is_focused: bool, palette: &Base16Palette) {
        let (text_color, _border_color, _bg_color) = palette.get_panel_colors(is_focused);
        let (selection_bg, selection_fg) = palette.get_selection_colors(is_focused);
        let width = area.width as usize;

        let items: Vec<ListItem> = self
            .rows()
            .iter()
            .map(|row| {
                let title_style = match row.level {
                    1 => Style::default().fg(text_color).add_modifier(Modifier::BOLD),
                    2 => Style::default().fg(text_color),
                    _ => Style::default().fg(palette.base_04),
                };
                let glyph = row.disclosure().unwrap_or(" ");
                let prefix = format!("{}{} ", " ".repeat(row.indent), glyph);
                let page = row.page.to_string();

                let title_room = width
                    .saturating_sub(prefix.width())
                    .saturating_sub(page.len() + 1);
                let title = truncate_to_width(&row.title, title_room);
                let padding = width
                    .saturating_sub(prefix.width() + title.width() + page.len())
                    .max(1);

                ListItem::new(Line::from(vec![
                    Span::styled(prefix, Style::default().fg(palette.base_0d)),
                    Span::styled(title, title_style),
                    Span::raw(" ".repeat(padding)),
                    Span::styled(page, Style::default().fg(palette.base_03)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default().bg(selection_bg).fg(selection_fg))
            .style(Style::default().bg(palette.base_00));

        f.render_stateful_widget(list, area, &mut self.list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(rows: &[OutlineRow]) -> Vec<&str> {
        rows.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_default_expansion_shows_first_two_sections() {
        let rows = visible_rows(&sample_outline(), &default_expansion());
        assert_eq!(ids(&rows), vec!["1", "1.1", "1.2", "2", "2.1", "2.2", "3"]);
    }

    #[test]
    fn test_collapsed_tree_shows_only_roots() {
        let rows = visible_rows(&sample_outline(), &ExpansionState::new());
        assert_eq!(ids(&rows), vec!["1", "2", "3"]);
        assert!(rows.iter().all(|r| !r.expanded));
    }

    #[test]
    fn test_indent_follows_level() {
        let rows = visible_rows(&sample_outline(), &default_expansion());
        assert_eq!(rows[0].indent, 0);
        assert_eq!(rows[1].indent, INDENT_PER_LEVEL);
    }

    #[test]
    fn test_disclosure_only_for_nodes_with_children() {
        let rows = visible_rows(&sample_outline(), &default_expansion());
        assert_eq!(rows[0].disclosure(), Some("▼"));
        assert_eq!(rows[1].disclosure(), None);
        assert_eq!(rows[6].disclosure(), None);

        let collapsed = visible_rows(&sample_outline(), &ExpansionState::new());
        assert_eq!(collapsed[0].disclosure(), Some("▶"));
    }

    #[test]
    fn test_toggle_twice_restores_membership() {
        let mut state = default_expansion();
        for id in ["1", "3", "unknown"] {
            let before = state.is_expanded(id);
            state.toggle(id);
            assert_ne!(state.is_expanded(id), before);
            state.toggle(id);
            assert_eq!(state.is_expanded(id), before);
        }
        assert_eq!(state, default_expansion());
    }

    #[test]
    fn test_toggle_unknown_id_is_harmless() {
        let mut state = default_expansion();
        state.toggle("42");
        assert!(state.is_expanded("42"));
        let rows = visible_rows(&sample_outline(), &state);
        assert_eq!(rows.len(), 7);
    }

    #[test]
    fn test_toggling_leaf_id_changes_nothing_visible() {
        let mut state = default_expansion();
        let before = visible_rows(&sample_outline(), &state);
        state.toggle("3");
        let after = visible_rows(&sample_outline(), &state);
        assert_eq!(ids(&before), ids(&after));
        assert_eq!(after[6].disclosure(), None);
    }

    #[test]
    fn test_collapse_keeps_descendant_state() {
        let tree = vec![OutlineNode::section(
            "a",
            "A",
            1,
            1,
            vec![OutlineNode::section(
                "a.1",
                "A1",
                2,
                1,
                vec![OutlineNode::leaf("a.1.1", "A11", 3, 2)],
            )],
        )];
        let mut state = ExpansionState::with_expanded(["a", "a.1"]);
        assert_eq!(visible_rows(&tree, &state).len(), 3);

        state.toggle("a");
        assert_eq!(ids(&visible_rows(&tree, &state)), vec!["a"]);
        assert!(state.is_expanded("a.1"));

        state.toggle("a");
        assert_eq!(visible_rows(&tree, &state).len(), 3);
    }

    #[test]
    fn test_disclosure_control_ignores_leaves() {
        let mut tree = OutlineTree::sample();
        tree.select_last();
        assert_eq!(tree.selected_row().map(|r| r.id), Some("3".to_string()));

        tree.toggle_selected();
        assert!(!tree.expansion().is_expanded("3"));
        assert_eq!(tree.expansion(), &default_expansion());
    }

    #[test]
    fn test_selection_clamped_after_collapse() {
        let mut tree = OutlineTree::sample();
        tree.select_last();
        assert_eq!(tree.selected_index, 6);

        tree.toggle("1");
        tree.toggle("2");
        assert_eq!(tree.rows().len(), 3);
        assert_eq!(tree.selected_index, 2);
    }

    #[test]
    fn test_move_selection_stays_in_bounds() {
        let mut tree = OutlineTree::sample();
        tree.move_selection_up();
        assert_eq!(tree.selected_index, 0);
        for _ in 0..20 {
            tree.move_selection_down();
        }
        assert_eq!(tree.selected_index, 6);
    }
}
