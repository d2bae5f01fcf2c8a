//! Semantic links panel
//!
//! Each link names a related concept, reference or data source with a
//! relevance score in `[0, 1]`, shown as a rounded percentage.

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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkCategory {
    Concept,
    Reference,
    Data,
}

impl LinkCategory {
    pub fn label(&self) -> &'static str {
        match self {
            LinkCategory::Concept => "Concept",
            LinkCategory::Reference => "Reference",
            LinkCategory::Data => "Data",
        }
    }
}

/// A related-item record shown in the insights tab.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticLink {
    pub id: String,
    pub title: String,
    pub category: LinkCategory,
    /// Relevance in `[0, 1]`.
    pub relevance: f32,
}

impl SemanticLink {
    pub fn new(id: &str, title: &str, category: LinkCategory, relevance: f32) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            category,
            relevance: relevance.clamp(0.0, 1.0),
        }
    }

    pub fn relevance_percent(&self) -> u32 {
        (self.relevance * 100.0).round() as u32
    }
}

pub fn sample_links() -> Vec<SemanticLink> {
    vec![
        SemanticLink::new("1", "Related Concepts", LinkCategory::Concept, 0.9),
        SemanticLink::new("2", "Similar Research", LinkCategory::Reference, 0.8),
        SemanticLink::new("3", "Data Correlation", LinkCategory::Data, 0.7),
    ]
}

pub struct SemanticLinkList {
    links: Vec<SemanticLink>,
    pub selected_index: usize,
    pub list_state: ListState,
}

impl SemanticLinkList {
    pub fn new(links: Vec<SemanticLink>) -> Self {
        let mut list_state = ListState::default();
        if !links.is_empty() {
            list_state.select(Some(0));
        }
        Self {
            links,
            selected_index: 0,
            list_state,
        }
    }

    pub fn sample() -> Self {
        Self::new(sample_links())
    }

    pub fn links(&self) -> &[SemanticLink] {
        &self.links
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.links.len() {
            self.selected_index += 1;
            self.list_state.select(Some(self.selected_index));
        }
    }

    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.list_state.select(Some(self.selected_index));
        }
    }

    /// Each link takes two lines: title with relevance, then category.
    pub fn render(&mut self, f: &mut Frame, area: Rect, is_focused: bool, palette: &Base16Palette) {
        let (text_color, _border_color, _bg_color) = palette.get_panel_colors(is_focused);
        let (selection_bg, selection_fg) = palette.get_selection_colors(is_focused);
        let width = area.width as usize;

        let items: Vec<ListItem> = self
            .links
            .iter()
            .map(|link| {
                let percent = format!("{}%", link.relevance_percent());
                let title = truncate_to_width(&link.title, width.saturating_sub(percent.len() + 1));
                let padding = width.saturating_sub(title.width() + percent.len()).max(1);

                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(
                            title,
                            Style::default().fg(text_color).add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(" ".repeat(padding)),
                        Span::styled(percent, Style::default().fg(palette.base_03)),
                    ]),
                    Line::from(vec![
                        Span::styled("↗ ", Style::default().fg(palette.base_0d)),
                        Span::styled(link.category.label(), Style::default().fg(palette.base_03)),
                    ]),
                ])
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

    #[test]
    fn test_relevance_percent_rounds() {
        assert_eq!(sample_links()[0].relevance_percent(), 90);
        let link = SemanticLink::new("x", "X", LinkCategory::Data, 0.456);
        assert_eq!(link.relevance_percent(), 46);
    }

    #[test]
    fn test_relevance_clamped_to_unit_range() {
        assert_eq!(SemanticLink::new("x", "X", LinkCategory::Data, 1.7).relevance, 1.0);
        assert_eq!(SemanticLink::new("x", "X", LinkCategory::Data, -0.2).relevance, 0.0);
    }

    #[test]
    fn test_selection_bounds() {
        let mut list = SemanticLinkList::sample();
        list.move_selection_up();
        assert_eq!(list.selected_index, 0);
        for _ in 0..5 {
            list.move_selection_down();
        }
        assert_eq!(list.selected_index, 2);
    }
}
