//! Navigation sidebar: tab selector, search box and the three panels.
//!
//! The search box captures text but never filters any list.

use crossterm::event::{KeyCode, KeyEvent};
use log::debug;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::inputs::KeySeq;
use crate::outline::OutlineTree;
use crate::semantic_links::SemanticLinkList;
use crate::theme::Base16Palette;
use crate::widget::truncate_to_width;

/// Width of the sidebar when expanded / collapsed to its icon strip.
pub const EXPANDED_WIDTH: u16 = 40;
pub const COLLAPSED_WIDTH: u16 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SidebarTab {
    #[default]
    Outline,
    Semantic,
    Documents,
}

impl SidebarTab {
    pub fn all() -> [SidebarTab; 3] {
        [SidebarTab::Outline, SidebarTab::Semantic, SidebarTab::Documents]
    }

    pub fn label(&self) -> &'static str {
        match self {
            SidebarTab::Outline => "Outline",
            SidebarTab::Semantic => "Insights",
            SidebarTab::Documents => "Docs",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SidebarTab::Outline => "#",
            SidebarTab::Semantic => "◆",
            SidebarTab::Documents => "▤",
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            SidebarTab::Outline => "Document Structure",
            SidebarTab::Semantic => "Semantic Connections",
            SidebarTab::Documents => "Recent Documents",
        }
    }

    /// Word used in the search placeholder.
    pub fn search_noun(&self) -> &'static str {
        match self {
            SidebarTab::Outline => "outline",
            SidebarTab::Semantic => "semantic",
            SidebarTab::Documents => "documents",
        }
    }

    fn index(&self) -> usize {
        match self {
            SidebarTab::Outline => 0,
            SidebarTab::Semantic => 1,
            SidebarTab::Documents => 2,
        }
    }

    pub fn next(&self) -> Self {
        Self::all()[(self.index() + 1) % 3]
    }

    pub fn previous(&self) -> Self {
        Self::all()[(self.index() + 2) % 3]
    }
}

/// An entry in the documents tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEntry {
    pub name: String,
    pub pages: u32,
    pub size_label: String,
    pub reference: String,
}

pub fn sample_documents() -> Vec<DocumentEntry> {
    vec![DocumentEntry {
        name: "Research Paper.pdf".to_string(),
        pages: 24,
        size_label: "2.3 MB".to_string(),
        reference: "samples/research-paper.pdf".to_string(),
    }]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarAction {
    SelectDocument(String),
}

pub struct SidebarPanel {
    tab: SidebarTab,
    search_query: String,
    search_active: bool,
    pub outline: OutlineTree,
    pub links: SemanticLinkList,
    documents: Vec<DocumentEntry>,
    selected_document: usize,
    documents_state: ListState,
}

impl Default for SidebarPanel {
    fn default() -> Self {
        Self::new(
            OutlineTree::sample(),
            SemanticLinkList::sample(),
            sample_documents(),
        )
    }
}

impl SidebarPanel {
    pub fn new(outline: OutlineTree, links: SemanticLinkList, documents: Vec<DocumentEntry>) -> Self {
        let mut documents_state = ListState::default();
        if !documents.is_empty() {
            documents_state.select(Some(0));
        }
        Self {
            tab: SidebarTab::default(),
            search_query: String::new(),
            search_active: false,
            outline,
            links,
            documents,
            selected_document: 0,
            documents_state,
        }
    }

    pub fn tab(&self) -> SidebarTab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: SidebarTab) {
        if self.tab != tab {
            debug!("Sidebar tab {:?} -> {:?}", self.tab, tab);
        }
        self.tab = tab;
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn is_search_active(&self) -> bool {
        self.search_active
    }

    pub fn documents(&self) -> &[DocumentEntry] {
        &self.documents
    }

    /// Handle a key while the sidebar has focus.
    ///
    /// When collapsed only the tab selector is reachable.
    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        collapsed: bool,
        key_seq: &mut KeySeq,
    ) -> Option<SidebarAction> {
        if self.search_active && !collapsed {
            self.handle_search_key(key);
            return None;
        }

        key_seq.push(key);
        match key.code {
            KeyCode::Char('1') => self.select_tab(SidebarTab::Outline),
            KeyCode::Char('2') => self.select_tab(SidebarTab::Semantic),
            KeyCode::Char('3') => self.select_tab(SidebarTab::Documents),
            KeyCode::Char('h') | KeyCode::Left => self.select_tab(self.tab.previous()),
            KeyCode::Char('l') | KeyCode::Right => self.select_tab(self.tab.next()),
            _ if collapsed => {}
            KeyCode::Char('/') => self.search_active = true,
            KeyCode::Char('j') | KeyCode::Down => self.move_selection_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection_up(),
            KeyCode::Char('G') => self.select_last(),
            KeyCode::Char('g') if key_seq.matches(&[KeyCode::Char('g'), KeyCode::Char('g')]) => {
                self.select_first();
                key_seq.clear();
            }
            KeyCode::Enter | KeyCode::Char(' ') => return self.activate_selected(),
            _ => {}
        }
        None
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.search_active = false,
            KeyCode::Backspace => {
                self.search_query.pop();
            }
            KeyCode::Char(c) => self.search_query.push(c),
            _ => {}
        }
    }

    fn move_selection_down(&mut self) {
        match self.tab {
            SidebarTab::Outline => self.outline.move_selection_down(),
            SidebarTab::Semantic => self.links.move_selection_down(),
            SidebarTab::Documents => {
                if self.selected_document + 1 < self.documents.len() {
                    self.select_document_row(self.selected_document + 1);
                }
            }
        }
    }

    fn move_selection_up(&mut self) {
        match self.tab {
            SidebarTab::Outline => self.outline.move_selection_up(),
            SidebarTab::Semantic => self.links.move_selection_up(),
            SidebarTab::Documents => {
                if self.selected_document > 0 {
                    self.select_document_row(self.selected_document - 1);
                }
            }
        }
    }

    fn select_first(&mut self) {
        match self.tab {
            SidebarTab::Outline => self.outline.select_first(),
            SidebarTab::Semantic => {
                while self.links.selected_index > 0 {
                    self.links.move_selection_up();
                }
            }
            SidebarTab::Documents => self.select_document_row(0),
        }
    }

    fn select_last(&mut self) {
        match self.tab {
            SidebarTab::Outline => self.outline.select_last(),
            SidebarTab::Semantic => {
                while self.links.selected_index + 1 < self.links.links().len() {
                    self.links.move_selection_down();
                }
            }
            SidebarTab::Documents => {
                self.select_document_row(self.documents.len().saturating_sub(1))
            }
        }
    }

    fn select_document_row(&mut self, index: usize) {
        self.selected_document = index;
        self.documents_state.select(Some(index));
    }

    fn activate_selected(&mut self) -> Option<SidebarAction> {
        match self.tab {
            SidebarTab::Outline => {
                self.outline.toggle_selected();
                None
            }
            SidebarTab::Semantic => None,
            SidebarTab::Documents => self
                .documents
                .get(self.selected_document)
                .map(|doc| SidebarAction::SelectDocument(doc.reference.clone())),
        }
    }

    pub fn render(
        &mut self,
        f: &mut Frame,
        area: Rect,
        is_focused: bool,
        collapsed: bool,
        palette: &Base16Palette,
        current_document: Option<&str>,
    ) {
        let (_text_color, border_color, _bg_color) = palette.get_panel_colors(is_focused);
        let block = Block::default()
            .borders(Borders::RIGHT)
            .border_style(Style::default().fg(border_color))
            .style(Style::default().bg(palette.base_00));
        let inner = block.inner(area);
        f.render_widget(block, area);

        if collapsed {
            self.render_icon_strip(f, inner, palette);
            return;
        }

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Min(1),
            ])
            .split(inner);

        self.render_tab_bar(f, rows[0], palette);
        self.render_search(f, rows[1], palette);

        let heading = Paragraph::new(Line::from(Span::styled(
            format!(" {}", self.tab.heading()),
            Style::default()
                .fg(palette.base_04)
                .add_modifier(Modifier::BOLD),
        )));
        f.render_widget(heading, rows[2]);

        let content = Rect {
            x: rows[3].x + 1,
            width: rows[3].width.saturating_sub(2),
            ..rows[3]
        };
        match self.tab {
            SidebarTab::Outline => self.outline.render(f, content, is_focused, palette),
            SidebarTab::Semantic => self.links.render(f, content, is_focused, palette),
            SidebarTab::Documents => {
                self.render_documents(f, content, is_focused, palette, current_document)
            }
        }
    }

    fn tab_style(&self, tab: SidebarTab, palette: &Base16Palette) -> Style {
        if tab == self.tab {
            Style::default()
                .fg(palette.base_07)
                .bg(palette.base_02)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.base_03)
        }
    }

    fn render_icon_strip(&self, f: &mut Frame, area: Rect, palette: &Base16Palette) {
        let mut lines = vec![Line::from("")];
        for tab in SidebarTab::all() {
            lines.push(Line::from(Span::styled(
                format!(" {} ", tab.icon()),
                self.tab_style(tab, palette),
            )));
            lines.push(Line::from(""));
        }
        f.render_widget(Paragraph::new(lines), area);
    }

    fn render_tab_bar(&self, f: &mut Frame, area: Rect, palette: &Base16Palette) {
        let mut spans = vec![Span::raw(" ")];
        for tab in SidebarTab::all() {
            spans.push(Span::styled(
                format!(" {} {} ", tab.icon(), tab.label()),
                self.tab_style(tab, palette),
            ));
            spans.push(Span::raw(" "));
        }
        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_search(&self, f: &mut Frame, area: Rect, palette: &Base16Palette) {
        let border = if self.search_active {
            palette.base_0d
        } else {
            palette.base_02
        };
        let text = if self.search_query.is_empty() && !self.search_active {
            Span::styled(
                format!("Search {}...", self.tab.search_noun()),
                Style::default().fg(palette.base_03),
            )
        } else {
            Span::styled(self.search_query.clone(), Style::default().fg(palette.base_07))
        };
        let mut spans = vec![Span::styled("⌕ ", Style::default().fg(palette.base_03)), text];
        if self.search_active {
            spans.push(Span::styled("█", Style::default().fg(palette.base_0d)));
        }

        let search = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );
        let area = Rect {
            x: area.x + 1,
            width: area.width.saturating_sub(2),
            ..area
        };
        f.render_widget(search, area);
    }

    fn render_documents(
        &mut self,
        f: &mut Frame,
        area: Rect,
        is_focused: bool,
        palette: &Base16Palette,
        current_document: Option<&str>,
    ) {
        let (text_color, _border_color, _bg_color) = palette.get_panel_colors(is_focused);
        let (selection_bg, selection_fg) = palette.get_selection_colors(is_focused);
        let width = area.width as usize;

        let items: Vec<ListItem> = self
            .documents
            .iter()
            .map(|doc| {
                let is_open = current_document == Some(doc.reference.as_str());
                let marker = if is_open { "▶ " } else { "▤ " };
                let name = truncate_to_width(&doc.name, width.saturating_sub(marker.width()));
                let name_style = if is_open {
                    Style::default().fg(palette.base_08).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(text_color).add_modifier(Modifier::BOLD)
                };
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(marker, Style::default().fg(palette.base_0d)),
                        Span::styled(name, name_style),
                    ]),
                    Line::from(Span::styled(
                        format!("  {} pages • {}", doc.pages, doc.size_label),
                        Style::default().fg(palette.base_03),
                    )),
                ])
            })
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default().bg(selection_bg).fg(selection_fg))
            .style(Style::default().bg(palette.base_00));

        f.render_stateful_widget(list, area, &mut self.documents_state);
    }
}
