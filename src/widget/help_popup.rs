use crate::inputs::KeySeq;
use crate::theme::Base16Palette;
use crate::widget::content_sized_rect;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub enum HelpPopupAction {
    Close,
}

pub struct HelpPopup {
    content: &'static str,
    scroll_offset: usize,
    last_popup_area: Option<Rect>,
}

impl Default for HelpPopup {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpPopup {
    pub fn new() -> Self {
        HelpPopup {
            content: include_str!("../../readme.txt"),
            scroll_offset: 0,
            last_popup_area: None,
        }
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, palette: &Base16Palette) {
        let max_content_width = self
            .content
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(80);

        // 2 chars of margin on each side plus borders
        let desired_width = (max_content_width + 6).min(area.width as usize);

        let popup_area = content_sized_rect(desired_width as u16, 90, area);
        self.last_popup_area = Some(popup_area);

        f.render_widget(Clear, popup_area);

        let lines: Vec<Line> = self
            .content
            .lines()
            .skip(self.scroll_offset)
            .map(|line| {
                Line::from(Span::styled(
                    format!("  {line}"),
                    Style::default().fg(palette.base_05),
                ))
            })
            .collect();

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(" Help - Press ? or ESC to close ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.base_0c))
                    .style(Style::default().bg(palette.base_00)),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, popup_area);
    }

    fn max_offset(&self) -> usize {
        self.content.lines().count().saturating_sub(1)
    }

    pub fn scroll_down(&mut self) {
        if self.scroll_offset < self.max_offset() {
            self.scroll_offset += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    fn page_size(&self) -> usize {
        self.last_popup_area
            .map(|area| (area.height as usize / 2).max(1))
            .unwrap_or(10)
    }

    pub fn handle_key(&mut self, key: KeyEvent, key_seq: &mut KeySeq) -> Option<HelpPopupAction> {
        key_seq.push(key);
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_up(),
            KeyCode::Char('g') if key_seq.matches(&[KeyCode::Char('g'), KeyCode::Char('g')]) => {
                self.scroll_offset = 0;
                key_seq.clear();
            }
            KeyCode::Char('G') => self.scroll_offset = self.max_offset(),
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.scroll_offset = (self.scroll_offset + self.page_size()).min(self.max_offset());
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.scroll_offset = self.scroll_offset.saturating_sub(self.page_size());
            }
            KeyCode::Esc | KeyCode::Char('?') => return Some(HelpPopupAction::Close),
            _ => {}
        }
        None
    }
}
