//! Placeholder document viewer
//!
//! The viewport is handed a document reference but never looks at it: every
//! document renders the same sample page. Zoom scales the page width and
//! rewraps the text; a quarter turn lays the page out in landscape.

use crossterm::event::{KeyCode, KeyEvent};
use log::debug;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::theme::Base16Palette;
use crate::viewer::{ViewerState, coerce_page_input};

/// Page width in columns at 100% zoom.
pub const BASE_PAGE_WIDTH: f32 = 60.0;
/// Long side over short side of an A4 sheet.
const LANDSCAPE_RATIO: f32 = 1.41;
const NBSP: char = '\u{a0}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLineKind {
    Title,
    Subtitle,
    Heading,
    Subheading,
    Body,
    Note,
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLine {
    pub kind: PageLineKind,
    pub text: String,
}

struct Highlight {
    phrase: &'static str,
    note: &'static str,
}

enum PageBlock {
    Title(&'static str),
    Subtitle(&'static str),
    Heading(&'static str),
    Subheading(&'static str),
    Paragraph(&'static str),
}

const SAMPLE_PAGE: [PageBlock; 7] = [
    PageBlock::Title("Research Paper: AI-Powered Document Analysis"),
    PageBlock::Subtitle("A comprehensive study on semantic document understanding"),
    PageBlock::Heading("1. Introduction"),
    PageBlock::Paragraph(
        "The field of artificial intelligence has revolutionized how we process and \
         understand documents. Modern approaches to natural language processing enable \
         sophisticated analysis of textual content.",
    ),
    PageBlock::Paragraph(
        "This research explores the intersection of semantic analysis and document \
         understanding, presenting a novel framework for extracting meaningful insights \
         from unstructured text.",
    ),
    PageBlock::Subheading("1.1 Objectives"),
    PageBlock::Paragraph(
        "Our primary objectives include developing robust algorithms for content \
         extraction and implementing real-time processing capabilities for large-scale \
         document analysis.",
    ),
];

const HIGHLIGHTS: [Highlight; 4] = [
    Highlight {
        phrase: "artificial intelligence",
        note: "Related to: Machine Learning, Page 5",
    },
    Highlight {
        phrase: "natural language processing",
        note: "Connected concept: NLP Framework",
    },
    Highlight {
        phrase: "semantic analysis",
        note: "See also: Page 12, Methodology",
    },
    Highlight {
        phrase: "content extraction",
        note: "Cross-reference: Results, Page 15",
    },
];

/// Lay out the sample page for a given inner width.
///
/// Highlighted phrases stay on one line unless the page is narrower than
/// the phrase itself.
pub fn layout_page(width: usize) -> Vec<PageLine> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for block in SAMPLE_PAGE.iter() {
        match block {
            PageBlock::Title(text) => push_wrapped(PageLineKind::Title, text, width, &mut lines),
            PageBlock::Subtitle(text) => {
                push_wrapped(PageLineKind::Subtitle, text, width, &mut lines);
                lines.push(blank());
            }
            PageBlock::Heading(text) => push_wrapped(PageLineKind::Heading, text, width, &mut lines),
            PageBlock::Subheading(text) => {
                push_wrapped(PageLineKind::Subheading, text, width, &mut lines)
            }
            PageBlock::Paragraph(text) => {
                push_wrapped(PageLineKind::Body, text, width, &mut lines);
                lines.push(blank());
            }
        }
    }

    for highlight in HIGHLIGHTS.iter() {
        let note = format!("* {}: {}", highlight.phrase, highlight.note);
        push_wrapped(PageLineKind::Note, &note, width, &mut lines);
    }

    lines
}

fn push_wrapped(kind: PageLineKind, text: &str, width: usize, lines: &mut Vec<PageLine>) {
    let glued = glue_highlights(text);
    for line in textwrap::wrap(&glued, width) {
        lines.push(PageLine {
            kind,
            text: line.replace(NBSP, " "),
        });
    }
}

fn blank() -> PageLine {
    PageLine {
        kind: PageLineKind::Blank,
        text: String::new(),
    }
}

fn glue_highlights(text: &str) -> String {
    HIGHLIGHTS.iter().fold(text.to_string(), |acc, h| {
        acc.replace(h.phrase, &h.phrase.replace(' ', &NBSP.to_string()))
    })
}

/// Split a body line into plain and highlighted runs.
fn highlight_spans(text: &str, plain: Style, marked: Style) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut rest = text;
    loop {
        let next = HIGHLIGHTS
            .iter()
            .filter_map(|h| rest.find(h.phrase).map(|idx| (idx, h.phrase.len())))
            .min_by_key(|(idx, _)| *idx);
        match next {
            Some((idx, len)) => {
                if idx > 0 {
                    spans.push(Span::styled(rest[..idx].to_string(), plain));
                }
                spans.push(Span::styled(rest[idx..idx + len].to_string(), marked));
                rest = &rest[idx + len..];
            }
            None => {
                if !rest.is_empty() {
                    spans.push(Span::styled(rest.to_string(), plain));
                }
                return spans;
            }
        }
    }
}

pub struct DocumentViewport {
    reference: String,
    pub state: ViewerState,
    page_input: Option<String>,
}

impl DocumentViewport {
    pub fn new(reference: impl Into<String>, total_pages: u32) -> Self {
        Self {
            reference: reference.into(),
            state: ViewerState::new(total_pages),
            page_input: None,
        }
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Point the viewport at another document; the view state carries over.
    pub fn set_reference(&mut self, reference: impl Into<String>) {
        self.reference = reference.into();
    }

    pub fn is_page_input_active(&self) -> bool {
        self.page_input.is_some()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if let Some(input) = self.page_input.as_mut() {
            match key.code {
                KeyCode::Esc => self.page_input = None,
                KeyCode::Enter => {
                    let page = coerce_page_input(input);
                    debug!("Page input {input:?} -> {page}");
                    self.state.set_page(page);
                    self.page_input = None;
                }
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Char(c) if c.is_ascii_digit() => input.push(c),
                KeyCode::Char('-') if input.is_empty() => input.push('-'),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('+') | KeyCode::Char('=') => self.state.zoom_in(),
            KeyCode::Char('-') => self.state.zoom_out(),
            KeyCode::Char('r') => self.state.rotate(),
            KeyCode::Char('j') | KeyCode::Down | KeyCode::PageDown => self.state.next_page(),
            KeyCode::Char('k') | KeyCode::Up | KeyCode::PageUp => self.state.previous_page(),
            KeyCode::Char('p') => self.page_input = Some(String::new()),
            _ => {}
        }
    }

    /// Page box size in cells for the current zoom and rotation.
    pub fn page_width(&self, available: u16) -> u16 {
        let mut width = BASE_PAGE_WIDTH * self.state.zoom;
        if self.state.is_landscape() {
            width *= LANDSCAPE_RATIO;
        }
        (width.round() as u16).clamp(1, available.max(1))
    }

    pub fn render(&self, f: &mut Frame, area: Rect, is_focused: bool, palette: &Base16Palette) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(3)])
            .split(area);

        self.render_toolbar(f, rows[0], is_focused, palette);
        self.render_page(f, rows[1], palette);
    }

    fn render_toolbar(&self, f: &mut Frame, area: Rect, is_focused: bool, palette: &Base16Palette) {
        let (text_color, border_color, _bg) = palette.get_panel_colors(is_focused);
        let button = Style::default().fg(palette.base_00).bg(palette.base_04);
        let separator = Span::styled("  │  ", Style::default().fg(palette.base_02));

        let page_field = match &self.page_input {
            Some(input) => Span::styled(
                format!(" {input}█ "),
                Style::default().fg(palette.base_07).bg(palette.base_02),
            ),
            None => Span::styled(
                format!(" {} ", self.state.current_page),
                Style::default().fg(text_color).bg(palette.base_01),
            ),
        };

        let toolbar = Paragraph::new(Line::from(vec![
            Span::raw(" "),
            Span::styled(" - ", button),
            Span::styled(
                format!(" {:>4}% ", self.state.zoom_percent()),
                Style::default().fg(text_color),
            ),
            Span::styled(" + ", button),
            separator.clone(),
            Span::styled(" ⟳ ", button),
            Span::styled(
                format!(" {}°", self.state.rotation),
                Style::default().fg(text_color),
            ),
            separator.clone(),
            Span::styled("Page ", Style::default().fg(palette.base_03)),
            page_field,
            Span::styled(
                format!(" of {}", self.state.total_pages),
                Style::default().fg(palette.base_03),
            ),
            separator,
            Span::styled("Share  Download", Style::default().fg(palette.base_03)),
        ]))
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(border_color)),
        );
        f.render_widget(toolbar, area);
    }

    fn render_page(&self, f: &mut Frame, area: Rect, palette: &Base16Palette) {
        let width = self.page_width(area.width);
        let page_area = Rect {
            x: area.x + area.width.saturating_sub(width) / 2,
            y: area.y,
            width,
            height: area.height,
        };
        f.render_widget(Clear, page_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(palette.base_03))
            .title_bottom(
                Line::from(format!(" Page {} ", self.state.current_page)).right_aligned(),
            )
            .style(Style::default().bg(palette.base_07).fg(palette.base_00));
        let inner = block.inner(page_area);
        f.render_widget(block, page_area);

        let text_area = Rect {
            x: inner.x + 1,
            width: inner.width.saturating_sub(2),
            ..inner
        };
        let body = Style::default().fg(palette.base_00);
        let marked = Style::default()
            .fg(palette.base_0e)
            .add_modifier(Modifier::UNDERLINED);

        let lines: Vec<Line> = layout_page(text_area.width as usize)
            .into_iter()
            .map(|line| match line.kind {
                PageLineKind::Title => Line::from(Span::styled(
                    line.text,
                    body.add_modifier(Modifier::BOLD),
                )),
                PageLineKind::Subtitle | PageLineKind::Note => {
                    Line::from(Span::styled(line.text, Style::default().fg(palette.base_03)))
                }
                PageLineKind::Heading | PageLineKind::Subheading => Line::from(Span::styled(
                    line.text,
                    body.add_modifier(Modifier::BOLD),
                )),
                PageLineKind::Body => Line::from(highlight_spans(&line.text, body, marked)),
                PageLineKind::Blank => Line::from(""),
            })
            .collect();

        f.render_widget(Paragraph::new(lines).alignment(Alignment::Left), text_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::empty())
    }

    fn code(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    #[test]
    fn test_layout_respects_width() {
        for width in [20, 35, 58, 120] {
            for line in layout_page(width) {
                assert!(
                    line.text.chars().count() <= width,
                    "{:?} wider than {width}",
                    line.text
                );
            }
        }
    }

    #[test]
    fn test_highlighted_phrases_stay_on_one_line() {
        let lines = layout_page(30);
        let body: Vec<&str> = lines
            .iter()
            .filter(|l| l.kind == PageLineKind::Body)
            .map(|l| l.text.as_str())
            .collect();
        for highlight in HIGHLIGHTS.iter() {
            assert!(
                body.iter().any(|l| l.contains(highlight.phrase)),
                "{} was split",
                highlight.phrase
            );
        }
    }

    #[test]
    fn test_highlight_spans_mark_phrases() {
        let plain = Style::default();
        let marked = Style::default().add_modifier(Modifier::UNDERLINED);
        let spans = highlight_spans("The field of artificial intelligence has", plain, marked);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[1].content, "artificial intelligence");
        assert_eq!(spans[1].style, marked);
    }

    #[test]
    fn test_reference_does_not_change_layout() {
        let a = DocumentViewport::new("a.pdf", 24);
        let b = DocumentViewport::new("https://example.com/other.pdf", 24);
        assert_eq!(a.page_width(200), b.page_width(200));
        assert_eq!(layout_page(40), layout_page(40));
    }

    #[test]
    fn test_zoom_and_rotation_scale_page() {
        let mut viewport = DocumentViewport::new("doc", 24);
        assert_eq!(viewport.page_width(200), 60);
        viewport.handle_key(key('+'));
        assert_eq!(viewport.page_width(200), 75);
        viewport.handle_key(key('-'));
        viewport.handle_key(key('r'));
        assert_eq!(viewport.page_width(200), 85);
        assert_eq!(viewport.page_width(40), 40);
    }

    #[test]
    fn test_page_prompt_sets_page_verbatim() {
        let mut viewport = DocumentViewport::new("doc", 24);
        viewport.handle_key(key('p'));
        assert!(viewport.is_page_input_active());
        for c in "-5".chars() {
            viewport.handle_key(key(c));
        }
        viewport.handle_key(code(KeyCode::Enter));
        assert!(!viewport.is_page_input_active());
        assert_eq!(viewport.state.current_page, -5);
    }

    #[test]
    fn test_page_prompt_ignores_letters_and_coerces_empty() {
        let mut viewport = DocumentViewport::new("doc", 24);
        viewport.handle_key(key('p'));
        viewport.handle_key(key('x'));
        viewport.handle_key(key('4'));
        viewport.handle_key(key('-'));
        viewport.handle_key(key('0'));
        viewport.handle_key(code(KeyCode::Enter));
        assert_eq!(viewport.state.current_page, 40);

        viewport.handle_key(key('p'));
        viewport.handle_key(code(KeyCode::Enter));
        assert_eq!(viewport.state.current_page, 0);
    }

    #[test]
    fn test_page_prompt_escape_keeps_page() {
        let mut viewport = DocumentViewport::new("doc", 24);
        viewport.handle_key(key('p'));
        viewport.handle_key(key('9'));
        viewport.handle_key(code(KeyCode::Esc));
        assert_eq!(viewport.state.current_page, 1);
    }

    #[test]
    fn test_set_reference_keeps_view_state() {
        let mut viewport = DocumentViewport::new("a.pdf", 24);
        viewport.handle_key(key('+'));
        viewport.handle_key(key('j'));
        viewport.set_reference("b.pdf");
        assert_eq!(viewport.reference(), "b.pdf");
        assert_eq!(viewport.state.zoom_percent(), 125);
        assert_eq!(viewport.state.current_page, 2);
    }
}
