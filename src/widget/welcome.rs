use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::theme::Base16Palette;
use crate::upload::ACCEPT_HINT;

pub enum WelcomeAction {
    /// The picker was confirmed with this raw path text.
    Pick(String),
}

struct Feature {
    title: &'static str,
    description: &'static str,
}

const FEATURES: [Feature; 3] = [
    Feature {
        title: "Smart Document Structure",
        description: "Automatically extract hierarchical outlines and navigate through H1/H2/H3 sections with ease.",
    },
    Feature {
        title: "Semantic Intelligence",
        description: "AI-powered analysis links related concepts across documents and highlights key insights.",
    },
    Feature {
        title: "Interactive Experience",
        description: "Transform static PDFs into dynamic, searchable, and interconnected knowledge bases.",
    },
];

/// Landing screen with the upload area and the file picker prompt.
#[derive(Default)]
pub struct WelcomeScreen {
    picker_input: Option<String>,
}

impl WelcomeScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_picker_open(&self) -> bool {
        self.picker_input.is_some()
    }

    pub fn picker_input(&self) -> Option<&str> {
        self.picker_input.as_deref()
    }

    pub fn open_picker(&mut self) {
        self.picker_input = Some(String::new());
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<WelcomeAction> {
        let Some(input) = self.picker_input.as_mut() else {
            if key.code == KeyCode::Char('o') {
                self.open_picker();
            }
            return None;
        };

        match key.code {
            KeyCode::Esc => {
                self.picker_input = None;
                None
            }
            KeyCode::Enter => self.picker_input.take().map(WelcomeAction::Pick),
            KeyCode::Backspace => {
                input.pop();
                None
            }
            KeyCode::Char(c) => {
                input.push(c);
                None
            }
            _ => None,
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, palette: &Base16Palette, drag_active: bool) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6),
                Constraint::Length(9),
                Constraint::Min(6),
                Constraint::Length(1),
            ])
            .split(area);

        let hero = Paragraph::new(vec![
            Line::from(Span::styled(
                "◆ AI-Powered Document Analysis",
                Style::default().fg(palette.base_0d),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Transform PDFs into Intelligent Documents",
                Style::default()
                    .fg(palette.base_07)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Upload your PDF and watch it come alive with interactive outlines, \
                 semantic connections, and AI-powered insights.",
                Style::default().fg(palette.base_04),
            )),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        f.render_widget(hero, rows[0]);

        self.render_upload_area(f, rows[1], palette, drag_active);
        render_features(f, rows[2], palette);

        let footer = Paragraph::new(Line::from(Span::styled(
            "Built for the future of document intelligence",
            Style::default().fg(palette.base_03),
        )))
        .alignment(Alignment::Center);
        f.render_widget(footer, rows[3]);

        if let Some(input) = &self.picker_input {
            render_picker(f, area, palette, input);
        }
    }

    fn render_upload_area(
        &self,
        f: &mut Frame,
        area: Rect,
        palette: &Base16Palette,
        drag_active: bool,
    ) {
        let (border_color, heading) = if drag_active {
            (palette.base_0d, "Drop your PDF here")
        } else {
            (palette.base_03, "Upload your PDF document")
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .style(Style::default().bg(palette.base_00));

        let upload = Paragraph::new(vec![
            Line::from(Span::styled("⇪", Style::default().fg(palette.base_0d))),
            Line::from(Span::styled(
                heading,
                Style::default()
                    .fg(palette.base_07)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Drag and drop your file here, or press o to browse",
                Style::default().fg(palette.base_04),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    " Choose File (o) ",
                    Style::default().fg(palette.base_00).bg(palette.base_0d),
                ),
                Span::raw("   "),
                Span::styled(" Try Demo PDF → ", Style::default().fg(palette.base_05)),
            ]),
        ])
        .alignment(Alignment::Center)
        .block(block);

        f.render_widget(upload, area);
    }
}

fn render_features(f: &mut Frame, area: Rect, palette: &Base16Palette) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for (feature, column) in FEATURES.iter().zip(columns.iter()) {
        let card = Paragraph::new(vec![
            Line::from(Span::styled(
                feature.title,
                Style::default()
                    .fg(palette.base_0d)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                feature.description,
                Style::default().fg(palette.base_04),
            )),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.base_02)),
        );
        f.render_widget(card, *column);
    }
}

fn render_picker(f: &mut Frame, area: Rect, palette: &Base16Palette, input: &str) {
    let width = area.width.min(70);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + area.height.saturating_sub(3) / 2,
        width,
        height: 3.min(area.height),
    };
    f.render_widget(Clear, popup);

    let prompt = Paragraph::new(Line::from(vec![
        Span::styled(input.to_string(), Style::default().fg(palette.base_07)),
        Span::styled("█", Style::default().fg(palette.base_0d)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Open file (*{ACCEPT_HINT}) - Enter to upload, Esc to cancel "))
            .border_style(Style::default().fg(palette.base_0c))
            .style(Style::default().bg(palette.base_01)),
    );
    f.render_widget(prompt, popup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    #[test]
    fn test_picker_collects_path() {
        let mut screen = WelcomeScreen::new();
        assert!(screen.handle_key(key(KeyCode::Char('x'))).is_none());
        assert!(!screen.is_picker_open());

        screen.handle_key(key(KeyCode::Char('o')));
        assert!(screen.is_picker_open());
        for c in "a.pdfx".chars() {
            screen.handle_key(key(KeyCode::Char(c)));
        }
        screen.handle_key(key(KeyCode::Backspace));
        assert_eq!(screen.picker_input(), Some("a.pdf"));

        match screen.handle_key(key(KeyCode::Enter)) {
            Some(WelcomeAction::Pick(path)) => assert_eq!(path, "a.pdf"),
            None => panic!("expected a pick"),
        }
        assert!(!screen.is_picker_open());
    }

    #[test]
    fn test_picker_escape_cancels() {
        let mut screen = WelcomeScreen::new();
        screen.open_picker();
        screen.handle_key(key(KeyCode::Char('z')));
        assert!(screen.handle_key(key(KeyCode::Esc)).is_none());
        assert!(!screen.is_picker_open());
    }
}
