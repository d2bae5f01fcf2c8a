use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::theme::Base16Palette;

pub const HEADER_HEIGHT: u16 = 3;
pub const APP_TITLE: &str = "IntelliPDF";
pub const APP_TAGLINE: &str = "Intelligent Document Analysis";
const SEARCH_PLACEHOLDER: &str = "Search documents, concepts, or insights...";

/// Top bar: menu toggle, logo, cosmetic search field and action labels.
pub fn render_header(f: &mut Frame, area: Rect, palette: &Base16Palette, sidebar_collapsed: bool) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(palette.base_02))
        .style(Style::default().bg(palette.base_01));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(36),
            Constraint::Min(10),
            Constraint::Length(26),
        ])
        .split(inner);

    let menu_hint = if sidebar_collapsed { "≡ ▸" } else { "≡ ◂" };
    let brand = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(format!(" {menu_hint} "), Style::default().fg(palette.base_05)),
            Span::styled(
                " IP ",
                Style::default()
                    .fg(palette.base_00)
                    .bg(palette.base_0d)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(
                APP_TITLE,
                Style::default()
                    .fg(palette.base_0d)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            format!("          {APP_TAGLINE}"),
            Style::default().fg(palette.base_03),
        )),
    ]);
    f.render_widget(brand, columns[0]);

    // Search here is decoration; nothing reads it.
    let search = Paragraph::new(Line::from(vec![
        Span::styled("⌕ ", Style::default().fg(palette.base_03)),
        Span::styled(SEARCH_PLACEHOLDER, Style::default().fg(palette.base_03)),
    ]));
    f.render_widget(search, columns[1]);

    let actions = Paragraph::new(Line::from(vec![
        Span::styled("⇪ Upload PDF", Style::default().fg(palette.base_05)),
        Span::raw("   "),
        Span::styled("⚙ ", Style::default().fg(palette.base_05)),
        Span::styled("? help ", Style::default().fg(palette.base_03)),
    ]))
    .alignment(Alignment::Right);
    f.render_widget(actions, columns[2]);
}
