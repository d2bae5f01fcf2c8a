use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, info};
use ratatui::{
    Frame, Terminal,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::document_viewport::DocumentViewport;
use crate::event_source::EventSource;
use crate::inputs::KeySeq;
use crate::settings;
use crate::sidebar::{COLLAPSED_WIDTH, EXPANDED_WIDTH, SidebarAction, SidebarPanel};
use crate::theme::{Base16Palette, current_theme};
use crate::upload::{FileHandle, UploadEvent, UploadGate, UploadHandler, parse_dropped_paths};
use crate::widget::header::{HEADER_HEIGHT, render_header};
use crate::widget::help_popup::{HelpPopup, HelpPopupAction};
use crate::widget::welcome::{WelcomeAction, WelcomeScreen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum FocusedPanel {
    Main(MainPanel),
    Popup(PopupWindow),
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum MainPanel {
    Sidebar,
    Content,
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum PopupWindow {
    Help,
}

/// Startup options for the shell.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub total_pages: u32,
    pub sidebar_collapsed: bool,
    pub initial_document: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            total_pages: crate::viewer::ViewerState::DEFAULT_TOTAL_PAGES,
            sidebar_collapsed: false,
            initial_document: None,
        }
    }
}

impl AppConfig {
    pub fn from_settings() -> Self {
        Self {
            total_pages: settings::get_total_pages(),
            sidebar_collapsed: settings::is_sidebar_collapsed(),
            initial_document: None,
        }
    }
}

/// The application shell: header, sidebar and the main area.
///
/// The main area shows the welcome screen until a document is selected and
/// the viewer afterwards. There is no way back to the welcome screen.
pub struct App {
    pub sidebar: SidebarPanel,
    sidebar_collapsed: bool,
    selection: Option<String>,
    viewport: Option<DocumentViewport>,
    welcome: WelcomeScreen,
    upload_gate: UploadGate,
    pub focused_panel: FocusedPanel,
    previous_main_panel: MainPanel,
    help_popup: Option<HelpPopup>,
    key_sequence: KeySeq,
    total_pages: u32,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self::new_with_config(AppConfig::from_settings(), Box::new(crate::upload::log_upload))
    }

    #[cfg(any(test, feature = "test-utils"))]
    pub fn new_with_upload_handler(on_upload: UploadHandler) -> Self {
        Self::new_with_config(AppConfig::default(), on_upload)
    }

    pub fn new_with_config(config: AppConfig, on_upload: UploadHandler) -> Self {
        let mut app = Self {
            sidebar: SidebarPanel::default(),
            sidebar_collapsed: config.sidebar_collapsed,
            selection: None,
            viewport: None,
            welcome: WelcomeScreen::new(),
            upload_gate: UploadGate::new(on_upload),
            focused_panel: FocusedPanel::Main(MainPanel::Sidebar),
            previous_main_panel: MainPanel::Sidebar,
            help_popup: None,
            key_sequence: KeySeq::new(),
            total_pages: config.total_pages,
        };
        if let Some(reference) = config.initial_document {
            app.select_document(reference);
        }
        app
    }

    pub fn is_sidebar_collapsed(&self) -> bool {
        self.sidebar_collapsed
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_collapsed = !self.sidebar_collapsed;
        debug!("Sidebar collapsed: {}", self.sidebar_collapsed);
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn viewport(&self) -> Option<&DocumentViewport> {
        self.viewport.as_ref()
    }

    pub fn upload_gate(&self) -> &UploadGate {
        &self.upload_gate
    }

    /// Switch the main area to the viewer for `reference`.
    pub fn select_document(&mut self, reference: impl Into<String>) {
        let reference = reference.into();
        info!("Selected document: {reference}");
        match self.viewport.as_mut() {
            Some(viewport) => viewport.set_reference(reference.clone()),
            None => self.viewport = Some(DocumentViewport::new(reference.clone(), self.total_pages)),
        }
        self.selection = Some(reference);
        self.set_main_panel_focus(MainPanel::Content);
    }

    pub fn is_main_panel(&self, panel: MainPanel) -> bool {
        self.focused_panel == FocusedPanel::Main(panel)
    }

    pub fn set_main_panel_focus(&mut self, panel: MainPanel) {
        self.focused_panel = FocusedPanel::Main(panel);
    }

    pub fn has_active_popup(&self) -> bool {
        matches!(self.focused_panel, FocusedPanel::Popup(_))
    }

    fn open_help(&mut self) {
        if let FocusedPanel::Main(panel) = self.focused_panel {
            self.previous_main_panel = panel;
        }
        self.help_popup = Some(HelpPopup::new());
        self.focused_panel = FocusedPanel::Popup(PopupWindow::Help);
    }

    fn close_help(&mut self) {
        self.help_popup = None;
        self.focused_panel = FocusedPanel::Main(self.previous_main_panel);
    }

    /// True while a text field owns the keyboard.
    fn text_input_active(&self) -> bool {
        match self.focused_panel {
            FocusedPanel::Main(MainPanel::Sidebar) => {
                !self.sidebar_collapsed && self.sidebar.is_search_active()
            }
            FocusedPanel::Main(MainPanel::Content) => match &self.viewport {
                Some(viewport) => viewport.is_page_input_active(),
                None => self.welcome.is_picker_open(),
            },
            FocusedPanel::Popup(_) => false,
        }
    }

    pub fn handle_event(&mut self, event: Event) -> Option<AppAction> {
        match event {
            Event::Key(key) => self.handle_key_event(key),
            Event::Paste(text) => {
                self.handle_paste(&text);
                None
            }
            _ => None,
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<AppAction> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            return Some(AppAction::Quit);
        }

        if self.has_active_popup() {
            let action = self
                .help_popup
                .as_mut()
                .and_then(|popup| popup.handle_key(key, &mut self.key_sequence));
            if let Some(HelpPopupAction::Close) = action {
                self.close_help();
            }
            return None;
        }

        if self.text_input_active() {
            self.route_to_focused_panel(key);
            return None;
        }

        match key.code {
            KeyCode::Char('q') => return Some(AppAction::Quit),
            KeyCode::Char('b') if ctrl => self.toggle_sidebar(),
            KeyCode::Char('m') => self.toggle_sidebar(),
            KeyCode::Char('?') => self.open_help(),
            KeyCode::Tab => {
                let next = if self.is_main_panel(MainPanel::Sidebar) {
                    MainPanel::Content
                } else {
                    MainPanel::Sidebar
                };
                self.set_main_panel_focus(next);
            }
            _ => self.route_to_focused_panel(key),
        }
        None
    }

    fn route_to_focused_panel(&mut self, key: KeyEvent) {
        match self.focused_panel {
            FocusedPanel::Main(MainPanel::Sidebar) => {
                let action =
                    self.sidebar
                        .handle_key(key, self.sidebar_collapsed, &mut self.key_sequence);
                if let Some(SidebarAction::SelectDocument(reference)) = action {
                    self.select_document(reference);
                }
            }
            FocusedPanel::Main(MainPanel::Content) => match self.viewport.as_mut() {
                Some(viewport) => viewport.handle_key(key),
                None => {
                    if let Some(WelcomeAction::Pick(path)) = self.welcome.handle_key(key) {
                        let path = path.trim();
                        let files = if path.is_empty() {
                            Vec::new()
                        } else {
                            vec![FileHandle::from_path(path)]
                        };
                        self.upload_gate.handle(UploadEvent::Pick(files));
                    }
                }
            },
            FocusedPanel::Popup(_) => {}
        }
    }

    /// Terminals deliver a dragged-in file as a paste of its path.
    pub fn handle_paste(&mut self, text: &str) {
        if self.viewport.is_some() {
            debug!("Ignoring paste while a document is open");
            return;
        }
        let files: Vec<FileHandle> = parse_dropped_paths(text)
            .into_iter()
            .map(FileHandle::from_path)
            .collect();
        debug!("Paste delivered {} path(s)", files.len());
        self.upload_gate.handle(UploadEvent::DragEnter);
        self.upload_gate.handle(UploadEvent::Drop(files));
    }

    pub fn draw(&mut self, f: &mut Frame) {
        let palette = current_theme();
        let area = f.area();
        f.render_widget(Block::default().style(Style::default().bg(palette.base_00)), area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);

        render_header(f, rows[0], palette, self.sidebar_collapsed);

        let sidebar_width = if self.sidebar_collapsed {
            COLLAPSED_WIDTH
        } else {
            EXPANDED_WIDTH
        };
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(sidebar_width), Constraint::Min(10)])
            .split(rows[1]);

        let sidebar_focused = self.is_main_panel(MainPanel::Sidebar);
        let content_focused = self.is_main_panel(MainPanel::Content);
        self.sidebar.render(
            f,
            columns[0],
            sidebar_focused,
            self.sidebar_collapsed,
            palette,
            self.selection.as_deref(),
        );

        match &self.viewport {
            Some(viewport) => viewport.render(f, columns[1], content_focused, palette),
            None => {
                let inner = Rect {
                    x: columns[1].x + 1,
                    width: columns[1].width.saturating_sub(2),
                    ..columns[1]
                };
                self.welcome
                    .render(f, inner, palette, self.upload_gate.is_drag_active());
            }
        }

        self.render_help_bar(f, rows[2], palette);

        if let Some(popup) = self.help_popup.as_mut() {
            popup.render(f, area, palette);
        }
    }

    fn render_help_bar(&self, f: &mut Frame, area: Rect, palette: &Base16Palette) {
        let hints = match self.focused_panel {
            FocusedPanel::Popup(_) => "j/k scroll • ?/Esc close",
            FocusedPanel::Main(MainPanel::Sidebar) if self.sidebar_collapsed => {
                "1/2/3 tab • m expand • Tab focus • ? help • q quit"
            }
            FocusedPanel::Main(MainPanel::Sidebar) => {
                "1/2/3 tab • j/k move • Enter open • / search • m collapse • Tab focus • q quit"
            }
            FocusedPanel::Main(MainPanel::Content) if self.viewport.is_some() => {
                "+/- zoom • r rotate • j/k page • p go to page • Tab focus • ? help • q quit"
            }
            FocusedPanel::Main(MainPanel::Content) => {
                "o choose file • drop a file to upload • Tab focus • ? help • q quit"
            }
        };
        let bar = Paragraph::new(Line::from(Span::styled(
            format!(" {hints}"),
            Style::default().fg(palette.base_03),
        )))
        .style(Style::default().bg(palette.base_01));
        f.render_widget(bar, area);
    }
}

pub fn run_app_with_event_source<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_source: &mut dyn EventSource,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    terminal.draw(|f| app.draw(f))?;
    loop {
        // Block for one event, then drain whatever else is queued before redrawing
        let mut events = vec![event_source.read()?];
        while events.len() < 50 && event_source.poll(Duration::from_millis(0))? {
            events.push(event_source.read()?);
        }

        for event in events {
            if app.handle_event(event) == Some(AppAction::Quit) {
                info!("Quit requested");
                return Ok(());
            }
        }

        terminal.draw(|f| app.draw(f))?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::sidebar::SidebarTab;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::empty())
    }

    fn recording_app() -> (App, Rc<RefCell<Vec<FileHandle>>>) {
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&received);
        let app = App::new_with_upload_handler(Box::new(move |f| sink.borrow_mut().push(f)));
        (app, received)
    }

    #[test]
    fn test_starts_on_welcome_screen() {
        let (app, _) = recording_app();
        assert_eq!(app.selection(), None);
        assert!(app.viewport().is_none());
        assert!(!app.is_sidebar_collapsed());
        assert!(app.is_main_panel(MainPanel::Sidebar));
    }

    #[test]
    fn test_toggle_sidebar_keys() {
        let (mut app, _) = recording_app();
        app.handle_key_event(key('m'));
        assert!(app.is_sidebar_collapsed());
        app.handle_key_event(KeyEvent::new(KeyCode::Char('b'), KeyModifiers::CONTROL));
        assert!(!app.is_sidebar_collapsed());
    }

    #[test]
    fn test_select_document_switches_to_viewer() {
        let (mut app, _) = recording_app();
        app.select_document("a.pdf");
        assert_eq!(app.selection(), Some("a.pdf"));
        assert_eq!(app.viewport().map(|v| v.reference()), Some("a.pdf"));
        assert!(app.is_main_panel(MainPanel::Content));
    }

    #[test]
    fn test_selecting_another_document_keeps_viewer_state() {
        let (mut app, _) = recording_app();
        app.select_document("a.pdf");
        app.handle_key_event(key('+'));
        app.select_document("b.pdf");
        let viewport = app.viewport().unwrap();
        assert_eq!(viewport.reference(), "b.pdf");
        assert_eq!(viewport.state.zoom_percent(), 125);
    }

    #[test]
    fn test_semantic_tab_survives_collapse() {
        let (mut app, _) = recording_app();
        app.handle_key_event(key('m'));
        app.handle_key_event(key('2'));
        app.handle_key_event(key('m'));
        assert!(!app.is_sidebar_collapsed());
        assert_eq!(app.sidebar.tab(), SidebarTab::Semantic);
    }

    #[test]
    fn test_paste_uploads_first_file_only() {
        let (mut app, received) = recording_app();
        app.handle_paste("/tmp/first.pdf /tmp/second.pdf");
        let received = received.borrow();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].name, "first.pdf");
        assert!(!app.upload_gate().is_drag_active());
        assert_eq!(app.selection(), None);
    }

    #[test]
    fn test_paste_ignored_once_viewer_open() {
        let (mut app, received) = recording_app();
        app.select_document("a.pdf");
        app.handle_paste("/tmp/first.pdf");
        assert!(received.borrow().is_empty());
    }

    #[test]
    fn test_picker_uploads_typed_path() {
        let (mut app, received) = recording_app();
        app.handle_key_event(KeyEvent::new(KeyCode::Tab, KeyModifiers::empty()));
        app.handle_key_event(key('o'));
        for c in "/tmp/q.pdf".chars() {
            app.handle_key_event(key(c));
        }
        app.handle_key_event(KeyEvent::new(KeyCode::Enter, KeyModifiers::empty()));

        let received = received.borrow();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].name, "q.pdf");
    }

    #[test]
    fn test_text_input_swallows_global_keys() {
        let (mut app, _) = recording_app();
        app.handle_key_event(key('/'));
        assert_eq!(app.handle_key_event(key('q')), None);
        app.handle_key_event(key('m'));
        assert!(!app.is_sidebar_collapsed());
        assert_eq!(app.sidebar.search_query(), "qm");
    }

    #[test]
    fn test_help_popup_restores_focus() {
        let (mut app, _) = recording_app();
        app.handle_key_event(KeyEvent::new(KeyCode::Tab, KeyModifiers::empty()));
        app.handle_key_event(key('?'));
        assert!(app.has_active_popup());
        assert_eq!(app.handle_key_event(key('q')), None);
        app.handle_key_event(KeyEvent::new(KeyCode::Esc, KeyModifiers::empty()));
        assert!(app.is_main_panel(MainPanel::Content));
    }

    #[test]
    fn test_initial_document_from_config() {
        let config = AppConfig {
            total_pages: 10,
            sidebar_collapsed: true,
            initial_document: Some("x.pdf".to_string()),
        };
        let app = App::new_with_config(config, Box::new(|_| {}));
        assert_eq!(app.selection(), Some("x.pdf"));
        assert_eq!(app.viewport().map(|v| v.state.total_pages), Some(10));
        assert!(app.is_sidebar_collapsed());
    }
}
