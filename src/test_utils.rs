pub mod test_helpers {
    use crate::event_source::{
        Event, KeyCode, KeyEvent, KeyModifiers, ScriptStep, SimulatedEventSource,
    };
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    /// Builder for creating test scenarios with simulated user input
    #[derive(Default)]
    pub struct TestScenarioBuilder {
        steps: Vec<ScriptStep>,
    }

    impl TestScenarioBuilder {
        pub fn new() -> Self {
            Self { steps: Vec::new() }
        }

        fn push(&mut self, event: Event) {
            self.steps.push(ScriptStep::Input(event));
        }

        fn press(mut self, code: KeyCode) -> Self {
            self.push(Event::Key(KeyEvent::new(code, KeyModifiers::empty())));
            self
        }

        /// Add a character key press
        pub fn press_char(mut self, c: char) -> Self {
            self.push(SimulatedEventSource::char_key(c));
            self
        }

        /// Add a Ctrl+character key press
        pub fn press_ctrl_char(mut self, c: char) -> Self {
            self.push(SimulatedEventSource::ctrl_char_key(c));
            self
        }

        /// Type each character of `text`
        pub fn type_text(mut self, text: &str) -> Self {
            for c in text.chars() {
                self.push(SimulatedEventSource::char_key(c));
            }
            self
        }

        pub fn press_enter(self) -> Self {
            self.press(KeyCode::Enter)
        }

        pub fn press_tab(self) -> Self {
            self.press(KeyCode::Tab)
        }

        pub fn press_esc(self) -> Self {
            self.press(KeyCode::Esc)
        }

        /// Paste text, as a terminal does when a file is dropped onto it
        pub fn paste(mut self, text: &str) -> Self {
            self.push(SimulatedEventSource::paste(text));
            self
        }

        /// Navigate down n times (press 'j' n times)
        pub fn navigate_down(mut self, times: usize) -> Self {
            for _ in 0..times {
                self.push(SimulatedEventSource::char_key('j'));
            }
            self
        }

        /// Navigate up n times (press 'k' n times)
        pub fn navigate_up(mut self, times: usize) -> Self {
            for _ in 0..times {
                self.push(SimulatedEventSource::char_key('k'));
            }
            self
        }

        /// Pause so the shell draws a frame before the next input
        pub fn idle(mut self) -> Self {
            self.steps.push(ScriptStep::Idle);
            self
        }

        /// Pause, then press 'q', so the last frame reflects every step
        pub fn quit(mut self) -> Self {
            self = self.idle();
            self.push(SimulatedEventSource::char_key('q'));
            self
        }

        pub fn build(self) -> SimulatedEventSource {
            SimulatedEventSource::new(self.steps)
        }
    }

    /// Create a test terminal for snapshot testing
    pub fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
        let backend = TestBackend::new(width, height);
        Terminal::new(backend).unwrap()
    }

    /// Capture the current terminal buffer as a string
    pub fn capture_terminal_state(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut lines = Vec::new();

        for y in 0..buffer.area.height {
            let mut line = String::new();
            for x in 0..buffer.area.width {
                line.push_str(buffer[(x, y)].symbol());
            }
            lines.push(line.trim_end().to_string());
        }

        // Remove trailing empty lines
        while lines.last().map(|l| l.is_empty()).unwrap_or(false) {
            lines.pop();
        }

        lines.join("\n")
    }
}
