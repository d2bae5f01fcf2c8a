//! Zoom, rotation and page state for the document viewer
//!
//! Every operation is a plain state transform. Zoom and rotation always stay
//! inside their domains; the page number is stored as given.

/// Viewer state for one viewport instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    /// Current zoom factor (1.0 = 100%)
    pub zoom: f32,

    /// Rotation in degrees, one of 0, 90, 180, 270
    pub rotation: u16,

    /// Current page. Not validated against `total_pages`.
    pub current_page: i64,

    /// Page count shown in the toolbar
    pub total_pages: u32,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TOTAL_PAGES)
    }
}

impl ViewerState {
    pub const MIN_ZOOM: f32 = 0.5;
    pub const MAX_ZOOM: f32 = 3.0;
    pub const ZOOM_STEP: f32 = 0.25;
    pub const ROTATION_STEP: u16 = 90;
    pub const DEFAULT_TOTAL_PAGES: u32 = 24;

    pub fn new(total_pages: u32) -> Self {
        Self {
            zoom: 1.0,
            rotation: 0,
            current_page: 1,
            total_pages,
        }
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + Self::ZOOM_STEP).min(Self::MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom - Self::ZOOM_STEP).max(Self::MIN_ZOOM);
    }

    pub fn rotate(&mut self) {
        self.rotation = (self.rotation + Self::ROTATION_STEP) % 360;
    }

    /// Stores `page` verbatim, without clamping to `1..=total_pages`.
    pub fn set_page(&mut self, page: i64) {
        self.current_page = page;
    }

    pub fn next_page(&mut self) {
        self.set_page(self.current_page.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.current_page.saturating_sub(1));
    }

    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    /// True when the page is turned sideways.
    pub fn is_landscape(&self) -> bool {
        self.rotation % 180 == 90
    }
}

/// Coerce page-prompt text into a number the way a numeric input does:
/// empty or unparsable text becomes 0.
pub fn coerce_page_input(input: &str) -> i64 {
    input.trim().parse::<i64>().unwrap_or(0)
}
