// Export modules for use in tests
pub mod document_viewport;
pub mod event_source;
pub mod inputs;
pub mod main_app;
pub mod outline;
pub mod panic_handler;
pub mod semantic_links;
pub mod settings;
pub mod sidebar;
pub mod theme;
pub mod upload;
pub mod viewer;
pub mod widget;

pub mod test_utils;

// Re-export main app components
pub use main_app::{App, AppConfig, FocusedPanel, MainPanel, run_app_with_event_source};
