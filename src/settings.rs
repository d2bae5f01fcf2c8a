use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, RwLock};
use thiserror::Error;

use crate::viewer::ViewerState;

pub const CURRENT_VERSION: u32 = 1;
const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "intellipdf";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "default_theme")]
    pub theme: String,

    /// Page count shown by the viewer toolbar
    #[serde(default = "default_total_pages")]
    pub total_pages: u32,

    /// Start with the sidebar collapsed to its icon strip
    #[serde(default)]
    pub sidebar_collapsed: bool,
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

fn default_theme() -> String {
    "Oceanic Next".to_string()
}

fn default_total_pages() -> u32 {
    ViewerState::DEFAULT_TOTAL_PAGES
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            theme: default_theme(),
            total_pages: default_total_pages(),
            sidebar_collapsed: false,
        }
    }
}

static SETTINGS: LazyLock<RwLock<Settings>> = LazyLock::new(|| RwLock::new(Settings::default()));

pub fn preferred_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
}

/// Load settings into the process-wide store.
///
/// A missing file is created with defaults; a broken one is logged and
/// defaults are kept.
pub fn load_settings(path_override: Option<&Path>) {
    let path = match path_override {
        Some(path) => path.to_path_buf(),
        None => match preferred_config_path() {
            Some(path) => path,
            None => {
                warn!("Could not determine config directory, using default settings");
                return;
            }
        },
    };

    if !path.exists() {
        info!("Settings file not found, creating with defaults at {path:?}");
        if let Err(e) = save_settings_to_file(&get_settings(), &path) {
            error!("{e}");
        }
        return;
    }

    match load_settings_from_path(&path) {
        Ok(settings) => {
            if let Ok(mut global) = SETTINGS.write() {
                *global = settings;
            }
        }
        Err(e) => error!("{e}"),
    }
}

pub fn load_settings_from_path(path: &Path) -> Result<Settings, SettingsError> {
    let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut settings: Settings =
        serde_yaml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    debug!("Loaded settings from {path:?}");

    if settings.version < CURRENT_VERSION {
        migrate_settings(&mut settings);
        save_settings_to_file(&settings, path)?;
    }

    Ok(settings)
}

fn migrate_settings(settings: &mut Settings) {
    info!(
        "Migrating settings from v{} to v{}",
        settings.version, CURRENT_VERSION
    );
    settings.version = CURRENT_VERSION;
}

pub fn save_settings_to_file(settings: &Settings, path: &Path) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let mut content = String::from(SETTINGS_HEADER);
    content.push_str(&serde_yaml::to_string(settings)?);

    fs::write(path, content).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Saved settings to {path:?}");
    Ok(())
}

const SETTINGS_HEADER: &str = "# IntelliPDF settings
# theme: \"Oceanic Next\" or \"Catppuccin Mocha\"
# total_pages: page count shown in the viewer toolbar
# sidebar_collapsed: start with the sidebar collapsed
";

// Public API for accessing settings

pub fn get_settings() -> Settings {
    SETTINGS.read().map(|s| s.clone()).unwrap_or_default()
}

pub fn get_theme_name() -> String {
    SETTINGS
        .read()
        .map(|s| s.theme.clone())
        .unwrap_or_else(|_| default_theme())
}

pub fn get_total_pages() -> u32 {
    SETTINGS
        .read()
        .map(|s| s.total_pages)
        .unwrap_or_else(|_| default_total_pages())
}

pub fn is_sidebar_collapsed() -> bool {
    SETTINGS.read().map(|s| s.sidebar_collapsed).unwrap_or(false)
}
