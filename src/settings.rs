use log::{LevelFilter, debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::viewer::{BusyPolicy, SlotSpacing, ViewerConfig};

pub const CURRENT_VERSION: u32 = 1;
const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "pageview";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Horizontal space kept free when fitting page 1 to the width
    #[serde(default = "default_fit_padding")]
    pub fit_padding_px: f32,

    #[serde(default = "default_slot_gap")]
    pub slot_gap_px: f32,

    #[serde(default = "default_label_height")]
    pub label_height_px: f32,

    #[serde(default)]
    pub busy_policy: BusyPolicy,

    /// Distance moved by one plain arrow / j / k press
    #[serde(default = "default_scroll_step")]
    pub scroll_step_px: f32,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Size of the virtual scroll container in the terminal host
    #[serde(default = "default_viewport_width")]
    pub viewport_width_px: f32,

    #[serde(default = "default_viewport_height")]
    pub viewport_height_px: f32,
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

fn default_fit_padding() -> f32 {
    crate::viewer::DEFAULT_FIT_PADDING
}

fn default_slot_gap() -> f32 {
    SlotSpacing::default().gap
}

fn default_label_height() -> f32 {
    SlotSpacing::default().label_height
}

fn default_scroll_step() -> f32 {
    120.0
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_viewport_width() -> f32 {
    1040.0
}

fn default_viewport_height() -> f32 {
    900.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            fit_padding_px: default_fit_padding(),
            slot_gap_px: default_slot_gap(),
            label_height_px: default_label_height(),
            busy_policy: BusyPolicy::default(),
            scroll_step_px: default_scroll_step(),
            log_level: default_log_level(),
            viewport_width_px: default_viewport_width(),
            viewport_height_px: default_viewport_height(),
        }
    }
}

impl Settings {
    /// Load from `path`, or from the default config location.
    ///
    /// A missing file is created with defaults. Unreadable or malformed
    /// files are logged and ignored.
    pub fn load(path: Option<&Path>) -> Settings {
        let Some(path) = path.map(Path::to_path_buf).or_else(default_config_path) else {
            warn!("Could not determine config directory, using default settings");
            return Settings::default();
        };

        if !path.exists() {
            info!("Settings file not found, creating with defaults at {path:?}");
            let settings = Settings::default();
            save_settings_to_file(&settings, &path);
            return settings;
        }

        load_settings_from_path(&path).unwrap_or_default()
    }

    pub fn log_level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or_else(|_| {
            warn!("Unknown log level '{}', using info", self.log_level);
            LevelFilter::Info
        })
    }

    /// Controller-facing subset
    pub fn viewer_config(&self) -> ViewerConfig {
        ViewerConfig {
            fit_padding: self.fit_padding_px.max(0.0),
            spacing: SlotSpacing {
                label_height: self.label_height_px.max(0.0),
                gap: self.slot_gap_px.max(0.0),
            },
            busy_policy: self.busy_policy,
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
}

fn load_settings_from_path(path: &Path) -> Option<Settings> {
    match fs::read_to_string(path) {
        Ok(content) => match serde_yaml::from_str::<Settings>(&content) {
            Ok(mut settings) => {
                debug!("Loaded settings from {path:?}");

                if settings.version < CURRENT_VERSION {
                    migrate_settings(&mut settings);
                    save_settings_to_file(&settings, path);
                }
                Some(settings)
            }
            Err(e) => {
                error!("Failed to parse settings file {path:?}: {e}");
                None
            }
        },
        Err(e) => {
            error!("Failed to read settings file {path:?}: {e}");
            None
        }
    }
}

fn migrate_settings(settings: &mut Settings) {
    info!(
        "Migrating settings from v{} to v{}",
        settings.version, CURRENT_VERSION
    );
    settings.version = CURRENT_VERSION;
}

fn save_settings_to_file(settings: &Settings, path: &Path) {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory {parent:?}: {e}");
                return;
            }
        }
    }

    match fs::write(path, generate_settings_yaml(settings)) {
        Ok(()) => debug!("Saved settings to {path:?}"),
        Err(e) => error!("Failed to save settings to {path:?}: {e}"),
    }
}

fn generate_settings_yaml(settings: &Settings) -> String {
    let mut content = String::new();

    content.push_str(&format!("version: {}\n", settings.version));
    content.push_str("\n# Zoom-to-fit leaves this many pixels beside the page\n");
    content.push_str(&format!("fit_padding_px: {}\n", settings.fit_padding_px));
    content.push_str(&format!("slot_gap_px: {}\n", settings.slot_gap_px));
    content.push_str(&format!("label_height_px: {}\n", settings.label_height_px));
    content.push_str("\n# What a re-render request does while pages are rendering:\n");
    content.push_str("#   restart - start over with the latest zoom\n");
    content.push_str("#   drop    - ignore the request\n");
    content.push_str(&format!(
        "busy_policy: {}\n",
        settings.busy_policy.as_str()
    ));
    content.push('\n');
    content.push_str(&format!("scroll_step_px: {}\n", settings.scroll_step_px));
    content.push_str(&format!("log_level: {}\n", settings.log_level));
    content.push_str(&format!(
        "viewport_width_px: {}\n",
        settings.viewport_width_px
    ));
    content.push_str(&format!(
        "viewport_height_px: {}\n",
        settings.viewport_height_px
    ));

    content
}
