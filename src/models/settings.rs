//! Editor settings persisted as TOML next to the executable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

const SETTINGS_FILE: &str = "fabler.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Project reopened on launch when it still exists.
    pub last_project: Option<PathBuf>,
    /// Delay before a hovered collapsed section is forced open.
    pub section_enter_delay_ms: u64,
    /// Shorter delay before a left section snaps closed again.
    pub section_leave_delay_ms: u64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            last_project: None,
            section_enter_delay_ms: 200,
            section_leave_delay_ms: 40,
        }
    }
}

impl EditorSettings {
    /// Loads settings, falling back to defaults on a missing or broken file.
    pub fn load() -> Self {
        let path = Path::new(SETTINGS_FILE);
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(text) => match toml::from_str(&text) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("LOGIC: Ignoring broken {SETTINGS_FILE}: {e}");
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("LOGIC: Could not read {SETTINGS_FILE}: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<(), String> {
        let text = toml::to_string_pretty(self).map_err(|e| e.to_string())?;
        std::fs::write(SETTINGS_FILE, text).map_err(|e| e.to_string())
    }

    pub fn enter_delay(&self) -> Duration {
        Duration::from_millis(self.section_enter_delay_ms)
    }

    pub fn leave_delay(&self) -> Duration {
        Duration::from_millis(self.section_leave_delay_ms)
    }
}
