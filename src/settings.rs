//! User settings stored as settings.json in the app data directory

use crate::theme::ThemeMode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    // Onboarding
    pub has_seen_intro: bool,
    pub has_seen_tutorial: bool,
    pub user_name: Option<String>,
    pub user_nit: Option<String>,

    // View
    pub theme: ThemeMode,
    pub search_all_fields: bool,

    // Data
    pub data_source: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            has_seen_intro: false,
            has_seen_tutorial: false,
            user_name: None,
            user_nit: None,
            theme: ThemeMode::Light,
            search_all_fields: false,
            data_source: None,
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(SETTINGS_FILE);
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join(SETTINGS_FILE);
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }
}

/// Trimmed free text, or `None` when blank
pub fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings, Settings::default());
        assert!(!settings.has_seen_intro);
        assert_eq!(settings.theme, ThemeMode::Light);
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            has_seen_intro: true,
            user_name: Some("Ana López".into()),
            user_nit: Some("1234567-8".into()),
            theme: ThemeMode::Dark,
            search_all_fields: true,
            data_source: Some("/tmp/data.csv".into()),
            ..Default::default()
        };
        settings.save(dir.path());

        let loaded = Settings::load(dir.path());
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "{ not json").unwrap();
        assert_eq!(Settings::load(dir.path()), Settings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), r#"{"has_seen_intro": true}"#).unwrap();
        let loaded = Settings::load(dir.path());
        assert!(loaded.has_seen_intro);
        assert!(!loaded.has_seen_tutorial);
        assert_eq!(loaded.user_name, None);
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank("  "), None);
        assert_eq!(non_blank(" 1234567-8 ").as_deref(), Some("1234567-8"));
    }
}
