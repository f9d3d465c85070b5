//! History settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::figure::LinkMode;

/// User-tunable behavior of the history engine and the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySettings {
    /// Maximum number of undo records kept; oldest are dropped first
    #[serde(default)]
    pub undo_limit: Option<usize>,
    /// How attached polylines follow a moved object
    #[serde(default)]
    pub link_mode: LinkMode,
    /// Default `tracing` filter when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    "fig_history=info".into()
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            undo_limit: None,
            link_mode: LinkMode::Off,
            log_filter: default_log_filter(),
        }
    }
}

impl HistorySettings {
    /// `settings.json` in the platform config directory
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("org", "xfig", "fig-history")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Self {
        if let Ok(json) = std::fs::read_to_string(path) {
            match serde_json::from_str(&json) {
                Ok(settings) => return settings,
                Err(e) => tracing::warn!(path = %path.display(), "ignoring settings: {e}"),
            }
        }
        Self::default()
    }

    /// Save settings to file
    pub fn save(&self) -> std::io::Result<PathBuf> {
        let path = Self::config_path().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "no config directory")
        })?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: HistorySettings = serde_json::from_str(r#"{"undo_limit": 20}"#).unwrap();
        assert_eq!(settings.undo_limit, Some(20));
        assert_eq!(settings.link_mode, LinkMode::Off);
        assert_eq!(settings.log_filter, "fig_history=info");
    }

    #[test]
    fn test_link_mode_names() {
        let settings = HistorySettings {
            link_mode: LinkMode::Slide,
            ..HistorySettings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains(r#""link_mode":"slide""#));
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir()
            .join(format!("fig-history-{}", std::process::id()))
            .join("settings.json");
        let settings = HistorySettings {
            undo_limit: Some(5),
            link_mode: LinkMode::Move,
            ..HistorySettings::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(HistorySettings::load_from(&path), settings);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("fig-history-missing/settings.json");
        assert_eq!(HistorySettings::load_from(&path), HistorySettings::default());
    }
}
