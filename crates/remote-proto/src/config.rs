use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::platform;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Where the player's HTTP interface lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// HTTP interface password. Empty means no authentication header.
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_status_interval_ms")]
    pub status_interval_ms: u64,
    #[serde(default = "default_playlist_interval_ms")]
    pub playlist_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Terminals this wide or narrower get the mobile-style layout: side
    /// navigation and playlist panel are never open together.
    #[serde(default = "default_narrow_width")]
    pub narrow_width: u16,
    /// Volume change per keypress, in player units (0–255).
    #[serde(default = "default_volume_step")]
    pub volume_step: u8,
    #[serde(default = "default_seek_step_secs")]
    pub seek_step_secs: i64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            password: String::new(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            status_interval_ms: default_status_interval_ms(),
            playlist_interval_ms: default_playlist_interval_ms(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            narrow_width: default_narrow_width(),
            volume_step: default_volume_step(),
            seek_step_secs: default_seek_step_secs(),
        }
    }
}

impl PlayerConfig {
    pub fn password(&self) -> Option<String> {
        (!self.password.is_empty()).then(|| self.password.clone())
    }
}

impl PollingConfig {
    pub fn status_interval(&self) -> Duration {
        Duration::from_millis(self.status_interval_ms.max(1))
    }

    pub fn playlist_interval(&self) -> Duration {
        Duration::from_millis(self.playlist_interval_ms.max(1))
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_status_interval_ms() -> u64 {
    1000
}

fn default_playlist_interval_ms() -> u64 {
    5000
}

fn default_narrow_width() -> u16 {
    80
}

fn default_volume_step() -> u8 {
    13
}

fn default_seek_step_secs() -> i64 {
    10
}

impl Config {
    /// Load from the default location, writing defaults there on first run.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.player.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.player.password(), None);
        assert_eq!(config.polling.status_interval(), Duration::from_millis(1000));
        assert_eq!(config.polling.playlist_interval(), Duration::from_millis(5000));
        assert_eq!(config.ui.narrow_width, 80);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [player]
            password = "secret"

            [polling]
            status_interval_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.player.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.player.password().as_deref(), Some("secret"));
        assert_eq!(config.polling.status_interval_ms, 250);
        assert_eq!(config.polling.playlist_interval_ms, 5000);
        assert_eq!(config.ui.volume_step, 13);
    }

    #[test]
    fn test_config_path() {
        assert!(Config::config_path().ends_with("vlcr/config.toml"));
    }
}
