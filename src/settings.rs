//! Game settings with persistence
//!
//! Settings are read from `~/.config/courier/settings.toml`. Every section
//! and field is optional; anything missing keeps its default.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use courier_core::{ConfigError, TimeConfig};
use courier_game::{ArrowConfig, BumperConfig, ControllerConfig, DeliveryConfig, FadeConfig};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All game settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub time: TimeConfig,
    pub controller: ControllerConfig,
    pub bumper: BumperConfig,
    pub delivery: DeliveryConfig,
    pub messages: FadeConfig,
    pub arrow: ArrowConfig,
}

impl GameSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("courier"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from disk, or return defaults if not found or unreadable
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => {
                info!("Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!("{:#}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Load settings from a specific file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Parse settings from TOML text
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Failed to parse settings")
    }

    /// Check every section before anything is built from it
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.time.validate()?;
        self.controller.validate()?;
        self.delivery.validate()?;
        ConfigError::require_non_negative("bumper.push_force", self.bumper.push_force)?;
        ConfigError::require_non_negative("bumper.stun_time", self.bumper.stun_time)?;
        ConfigError::require_positive("bumper.reset_time", self.bumper.reset_time)?;
        ConfigError::require_positive("bumper.radius", self.bumper.radius)?;
        ConfigError::require_positive("messages.fade_time", self.messages.fade_time)?;
        ConfigError::require_positive("arrow.fade.fade_time", self.arrow.fade.fade_time)?;
        ConfigError::require_non_negative("arrow.rotation_speed", self.arrow.rotation_speed)
    }
}
