//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::notify::{ToastOptions, ToastPosition, DEFAULT_TOAST_DURATION_MS};

/// Name of the per-directory configuration folder
pub const LOCAL_DIR: &str = ".intake";

/// Intake configuration with layered hierarchy
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// How long a notification stays on screen, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toast_duration_ms: Option<u64>,

    /// Where notifications appear
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toast_position: Option<ToastPosition>,

    /// Default output format for reports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/intake/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Nearest local config (.intake/config.yaml)
        if let Some(local_path) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::local_config_path(&cwd))
        {
            if let Some(local) = Self::read_file(&local_path) {
                config.merge(local);
            }
        }

        // 4. Environment variables
        config.apply_env(|key| std::env::var(key).ok());

        config
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "intake")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Find the nearest `.intake/config.yaml` walking up from `start`
    pub fn local_config_path(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(LOCAL_DIR).join("config.yaml"))
            .find(|path| path.is_file())
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read config file");
                return None;
            }
        };
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config file");
                Some(config)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config file");
                None
            }
        }
    }

    /// Overlay values from environment variables
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(duration) = var("INTAKE_TOAST_DURATION_MS") {
            match duration.parse() {
                Ok(ms) => self.toast_duration_ms = Some(ms),
                Err(_) => tracing::warn!(value = %duration, "INTAKE_TOAST_DURATION_MS is not a number"),
            }
        }
        if let Some(position) = var("INTAKE_TOAST_POSITION") {
            match position.parse() {
                Ok(p) => self.toast_position = Some(p),
                Err(e) => tracing::warn!(error = %e, "ignoring INTAKE_TOAST_POSITION"),
            }
        }
        if let Some(format) = var("INTAKE_FORMAT") {
            self.default_format = Some(format);
        }
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.toast_duration_ms.is_some() {
            self.toast_duration_ms = other.toast_duration_ms;
        }
        if other.toast_position.is_some() {
            self.toast_position = other.toast_position;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// Notification settings for a new session
    pub fn toast_options(&self) -> ToastOptions {
        ToastOptions {
            duration: Duration::from_millis(
                self.toast_duration_ms.unwrap_or(DEFAULT_TOAST_DURATION_MS),
            ),
            position: self.toast_position.unwrap_or_default(),
        }
    }
}
