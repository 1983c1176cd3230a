/// Application configuration
use crate::error::{CliError, Result};
use lectern_library::{CatalogSource, DEFAULT_AUDIO_BASE};
use lectern_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Config file read from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "lectern.toml";

/// Environment variable prefix, e.g. `LECTERN_STORAGE__DATABASE_URL`
pub const ENV_PREFIX: &str = "LECTERN";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_catalog")]
    pub catalog: CatalogSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogSettings {
    /// `bundled`, a JSON file path, or an http(s) URL
    #[serde(default = "default_catalog_source")]
    pub source: String,

    #[serde(default = "default_audio_base")]
    pub audio_base: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_volume")]
    pub volume: f64,

    #[serde(default = "default_history_size")]
    pub history_size: usize,

    #[serde(default = "default_resume_window_hours")]
    pub resume_window_hours: u32,

    #[serde(default = "default_progress_persist_step")]
    pub progress_persist_step: f64,
}

impl AppConfig {
    /// Load configuration from `lectern.toml` (if present) and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(None, None)
    }

    /// Load from an explicit file and, for tests, an explicit environment map
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load_from(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (LECTERN_SECTION__KEY)
        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.database_url.trim().is_empty() {
            return Err(CliError::Config(
                "database URL is required (set LECTERN_STORAGE__DATABASE_URL)".to_string(),
            ));
        }

        let volume = self.playback.volume;
        if !volume.is_finite() || !(0.0..=1.0).contains(&volume) {
            return Err(CliError::Config(format!(
                "playback.volume must be between 0 and 1, got {volume}"
            )));
        }

        if self.playback.history_size == 0 {
            return Err(CliError::Config(
                "playback.history_size must be at least 1".to_string(),
            ));
        }

        let step = self.playback.progress_persist_step;
        if !step.is_finite() || step < 0.0 {
            return Err(CliError::Config(format!(
                "playback.progress_persist_step must be >= 0, got {step}"
            )));
        }

        Ok(())
    }

    pub fn catalog_source(&self) -> CatalogSource {
        CatalogSource::parse(&self.catalog.source)
    }

    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            audio_base: self.catalog.audio_base.clone(),
            volume: self.playback.volume,
            history_size: self.playback.history_size,
            progress_persist_step: self.playback.progress_persist_step,
            resume_window_hours: self.playback.resume_window_hours,
        }
    }
}

// Default values
fn default_catalog() -> CatalogSettings {
    CatalogSettings {
        source: default_catalog_source(),
        audio_base: default_audio_base(),
    }
}

fn default_catalog_source() -> String {
    "bundled".to_string()
}

fn default_audio_base() -> String {
    DEFAULT_AUDIO_BASE.to_string()
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/lectern.db".to_string()
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        volume: default_volume(),
        history_size: default_history_size(),
        resume_window_hours: default_resume_window_hours(),
        progress_persist_step: default_progress_persist_step(),
    }
}

fn default_volume() -> f64 {
    0.7
}

fn default_history_size() -> usize {
    50
}

fn default_resume_window_hours() -> u32 {
    24
}

fn default_progress_persist_step() -> f64 {
    0.0
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            storage: default_storage(),
            playback: default_playback(),
        }
    }
}
