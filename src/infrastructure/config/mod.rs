//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub gallery: GalleryConfig,
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
    pub adapters: AdaptersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GalleryConfig {
    /// SQLite database file
    pub database_path: PathBuf,
    /// Base directory for relative local picture sources
    pub picture_dir: PathBuf,
    /// Where downloaded remote candidate lists are kept
    pub cache_dir: PathBuf,
}

/// One configured command bound to a picture source and a template
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SourceConfig {
    #[serde(default = "default_command")]
    pub command: String,
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_template")]
    pub template: String,
}

fn default_command() -> String {
    "picar".to_string()
}

fn default_url() -> String {
    "https://example.com".to_string()
}

fn default_template() -> String {
    "{pict}".to_string()
}

fn default_sources() -> Vec<SourceConfig> {
    vec![SourceConfig {
        command: default_command(),
        url: default_url(),
        template: default_template(),
    }]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdaptersConfig {
    pub console: Option<ConsoleConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    pub enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "picar-bot".to_string(),
                prefix: "/".to_string(),
            },
            gallery: GalleryConfig {
                database_path: PathBuf::from("picar-bot.db"),
                picture_dir: PathBuf::from("pictures"),
                cache_dir: PathBuf::from("data/picar-cache"),
            },
            sources: default_sources(),
            adapters: AdaptersConfig {
                console: Some(ConsoleConfig { enabled: true }),
            },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn load_env() -> Self {
        // Load from environment variables
        let mut config = Config::default();

        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            config.bot.prefix = prefix;
        }

        if let Ok(dir) = std::env::var("PICAR_PICTURE_DIR") {
            config.gallery.picture_dir = PathBuf::from(dir);
        }

        config
    }
}
