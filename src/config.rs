use crate::error::{CataidError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable overriding the stored cataloger name
pub const CATALOGER_ENV: &str = "CATAID_CATALOGER";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Used when a page has no cataloger of its own
    pub cataloger: Option<String>,
    pub catout_pattern: String,
    pub table_output: String,
    pub image_height_px: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cataloger: None,
            catout_pattern: "*_catout*.json".into(),
            table_output: "catout_table.html".into(),
            image_height_px: 180,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "config loaded");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CataidError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("cataid").join("config.json"))
    }

    /// Environment first, then the stored name
    pub fn get_cataloger(&self) -> Option<String> {
        if let Ok(name) = std::env::var(CATALOGER_ENV) {
            if !name.trim().is_empty() {
                return Some(name);
            }
        }

        self.cataloger.clone()
    }

    pub fn set_cataloger(&mut self, name: String) -> Result<()> {
        self.cataloger = Some(name);
        self.save()
    }
}
