use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::layout::RulerRange;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api_base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_semester")]
    pub semester: String,
    #[serde(default = "default_font_scale")]
    pub font_scale: f32,
    #[serde(default)]
    pub ruler: RulerRange,
}

fn default_semester() -> String {
    "202501".to_string()  // Spring 2025
}

fn default_font_scale() -> f32 {
    1.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            api_token: None,
            semester: default_semester(),
            font_scale: default_font_scale(),
            ruler: RulerRange::BusinessDay,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .context("Failed to read config file")?;
            serde_json::from_str(&contents)
                .context("Failed to parse config file")
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        !self.api_base_url.trim().is_empty()
            && self.api_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("edu", "classweek", "classweek")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Backend API root, e.g. "https://planner.example.edu/api".
    /// An explicit http:// is kept for local development servers.
    pub fn api_url(&self) -> String {
        let raw = self.api_base_url.trim();
        let (scheme, rest) = match raw.strip_prefix("http://") {
            Some(rest) => ("http", rest),
            None => ("https", raw.trim_start_matches("https://")),
        };

        let host = rest
            .trim_end_matches('/')
            .split('/')
            .next()
            .unwrap_or(rest);

        format!("{}://{}/api", scheme, host)
    }
}
