use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use graph::Background;
use serde::Deserialize;

use crate::keymap::Keys;

/// User configuration, read once at startup and passed down by reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub keys: Keys,
    pub preview: PreviewConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub show_at_start: bool,
    /// Appended to `jj show`
    pub extra_args: Vec<String>,
    /// Share of the width the preview takes, in percent
    pub width_percent: u16,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            show_at_start: false,
            extra_args: Vec::new(),
            width_percent: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// SGR background for the highlighted row, e.g. `"48;5;238"`
    pub highlight_background: String,
    /// Revset shown when none is given on the command line
    pub revset: Option<String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            highlight_background: "48;5;238".to_string(),
            revset: None,
        }
    }
}

impl Config {
    /// `<config dir>/jjui/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("jjui").join("config.toml"))
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing file yields the defaults; an unreadable or malformed one is
    /// an error, as is a highlight background that is not numeric.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => path,
            None => return Ok(Self::default()),
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.highlight()?;
        Ok(config)
    }

    /// Validated highlight background
    pub fn highlight(&self) -> Result<Background> {
        Ok(self.ui.highlight_background.parse()?)
    }
}
