use anyhow::Context;
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const TOKEN_ENV: &str = "GENIUS_ACCESS_TOKEN";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub genius: GeniusConfig,
    pub player: PlayerConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeniusConfig {
    /// Genius API client access token (https://genius.com/api-clients).
    pub access_token: String,
    pub api_base: String,
    pub web_base: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Program printing the player status (cmus-remote format).
    pub command: String,
    pub args: Vec<String>,
    pub poll_interval_secs: u64,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub show_help_footer: bool,
}

impl Default for GeniusConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            api_base: "https://api.genius.com".to_string(),
            web_base: "https://genius.com".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            command: "cmus-remote".to_string(),
            args: vec!["-Q".to_string()],
            poll_interval_secs: 5,
            timeout_secs: 3,
        }
    }
}

impl PlayerConfig {
    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "cmus-lyrics", "cmus-lyrics")
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let proj = project_dirs().context("ProjectDirs unavailable")?;
    Ok(proj.config_dir().join("config.toml"))
}

/// Directory for the interactive-mode log file.
pub fn log_dir() -> PathBuf {
    project_dirs()
        .map(|p| p.data_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("cmus-lyrics"))
}

/// A missing file yields defaults; nothing is ever written back.
pub fn load(override_path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    let mut cfg = read(&path)?;
    if let Ok(token) = std::env::var(TOKEN_ENV)
        && !token.trim().is_empty()
    {
        cfg.genius.access_token = token.trim().to_string();
    }
    Ok(cfg)
}

fn read(path: &Path) -> anyhow::Result<Config> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => return Err(e).with_context(|| format!("read {}", path.display())),
    };
    toml::from_str::<Config>(&raw).with_context(|| format!("parse {}", path.display()))
}
