use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub explorer: ExplorerConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
}

/// Where the graph service lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_dataset_path")]
    pub dataset_path: String,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_dataset_path() -> String {
    "/graph".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
            dataset_path: default_dataset_path(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// What a confirmed search does next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Fetch recommendations and show them next to the graph.
    #[default]
    InPlace,
    /// Hand off to the dedicated results view for the user.
    Navigate,
}

/// Whether tapping an edge changes the selected user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeTapPolicy {
    #[default]
    HighlightOnly,
    SelectSource,
    SelectTarget,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerConfig {
    #[serde(default)]
    pub search_mode: SearchMode,
    #[serde(default)]
    pub edge_tap: EdgeTapPolicy,
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,
    #[serde(default = "default_container")]
    pub container: String,
}

fn default_recommendation_count() -> usize {
    5
}

fn default_container() -> String {
    "graph".to_string()
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            search_mode: SearchMode::default(),
            edge_tap: EdgeTapPolicy::default(),
            recommendation_count: default_recommendation_count(),
            container: default_container(),
        }
    }
}

/// Force simulation and viewport parameters for the bundled layout engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub force_charge: f32,
    pub force_spring: f32,
    pub force_max: f32,
    pub node_speed: f32,
    pub damping_factor: f32,
    pub max_ticks: usize,
    pub tick_seconds: f32,
    /// Largest per-tick node displacement still considered "settled"
    pub settle_threshold: f32,
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            force_charge: 150.0,
            force_spring: 0.05,
            force_max: 100.0,
            node_speed: 3000.0,
            damping_factor: 0.9,
            max_ticks: 500,
            tick_seconds: 0.016,
            settle_threshold: 0.05,
            width: 800.0,
            height: 600.0,
            padding: 50.0,
        }
    }
}

impl Config {
    /// Get the configuration directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("socialgraph");
        Ok(config_dir)
    }

    /// Get the default configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Resolve an explicit path or fall back to the default location
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::config_path(),
        }
    }

    /// Load configuration, using defaults when the file does not exist
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config_path = Self::resolve_path(explicit)?;

        if !config_path.exists() {
            debug!(
                "No configuration at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", config_path.display()))?;

        config.expand_env_vars();

        Ok(config)
    }

    /// Expand environment variables in configuration values
    fn expand_env_vars(&mut self) {
        self.api.base_url = expand_env_var(&self.api.base_url);
        self.explorer.container = expand_env_var(&self.explorer.container);
    }
}

/// Expand environment variable references like ${VAR_NAME}
fn expand_env_var(value: &str) -> String {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).unwrap_or_default()
    } else if let Some(var_name) = value.strip_prefix('$') {
        std::env::var(var_name).unwrap_or_default()
    } else {
        value.to_string()
    }
}
