//! CLI configuration management.
//!
//! Values come from defaults, then the JSON config file, then environment
//! variables (a `.env` file is honoured). Later sources win.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use neva_graph_core::{EntityKind, HighlightPolicy};
use serde::{Deserialize, Serialize};

const DEFAULT_LAYOUT_TIMEOUT_MS: u64 = 5_000;

/// Application-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upper bound for a layout request in milliseconds; `0` disables it.
    pub layout_timeout_ms: u64,

    /// Node kinds that react to hover.
    pub eligible_kinds: Vec<EntityKind>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout_timeout_ms: DEFAULT_LAYOUT_TIMEOUT_MS,
            eligible_kinds: HighlightPolicy::default().eligible_kinds(),
        }
    }
}

impl Config {
    /// Load configuration from the config file and environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present (silently ignore if missing)
        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path).with_context(|| {
                    format!("Failed to read config from {}", config_path.display())
                })?;
                config = serde_json::from_str(&contents).with_context(|| {
                    format!("Failed to parse config file {}", config_path.display())
                })?;
            }
        }

        // Environment takes precedence over the file
        if let Ok(timeout) = std::env::var("NGRAPH_LAYOUT_TIMEOUT_MS") {
            config.layout_timeout_ms = timeout
                .trim()
                .parse()
                .with_context(|| format!("Invalid NGRAPH_LAYOUT_TIMEOUT_MS: {timeout}"))?;
        }
        if let Ok(kinds) = std::env::var("NGRAPH_ELIGIBLE_KINDS") {
            config.eligible_kinds = parse_kinds(&kinds)?;
        }

        Ok(config)
    }

    /// Path to the config file. `NGRAPH_CONFIG` overrides the platform default.
    pub fn config_file_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("NGRAPH_CONFIG") {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("dev", "nevalang", "ngraph")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    pub fn highlight_policy(&self) -> HighlightPolicy {
        HighlightPolicy::only(self.eligible_kinds.iter().copied())
    }

    pub fn layout_timeout(&self) -> Option<Duration> {
        (self.layout_timeout_ms > 0).then(|| Duration::from_millis(self.layout_timeout_ms))
    }
}

/// Parse a comma-separated kind list such as `component,interface`.
fn parse_kinds(raw: &str) -> Result<Vec<EntityKind>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<EntityKind>()
                .with_context(|| format!("Invalid NGRAPH_ELIGIBLE_KINDS entry: {part}"))
        })
        .collect()
}
