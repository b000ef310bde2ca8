//! Configuration file loading and environment overrides
//!
//! An optional TOML file provides defaults for the token and batch tuning;
//! environment variables override the file, and CLI flags override both.
//! A missing file is not an error; everything has a default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variables consulted for the token, most specific first
pub const TOKEN_ENV_VARS: [&str; 2] = ["GH_PR_GITHUB_TOKEN", "GITHUB_TOKEN"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GithubSection,
    #[serde(default)]
    pub batch: BatchSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GithubSection {
    /// Personal access token; env vars and the --github-token flag override
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSection {
    /// Seconds between API operations
    pub rate_limit: Option<f64>,
    /// Maximum concurrent per-PR operations
    pub max_concurrency: Option<usize>,
}

impl Config {
    /// Default location: `<config dir>/gh-pr/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gh-pr").join("config.toml"))
    }

    /// Load from the given path, or the default location when `None`.
    /// Absent files yield the default configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve the token: CLI flag, then environment, then config file.
    pub fn resolve_token(&self, flag: Option<String>) -> Option<String> {
        if let Some(token) = flag.filter(|t| !t.trim().is_empty()) {
            return Some(token);
        }
        for var in TOKEN_ENV_VARS {
            if let Ok(token) = std::env::var(var) {
                if !token.trim().is_empty() {
                    return Some(token);
                }
            }
        }
        self.github
            .token
            .clone()
            .filter(|t| !t.trim().is_empty())
    }
}
