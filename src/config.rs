use crate::mixing::DEFAULT_DROP_THRESHOLD;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub const DEFAULT_TRACKS_FILE: &str = "tracks.json";
pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

/// Configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub tracks_file: PathBuf,
    pub suggestion_limit: usize,
    pub drop_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tracks_file: PathBuf::from(DEFAULT_TRACKS_FILE),
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            drop_threshold: DEFAULT_DROP_THRESHOLD,
        }
    }
}

impl Config {
    /// Build from a variable lookup; unset variables fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(path) = lookup("MIXFLOW_TRACKS") {
            config.tracks_file = PathBuf::from(path);
        }
        if let Some(limit) = lookup("MIXFLOW_SUGGESTION_LIMIT") {
            config.suggestion_limit = limit
                .trim()
                .parse()
                .with_context(|| {
                    format!("MIXFLOW_SUGGESTION_LIMIT must be a count, got '{limit}'")
                })?;
        }
        if let Some(threshold) = lookup("MIXFLOW_DROP_THRESHOLD") {
            let value: f64 = threshold.trim().parse().with_context(|| {
                format!("MIXFLOW_DROP_THRESHOLD must be a number, got '{threshold}'")
            })?;
            if !value.is_finite() || value < 0.0 {
                anyhow::bail!("MIXFLOW_DROP_THRESHOLD must be a non-negative number, got {value}");
            }
            config.drop_threshold = value;
        }

        Ok(config)
    }
}

/// Load configuration from `.env` and environment
pub fn load_config() -> Result<Config> {
    // Load `.env` file if present
    dotenv::dotenv().ok();
    Config::from_lookup(|name| std::env::var(name).ok())
}
