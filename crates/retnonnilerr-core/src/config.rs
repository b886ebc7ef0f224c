//! Configuration loading from retnonnilerr.toml.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use retnonnilerr_check::suppression::IGNORE_MARKER;
use retnonnilerr_check::{CheckOptions, SuppressionMode};

pub const CONFIG_FILE_NAME: &str = "retnonnilerr.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub retnonnilerr: GeneralConfig,
    pub rules: RulesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub severity_threshold: String,
    pub skip_generated: bool,
    /// 0 = unlimited.
    pub max_diagnostics: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub retnonnilerr: RetNonNilErrConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetNonNilErrConfig {
    pub enabled: bool,
    /// Comment substring that suppresses the following line.
    pub ignore_marker: String,
    pub suppression: SuppressionMode,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            severity_threshold: "warning".to_string(),
            skip_generated: false,
            max_diagnostics: 0,
        }
    }
}

impl Default for RetNonNilErrConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ignore_marker: IGNORE_MARKER.to_string(),
            suppression: SuppressionMode::default(),
        }
    }
}

impl Config {
    /// Options for the pass derived from this configuration.
    pub fn check_options(&self) -> CheckOptions {
        CheckOptions {
            ignore_marker: self.rules.retnonnilerr.ignore_marker.clone(),
            suppression: self.rules.retnonnilerr.suppression,
            skip_generated: self.retnonnilerr.skip_generated,
        }
    }
}

/// Find and load retnonnilerr.toml, walking up from `start_dir`.
/// Returns default config if no file found or the file does not parse.
pub fn load_config(start_dir: &Path) -> Config {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = std::fs::read_to_string(&path).unwrap_or_default();
            match toml::from_str(&content) {
                Ok(config) => {
                    tracing::debug!(path = %path.display(), "loaded config");
                    config
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "invalid config, using defaults"
                    );
                    Config::default()
                }
            }
        }
        None => Config::default(),
    }
}

/// Walk up directories looking for retnonnilerr.toml.
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}

/// Default TOML content for `retnonnilerr init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"[retnonnilerr]
severity_threshold = "warning"
skip_generated = false
# 0 = unlimited; a notice on stderr reports anything cut off
max_diagnostics = 0

[rules.retnonnilerr]
enabled = true
ignore_marker = "lint:ignore retnonnilerr"
# "stop_block": a suppressed return also silences later returns in its block
# "skip_return": only the suppressed return is skipped
suppression = "stop_block"
"#;
