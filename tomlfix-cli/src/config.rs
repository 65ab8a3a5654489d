//! Configuration file loading for tomlfix.
//!
//! Discovers and loads `tomlfix.toml` from the document root.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tomlfix_core::TransformSettings;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "tomlfix.toml";

/// Top-level configuration from tomlfix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TomlfixConfig {
    pub policy: PolicyConfig,
    pub run: RunConfig,
}

/// Policy section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Allowlist patterns for rule ids.
    /// If non-empty, only allowlisted rules are fixed.
    pub allow: Vec<String>,

    /// Denylist patterns for rule ids.
    pub deny: Vec<String>,
}

/// Run section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Worker threads; `0` or absent means one per core.
    pub jobs: Option<usize>,

    /// Persist changes without `--write`.
    pub write: bool,
}

/// Discover the tomlfix.toml config file in `root`.
pub fn discover_config(root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a tomlfix.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<TomlfixConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

pub fn parse_config(contents: &str) -> anyhow::Result<TomlfixConfig> {
    let config: TomlfixConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load an explicit config file, or discover one in `root`, or fall back to defaults.
pub fn load_or_default(
    root: &Utf8Path,
    explicit: Option<&Utf8Path>,
) -> anyhow::Result<TomlfixConfig> {
    match explicit {
        Some(path) => load_config(path),
        None => match discover_config(root) {
            Some(path) => load_config(&path),
            None => Ok(TomlfixConfig::default()),
        },
    }
}

/// CLI inputs that override or extend the config file.
#[derive(Debug, Clone, Default)]
pub struct ApplyOverrides {
    pub allow: Vec<String>,
    pub deny: Vec<String>,
    pub jobs: Option<usize>,
    pub write: bool,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: TomlfixConfig,
}

impl ConfigMerger {
    pub fn new(config: TomlfixConfig) -> Self {
        Self { config }
    }

    /// Merge with `apply` arguments.
    ///
    /// CLI `allow`/`deny` extend the config lists; `--jobs` replaces `run.jobs`; `--write` or
    /// `run.write` turns off dry-run.
    pub fn merge_apply_args(self, cli: &ApplyOverrides) -> TransformSettings {
        let mut allow = self.config.policy.allow;
        let mut deny = self.config.policy.deny;

        for pattern in &cli.allow {
            if !allow.contains(pattern) {
                allow.push(pattern.clone());
            }
        }
        for pattern in &cli.deny {
            if !deny.contains(pattern) {
                deny.push(pattern.clone());
            }
        }

        TransformSettings {
            jobs: cli.jobs.or(self.config.run.jobs).unwrap_or(0),
            dry_run: !(cli.write || self.config.run.write),
            allow,
            deny,
        }
    }
}
