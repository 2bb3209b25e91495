//! Configuration file support for sniffer
//!
//! Loads `.sniffer.toml` from current directory or parent directories.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = ".sniffer.toml";

/// Configuration file structure
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rules: RulesConfig,
    pub paths: PathsConfig,
    pub output: OutputConfig,
    pub fixer: FixerConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// If set, only these rules will run
    pub enabled: Option<Vec<String>>,
    /// Rules to exclude (applied after enabled)
    pub disabled: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Glob patterns to exclude from processing
    pub exclude: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "text", "json" or "github"
    pub format: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FixerConfig {
    /// Ceiling on fix passes per file
    pub max_passes: Option<usize>,
}

impl Config {
    /// Load config from `.sniffer.toml` searching from current directory upward
    pub fn load() -> Result<Option<(Config, PathBuf)>> {
        Self::load_from(std::env::current_dir()?)
    }

    /// Load the first config file found in `start_dir` or its ancestors
    pub fn load_from(start_dir: PathBuf) -> Result<Option<(Config, PathBuf)>> {
        let Some(config_path) = start_dir
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE))
            .find(|candidate| candidate.is_file())
        else {
            return Ok(None);
        };

        let config = Self::load_path(&config_path)?;
        Ok(Some((config, config_path)))
    }

    /// Load config from a specific path
    pub fn load_path(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Rules to run: the CLI selection if any, else `enabled` (default all)
    /// minus `disabled`
    pub fn effective_rules(&self, all_rules: &[&str], cli_rules: &[String]) -> HashSet<String> {
        if !cli_rules.is_empty() {
            return cli_rules.iter().cloned().collect();
        }

        let selected: Vec<&str> = match &self.rules.enabled {
            Some(enabled) => enabled.iter().map(String::as_str).collect(),
            None => all_rules.to_vec(),
        };
        selected
            .into_iter()
            .filter(|name| !self.rules.disabled.iter().any(|d| d.as_str() == *name))
            .map(str::to_string)
            .collect()
    }

    /// Rule names in the config that no registered rule answers to
    pub fn unknown_rules<'a>(&'a self, all_rules: &[&str]) -> Vec<&'a str> {
        self.rules
            .enabled
            .iter()
            .flatten()
            .chain(&self.rules.disabled)
            .map(String::as_str)
            .filter(|name| !all_rules.contains(name))
            .collect()
    }

    /// Whether a discovered file matches one of the exclude patterns
    ///
    /// A pattern ending in `/` names a directory at any depth. Other patterns
    /// are globs tried against the whole path and against the file name.
    /// Invalid patterns never match.
    pub fn should_exclude(&self, path: &Path) -> bool {
        self.paths
            .exclude
            .iter()
            .any(|pattern| match pattern.strip_suffix('/') {
                Some(dir) => glob::Pattern::new(dir).is_ok_and(|dir| {
                    path.parent().is_some_and(|parent| {
                        parent
                            .components()
                            .any(|c| dir.matches(&c.as_os_str().to_string_lossy()))
                    })
                }),
                None => glob::Pattern::new(pattern).is_ok_and(|glob| {
                    glob.matches_path(path)
                        || path
                            .file_name()
                            .is_some_and(|name| glob.matches(&name.to_string_lossy()))
                }),
            })
    }
}
