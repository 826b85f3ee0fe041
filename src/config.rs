//! Pipeline configuration loaded from a YAML file.
//!
//! The file lists the deployable modules in catalog order plus optional
//! ignore prefixes and the no-match policy for commit-message detection:
//!
//! ```yaml
//! modules:
//!   - name: project
//!     path: project/*
//!     displayName: Project Module
//!     order: 1
//! ignore_paths:
//!   - docs/
//! on_no_match: run-all
//! ```

use crate::selector::model::{FallbackPolicy, Module};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to parse YAML configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("IO error reading configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
struct ModuleEntry {
    name: String,
    path: String,
    #[serde(rename = "displayName", alias = "display_name")]
    display_name: Option<String>,
    order: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawConfig {
    // Older pipeline configs use `folders`, newer ones `modules`.
    #[serde(alias = "folders")]
    modules: Option<Vec<ModuleEntry>>,
    #[serde(default, alias = "Ignore_Paths")]
    ignore_paths: Vec<String>,
    #[serde(default)]
    on_no_match: Option<String>,
}

/// Validated pipeline configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub modules: Vec<Module>,
    pub ignore_paths: Vec<String>,
    pub fallback_policy: FallbackPolicy,
}

impl Config {
    /// Load and validate a configuration file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_yaml::from_str(content)?;

        let entries = raw.modules.ok_or_else(|| {
            ConfigError::Invalid("missing `modules` (or `folders`) list".to_string())
        })?;
        if entries.is_empty() {
            return Err(ConfigError::Invalid(
                "`modules` list must not be empty".to_string(),
            ));
        }

        let mut modules = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.name.is_empty() {
                return Err(ConfigError::Invalid(
                    "module entry with empty `name`".to_string(),
                ));
            }
            if entry.path.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "module '{}' has an empty `path`",
                    entry.name
                )));
            }
            if modules.iter().any(|m: &Module| m.name == entry.name) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate module name '{}'",
                    entry.name
                )));
            }
            let mut module = Module::new(&entry.name, &normalize_prefix(&entry.path));
            if let Some(display) = entry.display_name {
                module.display_name = display;
            }
            module.order = entry.order;
            modules.push(module);
        }

        let fallback_policy = match raw.on_no_match.as_deref() {
            None | Some("run-all") => FallbackPolicy::RunAll,
            Some("fail") => FallbackPolicy::Fail,
            Some(other) => {
                return Err(ConfigError::Invalid(format!(
                    "unknown `on_no_match` policy '{}' (expected 'run-all' or 'fail')",
                    other
                )))
            }
        };

        Ok(Self {
            modules,
            ignore_paths: raw.ignore_paths,
            fallback_policy,
        })
    }

    /// The built-in five-module catalog used when no config file is given.
    pub fn default_catalog() -> Self {
        let names = ["project", "iam", "compute", "network", "database"];
        let modules = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let mut module = Module::new(name, &format!("{}/", name));
                module.order = Some(i as u32 + 1);
                module
            })
            .collect();
        Self {
            modules,
            ignore_paths: Vec::new(),
            fallback_policy: FallbackPolicy::RunAll,
        }
    }
}

/// Strip a trailing wildcard and ensure a trailing slash, so `compute/*`,
/// `compute/` and `compute` all become `compute/`.
fn normalize_prefix(path: &str) -> String {
    let trimmed = path.trim_end_matches('*').trim_end_matches('/');
    format!("{}/", trimmed)
}
