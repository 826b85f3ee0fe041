//! Core data model for module selection.

use serde::{Deserialize, Serialize};

/// A deployable module: a unique name plus the repository path prefix that
/// change detection checks against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    pub path_prefix: String,
    pub display_name: String,
    /// Advisory execution order used only for display. Matching and
    /// selection never consult it.
    pub order: Option<u32>,
}

impl Module {
    pub fn new(name: &str, path_prefix: &str) -> Self {
        Self {
            name: name.to_string(),
            path_prefix: path_prefix.to_string(),
            display_name: format!("{} Module", capitalize(name)),
            order: None,
        }
    }

    /// Returns true if `path` lives under this module's directory.
    pub fn matches_path(&self, path: &str) -> bool {
        path.starts_with(&self.path_prefix)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// The change signal for a single pipeline run. Produced once, immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeSignal {
    /// The latest commit message, matched by module-name substring.
    CommitMessage(String),
    /// Relative paths changed against a base ref, matched by path prefix.
    ChangedFiles(Vec<String>),
}

/// What to do in commit-message mode when no module name matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Deploy everything when nothing matched.
    #[default]
    RunAll,
    /// Fail the run when nothing matched.
    Fail,
}

/// The selection decision consumed by downstream stage gates.
///
/// `Modules` preserves catalog order and holds no duplicates. The variant is
/// never constructed with an empty list: an empty match set becomes either
/// `RunAll` or a `NoModulesDetected` error depending on the policy in force.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "decision", content = "modules")]
pub enum SelectionResult {
    RunAll,
    Modules(Vec<String>),
}

impl SelectionResult {
    pub fn is_run_all(&self) -> bool {
        matches!(self, SelectionResult::RunAll)
    }

    /// Selected module names, or `None` when everything runs.
    pub fn selected(&self) -> Option<&[String]> {
        match self {
            SelectionResult::RunAll => None,
            SelectionResult::Modules(names) => Some(names),
        }
    }

    /// Comma-joined module list as consumed by pipeline variables, or the
    /// literal `all` marker.
    pub fn as_variable_value(&self) -> String {
        match self {
            SelectionResult::RunAll => "all".to_string(),
            SelectionResult::Modules(names) => names.join(","),
        }
    }
}
