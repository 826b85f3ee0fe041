//! The selector: maps a change signal plus the catalog to a selection.
//!
//! One parameterized implementation covers both detection modes. The
//! commit-message mode matches module names as plain substrings of the
//! lowercased message, which means a name embedded in a longer word (for
//! example "iam" inside "claim") still matches. That imprecision is
//! inherited deliberately; fixing it would change which deployments fire
//! for existing commit conventions.

use crate::selector::catalog::ModuleCatalog;
use crate::selector::model::{ChangeSignal, FallbackPolicy, SelectionResult};
use thiserror::Error;

/// Token in a commit message that forces a full deployment.
const RUN_ALL_TOKEN: &str = "all";

#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("No module changes detected. Expected changes under one of: {expected}")]
    NoModulesDetected { expected: String },
}

impl SelectionError {
    fn no_match(catalog: &ModuleCatalog) -> Self {
        let expected = catalog
            .modules()
            .iter()
            .map(|m| m.path_prefix.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        SelectionError::NoModulesDetected { expected }
    }
}

/// Detection mode plus the policy applied when nothing matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionMode {
    /// Substring matching against the latest commit message. The policy
    /// decides between a run-all fallback and failing the run.
    CommitMessage(FallbackPolicy),
    /// Path-prefix matching against the changed file set. Always strict:
    /// an empty match fails the run.
    FileDiff,
}

/// Evaluate a change signal against the catalog.
///
/// Deterministic and side-effect free: the same signal and catalog always
/// produce the same result.
pub fn select(
    catalog: &ModuleCatalog,
    signal: &ChangeSignal,
    mode: DetectionMode,
) -> Result<SelectionResult, SelectionError> {
    match (signal, mode) {
        (ChangeSignal::CommitMessage(message), DetectionMode::CommitMessage(policy)) => {
            select_from_commit(catalog, message, policy)
        }
        (ChangeSignal::ChangedFiles(paths), _) => select_from_files(catalog, paths),
        (ChangeSignal::CommitMessage(message), DetectionMode::FileDiff) => {
            // A commit signal under file-diff mode gets the strict policy.
            select_from_commit(catalog, message, FallbackPolicy::Fail)
        }
    }
}

/// Commit-message detection: lowercase, short-circuit on the `all` token,
/// then collect substring matches in catalog order.
pub fn select_from_commit(
    catalog: &ModuleCatalog,
    message: &str,
    policy: FallbackPolicy,
) -> Result<SelectionResult, SelectionError> {
    let lowered = message.to_lowercase();

    if lowered.contains(RUN_ALL_TOKEN) {
        tracing::debug!("commit message contains '{}', running everything", RUN_ALL_TOKEN);
        return Ok(SelectionResult::RunAll);
    }

    let selected: Vec<String> = catalog
        .modules()
        .iter()
        .filter(|m| lowered.contains(&m.name.to_lowercase()))
        .map(|m| m.name.clone())
        .collect();

    if selected.is_empty() {
        return match policy {
            FallbackPolicy::RunAll => {
                tracing::debug!("no module names in commit message, falling back to run-all");
                Ok(SelectionResult::RunAll)
            }
            FallbackPolicy::Fail => Err(SelectionError::no_match(catalog)),
        };
    }

    Ok(SelectionResult::Modules(selected))
}

/// File-diff detection: mark the first matching module per changed path,
/// skipping ignored prefixes. No run-all fallback.
pub fn select_from_files(
    catalog: &ModuleCatalog,
    paths: &[String],
) -> Result<SelectionResult, SelectionError> {
    let mut changed = vec![false; catalog.modules().len()];

    for path in paths {
        if catalog.is_ignored(path) {
            tracing::debug!("ignoring changed path: {}", path);
            continue;
        }
        if let Some(position) = catalog
            .modules()
            .iter()
            .position(|m| m.matches_path(path))
        {
            changed[position] = true;
        }
    }

    let selected: Vec<String> = catalog
        .modules()
        .iter()
        .zip(&changed)
        .filter(|(_, hit)| **hit)
        .map(|(m, _)| m.name.clone())
        .collect();

    if selected.is_empty() {
        return Err(SelectionError::no_match(catalog));
    }

    Ok(SelectionResult::Modules(selected))
}
