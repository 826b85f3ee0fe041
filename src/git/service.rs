//! Change signal extraction from the local git repository.

use std::path::PathBuf;
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitError {
    #[error("Git binary not found in PATH")]
    BinaryNotFound,

    #[error("Could not read change signal from git: {0}")]
    SignalUnavailable(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Wraps the git binary for the two version-control queries the selector
/// needs: the latest commit message, and the changed-file set against a
/// base ref. Both are one-shot; a failing query is fatal and never retried.
pub struct GitService {
    git_path: PathBuf,
    repo_directory: PathBuf,
}

impl GitService {
    pub fn new(repo_directory: PathBuf) -> Result<Self, GitError> {
        let git_path = which::which("git").map_err(|_| GitError::BinaryNotFound)?;
        tracing::debug!(
            "GitService using {} in {}",
            git_path.display(),
            repo_directory.display()
        );
        Ok(Self {
            git_path,
            repo_directory,
        })
    }

    pub fn repo_directory(&self) -> &PathBuf {
        &self.repo_directory
    }

    /// Full message of the most recent commit.
    pub async fn latest_commit_message(&self) -> Result<String, GitError> {
        let stdout = self.run(&["log", "-1", "--pretty=%B"])?;
        let message = stdout.trim().to_string();
        if message.is_empty() {
            return Err(GitError::SignalUnavailable(
                "latest commit has an empty message".to_string(),
            ));
        }
        Ok(message)
    }

    /// Relative paths changed in this run.
    ///
    /// An explicit `base` ref wins. Otherwise a pull-request build (detected
    /// from the `BUILD_REASON` / `SYSTEM_PULLREQUEST_TARGETBRANCH` variables
    /// the orchestrator sets) diffs against the merge base with the target
    /// branch, and a direct push diffs against the previous commit.
    pub async fn changed_files(&self, base: Option<&str>) -> Result<Vec<String>, GitError> {
        let range = match base {
            Some(base_ref) => {
                tracing::info!("diffing against explicit base ref: {}", base_ref);
                format!("{}...HEAD", base_ref)
            }
            None => match pull_request_target() {
                Some(target) => {
                    tracing::info!("PR build detected, comparing with target branch: {}", target);
                    self.run(&["fetch", "origin", &target])?;
                    format!("origin/{}...HEAD", target)
                }
                None => {
                    tracing::info!("direct push detected, comparing with previous commit");
                    "HEAD~1..HEAD".to_string()
                }
            },
        };

        let stdout = self.run(&["diff", "--name-only", &range])?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let output = Command::new(&self.git_path)
            .args(args)
            .current_dir(&self.repo_directory)
            .output()?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(GitError::SignalUnavailable(format!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }
}

/// Target branch name for pull-request builds, without the refs/heads/
/// prefix. `None` for direct pushes.
fn pull_request_target() -> Option<String> {
    let build_reason = std::env::var("BUILD_REASON").unwrap_or_default();
    if !build_reason.eq_ignore_ascii_case("pullrequest") {
        return None;
    }
    let target = std::env::var("SYSTEM_PULLREQUEST_TARGETBRANCH").ok()?;
    if target.is_empty() {
        return None;
    }
    Some(target.trim_start_matches("refs/heads/").to_string())
}
