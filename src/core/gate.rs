use crate::config::Config;
use crate::git::service::GitService;
use crate::selector::catalog::ModuleCatalog;
use crate::selector::engine;
use crate::selector::model::{FallbackPolicy, SelectionResult};
use crate::shared::logging;
use std::path::PathBuf;

/// Orchestrates one detection run: configuration, the git signal query,
/// and the selector.
pub struct TfGate {
    catalog: ModuleCatalog,
    fallback_policy: FallbackPolicy,
    git_service: GitService,
}

impl TfGate {
    /// Build from CLI inputs.
    ///
    /// Config path priority: CLI argument, then the `TFGATE_CONFIG`
    /// environment variable, then the built-in default catalog.
    /// Repository directory priority: CLI argument, then
    /// `BUILD_SOURCESDIRECTORY` (set by the pipeline agent), then the
    /// current directory.
    pub fn new(config_path: Option<String>, repo_dir: Option<String>) -> anyhow::Result<Self> {
        let config_path = config_path.or_else(|| std::env::var("TFGATE_CONFIG").ok());

        let config = match config_path {
            Some(path) => {
                let path_buf = absolutize(PathBuf::from(&path))?;
                logging::info(&format!("Loading catalog from: {}", path_buf.display()));
                Config::from_path(&path_buf)?
            }
            None => {
                logging::info("No config path provided, using built-in module catalog");
                Config::default_catalog()
            }
        };

        let repo_directory = match repo_dir {
            Some(dir) => absolutize(PathBuf::from(dir))?,
            None => match std::env::var("BUILD_SOURCESDIRECTORY") {
                Ok(dir) => {
                    logging::info(&format!(
                        "Using repository directory from BUILD_SOURCESDIRECTORY: {}",
                        dir
                    ));
                    PathBuf::from(dir)
                }
                Err(_) => std::env::current_dir()?,
            },
        };

        let git_service = GitService::new(repo_directory)?;
        let catalog = ModuleCatalog::from_config(&config);

        logging::info(&format!(
            "TfGate initialized with {} modules: {}",
            catalog.modules().len(),
            catalog.names().join(", ")
        ));

        Ok(Self {
            catalog,
            fallback_policy: config.fallback_policy,
            git_service,
        })
    }

    pub fn catalog(&self) -> &ModuleCatalog {
        &self.catalog
    }

    /// Commit-message detection. `message` bypasses the git query when the
    /// caller already has the text; `strict` forces the fail policy over
    /// whatever the config chose.
    pub async fn detect_from_commit(
        &self,
        message: Option<String>,
        strict: bool,
    ) -> anyhow::Result<SelectionResult> {
        let message = match message {
            Some(text) => text,
            None => self.git_service.latest_commit_message().await?,
        };
        logging::debug(&format!("Commit message signal: {:?}", message));

        let policy = if strict {
            FallbackPolicy::Fail
        } else {
            self.fallback_policy
        };

        let result = engine::select_from_commit(&self.catalog, &message, policy)?;
        log_result(&result);
        Ok(result)
    }

    /// File-diff detection. Explicit `files` bypass the git query; `base`
    /// overrides the PR/push base-ref heuristics.
    pub async fn detect_from_files(
        &self,
        files: Vec<String>,
        base: Option<&str>,
    ) -> anyhow::Result<SelectionResult> {
        let paths = if files.is_empty() {
            self.git_service.changed_files(base).await?
        } else {
            files
        };

        logging::info(&format!("Changed files ({}):", paths.len()));
        for path in &paths {
            logging::info(&format!("  - {}", path));
        }

        let result = engine::select_from_files(&self.catalog, &paths)?;
        log_result(&result);
        Ok(result)
    }
}

fn log_result(result: &SelectionResult) {
    match result {
        SelectionResult::RunAll => logging::info("All modules will be deployed"),
        SelectionResult::Modules(names) => logging::info(&format!(
            "The following modules will be deployed: {}",
            names.join(",")
        )),
    }
}

fn absolutize(path: PathBuf) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
