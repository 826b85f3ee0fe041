// Re-export modules for testing and external use
pub mod selector {
    pub mod catalog;
    pub mod engine;
    pub mod gate;
    pub mod model;

    // Re-export commonly used items
    pub use catalog::ModuleCatalog;
    pub use engine::{select, DetectionMode, SelectionError};
    pub use gate::should_run;
    pub use model::{ChangeSignal, FallbackPolicy, Module, SelectionResult};
}

pub mod formatters {
    pub mod output;

    pub use output::{OutputFormat, OutputFormatter};
}

pub mod shared {
    pub mod logging;
}

pub mod git {
    pub mod service;

    pub use service::{GitError, GitService};
}

pub mod core {
    pub mod gate;
}

pub mod config;

// Re-export commonly used types for easier testing and external use
pub use config::Config;
pub use core::gate::TfGate;
pub use git::service::GitService;
pub use selector::catalog::ModuleCatalog;
pub use selector::model::SelectionResult;
