//! The static module catalog checked by change detection.

use crate::config::Config;
use crate::selector::model::Module;

/// Ordered, immutable catalog of deployable modules. Built once from the
/// configuration; the rest of the run only reads it.
#[derive(Debug, Clone)]
pub struct ModuleCatalog {
    modules: Vec<Module>,
    ignore_paths: Vec<String>,
}

impl ModuleCatalog {
    pub fn from_config(config: &Config) -> Self {
        Self {
            modules: config.modules.clone(),
            ignore_paths: config.ignore_paths.clone(),
        }
    }

    /// Modules in catalog order.
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.iter().any(|m| m.name == name)
    }

    /// Whether a changed path is excluded from detection.
    pub fn is_ignored(&self, path: &str) -> bool {
        self.ignore_paths.iter().any(|prefix| path.starts_with(prefix))
    }

    /// First module (in catalog order) whose path prefix matches `path`.
    pub fn match_path(&self, path: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.matches_path(path))
    }

    /// Modules sorted by the advisory `order` field, for display only.
    /// Entries without an order sort last, keeping catalog order among
    /// themselves.
    pub fn execution_order(&self) -> Vec<&Module> {
        let mut ordered: Vec<&Module> = self.modules.iter().collect();
        ordered.sort_by_key(|m| m.order.unwrap_or(u32::MAX));
        ordered
    }
}
