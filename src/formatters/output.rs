//! Rendering of selection results for pipeline consumption.

use crate::selector::catalog::ModuleCatalog;
use crate::selector::gate;
use crate::selector::model::SelectionResult;
use serde_json::{json, Value};

/// Output style requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Structured JSON report.
    Json,
    /// Azure DevOps logging commands (`##vso[...]`) setting pipeline
    /// variables for downstream stages.
    Azdo,
    /// One module name per line, or the literal `all`.
    Plain,
}

/// Formatter for selection results.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Structured report: the decision, the flat module list, and the
    /// per-module gate map downstream stages key into.
    pub fn format_report(
        mode: &str,
        catalog: &ModuleCatalog,
        result: &SelectionResult,
    ) -> Value {
        json!({
            "mode": mode,
            "run_all": result.is_run_all(),
            "selected_modules": result.selected().unwrap_or(&[]),
            "gates": gate::gate_report(catalog, result),
        })
    }

    /// Azure DevOps logging commands, one per line. The orchestrator maps
    /// these onto output variables visible to later stages.
    pub fn format_azdo(result: &SelectionResult) -> String {
        let mut lines = Vec::new();
        lines.push(format!(
            "##vso[task.setvariable variable=runAll;isOutput=true]{}",
            result.is_run_all()
        ));
        lines.push(format!(
            "##vso[task.setvariable variable=changedModules;isOutput=true]{}",
            result.as_variable_value()
        ));
        lines.join("\n")
    }

    /// Azure DevOps error logging command for a failed detection run.
    pub fn format_azdo_error(message: &str) -> String {
        format!("##vso[task.logissue type=error]{}", message)
    }

    pub fn format_plain(result: &SelectionResult) -> String {
        match result.selected() {
            None => "all".to_string(),
            Some(names) => names.join("\n"),
        }
    }

    /// Human-readable catalog listing, sorted by the advisory order field.
    pub fn format_catalog(catalog: &ModuleCatalog) -> String {
        let mut lines = vec!["Module execution order (advisory):".to_string()];
        for module in catalog.execution_order() {
            let order = module
                .order
                .map(|o| o.to_string())
                .unwrap_or_else(|| "-".to_string());
            lines.push(format!(
                "  {}. {} ({}) -> {}",
                order, module.name, module.path_prefix, module.display_name
            ));
        }
        lines.join("\n")
    }
}
