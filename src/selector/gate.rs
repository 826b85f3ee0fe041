//! Stage gating: the predicate downstream deployment stages consult.

use crate::selector::catalog::ModuleCatalog;
use crate::selector::model::SelectionResult;
use serde_json::{json, Value};

/// Pure predicate: does this module's deployment stage run?
///
/// True for every module under `RunAll`; otherwise true exactly when the
/// module name is a literal member of the selected set.
pub fn should_run(module_name: &str, result: &SelectionResult) -> bool {
    match result {
        SelectionResult::RunAll => true,
        SelectionResult::Modules(names) => names.iter().any(|n| n == module_name),
    }
}

/// Per-module gate decisions for the whole catalog, keyed by module name.
pub fn gate_report(catalog: &ModuleCatalog, result: &SelectionResult) -> Value {
    let gates: serde_json::Map<String, Value> = catalog
        .modules()
        .iter()
        .map(|m| (m.name.clone(), json!(should_run(&m.name, result))))
        .collect();
    Value::Object(gates)
}
