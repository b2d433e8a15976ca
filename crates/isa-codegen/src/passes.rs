//! Optimizer pass registry fragments.

use isa_db::{Database, Pass, PassArg};
use tracing::debug;

use crate::srcgen::escape_c_string;

fn passes_by_type(db: &Database) -> Vec<&Pass> {
    let mut passes: Vec<&Pass> = db.passes().iter().collect();
    passes.sort_by(|a, b| a.type_name.cmp(&b.type_name));
    passes
}

/// `initialize<Type>Pass(Registry);` for every pass, ordered by type name.
#[must_use]
pub fn init_passes(db: &Database) -> String {
    passes_by_type(db)
        .iter()
        .map(|p| format!("initialize{}Pass(Registry);\n", p.type_name))
        .collect()
}

/// Per-pass string arrays followed by the `passName` lookups returning them.
fn pass_arg_lookup(db: &Database, field: fn(&PassArg) -> &str) -> String {
    let mut decls = String::new();
    let mut checks = String::new();
    for pass in passes_by_type(db).into_iter().filter(|p| !p.args.is_empty()) {
        let items = pass
            .args
            .iter()
            .map(|a| format!("\"{}\"", escape_c_string(field(a))))
            .collect::<Vec<_>>()
            .join(", ");
        decls.push_str(&format!(
            "static const LPCSTR {}Args[] = {{ {items} }};\n",
            pass.type_name
        ));
        checks.push_str(&format!(
            "if (strcmp(passName, \"{}\") == 0) return ArrayRef<LPCSTR>({ty}Args, _countof({ty}Args));\n",
            pass.name,
            ty = pass.type_name
        ));
    }
    decls.push_str(&checks);
    decls
}

/// Argument name arrays keyed by pass name.
#[must_use]
pub fn pass_arg_names(db: &Database) -> String {
    pass_arg_lookup(db, |a| a.name.as_str())
}

/// Argument description arrays keyed by pass name.
#[must_use]
pub fn pass_arg_descs(db: &Database) -> String {
    pass_arg_lookup(db, |a| a.doc.as_str())
}

/// A `return` expression testing whether `S` names any pass option.
#[must_use]
pub fn is_pass_option_name(db: &Database) -> String {
    let names = db.pass_option_names();
    debug!(options = names.len(), "rendering pass option predicate");
    if names.is_empty() {
        return "return false;\n".to_string();
    }
    let tests = names
        .iter()
        .map(|name| format!("S.equals(\"{}\")", escape_c_string(name)))
        .collect::<Vec<_>>()
        .join("\n  ||  ");
    format!("return {tests};\n")
}
