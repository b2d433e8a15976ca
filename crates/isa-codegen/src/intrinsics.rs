//! HLSL intrinsic tables and `IntrinsicOp` enumeration fragments.
//!
//! Every renderer walks the intrinsics in `key` order. Namespace
//! `Intrinsics` maps to `IOP_` enumerators; every other namespace (the
//! object method tables) maps to `MOP_`.

use std::collections::HashSet;

use isa_db::{Database, Intrinsic, IntrinsicParam};
use tracing::debug;

use crate::errors::{GenError, GenResult};

/// Namespace of free-function intrinsics.
pub const GLOBAL_NAMESPACE: &str = "Intrinsics";

fn by_key(db: &Database) -> Vec<&Intrinsic> {
    let mut intrinsics: Vec<&Intrinsic> = db.intrinsics().iter().collect();
    intrinsics.sort_by(|a, b| a.key.cmp(&b.key));
    intrinsics
}

fn op_prefix(ns: &str) -> &'static str {
    if ns == GLOBAL_NAMESPACE {
        "IOP"
    } else {
        "MOP"
    }
}

/// Returns `seed` unless a later item has a strictly larger measure, in which
/// case the first such maximum wins.
fn longest_from<'a, T: 'a>(
    seed: &'a T,
    items: impl IntoIterator<Item = &'a T>,
    measure: impl Fn(&T) -> usize,
) -> &'a T {
    items.into_iter().fold(seed, |current, item| {
        if measure(item) > measure(current) {
            item
        } else {
            current
        }
    })
}

/// Returns the first item whose measure is strictly larger than every item
/// before it.
fn first_longest<'a, T: 'a>(
    items: impl IntoIterator<Item = &'a T>,
    measure: impl Fn(&T) -> usize,
) -> Option<&'a T> {
    let mut items = items.into_iter();
    let seed = items.next()?;
    Some(longest_from(seed, items, measure))
}

/// Per-namespace counts and the length maxima used to size lookup buffers.
///
/// # Errors
///
/// Returns [`GenError::EmptySelection`] when there are no intrinsics or no
/// intrinsic declares a parameter.
pub fn intrinsic_stats(db: &Database) -> GenResult<String> {
    // Name and arity maxima start from the first declared intrinsic, then
    // scan in key order.
    let seed = db
        .intrinsics()
        .first()
        .ok_or(GenError::EmptySelection("intrinsics"))?;
    let intrinsics = by_key(db);
    let longest_name = longest_from(seed, intrinsics.iter().copied(), |i| {
        i.name.chars().count()
    });
    let longest_param = first_longest(
        intrinsics.iter().flat_map(|i| i.params.iter().skip(1)),
        |p: &IntrinsicParam| p.name.chars().count(),
    )
    .ok_or(GenError::EmptySelection("intrinsic parameters"))?;
    let longest_args = longest_from(seed, intrinsics.iter().copied(), |i| i.params.len());

    let mut out = String::new();
    for (ns, count) in db.namespace_counts() {
        out.push_str(&format!("static const UINT g_u{ns}Count = {count};\n"));
    }
    out.push('\n');
    out.push_str(&format!(
        "static const int g_MaxIntrinsicName = {}; // Count of characters for longest intrinsic name - '{}'\n",
        longest_name.name.chars().count(),
        longest_name.name
    ));
    out.push_str(&format!(
        "static const int g_MaxIntrinsicParamName = {}; // Count of characters for longest intrinsic parameter name - '{}'\n",
        longest_param.name.chars().count(),
        longest_param.name
    ));
    out.push_str(&format!(
        "static const int g_MaxIntrinsicParamCount = {}; // Count of parameters (without return) for longest intrinsic argument list - '{}'\n",
        longest_args.params.len().saturating_sub(1),
        longest_args.name
    ));
    Ok(out)
}

fn param_line(p: &IntrinsicParam) -> String {
    format!(
        "    \"{}\", {}, {}, {}, {}, {}, {}, {},\n",
        p.name,
        p.param_qual,
        p.template_id,
        p.template_list,
        p.component_id,
        p.component_list,
        p.rows,
        p.cols
    )
}

/// Argument arrays and per-namespace `HLSL_INTRINSIC` tables.
///
/// # Errors
///
/// Returns [`GenError::EmptySelection`] when there are no intrinsics.
pub fn intrinsic_tables(db: &Database) -> GenResult<String> {
    let intrinsics = by_key(db);
    if intrinsics.is_empty() {
        return Err(GenError::EmptySelection("intrinsics"));
    }
    debug!(intrinsics = intrinsics.len(), "rendering intrinsic tables");

    let mut out = String::new();
    let mut ns_table = String::new();
    let mut last_ns: Option<&str> = None;
    let mut arg_idx = 0usize;
    for intrinsic in intrinsics {
        let ns = intrinsic.ns.as_str();
        if last_ns != Some(ns) {
            if last_ns.is_some() {
                out.push_str(&ns_table);
                out.push_str("};\n");
            }
            last_ns = Some(ns);
            out.push_str(&format!("\n//\n// Start of {ns}\n//\n\n"));
            ns_table = format!("static const HLSL_INTRINSIC g_{ns}[] =\n{{\n");
            arg_idx = 0;
        }
        ns_table.push_str(&format!(
            "    (UINT)hlsl::IntrinsicOp::{}_{}, {}, {}, {}, {}, g_{ns}_Args{arg_idx},\n",
            op_prefix(ns),
            intrinsic.name,
            intrinsic.readonly,
            intrinsic.readnone,
            intrinsic.overload_param_index,
            intrinsic.params.len()
        ));
        out.push_str(&format!(
            "static const HLSL_INTRINSIC_ARGUMENT g_{ns}_Args{arg_idx}[] =\n{{\n"
        ));
        for p in &intrinsic.params {
            out.push_str(&param_line(p));
        }
        out.push_str("};\n\n");
        arg_idx += 1;
    }
    out.push_str(&ns_table);
    out.push_str("};\n");
    Ok(out)
}

/// `IntrinsicOp` enumerators: every distinct enum name, then the unsigned
/// variants not already listed, then `Num_Intrinsics`.
#[must_use]
pub fn intrinsic_enum(db: &Database) -> String {
    let intrinsics = by_key(db);
    let mut seen = HashSet::new();
    let mut out = String::new();
    for i in &intrinsics {
        if seen.insert(i.enum_name.as_str()) {
            out.push_str(&format!("  {},\n", i.enum_name));
        }
    }
    out.push_str("  // unsigned\n");
    for i in intrinsics.iter().filter(|i| !i.unsigned_op.is_empty()) {
        if seen.insert(i.unsigned_op.as_str()) {
            out.push_str(&format!("  {},\n", i.unsigned_op));
        }
    }
    out.push_str("  Num_Intrinsics,\n");
    out
}

/// Intrinsics with an unsigned variant, first occurrence per enum name.
fn with_unsigned(db: &Database) -> Vec<&Intrinsic> {
    let mut seen = HashSet::new();
    by_key(db)
        .into_iter()
        .filter(|i| !i.unsigned_op.is_empty() && seen.insert(i.enum_name.as_str()))
        .collect()
}

/// `case` labels for intrinsics that have an unsigned variant.
#[must_use]
pub fn has_unsigned_cases(db: &Database) -> String {
    with_unsigned(db)
        .iter()
        .map(|i| format!("  case IntrinsicOp::{}:\n", i.enum_name))
        .collect()
}

/// `case` labels returning each intrinsic's unsigned variant.
#[must_use]
pub fn get_unsigned_cases(db: &Database) -> String {
    with_unsigned(db)
        .iter()
        .map(|i| {
            format!(
                "  case IntrinsicOp::{}:\n    return static_cast<unsigned>(IntrinsicOp::{});\n",
                i.enum_name, i.unsigned_op
            )
        })
        .collect()
}
