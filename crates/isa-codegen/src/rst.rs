//! reStructuredText tables for `docs/DXIL.rst`.

use isa_db::{Database, Instruction, ValidationRule};

use crate::errors::{GenError, GenResult};
use crate::layout::{format_rst_table, rst_subsection, rst_table_block};

/// Enumeration describing signature points.
pub const SIGPOINT_KIND_ENUM: &str = "SigPointKind";
/// Enumeration describing semantic interpretations.
pub const SEMANTIC_INTERPRETATION_ENUM: &str = "SemanticInterpretationKind";

fn remarks_sections<'a>(instrs: impl IntoIterator<Item = &'a Instruction>) -> String {
    instrs
        .into_iter()
        .filter(|i| !i.remarks.is_empty())
        .map(|i| rst_subsection(&i.name, &i.remarks))
        .collect()
}

/// Table of allowed LLVM instructions followed by their remarks.
///
/// # Errors
///
/// Propagates table formatting failures.
pub fn instrs_rst(db: &Database) -> GenResult<String> {
    let mut instrs: Vec<&Instruction> = db
        .instructions()
        .iter()
        .filter(|i| i.is_allowed && !i.is_dxil_op)
        .collect();
    instrs.sort_by_key(|i| i.llvm_id);

    let mut rows = vec![vec![
        "Instruction".to_string(),
        "Action".to_string(),
        "Operand overloads".to_string(),
    ]];
    rows.extend(
        instrs
            .iter()
            .map(|i| vec![i.name.clone(), i.doc.clone(), i.oload_types.clone()]),
    );

    let mut out = rst_table_block(&rows)?;
    out.push_str(&remarks_sections(instrs.iter().copied()));
    out.push('\n');
    Ok(out)
}

/// Table of allowed DXIL opcodes by id, then remarks ordered by name.
///
/// # Errors
///
/// Propagates table formatting failures.
pub fn opcodes_rst(db: &Database) -> GenResult<String> {
    let mut instrs: Vec<&Instruction> = db
        .instructions()
        .iter()
        .filter(|i| i.is_allowed && i.is_dxil_op)
        .collect();
    instrs.sort_by_key(|i| i.dxil_opid);

    let mut rows = vec![vec![
        "ID".to_string(),
        "Name".to_string(),
        "Description".to_string(),
    ]];
    rows.extend(
        instrs
            .iter()
            .map(|i| vec![i.dxil_opid.to_string(), i.dxil_op.clone(), i.doc.clone()]),
    );

    let mut out = rst_table_block(&rows)?;
    instrs.sort_by(|a, b| a.name.cmp(&b.name));
    out.push_str(&remarks_sections(instrs.iter().copied()));
    out.push('\n');
    Ok(out)
}

/// Table of enabled validation rules ordered by rule code.
///
/// # Errors
///
/// Propagates table formatting failures.
pub fn valrules_rst(db: &Database) -> GenResult<String> {
    let mut rules: Vec<&ValidationRule> =
        db.val_rules().iter().filter(|r| !r.is_disabled).collect();
    rules.sort_by(|a, b| a.name.cmp(&b.name));

    let mut rows = vec![vec!["Rule Code".to_string(), "Description".to_string()]];
    rows.extend(rules.iter().map(|r| vec![r.name.clone(), r.doc.clone()]));
    rst_table_block(&rows)
}

/// Signature point table with the enumerator id and description added.
///
/// The final row of the source grid (the `Invalid` sentinel) is omitted.
///
/// # Errors
///
/// Fails if the grid has no rows besides the sentinel, the `SigPointKind`
/// enumeration is missing, or a row names an unknown signature point.
pub fn sigpoint_rst(db: &Database) -> GenResult<String> {
    let kinds = db.enum_named(SIGPOINT_KIND_ENUM)?;
    let grid = db.sigpoint_table();
    let body = grid.split_last().map_or(&[][..], |(_, rest)| rest);
    let (header, points) = body.split_first().ok_or(GenError::EmptyTable)?;

    let mut rows = Vec::with_capacity(body.len());
    let mut header_row = vec!["ID".to_string()];
    header_row.extend(header.iter().cloned());
    header_row.push("Description".to_string());
    rows.push(header_row);

    for point in points {
        let name = point.first().map_or("", String::as_str);
        let kind = kinds
            .value_named(name)
            .ok_or_else(|| GenError::UnknownEnumValue {
                enumeration: SIGPOINT_KIND_ENUM.to_string(),
                value: name.to_string(),
            })?;
        let mut row = vec![kind.value.to_string()];
        row.extend(point.iter().cloned());
        row.push(kind.doc.clone());
        rows.push(row);
    }
    rst_table_block(&rows)
}

/// Table of semantic interpretation kinds, excluding the trailing sentinel.
///
/// # Errors
///
/// Fails if the `SemanticInterpretationKind` enumeration is missing.
pub fn sem_interpretation_enum_rst(db: &Database) -> GenResult<String> {
    let kinds = db.enum_named(SEMANTIC_INTERPRETATION_ENUM)?;
    let values = kinds
        .values
        .split_last()
        .map_or(&[][..], |(_, rest)| rest);
    let mut rows = vec![vec![
        "ID".to_string(),
        "Name".to_string(),
        "Description".to_string(),
    ]];
    rows.extend(
        values
            .iter()
            .map(|v| vec![v.value.to_string(), v.name.clone(), v.doc.clone()]),
    );
    rst_table_block(&rows)
}

/// The semantic interpretation grid as an RST table.
///
/// # Errors
///
/// Fails on an empty or ragged grid.
pub fn sem_interpretation_table_rst(db: &Database) -> GenResult<String> {
    Ok(format!(
        "\n\n{}\n\n",
        format_rst_table(db.interpretation_table())?
    ))
}
