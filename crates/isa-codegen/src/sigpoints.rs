//! Signature point X-macro tables (`DxilSigPoint.inl`).

use isa_db::Database;
use tracing::debug;

use crate::errors::GenResult;
use crate::macro_table::format_macro_table;

/// `DO_SIGPOINTS` table.
///
/// # Errors
///
/// Fails on an empty or ragged grid.
pub fn sigpoint_table(db: &Database) -> GenResult<String> {
    format_macro_table(db.sigpoint_table(), "DO_SIGPOINTS")
}

/// `DO_INTERPRETATION_TABLE` table.
///
/// # Errors
///
/// Fails on an empty or ragged grid.
pub fn interpretation_table(db: &Database) -> GenResult<String> {
    format_macro_table(db.interpretation_table(), "DO_INTERPRETATION_TABLE")
}

/// Both tables, signature points first.
///
/// # Errors
///
/// See [`sigpoint_table`] and [`interpretation_table`].
pub fn sigpoint_tables(db: &Database) -> GenResult<String> {
    debug!(
        sigpoints = db.sigpoint_table().len(),
        interpretations = db.interpretation_table().len(),
        "rendering signature point tables"
    );
    let mut out = sigpoint_table(db)?;
    out.push_str(&interpretation_table(db)?);
    Ok(out)
}
