//! X-macro tables with comma-aligned columns.
//!
//! ```text
//! //   SigPoint, Related, ShaderKind
//! #define DO_SIGPOINTS(DO) \
//!   DO(VSIn,     Invalid, Vertex) \
//!   DO(VSOut,    Invalid, Vertex)
//! ```

use crate::errors::{GenError, GenResult};
use crate::layout::column_widths;

/// Default separator placed between cells.
pub const DEFAULT_SEPARATOR: &str = ", ";

/// Joins `row` with `sep`, padding every cell but the last to its column width.
#[must_use]
pub fn format_row<C: AsRef<str>>(row: &[C], widths: &[usize], sep: &str) -> String {
    let Some((last, init)) = row.split_last() else {
        return String::new();
    };
    let mut out = String::new();
    for (cell, &width) in init.iter().zip(widths) {
        let cell = cell.as_ref();
        out.push_str(cell);
        out.push_str(sep);
        out.push_str(&" ".repeat(width.saturating_sub(cell.chars().count())));
    }
    out.push_str(last.as_ref());
    out
}

/// Formats every row with shared column widths (minimum width 1).
///
/// # Errors
///
/// Returns [`GenError::EmptyTable`] or [`GenError::RaggedTable`] for
/// malformed input.
pub fn format_rows<R, C>(rows: &[R], sep: &str) -> GenResult<Vec<String>>
where
    R: AsRef<[C]>,
    C: AsRef<str>,
{
    let widths: Vec<usize> = column_widths(rows)?.into_iter().map(|w| w.max(1)).collect();
    Ok(rows
        .iter()
        .map(|row| format_row(row.as_ref(), &widths, sep))
        .collect())
}

/// Renders `rows` as a `#define macro_name(DO)` table.
///
/// The first row becomes a comment naming the columns; each other row
/// becomes one `DO(...)` invocation.
///
/// # Errors
///
/// See [`format_rows`].
pub fn format_macro_table<R, C>(rows: &[R], macro_name: &str) -> GenResult<String>
where
    R: AsRef<[C]>,
    C: AsRef<str>,
{
    let formatted = format_rows(rows, DEFAULT_SEPARATOR)?;
    let (header, body) = formatted.split_first().ok_or(GenError::EmptyTable)?;
    let invocations = body
        .iter()
        .map(|row| format!("  DO({row})"))
        .collect::<Vec<_>>()
        .join(" \\\n");
    Ok(format!(
        "//   {header}\n#define {macro_name}(DO) \\\n{invocations}\n"
    ))
}
