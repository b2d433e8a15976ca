//! Text layout helpers: wrapped line comments and reStructuredText tables.

use crate::errors::{GenError, GenResult};

/// Total line width budget for wrapped comments.
pub const COMMENT_LINE_WIDTH: usize = 80;

/// Wraps `text` into lines of at most [`COMMENT_LINE_WIDTH`] characters, each
/// starting with `prefix`.
///
/// Lines break at the last space that fits. A word longer than the available
/// width is never split: its line overflows instead. A prefix that leaves no
/// room for content still emits one word per line. Every emitted line ends
/// in `\n`; empty text produces an empty string.
#[must_use]
pub fn format_comment(prefix: &str, text: &str) -> String {
    let content_width = COMMENT_LINE_WIDTH
        .saturating_sub(prefix.chars().count())
        .max(1);
    let mut out = String::new();
    let mut emit = |segment: &str| {
        let segment = segment.trim();
        if !segment.is_empty() {
            out.push_str(prefix);
            out.push_str(segment);
            out.push('\n');
        }
    };

    let mut rest = text;
    while !rest.is_empty() {
        if rest.chars().count() < content_width {
            emit(rest);
            break;
        }
        let limit = rest
            .char_indices()
            .nth(content_width)
            .map_or(rest.len(), |(idx, _)| idx);
        let split = rest[..limit]
            .rfind(' ')
            .or_else(|| rest[limit..].find(' ').map(|idx| idx + limit));
        match split {
            Some(idx) => {
                emit(&rest[..idx]);
                rest = &rest[idx + 1..];
            }
            None => {
                emit(rest);
                break;
            }
        }
    }
    out
}

/// Per-column maximum character width.
///
/// # Errors
///
/// Returns [`GenError::EmptyTable`] for no rows and [`GenError::RaggedTable`]
/// when a row's arity differs from the first row's.
pub fn column_widths<R, C>(rows: &[R]) -> GenResult<Vec<usize>>
where
    R: AsRef<[C]>,
    C: AsRef<str>,
{
    let first = rows.first().ok_or(GenError::EmptyTable)?;
    let expected = first.as_ref().len();
    let mut widths = vec![0; expected];
    for (row_idx, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        if row.len() != expected {
            return Err(GenError::RaggedTable {
                row: row_idx,
                expected,
                found: row.len(),
            });
        }
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.as_ref().chars().count());
        }
    }
    Ok(widths)
}

/// Renders a reStructuredText simple table; the first row is the header.
///
/// # Errors
///
/// See [`column_widths`].
pub fn format_rst_table<R, C>(rows: &[R]) -> GenResult<String>
where
    R: AsRef<[C]>,
    C: AsRef<str>,
{
    let widths = column_widths(rows)?;
    let banner = widths
        .iter()
        .map(|&w| "=".repeat(w))
        .collect::<Vec<_>>()
        .join(" ");

    let mut out = String::new();
    out.push_str(&banner);
    out.push('\n');
    for (row_idx, row) in rows.iter().enumerate() {
        let line = row
            .as_ref()
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{:<width$}", cell.as_ref()))
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(line.trim_end());
        out.push('\n');
        if row_idx == 0 {
            out.push_str(&banner);
            out.push('\n');
        }
    }
    out.push_str(&banner);
    out.push('\n');
    Ok(out)
}

/// Wraps a table in the blank-line padding used when splicing it into a
/// reStructuredText document.
///
/// # Errors
///
/// See [`column_widths`].
pub fn rst_table_block<R, C>(rows: &[R]) -> GenResult<String>
where
    R: AsRef<[C]>,
    C: AsRef<str>,
{
    Ok(format!("\n\n{}\n\n", format_rst_table(rows)?))
}

/// Renders an RST subsection: `title`, a `~` underline and the body.
#[must_use]
pub fn rst_subsection(title: &str, body: &str) -> String {
    format!(
        "{title}\n{}\n\n{body}\n\n",
        "~".repeat(title.chars().count())
    )
}
