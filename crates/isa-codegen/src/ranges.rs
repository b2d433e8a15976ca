//! Compression of id sets into contiguous ranges and range-test expressions.

use std::fmt;

use crate::errors::{GenError, GenResult};

/// A maximal run of consecutive ids, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdRange {
    /// Lowest id in the run.
    pub low: i64,
    /// Highest id in the run.
    pub high: i64,
}

impl IdRange {
    /// Returns true if the run holds a single id.
    #[must_use]
    pub const fn is_singleton(self) -> bool {
        self.low == self.high
    }

    /// Returns true if `value` lies in the run.
    #[must_use]
    pub const fn contains(self, value: i64) -> bool {
        self.low <= value && value <= self.high
    }

    /// Renders the boolean test for membership of `var` in this run.
    #[must_use]
    pub fn condition(self, var: &str) -> String {
        if self.is_singleton() {
            format!("{var} == {}", self.low)
        } else {
            format!("{} <= {var} && {var} <= {}", self.low, self.high)
        }
    }
}

impl fmt::Display for IdRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.low, self.high)
    }
}

/// Lazy iterator over the contiguous runs of a sorted, deduplicated id list.
#[derive(Debug, Clone)]
pub struct ContiguousRanges {
    values: std::vec::IntoIter<i64>,
    pending: Option<IdRange>,
}

impl Iterator for ContiguousRanges {
    type Item = IdRange;

    fn next(&mut self) -> Option<IdRange> {
        for value in self.values.by_ref() {
            match self.pending.as_mut() {
                None => {
                    self.pending = Some(IdRange {
                        low: value,
                        high: value,
                    });
                }
                Some(open) if open.high.checked_add(1) == Some(value) => open.high = value,
                Some(open) => {
                    let closed = *open;
                    *open = IdRange {
                        low: value,
                        high: value,
                    };
                    return Some(closed);
                }
            }
        }
        self.pending.take()
    }
}

/// Splits `values` into maximal contiguous runs in ascending order.
///
/// Input order and duplicates are irrelevant; an empty input yields no runs.
#[must_use]
pub fn contiguous_ranges<I>(values: I) -> ContiguousRanges
where
    I: IntoIterator,
    I::Item: Into<i64>,
{
    let mut sorted: Vec<i64> = values.into_iter().map(Into::into).collect();
    sorted.sort_unstable();
    sorted.dedup();
    ContiguousRanges {
        values: sorted.into_iter(),
        pending: None,
    }
}

/// Builds a `||`-joined membership test for `var` over `values`.
///
/// Returns an empty string for an empty input; use [`range_condition`] where
/// the result must be a usable condition.
#[must_use]
pub fn build_range_code<I>(var: &str, values: I) -> String
where
    I: IntoIterator,
    I::Item: Into<i64>,
{
    contiguous_ranges(values)
        .map(|range| range.condition(var))
        .collect::<Vec<_>>()
        .join(" || ")
}

/// Like [`build_range_code`] but rejects an empty id set.
///
/// # Errors
///
/// Returns [`GenError::EmptyRange`] if `values` is empty.
pub fn range_condition<I>(var: &str, values: I) -> GenResult<String>
where
    I: IntoIterator,
    I::Item: Into<i64>,
{
    let code = build_range_code(var, values);
    if code.is_empty() {
        return Err(GenError::EmptyRange {
            var: var.to_string(),
        });
    }
    Ok(code)
}
