//! Category ordering and grouping shared by the generators.

use isa_db::Categorized;

/// Sorts records by `(category, name)`; uncategorized records come first.
///
/// The sort is stable, so records with equal keys keep database order.
#[must_use]
pub fn by_category<'a, T, I>(items: I) -> Vec<&'a T>
where
    T: Categorized + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut sorted: Vec<&T> = items.into_iter().collect();
    sorted.sort_by(|a, b| (a.category(), a.name()).cmp(&(b.category(), b.name())));
    sorted
}

/// Position of a record relative to the previous record's category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupEdge {
    /// First record seen.
    First,
    /// Category differs from the previous record's.
    Changed,
    /// Same category as the previous record.
    Same,
}

impl GroupEdge {
    /// True when a new category heading is due.
    #[must_use]
    pub const fn starts_group(self) -> bool {
        !matches!(self, Self::Same)
    }
}

/// Tracks category changes across a sequence of records.
#[derive(Debug, Default)]
pub struct CategoryGroups<'a> {
    last: Option<&'a str>,
}

impl<'a> CategoryGroups<'a> {
    /// Creates a tracker that has seen no records.
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Records `category` and reports how it relates to the previous one.
    pub fn advance(&mut self, category: &'a str) -> GroupEdge {
        match self.last.replace(category) {
            None => GroupEdge::First,
            Some(prev) if prev == category => GroupEdge::Same,
            Some(_) => GroupEdge::Changed,
        }
    }

    /// True once any record has been seen.
    #[must_use]
    pub const fn has_open_group(&self) -> bool {
        self.last.is_some()
    }
}

#[cfg(test)]
mod tests {
    use isa_db::ValidationRule;

    use super::*;

    fn rule(category: &str, name: &str) -> ValidationRule {
        ValidationRule {
            name: name.to_string(),
            category: category.to_string(),
            ..ValidationRule::default()
        }
    }

    #[test]
    fn uncategorized_records_sort_first() {
        let rules = [rule("Meta", "b"), rule("", "z"), rule("Instr", "a")];
        let names: Vec<&str> = by_category(&rules).iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["z", "a", "b"]);
    }

    #[test]
    fn categories_stay_contiguous_when_names_contain_dots() {
        let rules = [
            rule("A", "Alpha"),
            rule("A.B", "x"),
            rule("A", "Zed"),
        ];
        let cats: Vec<&str> = by_category(&rules)
            .iter()
            .map(|r| r.category.as_str())
            .collect();
        assert_eq!(cats, ["A", "A", "A.B"]);
    }

    #[test]
    fn group_edges_follow_category_changes() {
        let mut groups = CategoryGroups::new();
        assert!(!groups.has_open_group());
        assert_eq!(groups.advance("x"), GroupEdge::First);
        assert_eq!(groups.advance("x"), GroupEdge::Same);
        assert_eq!(groups.advance("y"), GroupEdge::Changed);
        assert!(groups.has_open_group());
        assert!(GroupEdge::Changed.starts_group());
        assert!(!GroupEdge::Same.starts_group());
    }
}
