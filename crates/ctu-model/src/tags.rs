use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An ordered set of curation tags.
///
/// Resource tables store tags comma-delimited; curated output stores them
/// semicolon-delimited. Both parsers drop blank parts, so a cell of
/// whitespace parses to the empty set. Serialization is sorted, which keeps
/// rule building and CSV output deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSet(BTreeSet<String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a resource-table cell: comma-delimited tags.
    pub fn from_comma_cell(cell: &str) -> Self {
        Self::from_delimited(cell, ',')
    }

    /// Parse a serialized curated cell: semicolon-delimited tags.
    pub fn from_semicolon_cell(cell: &str) -> Self {
        Self::from_delimited(cell, ';')
    }

    fn from_delimited(cell: &str, delimiter: char) -> Self {
        let tags = cell
            .split(delimiter)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(ToString::to_string)
            .collect();
        Self(tags)
    }

    pub fn insert(&mut self, tag: impl Into<String>) {
        self.0.insert(tag.into());
    }

    /// Union the other set into this one. Idempotent and commutative.
    pub fn union_with(&mut self, other: &TagSet) {
        for tag in &other.0 {
            self.0.insert(tag.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    /// Tags in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Serialized form for curated CSV cells: sorted, `;`-joined, empty
    /// string for the empty set.
    pub fn to_cell(&self) -> String {
        self.0.iter().cloned().collect::<Vec<_>>().join(";")
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cell())
    }
}

impl FromIterator<String> for TagSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_cells_dropping_blanks() {
        let tags = TagSet::from_comma_cell(" EGFR , KRAS ,, ");
        assert_eq!(tags.len(), 2);
        assert!(tags.contains("EGFR"));
        assert!(tags.contains("KRAS"));
        assert!(TagSet::from_comma_cell("   ").is_empty());
    }

    #[test]
    fn serializes_sorted_semicolon_joined() {
        let tags = TagSet::from_comma_cell("KRAS,EGFR");
        assert_eq!(tags.to_cell(), "EGFR;KRAS");
        let round = TagSet::from_semicolon_cell(&tags.to_cell());
        assert_eq!(round, tags);
    }

    #[test]
    fn union_is_idempotent() {
        let mut a = TagSet::from_comma_cell("a,b");
        let b = TagSet::from_comma_cell("b,c");
        a.union_with(&b);
        let once = a.clone();
        a.union_with(&b);
        assert_eq!(a, once);
        assert_eq!(a.to_cell(), "a;b;c");
    }
}
