use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{CriterionClass, Direction, ModelError, TagSet, TrialId};

/// Typed form of the `<criterion>_curation_<tag>` column convention.
///
/// Resolved once when a table is loaded; the string label only reappears at
/// serialization time. Serde uses the label form so the column can key JSON
/// maps.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CurationColumn {
    pub criterion: CriterionClass,
    pub tag: String,
}

impl CurationColumn {
    pub fn new(criterion: CriterionClass, tag: impl Into<String>) -> Self {
        Self {
            criterion,
            tag: tag.into(),
        }
    }

    /// Parse a conventional column label, e.g.
    /// `GeneAlterationCriterion_curation_gene`.
    pub fn parse_label(label: &str) -> Result<Self, ModelError> {
        let (prefix, tag) = label
            .split_once("_curation_")
            .ok_or_else(|| ModelError::InvalidCurationColumn(label.to_string()))?;
        if tag.trim().is_empty() {
            return Err(ModelError::InvalidCurationColumn(label.to_string()));
        }
        Ok(Self {
            criterion: CriterionClass::new(prefix)
                .map_err(|_| ModelError::InvalidCurationColumn(label.to_string()))?,
            tag: tag.trim().to_string(),
        })
    }

    /// Render back to the conventional CSV column label.
    pub fn label(&self) -> String {
        format!("{}_curation_{}", self.criterion, self.tag)
    }
}

impl fmt::Display for CurationColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for CurationColumn {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

impl<'de> Deserialize<'de> for CurationColumn {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Self::parse_label(&label).map_err(serde::de::Error::custom)
    }
}

/// One eligibility statement instance.
///
/// `fields` holds the free-text/structured columns produced by the upstream
/// LLM extraction; `curations` is populated by the lookup engine and always
/// maps to a (possibly empty) tag set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRow {
    pub trial_id: TrialId,
    pub direction: Direction,
    pub criterion_class: CriterionClass,
    pub fields: BTreeMap<String, String>,
    pub curations: BTreeMap<CurationColumn, TagSet>,
}

impl InstanceRow {
    pub fn new(trial_id: TrialId, direction: Direction, criterion_class: CriterionClass) -> Self {
        Self {
            trial_id,
            direction,
            criterion_class,
            fields: BTreeMap::new(),
            curations: BTreeMap::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Union tags into the row's output column, creating it when absent.
    pub fn union_curation(&mut self, column: CurationColumn, tags: &TagSet) {
        self.curations.entry(column).or_default().union_with(tags);
    }

    /// Tag sets on this row whose tag name matches, across all criterion
    /// namespaces.
    pub fn curations_named<'a>(
        &'a self,
        tag: &'a str,
    ) -> impl Iterator<Item = &'a TagSet> + 'a {
        self.curations
            .iter()
            .filter(move |(column, _)| column.tag == tag)
            .map(|(_, tags)| tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curation_column_label_round_trip() {
        let column = CurationColumn::parse_label("PrimaryTumorCriterion_curation_tumor").unwrap();
        assert_eq!(column.criterion.as_str(), "PrimaryTumorCriterion");
        assert_eq!(column.tag, "tumor");
        assert_eq!(column.label(), "PrimaryTumorCriterion_curation_tumor");
    }

    #[test]
    fn curation_column_rejects_malformed_labels() {
        assert!(CurationColumn::parse_label("no_marker_here").is_err());
        assert!(CurationColumn::parse_label("_curation_gene").is_err());
        assert!(CurationColumn::parse_label("Crit_curation_").is_err());
    }

    #[test]
    fn union_curation_creates_and_merges() {
        let mut row = InstanceRow::new(
            TrialId::new("NCT1").unwrap(),
            Direction::Incl,
            CriterionClass::new("GeneAlterationCriterion").unwrap(),
        );
        let column = CurationColumn::new(
            CriterionClass::new("GeneAlterationCriterion").unwrap(),
            "gene",
        );
        row.union_curation(column.clone(), &TagSet::from_comma_cell("EGFR"));
        row.union_curation(column.clone(), &TagSet::from_comma_cell("KRAS"));
        assert_eq!(row.curations[&column].to_cell(), "EGFR;KRAS");
    }

    #[test]
    fn instance_row_json_round_trip() {
        let mut row = InstanceRow::new(
            TrialId::new("NCT1").unwrap(),
            Direction::Excl,
            CriterionClass::new("GeneAlterationCriterion").unwrap(),
        );
        row.fields.insert("gene".to_string(), "EGFR".to_string());
        row.union_curation(
            CurationColumn::new(
                CriterionClass::new("GeneAlterationCriterion").unwrap(),
                "gene",
            ),
            &TagSet::from_comma_cell("EGFR,ERBB1"),
        );

        let json = serde_json::to_string(&row).unwrap();
        // Curation columns key the map by their conventional label.
        assert!(json.contains("GeneAlterationCriterion_curation_gene"));
        let back: InstanceRow = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn curation_column_deserialization_rejects_malformed_labels() {
        assert!(serde_json::from_str::<CurationColumn>("\"no_marker_here\"").is_err());
    }
}
