//! Compile curated rows into one boolean selection rule per trial.

use std::collections::{BTreeMap, BTreeSet};

use ctu_model::{Direction, InstanceRow, SelectionRule, TagSet, TrialId};

use crate::TYPE_TAG;

const GENE_TAG: &str = "gene";
const ALTERATION_TAG: &str = "alteration";

/// Literal candidate strings for one curated row.
///
/// A row carrying both gene and alteration tag sets yields the
/// `"{gene} {alteration}"` cross product instead of the individual tags; a
/// lone gene or alteration set contributes its tags directly. `type` tags
/// contribute nothing. All other curation tags are literals as-is.
pub fn row_literals(row: &InstanceRow) -> BTreeSet<String> {
    let mut gene_tags = TagSet::new();
    for tags in row.curations_named(GENE_TAG) {
        gene_tags.union_with(tags);
    }
    let mut alteration_tags = TagSet::new();
    for tags in row.curations_named(ALTERATION_TAG) {
        alteration_tags.union_with(tags);
    }

    let mut literals = BTreeSet::new();
    if !gene_tags.is_empty() && !alteration_tags.is_empty() {
        for gene in gene_tags.iter() {
            for alteration in alteration_tags.iter() {
                literals.insert(format!("{gene} {alteration}"));
            }
        }
    } else {
        literals.extend(gene_tags.iter().map(ToString::to_string));
        literals.extend(alteration_tags.iter().map(ToString::to_string));
    }

    for (column, tags) in &row.curations {
        if matches!(column.tag.as_str(), GENE_TAG | ALTERATION_TAG | TYPE_TAG) {
            continue;
        }
        literals.extend(tags.iter().map(ToString::to_string));
    }

    literals
}

/// OR the row's literals, parenthesized when there is more than one.
fn row_clause(literals: &BTreeSet<String>) -> Option<String> {
    let mut iter = literals.iter();
    let first = iter.next()?;
    if literals.len() == 1 {
        return Some(first.clone());
    }
    let joined = literals.iter().cloned().collect::<Vec<_>>().join(" OR ");
    Some(format!("({joined})"))
}

/// AND the inclusion clauses, OR the negated exclusion clauses, join the
/// two parts. A part is parenthesized only when it combines more than one
/// clause.
fn combine_trial(incl_clauses: &[String], excl_clauses: &[String]) -> String {
    let incl_part = incl_clauses.join(" AND ");
    let negated: Vec<String> = excl_clauses
        .iter()
        .map(|clause| format!("NOT({clause})"))
        .collect();
    let excl_part = negated.join(" OR ");

    match (incl_part.is_empty(), excl_part.is_empty()) {
        (false, false) => {
            let left = if incl_clauses.len() > 1 {
                format!("({incl_part})")
            } else {
                incl_part
            };
            let right = if negated.len() > 1 {
                format!("({excl_part})")
            } else {
                excl_part
            };
            format!("{left} AND {right}")
        }
        (false, true) => incl_part,
        (true, false) => excl_part,
        (true, true) => String::new(),
    }
}

/// One selection rule per trial, sorted by trial id. Pure over the curated
/// rows; a trial with zero literal-producing rows yields an empty rule.
pub fn build_selection_rules(rows: &[InstanceRow]) -> Vec<SelectionRule> {
    let mut by_trial: BTreeMap<TrialId, (Vec<String>, Vec<String>)> = BTreeMap::new();

    for row in rows {
        let entry = by_trial.entry(row.trial_id.clone()).or_default();
        let literals = row_literals(row);
        let Some(clause) = row_clause(&literals) else {
            continue;
        };
        match row.direction {
            Direction::Incl => entry.0.push(clause),
            Direction::Excl => entry.1.push(clause),
        }
    }

    by_trial
        .into_iter()
        .map(|(trial_id, (incl, excl))| SelectionRule {
            trial_id,
            expression: combine_trial(&incl, &excl),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctu_model::{CriterionClass, CurationColumn};

    fn row(trial: &str, direction: Direction) -> InstanceRow {
        InstanceRow::new(
            TrialId::new(trial).unwrap(),
            direction,
            CriterionClass::new("GeneAlterationCriterion").unwrap(),
        )
    }

    fn with_tags(mut instance: InstanceRow, tag: &str, values: &str) -> InstanceRow {
        let column = CurationColumn::new(instance.criterion_class.clone(), tag);
        instance.union_curation(column, &TagSet::from_comma_cell(values));
        instance
    }

    #[test]
    fn gene_alteration_cross_product() {
        let instance = with_tags(
            with_tags(row("NCT1", Direction::Incl), "gene", "EGFR,KRAS"),
            "alteration",
            "mutation",
        );
        let literals = row_literals(&instance);
        let expected: BTreeSet<String> = ["EGFR mutation", "KRAS mutation"]
            .into_iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(literals, expected);
    }

    #[test]
    fn lone_gene_set_contributes_tags_directly() {
        let instance = with_tags(row("NCT1", Direction::Incl), "gene", "EGFR,KRAS");
        let literals = row_literals(&instance);
        assert!(literals.contains("EGFR"));
        assert!(literals.contains("KRAS"));
        assert_eq!(literals.len(), 2);
    }

    #[test]
    fn type_tags_contribute_nothing() {
        let instance = with_tags(row("NCT1", Direction::Incl), "type", "activating");
        assert!(row_literals(&instance).is_empty());
    }
}
