//! Integration tests for the rule-builder.

use ctu_curate::build_selection_rules;
use ctu_model::{CriterionClass, CurationColumn, Direction, InstanceRow, TagSet, TrialId};

fn tagged_row(trial: &str, direction: Direction, tag: &str, values: &str) -> InstanceRow {
    let criterion = CriterionClass::new("PrimaryTumorCriterion").unwrap();
    let mut row = InstanceRow::new(TrialId::new(trial).unwrap(), direction, criterion.clone());
    row.union_curation(
        CurationColumn::new(criterion, tag),
        &TagSet::from_comma_cell(values),
    );
    row
}

#[test]
fn inclusion_and_exclusion_combine() {
    let rows = vec![
        tagged_row("NCT1", Direction::Incl, "tumor", "A"),
        tagged_row("NCT1", Direction::Excl, "tumor", "B,C"),
    ];
    let rules = build_selection_rules(&rows);
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].trial_id.as_str(), "NCT1");
    assert_eq!(rules[0].expression, "A AND NOT((B OR C))");
}

#[test]
fn inclusion_rows_are_anded() {
    let rows = vec![
        tagged_row("NCT1", Direction::Incl, "tumor", "A"),
        tagged_row("NCT1", Direction::Incl, "tumor", "B"),
    ];
    let rules = build_selection_rules(&rows);
    assert_eq!(rules[0].expression, "A AND B");
}

#[test]
fn exclusion_rows_are_ored_after_negation() {
    let rows = vec![
        tagged_row("NCT1", Direction::Excl, "tumor", "A"),
        tagged_row("NCT1", Direction::Excl, "tumor", "B"),
    ];
    let rules = build_selection_rules(&rows);
    assert_eq!(rules[0].expression, "NOT(A) OR NOT(B)");
}

#[test]
fn multiple_parts_are_parenthesized() {
    let rows = vec![
        tagged_row("NCT1", Direction::Incl, "tumor", "A"),
        tagged_row("NCT1", Direction::Incl, "tumor", "B"),
        tagged_row("NCT1", Direction::Excl, "tumor", "C"),
        tagged_row("NCT1", Direction::Excl, "tumor", "D"),
    ];
    let rules = build_selection_rules(&rows);
    assert_eq!(rules[0].expression, "(A AND B) AND (NOT(C) OR NOT(D))");
}

#[test]
fn rows_without_literals_contribute_nothing() {
    let criterion = CriterionClass::new("PrimaryTumorCriterion").unwrap();
    let empty = InstanceRow::new(TrialId::new("NCT1").unwrap(), Direction::Incl, criterion);
    let rules = build_selection_rules(&[empty]);
    assert_eq!(rules.len(), 1);
    assert!(rules[0].is_empty());
}

#[test]
fn gene_alteration_rows_cross_product_into_clauses() {
    let criterion = CriterionClass::new("GeneAlterationCriterion").unwrap();
    let mut row = InstanceRow::new(
        TrialId::new("NCT1").unwrap(),
        Direction::Incl,
        criterion.clone(),
    );
    row.union_curation(
        CurationColumn::new(criterion.clone(), "gene"),
        &TagSet::from_comma_cell("EGFR,KRAS"),
    );
    row.union_curation(
        CurationColumn::new(criterion, "alteration"),
        &TagSet::from_comma_cell("mutation"),
    );
    let rules = build_selection_rules(&[row]);
    assert_eq!(rules[0].expression, "(EGFR mutation OR KRAS mutation)");
}

#[test]
fn output_is_sorted_by_trial_id() {
    let rows = vec![
        tagged_row("NCT2", Direction::Incl, "tumor", "B"),
        tagged_row("NCT1", Direction::Incl, "tumor", "A"),
    ];
    let rules = build_selection_rules(&rows);
    let ids: Vec<&str> = rules.iter().map(|rule| rule.trial_id.as_str()).collect();
    assert_eq!(ids, vec!["NCT1", "NCT2"]);
}
