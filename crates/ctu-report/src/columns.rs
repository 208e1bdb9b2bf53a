//! Typed multi-level column labels and their fixed presentation order.

use ctu_model::Direction;

/// Criterion name used for non-criterion (identity) fields.
pub const CORE_CRITERION: &str = "Core";

/// Field that sorts first among a criterion's extraction fields.
const INPUT_TEXT_FIELD: &str = "input_text";

/// Three-level column label: (criterion, direction, field).
///
/// Parsed once at table ingestion from the `INCL:field` /
/// `EXCL:Criterion-field` / bare-label conventions; bare labels belong to
/// the ingesting file's default criterion (`Core` when none).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColumnLabel {
    pub criterion: String,
    pub direction: Option<Direction>,
    pub field: String,
}

impl ColumnLabel {
    pub fn core(field: impl Into<String>) -> Self {
        Self {
            criterion: CORE_CRITERION.to_string(),
            direction: None,
            field: field.into(),
        }
    }

    /// Parse a raw CSV header according to the column-naming convention.
    pub fn parse(label: &str, default_criterion: Option<&str>) -> Self {
        let fallback = default_criterion.unwrap_or(CORE_CRITERION);
        let Some((direction, rest)) = parse_direction_prefix(label) else {
            return Self {
                criterion: fallback.to_string(),
                direction: None,
                field: label.to_string(),
            };
        };

        // An optional `Criterion-` prefix before the field name.
        if let Some((criterion, field)) = rest.split_once('-') {
            if !criterion.is_empty() && criterion.chars().all(is_criterion_char) {
                return Self {
                    criterion: criterion.to_string(),
                    direction: Some(direction),
                    field: field.to_string(),
                };
            }
        }

        Self {
            criterion: fallback.to_string(),
            direction: Some(direction),
            field: rest.to_string(),
        }
    }

    pub fn is_core(&self) -> bool {
        self.criterion == CORE_CRITERION
    }

    /// Fixed presentation order: criterion, direction, core fields before
    /// criterion fields in their configured order, `input_text` first among
    /// criterion fields, then alphabetical.
    pub fn sort_key(&self) -> (usize, usize, usize, usize, String) {
        if self.is_core() {
            (
                criterion_rank(&self.criterion),
                direction_rank(self.direction),
                0,
                core_field_rank(&self.field),
                self.field.clone(),
            )
        } else {
            (
                criterion_rank(&self.criterion),
                direction_rank(self.direction),
                1,
                usize::from(self.field != INPUT_TEXT_FIELD),
                self.field.clone(),
            )
        }
    }
}

fn parse_direction_prefix(label: &str) -> Option<(Direction, &str)> {
    if let Some(rest) = label.strip_prefix("INCL:") {
        Some((Direction::Incl, rest))
    } else {
        label
            .strip_prefix("EXCL:")
            .map(|rest| (Direction::Excl, rest))
    }
}

fn is_criterion_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn criterion_rank(criterion: &str) -> usize {
    match criterion {
        "Core" => 0,
        "PrimaryTumorCriterion" => 1,
        "MolecularBiomarkerCriterion" => 2,
        "MolecularSignatureCriterion" => 3,
        "GeneAlterationCriterion" => 4,
        _ => 50,
    }
}

fn direction_rank(direction: Option<Direction>) -> usize {
    match direction {
        Some(Direction::Incl) => 0,
        Some(Direction::Excl) => 1,
        None => 50,
    }
}

fn core_field_rank(field: &str) -> usize {
    match field {
        "briefTitle" => 0,
        "conditions" => 1,
        "interventionName" => 2,
        "interventionOtherNames" => 3,
        "interventionType" => 4,
        "leadSponsor" => 5,
        "phases" => 6,
        "status" => 7,
        "facility" => 8,
        "address" => 9,
        _ => 999,
    }
}
