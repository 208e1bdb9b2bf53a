//! Default Essie search queries for building the trial universe.

/// Core query: recruiting-stage cancer trials with a drug intervention in
/// Australia or New Zealand, by MeSH condition term.
pub const CORE_QUERY: &str = "\
(
    AREA[ConditionMeshTerm]Neoplasms
)
AND
(
    AREA[LocationCountry]Australia
    OR AREA[LocationCountry]\"New Zealand\"
)
AND
(
    AREA[OverallStatus]RECRUITING
    OR AREA[OverallStatus]NOT_YET_RECRUITING
    OR AREA[OverallStatus]ACTIVE_NOT_RECRUITING
    OR AREA[OverallStatus]ENROLLING_BY_INVITATION
)
AND
(
    AREA[InterventionType]DRUG
)";

/// Query terms run when none are supplied on the command line: the core
/// MeSH query as a single stage.
///
/// Extra stages (e.g. free-text condition lists that catch trials the MeSH
/// query misses) come from repeated `--query-term` flags; they overlap with
/// the core stage, so the accumulated studies must be deduplicated by
/// NCT id.
pub fn default_query_terms() -> Vec<String> {
    vec![CORE_QUERY.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_the_single_core_stage() {
        let terms = default_query_terms();
        assert_eq!(terms, vec![CORE_QUERY.to_string()]);
        assert!(terms[0].contains("AREA[ConditionMeshTerm]Neoplasms"));
    }
}
