//! Property tests for order-preserving deduplication.

use std::collections::BTreeSet;

use proptest::prelude::*;

use ctu_extract::dedup_first_occurrence;

proptest! {
    #[test]
    fn output_contains_each_distinct_element_once(input in proptest::collection::vec("[a-z]{0,4}", 0..50)) {
        let output = dedup_first_occurrence(&input);

        let distinct: BTreeSet<&String> = input.iter().collect();
        prop_assert_eq!(output.len(), distinct.len());

        let output_set: BTreeSet<&String> = output.iter().collect();
        prop_assert_eq!(output_set, distinct);
    }

    #[test]
    fn output_order_matches_first_occurrences(input in proptest::collection::vec("[a-z]{0,4}", 0..50)) {
        let output = dedup_first_occurrence(&input);

        // Every output element's first index in the input is strictly increasing.
        let mut last_index = None;
        for element in &output {
            let index = input.iter().position(|candidate| candidate == element).unwrap();
            if let Some(last) = last_index {
                prop_assert!(index > last);
            }
            last_index = Some(index);
        }
    }

    #[test]
    fn dedup_is_idempotent(input in proptest::collection::vec("[a-z]{0,4}", 0..50)) {
        let once = dedup_first_occurrence(&input);
        let twice = dedup_first_occurrence(&once);
        prop_assert_eq!(once, twice);
    }
}
