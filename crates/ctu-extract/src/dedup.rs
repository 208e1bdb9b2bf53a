use std::collections::BTreeSet;

/// Order-preserving deduplication: each distinct element once, in order of
/// first occurrence.
pub fn dedup_first_occurrence<T: Clone + Ord>(items: &[T]) -> Vec<T> {
    let mut seen = BTreeSet::new();
    let mut output = Vec::with_capacity(items.len());
    for item in items {
        if seen.insert(item.clone()) {
            output.push(item.clone());
        }
    }
    output
}
