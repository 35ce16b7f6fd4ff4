//! Frequency counting with a documented, deterministic tie-break.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::hash::Hash;

/// The most frequent value and its occurrence count.
///
/// Tie-break: on equal counts, the value first encountered in input order
/// wins. Returns `None` for empty input.
pub fn mode_with_count<T>(values: impl IntoIterator<Item = T>) -> Option<(T, u64)>
where
    T: Eq + Hash,
{
    let counted = count_with_first_index(values);
    counted
        .into_iter()
        .max_by_key(|&(_, (count, first))| (count, Reverse(first)))
        .map(|(value, (count, _))| (value, count))
}

/// All distinct values with their counts, sorted by descending count.
/// Equal counts keep first-occurrence order.
pub fn value_counts<T>(values: impl IntoIterator<Item = T>) -> Vec<(T, u64)>
where
    T: Eq + Hash,
{
    let counted = count_with_first_index(values);
    let mut out: Vec<(T, u64, usize)> = counted
        .into_iter()
        .map(|(value, (count, first))| (value, count, first))
        .collect();
    out.sort_by_key(|&(_, count, first)| (Reverse(count), first));
    out.into_iter().map(|(value, count, _)| (value, count)).collect()
}

/// Count occurrences, remembering the input index of each value's first
/// appearance so callers can order deterministically.
fn count_with_first_index<T>(values: impl IntoIterator<Item = T>) -> HashMap<T, (u64, usize)>
where
    T: Eq + Hash,
{
    let mut counts: HashMap<T, (u64, usize)> = HashMap::new();
    for (index, value) in values.into_iter().enumerate() {
        let slot = counts.entry(value).or_insert((0, index));
        slot.0 += 1;
    }
    counts
}
