//! Choosing which documents of a date group get compared.

use crate::models::{ComparisonMode, ComparisonPair, DateGroup};

/// Plan the comparison pairs of one date group.
///
/// The group must already be sorted by modified time (see
/// [`crate::services::grouping::group`]). Groups with fewer than two members
/// yield no pairs.
///
/// - `Baseline`: the earliest document against every later one, `n - 1` pairs.
/// - `Pairwise`: every `(i, j)` with `i < j`, `n * (n - 1) / 2` pairs, the
///   earlier document always on the A side.
pub fn plan(group: &DateGroup, mode: ComparisonMode) -> Vec<ComparisonPair<'_>> {
    let docs = &group.documents;
    if docs.len() < 2 {
        return Vec::new();
    }

    let indices: Vec<(usize, usize)> = match mode {
        ComparisonMode::Baseline => (1..docs.len()).map(|j| (0, j)).collect(),
        ComparisonMode::Pairwise => (0..docs.len())
            .flat_map(|i| (i + 1..docs.len()).map(move |j| (i, j)))
            .collect(),
    };

    indices
        .into_iter()
        .enumerate()
        .map(|(index, (i, j))| ComparisonPair {
            index,
            date: group.date,
            a: &docs[i],
            b: &docs[j],
        })
        .collect()
}
