//! Greedy one-to-one pairing of two sibling lists.

use std::collections::{BTreeMap, BTreeSet};

use crate::diff::options::DiffOptions;
use crate::diff::score::score;
use crate::tree::Node;

/// Result of pairing before-children with after-children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffMatrix {
    /// before index -> (after index, score), scores strictly positive.
    pub matches: BTreeMap<usize, (usize, f64)>,
    /// After indices with no before counterpart (insertions).
    pub not_in_before: Vec<usize>,
    /// Before indices with no after counterpart (deletions).
    pub not_in_after: Vec<usize>,
}

impl DiffMatrix {
    /// Matched after indices.
    pub fn matched_after(&self) -> BTreeSet<usize> {
        self.matches.values().map(|&(after, _)| after).collect()
    }
}

/// Pair `before` with `after` by descending similarity.
///
/// Every pair is scored, then pairs are walked in ascending score order
/// (stable, before-major) and each one takes its slot unless the holder
/// scores strictly higher. Among equal scores the later pair wins. The walk
/// runs once to keep the best after-candidate per before-child, then once
/// more over those winners to keep the best before-candidate per
/// after-child. Zero scores never count as matches.
pub fn match_children(before: &[&Node], after: &[&Node], opts: &DiffOptions) -> DiffMatrix {
    let mut pairs: Vec<(usize, usize, f64)> = before
        .iter()
        .enumerate()
        .flat_map(|(i, b)| {
            after
                .iter()
                .enumerate()
                .map(move |(j, a)| (i, j, score(b, i, a, j, opts)))
        })
        .collect();
    pairs.sort_by(|x, y| x.2.total_cmp(&y.2));

    #[cfg(feature = "tracing")]
    for (i, j, s) in &pairs {
        crate::tracing_macros::trace!(before = i, after = j, score = s, "scored pair");
    }

    let best_after = pairs
        .iter()
        .fold(BTreeMap::new(), |acc, &(i, j, s)| claim(acc, i, j, s));

    let best_before = pairs
        .iter()
        .filter(|&&(i, j, _)| best_after.get(&i).map(|&(won, _)| won) == Some(j))
        .fold(BTreeMap::new(), |acc, &(i, j, s)| claim(acc, j, i, s));

    let matches: BTreeMap<usize, (usize, f64)> = best_before
        .into_iter()
        .filter(|&(_, (_, s))| s > 0.0)
        .map(|(j, (i, s))| (i, (j, s)))
        .collect();

    let matched_after: BTreeSet<usize> = matches.values().map(|&(j, _)| j).collect();
    let not_in_before = (0..after.len())
        .filter(|j| !matched_after.contains(j))
        .collect();
    let not_in_after = (0..before.len())
        .filter(|i| !matches.contains_key(i))
        .collect();

    DiffMatrix {
        matches,
        not_in_before,
        not_in_after,
    }
}

fn claim(
    mut slots: BTreeMap<usize, (usize, f64)>,
    slot: usize,
    candidate: usize,
    score: f64,
) -> BTreeMap<usize, (usize, f64)> {
    match slots.get(&slot) {
        Some(&(_, held)) if held > score => {}
        _ => {
            slots.insert(slot, (candidate, score));
        }
    }
    slots
}
