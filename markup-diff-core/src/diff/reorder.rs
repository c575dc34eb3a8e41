//! Turns matched sibling positions into reorder cycles.

use std::collections::BTreeMap;

use crate::diff::patch::PatchOp;

/// Reorders that put matched children into after-tree order.
///
/// `mapping` pairs before positions with after positions, `inserted` lists
/// after positions with no counterpart and `deleted` before positions with
/// no counterpart. The reorders assume deletions and insertions were already
/// applied, so every position they name is a post-insertion position.
///
/// Two-element cycles become swaps, expanded into adjacent swaps when the
/// two positions are not neighbours. Every longer cycle is folded into a
/// single composite reorder emitted first. With more than one long cycle
/// among the same siblings that composite is not a valid cycle.
pub fn extract_reorders(
    mapping: &BTreeMap<usize, usize>,
    inserted: &[usize],
    deleted: &[usize],
) -> Vec<PatchOp> {
    let moved = current_positions(mapping, inserted, deleted);

    let (open, swaps) = moved.iter().rev().fold(
        (Vec::new(), Vec::new()),
        |(mut open, mut swaps): (Vec<(usize, usize)>, Vec<(usize, usize)>), &(from, to)| {
            if let Some(pos) = open.iter().position(|&pair| pair == (to, from)) {
                open.remove(pos);
                swaps.push((from.min(to), from.max(to)));
            } else {
                open.push((from, to));
            }
            (open, swaps)
        },
    );

    let composite = flatten_cycles(&open);
    let adjacent = swaps
        .into_iter()
        .flat_map(|(lo, hi)| adjacent_swaps(lo, hi));

    let head = (!composite.is_empty()).then_some(composite);
    head.into_iter()
        .chain(adjacent)
        .map(|permutation| PatchOp::Reorder { permutation })
        .collect()
}

// (current position, target position) for every child that actually moves,
// ascending by current position.
fn current_positions(
    mapping: &BTreeMap<usize, usize>,
    inserted: &[usize],
    deleted: &[usize],
) -> Vec<(usize, usize)> {
    let after_deletions: Vec<(usize, usize)> = mapping
        .iter()
        .map(|(&before, &after)| {
            let removed_ahead = deleted.iter().filter(|&&d| d < before).count();
            (before - removed_ahead, after)
        })
        .collect();

    let mut slots = inserted.to_vec();
    slots.sort_unstable();
    let after_insertions = slots.iter().fold(after_deletions, |pairs, &slot| {
        pairs
            .into_iter()
            .map(|(current, after)| {
                if current >= slot {
                    (current + 1, after)
                } else {
                    (current, after)
                }
            })
            .collect()
    });

    after_insertions
        .into_iter()
        .filter(|(current, after)| current != after)
        .collect()
}

fn flatten_cycles(open: &[(usize, usize)]) -> Vec<usize> {
    let next: BTreeMap<usize, usize> = open.iter().copied().collect();
    let mut out = Vec::new();
    for &(start, _) in open {
        let mut at = start;
        while !out.contains(&at) {
            out.push(at);
            match next.get(&at) {
                Some(&to) => at = to,
                None => break,
            }
        }
    }
    out
}

// Swaps of neighbours whose composition exchanges `lo` and `hi`.
fn adjacent_swaps(lo: usize, hi: usize) -> Vec<Vec<usize>> {
    let forward = (lo..hi).map(|k| vec![k, k + 1]);
    let back = (lo..hi.saturating_sub(1)).rev().map(|k| vec![k, k + 1]);
    forward.chain(back).collect()
}
