//! Brute-force twins of the greedy drivers.
//!
//! Every step re-evaluates every candidate from the oracle; nothing is cached.
//! Candidate sets, cost definitions and tie-breaks match the incremental
//! engines exactly, so with an exact oracle both produce the same labels.

use tracing::info;

use crate::joining::Join;
use crate::moving::{Destination, Move};
use crate::partition::{Constraints, Partitioning, PartitioningArray};
use crate::triple::{Oracle, TripleCost};

/// Sum of the oracle over every triple whose members share a label.
pub fn total_cost<T, C: TripleCost<T> + ?Sized>(
    labels: &[usize],
    elements: &[T],
    cost: &C,
) -> f64 {
    assert_eq!(labels.len(), elements.len(), "one label per element");
    let n = elements.len();
    let mut sum = 0.0;
    for i in 0..n {
        for j in i + 1..n {
            if labels[i] != labels[j] {
                continue;
            }
            for k in j + 1..n {
                if labels[k] == labels[i] {
                    sum += cost.triple_cost(&elements[i], &elements[j], &elements[k]);
                }
            }
        }
    }
    sum
}

/// Change of the objective when `x` and `y` are merged.
pub(crate) fn join_cost<T, C: TripleCost<T> + ?Sized>(
    oracle: &Oracle<'_, T, C>,
    x: &[usize],
    y: &[usize],
) -> f64 {
    let mut sum = 0.0;
    for (a, b) in [(x, y), (y, x)] {
        for &u in a {
            for (idx, &v) in b.iter().enumerate() {
                for &w in &b[idx + 1..] {
                    sum += oracle.at(u, v, w);
                }
            }
        }
    }
    sum
}

/// Change of the objective when `x`, `y` and `z` are merged at once.
pub(crate) fn three_way_cost<T, C: TripleCost<T> + ?Sized>(
    oracle: &Oracle<'_, T, C>,
    x: &[usize],
    y: &[usize],
    z: &[usize],
) -> f64 {
    let mut cross = 0.0;
    for &u in x {
        for &v in y {
            for &w in z {
                cross += oracle.at(u, v, w);
            }
        }
    }
    join_cost(oracle, x, y) + join_cost(oracle, x, z) + join_cost(oracle, y, z) + cross
}

/// Cheapest join over `groups` in creation order.
pub(crate) fn best_join<T, C: TripleCost<T> + ?Sized>(
    oracle: &Oracle<'_, T, C>,
    groups: &[Vec<usize>],
) -> Option<Join> {
    let k = groups.len();
    let mut best: Option<Join> = None;
    for i in 0..k {
        for j in i + 1..k {
            let cost = if groups[i].len() == 1 && groups[j].len() == 1 {
                let mut c = f64::INFINITY;
                for l in j + 1..k {
                    c = c.min(three_way_cost(oracle, &groups[i], &groups[j], &groups[l]));
                }
                c
            } else {
                join_cost(oracle, &groups[i], &groups[j])
            };
            if cost.is_finite() && best.map_or(true, |b| cost < b.cost) {
                best = Some(Join {
                    first: i,
                    second: j,
                    cost,
                });
            }
        }
    }
    best
}

/// Greedy joining without a cache.
pub fn naive_greedy_join<T, C: TripleCost<T> + ?Sized>(
    elements: &[T],
    cost: &C,
) -> PartitioningArray {
    let oracle = Oracle::new(elements, cost);
    let mut groups: Vec<Vec<usize>> = (0..elements.len()).map(|i| vec![i]).collect();
    let mut steps = 0usize;
    while let Some(j) = best_join(&oracle, &groups).filter(|j| j.cost < 0.0) {
        let moved = groups.remove(j.second);
        groups[j.first].extend(moved);
        groups[j.first].sort_unstable();
        steps += 1;
    }
    info!(
        elements = elements.len(),
        steps,
        partitions = groups.len(),
        "naive_greedy_join"
    );
    let mut labels = vec![0; elements.len()];
    for (id, g) in groups.iter().enumerate() {
        for &m in g {
            labels[m] = id;
        }
    }
    labels
}

/// `−Σ T(e, u, v)` over pairs of `members` other than `e` and `skip`.
pub(crate) fn removal_cost<T, C: TripleCost<T> + ?Sized>(
    oracle: &Oracle<'_, T, C>,
    members: &[usize],
    e: usize,
    skip: Option<usize>,
) -> f64 {
    let rest: Vec<usize> = members
        .iter()
        .copied()
        .filter(|&u| u != e && Some(u) != skip)
        .collect();
    let mut sum = 0.0;
    for (idx, &u) in rest.iter().enumerate() {
        for &v in &rest[idx + 1..] {
            sum += oracle.at(e, u, v);
        }
    }
    -sum
}

/// `Σ T(e, u, v)` over pairs of `members`.
pub(crate) fn add_cost<T, C: TripleCost<T> + ?Sized>(
    oracle: &Oracle<'_, T, C>,
    members: &[usize],
    e: usize,
) -> f64 {
    -removal_cost(oracle, members, e, None)
}

/// Cheapest valid move over the current partitioning.
///
/// Rows by ascending element; destinations by ascending representative with
/// the fresh singleton last; partners by ascending index.
pub(crate) fn best_move<T, C: TripleCost<T> + ?Sized>(
    oracle: &Oracle<'_, T, C>,
    parts: &Partitioning,
    constraints: Option<&Constraints>,
) -> Option<Move> {
    let n = parts.len();
    let forbids = |a: usize, b: usize| constraints.is_some_and(|c| c.forbids(a, b));
    let mut best: Option<Move> = None;
    let mut offer = |m: Move| {
        if best.map_or(true, |b| m.cost < b.cost) {
            best = Some(m);
        }
    };
    for e in 0..n {
        let home = parts.slot_of(e);
        let detach = removal_cost(oracle, parts.members(home), e, None);
        for r in (0..n).filter(|&r| parts.is_representative(r)) {
            let dest = parts.slot_of(r);
            if dest == home {
                continue;
            }
            let q = parts.members(dest);
            if q.iter().any(|&u| forbids(e, u)) {
                continue;
            }
            if q.len() >= 2 {
                offer(Move {
                    element: e,
                    destination: Destination::PartitionOf(r),
                    partner: None,
                    cost: detach + add_cost(oracle, q, e),
                });
                continue;
            }
            let s = q[0];
            let mut pick: Option<(usize, f64)> = None;
            for k in e + 1..n {
                if k == s || forbids(e, k) || forbids(s, k) {
                    continue;
                }
                let left = removal_cost(oracle, parts.members(parts.slot_of(k)), k, Some(e));
                let c = oracle.at(e, s, k) + left;
                if pick.map_or(true, |(_, b)| c < b) {
                    pick = Some((k, c));
                }
            }
            if let Some((k, c)) = pick {
                offer(Move {
                    element: e,
                    destination: Destination::PartitionOf(r),
                    partner: Some(k),
                    cost: detach + c,
                });
            }
        }
        if parts.size(home) >= 2 {
            offer(Move {
                element: e,
                destination: Destination::NewSingleton,
                partner: None,
                cost: detach,
            });
        }
    }
    best
}

/// Apply `m` (and its partner) to `parts`.
pub(crate) fn apply_move(parts: &mut Partitioning, m: &Move) {
    let dest = match m.destination {
        Destination::PartitionOf(r) => Some(parts.slot_of(r)),
        Destination::NewSingleton => None,
    };
    let slot = parts.relocate(m.element, dest);
    if let Some(k) = m.partner {
        parts.relocate(k, Some(slot));
    }
}

/// Greedy moving without a cache.
pub fn naive_greedy_move<T, C: TripleCost<T> + ?Sized>(
    elements: &[T],
    cost: &C,
    constraints: Option<&Constraints>,
) -> PartitioningArray {
    let oracle = Oracle::new(elements, cost);
    let mut parts = Partitioning::singletons(elements.len());
    let mut steps = 0usize;
    while let Some(m) = best_move(&oracle, &parts, constraints).filter(|m| m.cost < 0.0) {
        apply_move(&mut parts, &m);
        steps += 1;
    }
    info!(
        elements = elements.len(),
        steps,
        partitions = parts.partition_count(),
        "naive_greedy_move"
    );
    parts.labels()
}
