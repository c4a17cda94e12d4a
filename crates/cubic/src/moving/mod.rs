//! Greedy moving: repeatedly relocate the element (or forced pair of
//! elements) whose move lowers the objective the most.
//!
//! Purpose
//! - Keep, for every element, its removal cost and the cost of adding it to
//!   every other partition, so that a move patches the affected rows and
//!   columns instead of re-evaluating all triples.
//!
//! Why this design
//! - Moving an element next to a lone element completes no triple. Such a
//!   destination is *deferred*: it is priced by the cheapest second element
//!   that follows into the same partition, and that partner is part of the
//!   reported [`Move`].
//! - Columns are keyed by arena slot, so a partition keeps its column while
//!   members come and go; results name partitions by smallest member.
//! - The four shapes a relocation can have are spelled out as [`MoveCase`]
//!   and drive how the source and destination columns are patched.
//!
//! Tie-breaks: rows by ascending element, destinations by ascending
//! representative with the fresh singleton last, partners by ascending index.
//!
//! References
//! - Code cross-refs: `triple::TripleTable`, `partition::{Partitioning, Constraints}`,
//!   `naive::naive_greedy_move` (brute-force twin used by the tests).

mod cache;
mod engine;
mod types;

pub use cache::{CellState, MoveCell, PairMoves};
pub use engine::GreedyMoving;
pub use types::{Destination, Move, MoveCase};

use tracing::info;

use crate::partition::{Constraints, PartitioningArray};
use crate::triple::TripleCost;

/// Move while the cheapest candidate is strictly negative.
///
/// Returns labels naming each partition by its smallest member. Pairs
/// forbidden by `constraints` never share a partition.
pub fn greedy_move<T, C: TripleCost<T> + ?Sized>(
    elements: &[T],
    cost: &C,
    constraints: Option<&Constraints>,
) -> PartitioningArray {
    let mut engine = GreedyMoving::new(elements, cost, constraints);
    let mut best = engine.initialize();
    let mut steps = 0usize;
    while let Some(m) = best.filter(|m| m.cost < 0.0) {
        best = engine.move_element(m.element, m.destination);
        if let Some(k) = m.partner {
            best = engine.move_element(k, Destination::PartitionOf(m.element));
        }
        steps += 1;
    }
    info!(
        elements = elements.len(),
        steps,
        partitions = engine.partitioning().partition_count(),
        "greedy_move"
    );
    engine.labels()
}

#[cfg(test)]
mod tests;
