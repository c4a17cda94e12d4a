//! Greedy joining: repeatedly merge the two partitions whose union lowers the
//! objective the most.
//!
//! Purpose
//! - Start from singletons and keep a cache of every pairwise join cost so a
//!   merge step patches `O(k²)` cells instead of re-evaluating `O(n³)` triples.
//!
//! Why this design
//! - Joining two singletons never completes a triple, so its plain cost is
//!   always zero. Such a cell is *deferred*: it carries the three-way costs of
//!   merging the pair with each higher partition and is ranked by their
//!   minimum. It matures into a resolved cost as soon as either side grows.
//! - Cache cells are an explicit [`JoinCell`] enum rather than a nullable list.
//!
//! References
//! - Code cross-refs: `partition::Partitioning` (membership), `naive::naive_greedy_join`
//!   (brute-force twin used by the tests).

mod cache;
mod engine;

pub use cache::{DeferredJoins, JoinCell};
pub use engine::{GreedyJoining, Join};

use tracing::info;

use crate::partition::PartitioningArray;
use crate::triple::TripleCost;

/// Join while the cheapest candidate is strictly negative.
///
/// Returns dense labels in creation order.
pub fn greedy_join<T, C: TripleCost<T> + ?Sized>(elements: &[T], cost: &C) -> PartitioningArray {
    let mut engine = GreedyJoining::new(elements, cost);
    let mut best = engine.initialize();
    let mut steps = 0usize;
    while let Some(j) = best.filter(|j| j.cost < 0.0) {
        best = engine.join(j.first, j.second);
        steps += 1;
    }
    info!(
        elements = elements.len(),
        steps,
        partitions = engine.partition_count(),
        "greedy_join"
    );
    engine.partitioning()
}
