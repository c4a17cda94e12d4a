//! Local search for cubic (triple-cost) clustering.
//!
//! Elements `0..n` are grouped into disjoint partitions so as to locally
//! minimize the sum of a caller-supplied cost over every triple of elements
//! that share a partition. Two incremental engines do the work:
//! - [`joining`]: start from singletons and merge partitions greedily;
//! - [`moving`]: start from singletons and relocate elements greedily, with
//!   optional "must not share a partition" [`Constraints`].
//!
//! [`naive`] holds brute-force twins of both drivers; [`planes`] is the 3D
//! plane-fitting application the cost model was built for.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API.
//! - Prefer clarity and better design over compatibility; breaking changes
//!   are fine when they improve quality.

pub mod algorithm;
pub mod api;
pub mod joining;
pub mod moving;
pub mod naive;
pub mod partition;
pub mod planes;
pub mod triple;

mod util;

#[cfg(test)]
mod testing;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use algorithm::{Algorithm, AlgorithmError};
pub use partition::{Constraints, PartitioningArray};
pub use triple::TripleCost;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::algorithm::Algorithm;
    pub use crate::joining::{greedy_join, GreedyJoining, Join};
    pub use crate::moving::{greedy_move, Destination, GreedyMoving, Move};
    pub use crate::naive::total_cost;
    pub use crate::partition::{Constraints, PartitioningArray};
    pub use crate::planes::{PlaneCost, Vec3};
    pub use crate::triple::TripleCost;
}
