//! Curated internal API (UNSTABLE).
//!
//! Important
//! - This is not a public API. It is a convenience surface for project-internal
//!   code such as the CLI. Breaking changes are allowed and expected.

// Drivers
pub use crate::algorithm::{Algorithm, AlgorithmError};
pub use crate::joining::greedy_join;
pub use crate::moving::greedy_move;
pub use crate::naive::{naive_greedy_join, naive_greedy_move, total_cost};
// Engines and their caches
pub use crate::joining::{DeferredJoins, GreedyJoining, Join, JoinCell};
pub use crate::moving::{CellState, Destination, GreedyMoving, Move, MoveCase, MoveCell, PairMoves};
// State
pub use crate::partition::{ConstraintError, Constraints, Partitioning, PartitioningArray, SlotId};
pub use crate::triple::{TripleCost, TripleTable};
// Planes
pub use crate::planes::{
    dist_from_plane, evaluate, fit_plane, sample_planes, sample_random_planes, Evaluation, FitError,
    PlaneCost, PlaneSample, ReplayToken, SampleCfg, SampleError, Vec3,
};
