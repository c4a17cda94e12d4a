//! Partition state shared by both local-search engines.
//!
//! Purpose
//! - Hold the current grouping of element indices `0..n` as one arena of
//!   partition records addressed by stable [`SlotId`]s, plus the element → slot
//!   map. Per-element label arrays are derived views.
//! - Hold the optional "must not share a partition" relation ([`Constraints`]).
//!
//! Why this design
//! - The joining engine needs dense creation-ordered ids that shift on every
//!   merge; the moving engine needs ids that stay put while elements travel.
//!   A single arena serves both: the joining engine keeps its own dense order
//!   over slots, the moving engine keys its cache columns by slot.
//!
//! Code cross-refs: `joining::GreedyJoining`, `moving::GreedyMoving`, `naive`.

mod arena;
mod constraints;

pub use arena::{Partitioning, PartitioningArray, SlotId};
pub use constraints::{ConstraintError, Constraints};
