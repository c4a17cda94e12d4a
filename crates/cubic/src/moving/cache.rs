//! Move-cost cache: one row per element, one cell per partition slot.

use crate::partition::SlotId;
use crate::util::Candidates;

/// Pair-move candidates of an element `e` towards a lone element.
///
/// Position `t` holds the candidate partner `e + 1 + t`; invalid partners
/// hold `+∞`.
#[derive(Clone, Debug, PartialEq)]
pub struct PairMoves {
    lone: usize,
    inner: Candidates,
}

impl PairMoves {
    pub(crate) fn new(lone: usize, inner: Vec<f64>) -> Self {
        Self {
            lone,
            inner: Candidates::new(inner),
        }
    }

    /// The lone element this cell leads to.
    #[inline]
    pub fn lone(&self) -> usize {
        self.lone
    }

    /// Partner costs excluding the row's removal cost.
    #[inline]
    pub fn costs(&self) -> &[f64] {
        self.inner.values()
    }

    /// Cheapest partner of row element `e`, lowest index on ties.
    #[inline]
    pub fn best_partner(&self, e: usize) -> Option<usize> {
        self.inner.best().map(|t| e + 1 + t)
    }

    /// Cheapest partner cost, `+∞` when no partner is valid.
    #[inline]
    pub fn cost(&self) -> f64 {
        self.inner.min()
    }

    #[inline]
    pub(crate) fn set(&mut self, pos: usize, value: f64) {
        self.inner.set(pos, value);
    }
}

/// What a slot means for a row element.
#[derive(Clone, Debug, PartialEq)]
pub enum CellState {
    /// The slot holds no partition.
    Vacant,
    /// The row element's own partition.
    Home,
    /// A partition of two or more: the cost of adding the element to it.
    Resolved(f64),
    /// A lone partition: adding the element alone completes no triple, so
    /// the cell carries the partner candidates.
    Deferred(PairMoves),
}

/// One cell: state plus the number of partition members constrained against
/// the row element. The cell is usable only while that count is zero.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveCell {
    pub(crate) blocked: u32,
    pub(crate) state: CellState,
}

impl MoveCell {
    #[inline]
    pub fn blocked(&self) -> u32 {
        self.blocked
    }

    #[inline]
    pub fn state(&self) -> &CellState {
        &self.state
    }
}

/// Row target as picked by the second pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Target {
    Slot(SlotId),
    Detach,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct MoveRow {
    /// Removal cost of the element from its partition.
    pub(crate) detach: f64,
    pub(crate) cells: Vec<MoveCell>,
    pub(crate) best: Option<(Target, f64)>,
}
