//! Join-cost cache: one row per partition, one cell per higher partition.

use crate::util::{first_min, Candidates};

/// Three-way merge costs of a pair of singletons, indexed by third partition.
///
/// Position `t` of the cell `(i, j)` holds the candidate with partition
/// `j + 1 + t`.
#[derive(Clone, Debug, PartialEq)]
pub struct DeferredJoins(Candidates);

impl DeferredJoins {
    pub(crate) fn from_costs(costs: Vec<f64>) -> Self {
        Self(Candidates::new(costs))
    }

    #[inline]
    pub fn costs(&self) -> &[f64] {
        self.0.values()
    }

    /// Position of the cheapest candidate (lowest position on ties).
    #[inline]
    pub fn best(&self) -> Option<usize> {
        self.0.best()
    }

    /// Cheapest candidate, `+∞` when there is none.
    #[inline]
    pub fn cost(&self) -> f64 {
        self.0.min()
    }

    #[inline]
    pub(crate) fn get(&self, pos: usize) -> f64 {
        self.0.get(pos)
    }

    #[inline]
    pub(crate) fn set(&mut self, pos: usize, value: f64) {
        self.0.set(pos, value);
    }

    #[inline]
    pub(crate) fn remove(&mut self, pos: usize) {
        self.0.remove(pos);
    }
}

/// One cell of the join-cost cache.
#[derive(Clone, Debug, PartialEq)]
pub enum JoinCell {
    /// At least one side has several members: the plain join cost.
    Resolved(f64),
    /// Both sides are singletons: joining them alone costs nothing, so the
    /// cell carries the three-way candidates instead.
    Deferred(DeferredJoins),
}

impl JoinCell {
    /// Cost the engine ranks this cell by.
    #[inline]
    pub fn cost(&self) -> f64 {
        match self {
            JoinCell::Resolved(c) => *c,
            JoinCell::Deferred(d) => d.cost(),
        }
    }

    /// Actual change of the objective when the pair is joined.
    #[inline]
    pub fn real_cost(&self) -> f64 {
        match self {
            JoinCell::Resolved(c) => *c,
            JoinCell::Deferred(_) => 0.0,
        }
    }

    #[inline]
    pub fn deferred(&self) -> Option<&DeferredJoins> {
        match self {
            JoinCell::Deferred(d) => Some(d),
            JoinCell::Resolved(_) => None,
        }
    }

    #[inline]
    pub(crate) fn deferred_mut(&mut self) -> Option<&mut DeferredJoins> {
        match self {
            JoinCell::Deferred(d) => Some(d),
            JoinCell::Resolved(_) => None,
        }
    }
}

/// Cells `(i, j)` for every `j > i`, at position `j - i - 1`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct JoinRow {
    pub(crate) cells: Vec<JoinCell>,
    pub(crate) best: Option<usize>,
}

impl JoinRow {
    pub(crate) fn new(cells: Vec<JoinCell>) -> Self {
        let mut row = Self { cells, best: None };
        row.rescan();
        row
    }

    pub(crate) fn rescan(&mut self) {
        self.best = first_min(self.cells.iter().map(JoinCell::cost));
    }

    #[inline]
    pub(crate) fn best_cost(&self) -> f64 {
        self.best.map_or(f64::INFINITY, |b| self.cells[b].cost())
    }
}
