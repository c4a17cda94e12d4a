//! Incremental greedy joining.

use tracing::debug;

use super::cache::{DeferredJoins, JoinCell, JoinRow};
use crate::partition::{Partitioning, PartitioningArray, SlotId};
use crate::triple::{Oracle, TripleCost};

/// A candidate join of two partitions (dense ids, `first < second`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Join {
    pub first: usize,
    pub second: usize,
    pub cost: f64,
}

/// Greedy joining state over borrowed elements and oracle.
///
/// Partitions carry dense ids `0..k` in creation order. Joining `p2` into
/// `p1 < p2` keeps `p1` and shifts every id above `p2` down by one.
pub struct GreedyJoining<'a, T, C: ?Sized> {
    oracle: Oracle<'a, T, C>,
    partitioning: Partitioning,
    order: Vec<SlotId>,
    rows: Vec<JoinRow>,
    best: Option<Join>,
}

impl<'a, T, C: TripleCost<T> + ?Sized> GreedyJoining<'a, T, C> {
    pub fn new(elements: &'a [T], cost: &'a C) -> Self {
        Self {
            oracle: Oracle::new(elements, cost),
            partitioning: Partitioning::singletons(0),
            order: Vec::new(),
            rows: Vec::new(),
            best: None,
        }
    }

    /// Reset to singletons and fill every cell; one oracle call per triple.
    pub fn initialize(&mut self) -> Option<Join> {
        let n = self.oracle.len();
        self.partitioning = Partitioning::singletons(n);
        self.order = (0..n).map(SlotId).collect();
        self.rows = (0..n)
            .map(|i| {
                let cells = (i + 1..n)
                    .map(|j| {
                        let costs = (j + 1..n).map(|k| self.oracle.at(i, j, k)).collect();
                        JoinCell::Deferred(DeferredJoins::from_costs(costs))
                    })
                    .collect();
                JoinRow::new(cells)
            })
            .collect();
        self.best = self.scan_best();
        self.best
    }

    #[inline]
    pub fn partition_count(&self) -> usize {
        self.rows.len()
    }

    /// Current cheapest join, if any candidate exists.
    #[inline]
    pub fn best(&self) -> Option<Join> {
        self.best
    }

    /// Cell `(i, j)` for partitions `i != j` (either order).
    pub fn cell(&self, i: usize, j: usize) -> &JoinCell {
        let (lo, hi) = self.check_pair(i, j);
        &self.rows[lo].cells[hi - lo - 1]
    }

    /// Sorted members of partition `id`.
    pub fn members(&self, id: usize) -> &[usize] {
        self.partitioning.members(self.order[id])
    }

    /// Dense labels: element → partition id.
    pub fn partitioning(&self) -> PartitioningArray {
        self.partitioning.labels_in_order(&self.order)
    }

    /// Join partitions `a` and `b` (either order) and patch the cache.
    ///
    /// Panics if the ids are equal or out of range.
    pub fn join(&mut self, a: usize, b: usize) -> Option<Join> {
        let (p1, p2) = self.check_pair(a, b);
        let k = self.rows.len();

        // Snapshot before any cell changes.
        let mut real_p1 = vec![0.0; k];
        let mut real_p2 = vec![0.0; k];
        let mut merged = vec![0.0; k];
        for x in (0..k).filter(|&x| x != p1 && x != p2) {
            real_p1[x] = self.real(x, p1);
            real_p2[x] = self.real(x, p2);
            merged[x] = real_p1[x] + real_p2[x] + self.cross(x, p1, p2);
        }

        // Rows above p1.
        for i in 0..p1 {
            let row = &mut self.rows[i];
            for j in i + 1..p1 {
                if let Some(d) = row.cells[j - i - 1].deferred_mut() {
                    let at_p1 = p1 - j - 1;
                    let at_p2 = p2 - j - 1;
                    let cross_p1 = d.get(at_p1) - real_p1[i] - real_p1[j];
                    let cross_p2 = d.get(at_p2) - real_p2[i] - real_p2[j];
                    d.set(at_p1, merged[i] + merged[j] + cross_p1 + cross_p2);
                    d.remove(at_p2);
                }
            }
            for j in p1 + 1..p2 {
                if let Some(d) = row.cells[j - i - 1].deferred_mut() {
                    d.remove(p2 - j - 1);
                }
            }
            row.cells[p1 - i - 1] = JoinCell::Resolved(merged[i]);
            row.cells.remove(p2 - i - 1);
            row.rescan();
        }

        // Row p1 becomes the merged partition.
        {
            let row = &mut self.rows[p1];
            for j in (p1 + 1..k).filter(|&j| j != p2) {
                row.cells[j - p1 - 1] = JoinCell::Resolved(merged[j]);
            }
            row.cells.remove(p2 - p1 - 1);
            row.rescan();
        }

        // Rows between p1 and p2.
        for i in p1 + 1..p2 {
            let row = &mut self.rows[i];
            for j in i + 1..p2 {
                if let Some(d) = row.cells[j - i - 1].deferred_mut() {
                    d.remove(p2 - j - 1);
                }
            }
            row.cells.remove(p2 - i - 1);
            row.rescan();
        }

        self.rows.remove(p2);
        let (into, from) = (self.order[p1], self.order[p2]);
        self.partitioning.absorb(into, from);
        self.order.remove(p2);
        self.best = self.scan_best();
        debug!(p1, p2, partitions = self.rows.len(), best = ?self.best, "join");
        self.best
    }

    fn check_pair(&self, a: usize, b: usize) -> (usize, usize) {
        let k = self.rows.len();
        assert!(a != b, "cannot join partition {a} with itself");
        assert!(a < k && b < k, "partitions ({a}, {b}) out of range for {k} partitions");
        if a < b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Join cost of two distinct partitions as currently cached.
    #[inline]
    fn real(&self, a: usize, b: usize) -> f64 {
        self.cell(a, b).real_cost()
    }

    /// Sum of the oracle over triples with one member in each of `a`, `b`, `c`.
    ///
    /// Read back from a deferred cell when the lower two partitions are both
    /// singletons; evaluated from the members otherwise.
    fn cross(&self, a: usize, b: usize, c: usize) -> f64 {
        let mut t = [a, b, c];
        t.sort_unstable();
        let [u, v, w] = t;
        if let Some(d) = self.rows[u].cells[v - u - 1].deferred() {
            return d.get(w - v - 1) - self.real(u, w) - self.real(v, w);
        }
        let mut sum = 0.0;
        for &x in self.members(u) {
            for &y in self.members(v) {
                for &z in self.members(w) {
                    sum += self.oracle.at(x, y, z);
                }
            }
        }
        sum
    }

    fn scan_best(&self) -> Option<Join> {
        let mut best: Option<Join> = None;
        for (i, row) in self.rows.iter().enumerate() {
            let Some(pos) = row.best else { continue };
            let cost = row.best_cost();
            if best.map_or(true, |b| cost < b.cost) {
                best = Some(Join {
                    first: i,
                    second: i + 1 + pos,
                    cost,
                });
            }
        }
        best
    }
}
