//! Incremental greedy moving.

use tracing::debug;

use super::cache::{CellState, MoveCell, MoveRow, PairMoves, Target};
use super::types::{Destination, Move, MoveCase};
use crate::partition::{Constraints, Partitioning, PartitioningArray, SlotId};
use crate::triple::{Oracle, TripleCost, TripleTable};

/// Greedy moving state over borrowed elements, oracle and constraints.
///
/// Cache columns are keyed by arena slot; public results name partitions by
/// their smallest member.
pub struct GreedyMoving<'a, T, C: ?Sized> {
    oracle: Oracle<'a, T, C>,
    constraints: Option<&'a Constraints>,
    table: TripleTable,
    parts: Partitioning,
    rows: Vec<MoveRow>,
    best: Option<Move>,
}

impl<'a, T, C: TripleCost<T> + ?Sized> GreedyMoving<'a, T, C> {
    /// Panics if `constraints` is defined over a different element count.
    pub fn new(elements: &'a [T], cost: &'a C, constraints: Option<&'a Constraints>) -> Self {
        if let Some(c) = constraints {
            assert_eq!(
                c.len(),
                elements.len(),
                "constraints cover {} elements, input has {}",
                c.len(),
                elements.len()
            );
        }
        Self {
            oracle: Oracle::new(elements, cost),
            constraints,
            table: TripleTable::build(0, |_, _, _| 0.0),
            parts: Partitioning::singletons(0),
            rows: Vec::new(),
            best: None,
        }
    }

    /// Reset to singletons, tabulate the oracle and fill every cell.
    pub fn initialize(&mut self) -> Option<Move> {
        let n = self.oracle.len();
        self.table = TripleTable::from_oracle(&self.oracle);
        self.parts = Partitioning::singletons(n);
        self.rows = (0..n)
            .map(|_| MoveRow {
                detach: 0.0,
                cells: Vec::with_capacity(n),
                best: None,
            })
            .collect();
        for e in 0..n {
            let cells: Vec<MoveCell> = (0..n)
                .map(|q| MoveCell {
                    blocked: u32::from(self.forbids(e, q)),
                    state: if q == e {
                        CellState::Home
                    } else {
                        CellState::Deferred(self.pair_moves(e, q))
                    },
                })
                .collect();
            self.rows[e].cells = cells;
        }
        self.best = self.second_pass();
        self.best
    }

    /// Current cheapest valid move, if any.
    #[inline]
    pub fn best(&self) -> Option<Move> {
        self.best
    }

    #[inline]
    pub fn partitioning(&self) -> &Partitioning {
        &self.parts
    }

    /// Labels naming each partition by its smallest member.
    pub fn labels(&self) -> PartitioningArray {
        self.parts.labels()
    }

    /// Cost of taking `element` out of its partition.
    #[inline]
    pub fn removal_cost(&self, element: usize) -> f64 {
        self.rows[element].detach
    }

    #[inline]
    pub fn cell(&self, element: usize, slot: SlotId) -> &MoveCell {
        &self.rows[element].cells[slot.0]
    }

    /// Relocate `element` and patch the cache.
    ///
    /// Panics if the element is out of range, already in the destination,
    /// constrained against a destination member, or alone and asked to open a
    /// fresh singleton.
    pub fn move_element(&mut self, element: usize, destination: Destination) -> Option<Move> {
        let n = self.parts.len();
        let m = element;
        assert!(m < n, "element {m} out of range for {n} elements");
        let a = self.parts.slot_of(m);
        let dest = match destination {
            Destination::PartitionOf(r) => {
                assert!(r < n, "element {r} out of range for {n} elements");
                let b = self.parts.slot_of(r);
                assert!(b != a, "element {m} already shares a partition with {r}");
                assert!(
                    self.rows[m].cells[b.0].blocked == 0,
                    "element {m} is constrained against the partition of {r}"
                );
                Some(b)
            }
            Destination::NewSingleton => None,
        };
        let case = MoveCase::classify(self.parts.size(a), dest.map(|b| self.parts.size(b)));
        let src_rest: Vec<usize> = self
            .parts
            .members(a)
            .iter()
            .copied()
            .filter(|&u| u != m)
            .collect();
        let dst_old: Vec<usize> = dest.map_or_else(Vec::new, |b| self.parts.members(b).to_vec());

        let old_detach = self.update_removal_costs(m, &src_rest, &dst_old);
        let b = self.parts.relocate(m, dest);
        self.update_blocked(m, a, b);
        self.patch_source(case, m, a, &src_rest, old_detach);
        self.patch_destination(case, m, b, &dst_old);

        let mut touched = src_rest;
        touched.push(m);
        touched.extend_from_slice(&dst_old);
        touched.sort_unstable();
        self.refresh_pairs(a, b, &touched);

        self.best = self.second_pass();
        debug!(
            element = m,
            ?case,
            partitions = self.parts.partition_count(),
            best = ?self.best,
            "move"
        );
        self.best
    }

    #[inline]
    fn forbids(&self, a: usize, b: usize) -> bool {
        self.constraints.is_some_and(|c| c.forbids(a, b))
    }

    /// Pair-move candidate `k` for row `e` towards lone `s`.
    fn pair_cost(&self, e: usize, s: usize, k: usize) -> f64 {
        if k == s || self.forbids(e, k) || self.forbids(s, k) {
            return f64::INFINITY;
        }
        let mut c = self.table.get(e, s, k) + self.rows[k].detach;
        if self.parts.same_partition(e, k) {
            for &x in self.parts.members(self.parts.slot_of(e)) {
                if x != e && x != k {
                    c += self.table.get(e, k, x);
                }
            }
        }
        c
    }

    fn pair_moves(&self, e: usize, s: usize) -> PairMoves {
        let n = self.parts.len();
        PairMoves::new(s, (e + 1..n).map(|k| self.pair_cost(e, s, k)).collect())
    }

    /// Adjust removal costs for `m` leaving `src_rest ∪ {m}` for `dst_old`.
    /// Returns the previous removal cost of `m`.
    fn update_removal_costs(&mut self, m: usize, src_rest: &[usize], dst_old: &[usize]) -> f64 {
        for &x in src_rest {
            let gain: f64 = src_rest
                .iter()
                .filter(|&&u| u != x)
                .map(|&u| self.table.get(x, m, u))
                .sum();
            self.rows[x].detach += gain;
        }
        for &x in dst_old {
            let loss: f64 = dst_old
                .iter()
                .filter(|&&u| u != x)
                .map(|&u| self.table.get(x, m, u))
                .sum();
            self.rows[x].detach -= loss;
        }
        let mut added = 0.0;
        for (idx, &u) in dst_old.iter().enumerate() {
            for &v in &dst_old[idx + 1..] {
                added += self.table.get(m, u, v);
            }
        }
        std::mem::replace(&mut self.rows[m].detach, -added)
    }

    fn update_blocked(&mut self, m: usize, a: SlotId, b: SlotId) {
        if self.constraints.is_none() {
            return;
        }
        for e in 0..self.parts.len() {
            if self.forbids(e, m) {
                let row = &mut self.rows[e];
                row.cells[a.0].blocked -= 1;
                row.cells[b.0].blocked += 1;
            }
        }
    }

    fn patch_source(
        &mut self,
        case: MoveCase,
        m: usize,
        a: SlotId,
        src_rest: &[usize],
        old_detach: f64,
    ) {
        let n = self.parts.len();
        if case.vacates_source() {
            for row in &mut self.rows {
                row.cells[a.0].state = CellState::Vacant;
            }
            return;
        }
        if let [s] = *src_rest {
            for e in (0..n).filter(|&e| e != s) {
                let pm = self.pair_moves(e, s);
                self.rows[e].cells[a.0].state = CellState::Deferred(pm);
            }
            return;
        }
        for e in 0..n {
            if e == m {
                self.rows[m].cells[a.0].state = CellState::Resolved(-old_detach);
                continue;
            }
            if self.parts.slot_of(e) == a {
                continue;
            }
            let shed: f64 = src_rest.iter().map(|&u| self.table.get(e, m, u)).sum();
            match &mut self.rows[e].cells[a.0].state {
                CellState::Resolved(add) => *add -= shed,
                other => unreachable!("source cell of row {e} was {other:?}"),
            }
        }
    }

    fn patch_destination(&mut self, case: MoveCase, m: usize, b: SlotId, dst_old: &[usize]) {
        let n = self.parts.len();
        match case {
            MoveCase::SplitToLone { fresh: true } => {
                for e in (0..n).filter(|&e| e != m) {
                    let pm = self.pair_moves(e, m);
                    self.rows[e].cells[b.0].state = CellState::Deferred(pm);
                }
            }
            MoveCase::LoneToLone | MoveCase::SplitToLone { fresh: false } => {
                let s = dst_old[0];
                for e in (0..n).filter(|&e| e != s && e != m) {
                    let add = self.table.get(e, s, m);
                    self.rows[e].cells[b.0].state = CellState::Resolved(add);
                }
            }
            MoveCase::LoneToGroup | MoveCase::SplitToGroup => {
                for e in 0..n {
                    if self.parts.slot_of(e) == b {
                        continue;
                    }
                    let gain: f64 = dst_old.iter().map(|&u| self.table.get(e, m, u)).sum();
                    match &mut self.rows[e].cells[b.0].state {
                        CellState::Resolved(add) => *add += gain,
                        other => unreachable!("destination cell of row {e} was {other:?}"),
                    }
                }
            }
        }
        self.rows[m].cells[b.0].state = CellState::Home;
    }

    /// Recompute the pair candidates in `touched` for every deferred cell
    /// outside the two columns the move rewrote.
    fn refresh_pairs(&mut self, a: SlotId, b: SlotId, touched: &[usize]) {
        let n = self.parts.len();
        let mut updates: Vec<(usize, f64)> = Vec::with_capacity(touched.len());
        let columns: Vec<usize> = self
            .parts
            .slots()
            .filter(|&p| p != a && p != b)
            .map(|p| p.0)
            .collect();
        for e in 0..n {
            for &p in &columns {
                let CellState::Deferred(pm) = &self.rows[e].cells[p].state else {
                    continue;
                };
                let s = pm.lone();
                updates.clear();
                for &k in touched.iter().filter(|&&k| k > e) {
                    updates.push((k - e - 1, self.pair_cost(e, s, k)));
                }
                if let CellState::Deferred(pm) = &mut self.rows[e].cells[p].state {
                    for &(pos, v) in &updates {
                        pm.set(pos, v);
                    }
                }
            }
        }
    }

    /// Cheapest valid target of row `e`: destinations by ascending
    /// representative, then the fresh singleton.
    fn row_best(&self, e: usize) -> Option<(Target, f64)> {
        let row = &self.rows[e];
        let mut best: Option<(Target, f64)> = None;
        let mut offer = |t: Target, c: f64| {
            if best.map_or(true, |(_, b)| c < b) {
                best = Some((t, c));
            }
        };
        for r in (0..self.parts.len()).filter(|&r| self.parts.is_representative(r)) {
            let slot = self.parts.slot_of(r);
            let cell = &row.cells[slot.0];
            if cell.blocked > 0 {
                continue;
            }
            match &cell.state {
                CellState::Resolved(add) => offer(Target::Slot(slot), row.detach + add),
                CellState::Deferred(pm) if pm.cost().is_finite() => {
                    offer(Target::Slot(slot), row.detach + pm.cost())
                }
                _ => {}
            }
        }
        if self.parts.size(self.parts.slot_of(e)) >= 2 {
            offer(Target::Detach, row.detach);
        }
        best
    }

    fn second_pass(&mut self) -> Option<Move> {
        let mut best: Option<Move> = None;
        for e in 0..self.rows.len() {
            let pick = self.row_best(e);
            self.rows[e].best = pick;
            let Some((target, cost)) = pick else { continue };
            if best.map_or(false, |b| cost >= b.cost) {
                continue;
            }
            let candidate = match target {
                Target::Detach => Move {
                    element: e,
                    destination: Destination::NewSingleton,
                    partner: None,
                    cost,
                },
                Target::Slot(slot) => {
                    let partner = match &self.rows[e].cells[slot.0].state {
                        CellState::Deferred(pm) => pm.best_partner(e),
                        _ => None,
                    };
                    let rep = self.parts.representative(slot);
                    let Some(rep) = rep else { continue };
                    Move {
                        element: e,
                        destination: Destination::PartitionOf(rep),
                        partner,
                        cost,
                    }
                }
            };
            best = Some(candidate);
        }
        best
    }
}
