use super::*;
use crate::naive::{add_cost, best_move, naive_greedy_move, removal_cost, total_cost};
use crate::partition::SlotId;
use crate::testing::{first_letter, int_cost, IntCost, WORDS};
use crate::triple::Oracle;
use proptest::prelude::*;

/// Every row and cell of `engine` against a from-scratch evaluation.
fn assert_cache_matches(
    engine: &GreedyMoving<'_, usize, IntCost>,
    oracle: &Oracle<'_, usize, IntCost>,
    constraints: Option<&Constraints>,
) {
    let parts = engine.partitioning();
    let n = parts.len();
    let forbids = |a: usize, b: usize| constraints.is_some_and(|c| c.forbids(a, b));
    for e in 0..n {
        let home = parts.slot_of(e);
        assert_eq!(
            engine.removal_cost(e),
            removal_cost(oracle, parts.members(home), e, None),
            "removal cost of {e}"
        );
        for p in 0..parts.capacity() {
            let slot = SlotId(p);
            let members = parts.members(slot);
            let cell = engine.cell(e, slot);
            let blocked = members.iter().filter(|&&u| forbids(e, u)).count() as u32;
            assert_eq!(cell.blocked(), blocked, "blocked count of row {e} slot {p}");
            match cell.state() {
                CellState::Vacant => assert!(members.is_empty(), "row {e} slot {p}"),
                CellState::Home => assert_eq!(slot, home, "row {e} slot {p}"),
                CellState::Resolved(add) => {
                    assert!(members.len() >= 2 && slot != home, "row {e} slot {p}");
                    assert_eq!(*add, add_cost(oracle, members, e), "row {e} slot {p}");
                }
                CellState::Deferred(pm) => {
                    assert!(members.len() == 1 && slot != home, "row {e} slot {p}");
                    let s = members[0];
                    assert_eq!(pm.lone(), s);
                    assert_eq!(pm.costs().len(), n - e - 1);
                    for (t, &c) in pm.costs().iter().enumerate() {
                        let k = e + 1 + t;
                        let want = if k == s || forbids(e, k) || forbids(s, k) {
                            f64::INFINITY
                        } else {
                            oracle.at(e, s, k)
                                + removal_cost(oracle, parts.members(parts.slot_of(k)), k, Some(e))
                        };
                        assert_eq!(c, want, "row {e} slot {p} partner {k}");
                    }
                }
            }
        }
    }
    assert_eq!(engine.best(), best_move(oracle, parts, constraints));
}

/// Valid destinations of `e`: partitions by representative, then a fresh one.
fn options(engine: &GreedyMoving<'_, usize, IntCost>, e: usize) -> Vec<Destination> {
    let parts = engine.partitioning();
    let home = parts.slot_of(e);
    let mut out: Vec<Destination> = (0..parts.len())
        .filter(|&r| parts.is_representative(r))
        .filter(|&r| {
            let slot = parts.slot_of(r);
            slot != home && engine.cell(e, slot).blocked() == 0
        })
        .map(Destination::PartitionOf)
        .collect();
    if parts.size(home) >= 2 {
        out.push(Destination::NewSingleton);
    }
    out
}

fn fixed_cost(n: usize) -> IntCost {
    let values: Vec<i8> = (0..n * (n - 1) * (n - 2) / 6)
        .map(|i| ((i * 7 + 3) % 9) as i8 - 4)
        .collect();
    IntCost::from_values(n, &values)
}

#[test]
fn classify_covers_four_cases() {
    assert_eq!(MoveCase::classify(1, Some(1)), MoveCase::LoneToLone);
    assert_eq!(MoveCase::classify(1, Some(3)), MoveCase::LoneToGroup);
    assert_eq!(MoveCase::classify(2, Some(1)), MoveCase::SplitToLone { fresh: false });
    assert_eq!(MoveCase::classify(4, None), MoveCase::SplitToLone { fresh: true });
    assert_eq!(MoveCase::classify(2, Some(2)), MoveCase::SplitToGroup);
    assert!(MoveCase::LoneToGroup.vacates_source());
    assert!(!MoveCase::SplitToGroup.vacates_source());
}

#[test]
#[should_panic(expected = "fresh singleton")]
fn classify_rejects_lone_to_fresh() {
    MoveCase::classify(1, None);
}

#[test]
fn every_case_patches_the_cache() {
    let cost = fixed_cost(7);
    let xs = cost.elements();
    let oracle = Oracle::new(&xs, &cost);
    let mut engine = GreedyMoving::new(&xs, &cost, None);
    engine.initialize();
    assert_cache_matches(&engine, &oracle, None);

    let script = [
        (0, Destination::PartitionOf(1), MoveCase::LoneToLone),
        (2, Destination::PartitionOf(0), MoveCase::LoneToGroup),
        (1, Destination::NewSingleton, MoveCase::SplitToLone { fresh: true }),
        (0, Destination::PartitionOf(3), MoveCase::SplitToLone { fresh: false }),
        (4, Destination::PartitionOf(3), MoveCase::LoneToGroup),
        (5, Destination::PartitionOf(1), MoveCase::LoneToLone),
        (4, Destination::PartitionOf(5), MoveCase::SplitToGroup),
        (0, Destination::PartitionOf(6), MoveCase::SplitToLone { fresh: false }),
        (4, Destination::NewSingleton, MoveCase::SplitToLone { fresh: true }),
    ];
    for (e, dest, case) in script {
        let parts = engine.partitioning();
        let dest_size = match dest {
            Destination::PartitionOf(r) => Some(parts.size(parts.slot_of(r))),
            Destination::NewSingleton => None,
        };
        assert_eq!(MoveCase::classify(parts.size(parts.slot_of(e)), dest_size), case);
        engine.move_element(e, dest);
        assert_cache_matches(&engine, &oracle, None);
    }
    assert_eq!(engine.labels(), vec![0, 1, 2, 3, 4, 1, 0]);
}

#[test]
fn constrained_cells_are_blocked() {
    let cost = fixed_cost(6);
    let xs = cost.elements();
    let oracle = Oracle::new(&xs, &cost);
    let c = Constraints::from_pairs(6, [(0, 1), (2, 4), (1, 5)]).unwrap();
    let mut engine = GreedyMoving::new(&xs, &cost, Some(&c));
    engine.initialize();
    assert_cache_matches(&engine, &oracle, Some(&c));
    assert_eq!(engine.cell(0, SlotId(1)).blocked(), 1);
    engine.move_element(5, Destination::PartitionOf(0));
    assert_cache_matches(&engine, &oracle, Some(&c));
    // 1 is now blocked from {0, 5} twice over
    let slot = engine.partitioning().slot_of(0);
    assert_eq!(engine.cell(1, slot).blocked(), 2);
}

#[test]
#[should_panic(expected = "constrained")]
fn moving_into_constrained_partition_panics() {
    let cost = fixed_cost(4);
    let xs = cost.elements();
    let c = Constraints::from_pairs(4, [(0, 2)]).unwrap();
    let mut engine = GreedyMoving::new(&xs, &cost, Some(&c));
    engine.initialize();
    engine.move_element(0, Destination::PartitionOf(2));
}

#[test]
#[should_panic(expected = "already shares")]
fn moving_home_panics() {
    let cost = fixed_cost(4);
    let xs = cost.elements();
    let mut engine = GreedyMoving::new(&xs, &cost, None);
    engine.initialize();
    engine.move_element(1, Destination::PartitionOf(1));
}

#[test]
#[should_panic(expected = "fresh singleton")]
fn lone_element_cannot_detach() {
    let cost = fixed_cost(4);
    let xs = cost.elements();
    let mut engine = GreedyMoving::new(&xs, &cost, None);
    engine.initialize();
    engine.move_element(1, Destination::NewSingleton);
}

#[test]
fn first_letter_words_group_by_letter() {
    let labels = greedy_move(&WORDS, &first_letter, None);
    assert_eq!(labels, naive_greedy_move(&WORDS, &first_letter, None));
    let letter = |i: usize| WORDS[i].chars().next();
    for i in 0..WORDS.len() {
        for j in i + 1..WORDS.len() {
            assert!(labels[i] != labels[j] || letter(i) == letter(j), "{i} {j}");
        }
    }
    // b, but, big, brother
    assert!([3, 6, 8].iter().all(|&i| labels[i] == labels[0]));
    // hello, howdy, humor
    assert!([4, 9].iter().all(|&i| labels[i] == labels[2]));
}

#[test]
fn partner_moves_price_both_steps() {
    // only the triple (0, 1, 2) is cheap
    let xs = [0usize, 1, 2, 3];
    let cost = |a: &usize, b: &usize, c: &usize| {
        let mut t = [*a, *b, *c];
        t.sort_unstable();
        if t == [0, 1, 2] {
            -5.0
        } else {
            1.0
        }
    };
    let mut engine = GreedyMoving::new(&xs, &cost, None);
    let m = engine.initialize().unwrap();
    assert_eq!(m.element, 0);
    assert_eq!(m.destination, Destination::PartitionOf(1));
    assert_eq!(m.partner, Some(2));
    assert_eq!(m.cost, -5.0);
    assert_eq!(greedy_move(&xs, &cost, None), vec![0, 0, 0, 3]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Arbitrary valid move sequences keep every cell equal to its brute-force value.
    #[test]
    fn cache_matches_brute_force_under_any_moves(
        cost in int_cost(2, 9, 3),
        raw_pairs in proptest::collection::vec((0usize..9, 0usize..9), 0..6),
        picks in proptest::collection::vec((0usize..64, 0usize..64), 0..12),
    ) {
        let xs = cost.elements();
        let n = xs.len();
        let pairs = raw_pairs.into_iter().map(|(i, j)| (i % n, j % n)).filter(|(i, j)| i != j);
        let c = Constraints::from_pairs(n, pairs).unwrap();
        let oracle = Oracle::new(&xs, &cost);
        let mut engine = GreedyMoving::new(&xs, &cost, Some(&c));
        engine.initialize();
        assert_cache_matches(&engine, &oracle, Some(&c));
        for (x, y) in picks {
            let e = x % n;
            let opts = options(&engine, e);
            if opts.is_empty() {
                continue;
            }
            engine.move_element(e, opts[y % opts.len()]);
            assert_cache_matches(&engine, &oracle, Some(&c));
        }
    }

    /// The driver reproduces the brute-force driver, strictly descends by the
    /// reported cost and never co-locates a constrained pair.
    #[test]
    fn driver_matches_naive_and_descends(
        cost in int_cost(0, 10, 4),
        raw_pairs in proptest::collection::vec((0usize..10, 0usize..10), 0..8),
    ) {
        let xs = cost.elements();
        let n = xs.len();
        let pairs = raw_pairs
            .into_iter()
            .filter(|_| n > 1)
            .map(|(i, j)| (i % n.max(1), j % n.max(1)))
            .filter(|(i, j)| i != j);
        let c = Constraints::from_pairs(n, pairs).unwrap();

        let mut engine = GreedyMoving::new(&xs, &cost, Some(&c));
        let mut best = engine.initialize();
        let mut last = total_cost(&engine.labels(), &xs, &cost);
        while let Some(m) = best.filter(|m| m.cost < 0.0) {
            best = engine.move_element(m.element, m.destination);
            if let Some(k) = m.partner {
                best = engine.move_element(k, Destination::PartitionOf(m.element));
            }
            let now = total_cost(&engine.labels(), &xs, &cost);
            prop_assert_eq!(now - last, m.cost);
            last = now;
        }
        let labels = engine.labels();
        for (i, j) in c.pairs() {
            prop_assert_ne!(labels[i], labels[j]);
        }
        prop_assert_eq!(&labels, &naive_greedy_move(&xs, &cost, Some(&c)));
        prop_assert_eq!(&labels, &greedy_move(&xs, &cost, Some(&c)));
    }
}
