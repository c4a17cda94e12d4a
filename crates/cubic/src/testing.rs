//! Test fixtures: exact integer oracles and their proptest strategies.

use proptest::collection::vec;
use proptest::prelude::*;

use crate::triple::{TripleCost, TripleTable};

/// Oracle over element indices backed by a table of small integers, so every
/// sum the engines form is exact.
#[derive(Clone, Debug)]
pub(crate) struct IntCost(pub(crate) TripleTable);

impl IntCost {
    pub(crate) fn from_values(n: usize, values: &[i8]) -> Self {
        let mut it = values.iter();
        Self(TripleTable::build(n, |_, _, _| {
            f64::from(*it.next().expect("one value per triple"))
        }))
    }

    pub(crate) fn elements(&self) -> Vec<usize> {
        (0..self.0.len()).collect()
    }
}

impl TripleCost<usize> for IntCost {
    fn triple_cost(&self, a: &usize, b: &usize, c: &usize) -> f64 {
        self.0.get(*a, *b, *c)
    }
}

/// Element count in `lo..=hi` plus one value in `-spread..=spread` per triple.
pub(crate) fn int_cost(lo: usize, hi: usize, spread: i8) -> impl Strategy<Value = IntCost> {
    (lo..=hi).prop_flat_map(move |n| {
        let triples = n * n.saturating_sub(1) * n.saturating_sub(2) / 6;
        vec(-spread..=spread, triples).prop_map(move |v| IntCost::from_values(n, &v))
    })
}

/// The first-letter oracle: `-1` when all three words share their first
/// character, `+1` otherwise.
pub(crate) fn first_letter(a: &&str, b: &&str, c: &&str) -> f64 {
    let f = |s: &str| s.chars().next();
    if f(a) == f(b) && f(b) == f(c) {
        -1.0
    } else {
        1.0
    }
}

pub(crate) const WORDS: [&str; 10] = [
    "b", "c", "hello", "but", "howdy", "charly", "big", "delta", "brother", "humor",
];
