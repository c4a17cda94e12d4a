//! Triple-cost oracle and the dense table of its values.
//!
//! The oracle is caller supplied: any `Fn(&T, &T, &T) -> f64` works. It must
//! be pure, symmetric in its arguments and return finite values; none of this
//! is checked.

/// Cost of placing three elements in one partition.
pub trait TripleCost<T: ?Sized> {
    fn triple_cost(&self, a: &T, b: &T, c: &T) -> f64;
}

impl<T: ?Sized, F> TripleCost<T> for F
where
    F: Fn(&T, &T, &T) -> f64,
{
    #[inline]
    fn triple_cost(&self, a: &T, b: &T, c: &T) -> f64 {
        self(a, b, c)
    }
}

/// Borrowed elements plus oracle, addressed by index.
pub(crate) struct Oracle<'a, T, C: ?Sized> {
    elements: &'a [T],
    cost: &'a C,
}

impl<'a, T, C: TripleCost<T> + ?Sized> Oracle<'a, T, C> {
    pub(crate) fn new(elements: &'a [T], cost: &'a C) -> Self {
        Self { elements, cost }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub(crate) fn at(&self, i: usize, j: usize, k: usize) -> f64 {
        self.cost
            .triple_cost(&self.elements[i], &self.elements[j], &self.elements[k])
    }
}

#[inline]
fn choose2(n: usize) -> usize {
    if n < 2 {
        0
    } else {
        n * (n - 1) / 2
    }
}

#[inline]
fn choose3(n: usize) -> usize {
    if n < 3 {
        0
    } else {
        n * (n - 1) * (n - 2) / 6
    }
}

/// Oracle values for every unordered triple, stored once.
///
/// Layout: the triple `i < j < k` lives at `C(k,3) + C(j,2) + i`.
#[derive(Clone, Debug, PartialEq)]
pub struct TripleTable {
    n: usize,
    values: Vec<f64>,
}

impl TripleTable {
    /// Evaluate `f(i, j, k)` once for every `i < j < k < n`.
    pub fn build(n: usize, mut f: impl FnMut(usize, usize, usize) -> f64) -> Self {
        let mut values = Vec::with_capacity(choose3(n));
        for k in 2..n {
            for j in 1..k {
                for i in 0..j {
                    values.push(f(i, j, k));
                }
            }
        }
        Self { n, values }
    }

    pub(crate) fn from_oracle<T, C: TripleCost<T> + ?Sized>(oracle: &Oracle<'_, T, C>) -> Self {
        Self::build(oracle.len(), |i, j, k| oracle.at(i, j, k))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Cached value for three distinct indices in any order.
    ///
    /// Panics on repeated or out-of-range indices.
    #[inline]
    pub fn get(&self, a: usize, b: usize, c: usize) -> f64 {
        let mut t = [a, b, c];
        t.sort_unstable();
        let [i, j, k] = t;
        assert!(i < j && j < k, "triple ({a}, {b}, {c}) repeats an index");
        assert!(k < self.n, "triple ({a}, {b}, {c}) out of range for {} elements", self.n);
        self.values[choose3(k) + choose2(j) + i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_oracle_in_any_order() {
        let f = |i: usize, j: usize, k: usize| (i * 100 + j * 10 + k) as f64;
        let t = TripleTable::build(6, f);
        for k in 2..6 {
            for j in 1..k {
                for i in 0..j {
                    let want = f(i, j, k);
                    assert_eq!(t.get(i, j, k), want);
                    assert_eq!(t.get(k, i, j), want);
                    assert_eq!(t.get(j, k, i), want);
                }
            }
        }
    }

    #[test]
    fn build_calls_oracle_once_per_triple() {
        let mut calls = 0;
        let _ = TripleTable::build(7, |_, _, _| {
            calls += 1;
            0.0
        });
        assert_eq!(calls, 35);
    }

    #[test]
    fn closures_are_oracles() {
        let cost = |a: &i32, b: &i32, c: &i32| f64::from(a + b + c);
        let xs = [1, 2, 3];
        let oracle = Oracle::new(&xs, &cost);
        assert_eq!(oracle.at(0, 1, 2), 6.0);
    }

    #[test]
    #[should_panic(expected = "repeats an index")]
    fn repeated_index_panics() {
        let t = TripleTable::build(4, |_, _, _| 1.0);
        t.get(1, 2, 1);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_panics() {
        let t = TripleTable::build(4, |_, _, _| 1.0);
        t.get(1, 2, 4);
    }
}
