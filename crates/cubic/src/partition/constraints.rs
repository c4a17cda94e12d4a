//! Symmetric "must not share a partition" relation over element pairs.

use std::fmt;

/// Error when building [`Constraints`] from caller-supplied pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstraintError {
    /// A pair names an element outside `0..len`.
    OutOfRange { index: usize, len: usize },
    /// A pair names the same element twice.
    SelfPair(usize),
}

impl fmt::Display for ConstraintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintError::OutOfRange { index, len } => {
                write!(f, "constraint names element {index}, but there are only {len} elements")
            }
            ConstraintError::SelfPair(i) => {
                write!(f, "element {i} cannot be constrained against itself")
            }
        }
    }
}

impl std::error::Error for ConstraintError {}

/// Triangular boolean matrix: `forbids(i, j)` ⇔ `i` and `j` must end up in
/// different partitions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constraints {
    n: usize,
    cut: Vec<bool>,
}

#[inline]
fn pair_index(i: usize, j: usize) -> usize {
    let (lo, hi) = if i < j { (i, j) } else { (j, i) };
    hi * (hi - 1) / 2 + lo
}

impl Constraints {
    /// No pair is constrained.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            cut: vec![false; n * n.saturating_sub(1) / 2],
        }
    }

    /// Build from `(i, j)` pairs, validating every index.
    pub fn from_pairs<I>(n: usize, pairs: I) -> Result<Self, ConstraintError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut c = Self::new(n);
        for (i, j) in pairs {
            for index in [i, j] {
                if index >= n {
                    return Err(ConstraintError::OutOfRange { index, len: n });
                }
            }
            if i == j {
                return Err(ConstraintError::SelfPair(i));
            }
            c.forbid(i, j);
        }
        Ok(c)
    }

    /// Constrain every pair `i < j` for which `pred(i, j)` holds.
    pub fn from_predicate(n: usize, mut pred: impl FnMut(usize, usize) -> bool) -> Self {
        let mut c = Self::new(n);
        for j in 1..n {
            for i in 0..j {
                if pred(i, j) {
                    c.forbid(i, j);
                }
            }
        }
        c
    }

    /// Number of elements the relation is defined over.
    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Constrain `i` and `j`. Panics on a self pair or an index out of range.
    pub fn forbid(&mut self, i: usize, j: usize) {
        assert!(i != j, "element {i} cannot be constrained against itself");
        assert!(
            i < self.n && j < self.n,
            "pair ({i}, {j}) out of range for {} elements",
            self.n
        );
        self.cut[pair_index(i, j)] = true;
    }

    /// Symmetric; always false for `i == j`.
    #[inline]
    pub fn forbids(&self, i: usize, j: usize) -> bool {
        i != j && self.cut[pair_index(i, j)]
    }

    /// Constrained pairs `(i, j)` with `i < j`, ascending by `j` then `i`.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (1..self.n).flat_map(move |j| {
            (0..j)
                .map(move |i| (i, j))
                .filter(move |&(i, j)| self.forbids(i, j))
        })
    }
}
