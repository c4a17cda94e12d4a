//! Named drivers, selectable by string.

use std::fmt;
use std::str::FromStr;

use crate::joining::greedy_join;
use crate::moving::greedy_move;
use crate::naive::{naive_greedy_join, naive_greedy_move};
use crate::partition::{Constraints, PartitioningArray};
use crate::triple::TripleCost;

/// Local-search driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    GreedyJoining,
    GreedyMoving,
    NaiveGreedyJoining,
    NaiveGreedyMoving,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AlgorithmError {
    /// No driver goes by this name.
    Unknown(String),
    /// The driver starts from joins and cannot honor constraints.
    ConstraintsUnsupported(Algorithm),
}

impl fmt::Display for AlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgorithmError::Unknown(name) => {
                let known: Vec<&str> = Algorithm::ALL.iter().map(|a| a.name()).collect();
                write!(f, "unknown algorithm {name:?} (known: {})", known.join(", "))
            }
            AlgorithmError::ConstraintsUnsupported(a) => {
                write!(f, "{a} does not support constraints")
            }
        }
    }
}

impl std::error::Error for AlgorithmError {}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::GreedyJoining,
        Algorithm::GreedyMoving,
        Algorithm::NaiveGreedyJoining,
        Algorithm::NaiveGreedyMoving,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::GreedyJoining => "GreedyJoining",
            Algorithm::GreedyMoving => "GreedyMoving",
            Algorithm::NaiveGreedyJoining => "NaiveGreedyJoining",
            Algorithm::NaiveGreedyMoving => "NaiveGreedyMoving",
        }
    }

    #[inline]
    pub fn supports_constraints(self) -> bool {
        matches!(self, Algorithm::GreedyMoving | Algorithm::NaiveGreedyMoving)
    }

    /// Run the driver to convergence.
    pub fn run<T, C: TripleCost<T> + ?Sized>(
        self,
        elements: &[T],
        cost: &C,
        constraints: Option<&Constraints>,
    ) -> Result<PartitioningArray, AlgorithmError> {
        if constraints.is_some() && !self.supports_constraints() {
            return Err(AlgorithmError::ConstraintsUnsupported(self));
        }
        Ok(match self {
            Algorithm::GreedyJoining => greedy_join(elements, cost),
            Algorithm::GreedyMoving => greedy_move(elements, cost, constraints),
            Algorithm::NaiveGreedyJoining => naive_greedy_join(elements, cost),
            Algorithm::NaiveGreedyMoving => naive_greedy_move(elements, cost, constraints),
        })
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = AlgorithmError;

    /// Case-insensitive; `-` and `_` are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name().to_lowercase() == key)
            .ok_or_else(|| AlgorithmError::Unknown(s.to_string()))
    }
}
