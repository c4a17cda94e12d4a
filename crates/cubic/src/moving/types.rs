//! Moves, destinations and the four patching cases.

/// Where an element goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Destination {
    /// The partition currently containing the given element.
    PartitionOf(usize),
    /// A brand-new singleton partition.
    NewSingleton,
}

/// A candidate move with its exact change of the objective.
///
/// With a `partner`, the element first joins the lone element named by
/// `destination`, then the partner follows into the same partition; `cost`
/// covers both steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Move {
    pub element: usize,
    pub destination: Destination,
    pub partner: Option<usize>,
    pub cost: f64,
}

/// Shape of a single relocation, deciding how the source and destination
/// columns of the cache are patched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveCase {
    /// Lone element joins a lone element; the source slot is vacated and the
    /// destination gains its second member.
    LoneToLone,
    /// Lone element joins a partition of two or more.
    LoneToGroup,
    /// Element leaves a group and joins a lone element, or opens a fresh
    /// singleton when `fresh`.
    SplitToLone { fresh: bool },
    /// Element leaves a group and joins another group.
    SplitToGroup,
}

impl MoveCase {
    /// Classify by the source size (including the element) and the
    /// destination size (`None` for a fresh singleton).
    ///
    /// Panics for an empty source or destination, and for a lone element
    /// asked to open a fresh singleton.
    pub fn classify(source_size: usize, destination_size: Option<usize>) -> Self {
        assert!(source_size > 0, "source partition is empty");
        let lone = source_size == 1;
        match destination_size {
            None => {
                assert!(!lone, "a lone element cannot move into a fresh singleton");
                MoveCase::SplitToLone { fresh: true }
            }
            Some(0) => panic!("destination partition is empty"),
            Some(1) if lone => MoveCase::LoneToLone,
            Some(_) if lone => MoveCase::LoneToGroup,
            Some(1) => MoveCase::SplitToLone { fresh: false },
            Some(_) => MoveCase::SplitToGroup,
        }
    }

    /// The source partition disappears.
    #[inline]
    pub fn vacates_source(self) -> bool {
        matches!(self, MoveCase::LoneToLone | MoveCase::LoneToGroup)
    }
}
