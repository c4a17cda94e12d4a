//! Arena of partition records.

/// Per-element partition labels: equal values ⇔ same partition.
pub type PartitioningArray = Vec<usize>;

/// Stable identifier of a partition record inside a [`Partitioning`].
///
/// A slot keeps its id while members come and go; an emptied slot is recycled
/// for the next fresh partition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub usize);

/// Disjoint grouping of the elements `0..n`.
///
/// Invariants
/// - every element is listed in exactly one slot, and `slot_of` agrees;
/// - member lists are sorted ascending;
/// - `free` lists exactly the empty slots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partitioning {
    groups: Vec<Vec<usize>>,
    slot_of: Vec<SlotId>,
    free: Vec<usize>,
}

impl Partitioning {
    /// Every element in its own partition; element `i` lives in slot `i`.
    pub fn singletons(n: usize) -> Self {
        Self {
            groups: (0..n).map(|i| vec![i]).collect(),
            slot_of: (0..n).map(SlotId).collect(),
            free: Vec::new(),
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.slot_of.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slot_of.is_empty()
    }

    /// Number of slots (used and free). Never exceeds the element count.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.groups.len()
    }

    /// Number of non-empty partitions.
    #[inline]
    pub fn partition_count(&self) -> usize {
        self.groups.len() - self.free.len()
    }

    #[inline]
    pub fn slot_of(&self, element: usize) -> SlotId {
        self.slot_of[element]
    }

    /// Sorted members of `slot` (empty for a free slot).
    #[inline]
    pub fn members(&self, slot: SlotId) -> &[usize] {
        &self.groups[slot.0]
    }

    #[inline]
    pub fn size(&self, slot: SlotId) -> usize {
        self.groups[slot.0].len()
    }

    /// Smallest member of `slot`, if any.
    #[inline]
    pub fn representative(&self, slot: SlotId) -> Option<usize> {
        self.groups[slot.0].first().copied()
    }

    /// True iff `element` is the smallest member of its partition.
    #[inline]
    pub fn is_representative(&self, element: usize) -> bool {
        self.groups[self.slot_of[element].0][0] == element
    }

    #[inline]
    pub fn same_partition(&self, a: usize, b: usize) -> bool {
        self.slot_of[a] == self.slot_of[b]
    }

    /// Non-empty slots in ascending slot order.
    pub fn slots(&self) -> impl Iterator<Item = SlotId> + '_ {
        self.groups
            .iter()
            .enumerate()
            .filter(|(_, g)| !g.is_empty())
            .map(|(i, _)| SlotId(i))
    }

    /// Move `element` into `dest`, or into a recycled empty slot when `dest` is
    /// `None`. Returns the slot the element ends up in.
    ///
    /// Panics if `dest` is the element's current slot or a free slot, or if no
    /// free slot exists for a fresh partition.
    pub fn relocate(&mut self, element: usize, dest: Option<SlotId>) -> SlotId {
        let src = self.slot_of[element];
        let target = match dest {
            Some(slot) => {
                assert!(slot != src, "element {element} is already in slot {}", slot.0);
                assert!(
                    !self.groups[slot.0].is_empty(),
                    "slot {} is free; pass None to open a fresh partition",
                    slot.0
                );
                slot
            }
            None => {
                assert!(
                    self.groups[src.0].len() > 1,
                    "element {element} is alone; it cannot open a fresh partition"
                );
                let idx = self
                    .free
                    .pop()
                    .unwrap_or_else(|| panic!("no free slot for element {element}"));
                SlotId(idx)
            }
        };
        let group = &mut self.groups[src.0];
        if let Ok(pos) = group.binary_search(&element) {
            group.remove(pos);
        }
        if group.is_empty() {
            self.free.push(src.0);
        }
        let group = &mut self.groups[target.0];
        let pos = group.binary_search(&element).unwrap_or_else(|p| p);
        group.insert(pos, element);
        self.slot_of[element] = target;
        target
    }

    /// Merge every member of `from` into `into`; `from` becomes free.
    pub fn absorb(&mut self, into: SlotId, from: SlotId) {
        assert!(into != from, "cannot absorb slot {} into itself", into.0);
        let moved = std::mem::take(&mut self.groups[from.0]);
        assert!(!moved.is_empty(), "slot {} is free", from.0);
        for &m in &moved {
            self.slot_of[m] = into;
        }
        let target = &mut self.groups[into.0];
        target.extend(moved);
        target.sort_unstable();
        self.free.push(from.0);
    }

    /// Labels naming each partition by its smallest member.
    pub fn labels(&self) -> PartitioningArray {
        self.slot_of
            .iter()
            .map(|s| self.groups[s.0][0])
            .collect()
    }

    /// Labels naming each partition by its position in `order`.
    ///
    /// `order` must list every non-empty slot exactly once.
    pub fn labels_in_order(&self, order: &[SlotId]) -> PartitioningArray {
        let mut labels = vec![usize::MAX; self.len()];
        for (id, slot) in order.iter().enumerate() {
            for &m in self.members(*slot) {
                labels[m] = id;
            }
        }
        debug_assert!(labels.iter().all(|&l| l != usize::MAX));
        labels
    }
}
