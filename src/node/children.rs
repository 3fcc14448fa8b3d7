//! Eight exclusively-owned child slots
//!
//! Storage for the slot array is allocated on the first insert and released
//! again when the last child is removed, so leaves carry one pointer only.

/// Number of child slots per node.
pub const NUM_CHILDREN: usize = 8;

/// Child slots of a node. Dropping the slots drops every owned subtree.
#[derive(Debug, Clone)]
pub struct ChildSlots<N> {
    slots: Option<Box<[Option<Box<N>>; NUM_CHILDREN]>>,
}

impl<N> Default for ChildSlots<N> {
    fn default() -> Self {
        Self { slots: None }
    }
}

impl<N> ChildSlots<N> {
    /// Create empty slots (no storage allocated).
    pub fn new() -> Self {
        Self::default()
    }

    /// Child in `slot`, if present.
    #[inline]
    pub fn get(&self, slot: usize) -> Option<&N> {
        self.slots.as_ref()?[slot].as_deref()
    }

    /// Mutable child in `slot`, if present.
    #[inline]
    pub fn get_mut(&mut self, slot: usize) -> Option<&mut N> {
        self.slots.as_mut()?[slot].as_deref_mut()
    }

    /// Whether `slot` holds a child.
    #[inline]
    pub fn contains(&self, slot: usize) -> bool {
        self.get(slot).is_some()
    }

    /// Whether any slot holds a child.
    pub fn has_any(&self) -> bool {
        self.slots
            .as_ref()
            .map_or(false, |slots| slots.iter().any(Option::is_some))
    }

    /// Whether all eight slots hold a child.
    pub fn is_full(&self) -> bool {
        self.slots
            .as_ref()
            .map_or(false, |slots| slots.iter().all(Option::is_some))
    }

    /// Number of occupied slots.
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Place `child` in `slot`, dropping any previous occupant.
    pub fn insert(&mut self, slot: usize, child: N) -> &mut N {
        let slots = self.slots.get_or_insert_with(Default::default);
        slots[slot].insert(Box::new(child))
    }

    /// Child in `slot`, inserting `make()` first if the slot is empty.
    pub fn get_or_insert_with(&mut self, slot: usize, make: impl FnOnce() -> N) -> &mut N {
        let slots = self.slots.get_or_insert_with(Default::default);
        slots[slot].get_or_insert_with(|| Box::new(make()))
    }

    /// Detach the child in `slot`.
    pub fn remove(&mut self, slot: usize) -> Option<Box<N>> {
        let slots = self.slots.as_mut()?;
        let child = slots[slot].take();
        if slots.iter().all(Option::is_none) {
            self.slots = None;
        }
        child
    }

    /// Drop every child and release the slot storage.
    pub fn clear(&mut self) {
        self.slots = None;
    }

    /// Occupied slots in ascending slot order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (usize, &N)> {
        self.slots
            .iter()
            .flat_map(|slots| slots.iter().enumerate())
            .filter_map(|(slot, child)| child.as_deref().map(|c| (slot, c)))
    }

    /// Mutable occupied slots in ascending slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut N)> {
        self.slots
            .iter_mut()
            .flat_map(|slots| slots.iter_mut().enumerate())
            .filter_map(|(slot, child)| child.as_deref_mut().map(|c| (slot, c)))
    }
}
