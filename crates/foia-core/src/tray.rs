//! Pending-notification tray with stable slot indices.

/// Append-only tray of pending items.
///
/// `push` assigns the next slot index and never reuses it; `take` empties a
/// slot exactly once. Surviving slots keep their indices after any removal,
/// so an index announced to the view stays valid until its own item is
/// taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationTray<T> {
    slots: Vec<Option<T>>,
}

impl<T> Default for NotificationTray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NotificationTray<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Append an item, returning its permanent slot index.
    pub fn push(&mut self, item: T) -> usize {
        self.slots.push(Some(item));
        self.slots.len() - 1
    }

    /// Remove and return the item at `index`. `None` when the index was
    /// never assigned or the item was already taken.
    pub fn take(&mut self, index: usize) -> Option<T> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Borrow the item at `index`, if still pending.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Pending items in slot order, with their stable indices.
    pub fn pending(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|item| (index, item)))
    }

    /// Number of items still pending.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Number of slot indices ever assigned, taken slots included.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending_len() == 0
    }
}
