use alloc::vec::Vec;

use super::handle::NodeId;

/// A slot is either live or a link in the free list.
enum Slot<T> {
    Occupied(T),
    Vacant { next_free: Option<NodeId> },
}

/// Index-addressed node storage.
///
/// Nodes never hold references to each other, only [`NodeId`]s, so splits, merges and
/// borrows are plain id rewrites. Releasing a node threads its slot onto an intrusive
/// free list; the next allocation reuses it.
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<NodeId>,
    live: usize,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            live: 0,
        }
    }

    /// Number of live nodes.
    #[cfg(test)]
    pub(crate) const fn len(&self) -> usize {
        self.live
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub(crate) fn alloc(&mut self, element: T) -> NodeId {
        self.live += 1;
        if let Some(id) = self.free_head {
            let slot = &mut self.slots[id.index()];
            let Slot::Vacant { next_free } = *slot else {
                panic!("`Arena::alloc()` - free list points at a live slot!");
            };
            self.free_head = next_free;
            *slot = Slot::Occupied(element);
            id
        } else {
            let id = NodeId::from_index(self.slots.len());
            self.slots.push(Slot::Occupied(element));
            id
        }
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &T {
        match &self.slots[id.index()] {
            Slot::Occupied(element) => element,
            Slot::Vacant { .. } => panic!("`Arena::get()` - {id:?} is vacant!"),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut T {
        match &mut self.slots[id.index()] {
            Slot::Occupied(element) => element,
            Slot::Vacant { .. } => panic!("`Arena::get_mut()` - {id:?} is vacant!"),
        }
    }

    /// Moves the element out and reclaims its slot.
    pub(crate) fn take(&mut self, id: NodeId) -> T {
        let vacant = Slot::Vacant {
            next_free: self.free_head,
        };
        match core::mem::replace(&mut self.slots[id.index()], vacant) {
            Slot::Occupied(element) => {
                self.free_head = Some(id);
                self.live -= 1;
                element
            }
            Slot::Vacant { next_free } => {
                // Undo the overwrite so the free list stays intact before reporting.
                self.slots[id.index()] = Slot::Vacant { next_free };
                panic!("`Arena::take()` - {id:?} is already vacant!");
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.live = 0;
    }
}
