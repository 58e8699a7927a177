//! Fixed-capacity recyclable storage for bullets, shards, enemies and items.
//!
//! Slots are allocated once up front. Releasing a slot pushes its index onto
//! a free list so the next `acquire` reuses it in O(1); nothing is freed
//! while a run is in progress. Every slot carries a generation that is
//! bumped on release, so a stale [`Handle`] never resolves to whatever
//! entity later occupies the same slot.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    pub fn index(self) -> usize {
        self.index as usize
    }
}

#[derive(Clone, Debug)]
struct Slot<T> {
    value: T,
    active: bool,
    generation: u32,
}

#[derive(Clone, Debug)]
pub struct EntityPool<T> {
    slots: Vec<Slot<T>>,
    /// Indices of inactive slots; popped on acquire, pushed on release.
    free_list: Vec<usize>,
    active: usize,
}

impl<T: Default> EntityPool<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|_| Slot {
                value: T::default(),
                active: false,
                generation: 0,
            })
            .collect();
        // Reversed so slot 0 is handed out first.
        let free_list = (0..capacity).rev().collect();
        Self {
            slots,
            free_list,
            active: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.active
    }

    pub fn available(&self) -> usize {
        self.free_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active == 0
    }

    /// Claim a free slot for `value`. Returns `None` when the pool is full;
    /// callers treat that as back-pressure, not an error.
    pub fn acquire(&mut self, value: T) -> Option<Handle> {
        let index = self.free_list.pop()?;
        let slot = &mut self.slots[index];
        slot.value = value;
        slot.active = true;
        self.active += 1;
        Some(Handle {
            index: index as u32,
            generation: slot.generation,
        })
    }

    /// Return a slot to the free list and wipe its contents back to
    /// `T::default()`. Releasing a stale or already-released handle is a
    /// no-op and returns `false`.
    pub fn release(&mut self, handle: Handle) -> bool {
        let Some(slot) = self.slots.get_mut(handle.index()) else {
            return false;
        };
        if !slot.active || slot.generation != handle.generation {
            return false;
        }
        slot.active = false;
        slot.value = T::default();
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(handle.index());
        self.active -= 1;
        true
    }

    /// Release every active entity matching `pred`; returns how many went.
    pub fn release_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let doomed: Vec<Handle> = self
            .iter()
            .filter(|(_, value)| pred(value))
            .map(|(handle, _)| handle)
            .collect();
        doomed.into_iter().filter(|&h| self.release(h)).count()
    }

    pub fn clear(&mut self) {
        for handle in self.handles() {
            self.release(handle);
        }
    }
}

impl<T> EntityPool<T> {
    pub fn is_active(&self, handle: Handle) -> bool {
        self.slots
            .get(handle.index())
            .is_some_and(|slot| slot.active && slot.generation == handle.generation)
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slots
            .get(handle.index())
            .filter(|slot| slot.active && slot.generation == handle.generation)
            .map(|slot| &slot.value)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index())
            .filter(|slot| slot.active && slot.generation == handle.generation)
            .map(|slot| &mut slot.value)
    }

    /// Active entities in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.slots.iter().enumerate().filter(|(_, s)| s.active).map(|(i, s)| {
            (
                Handle {
                    index: i as u32,
                    generation: s.generation,
                },
                &s.value,
            )
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, s)| {
                (
                    Handle {
                        index: i as u32,
                        generation: s.generation,
                    },
                    &mut s.value,
                )
            })
    }

    /// Snapshot of active handles, for passes that release while iterating.
    pub fn handles(&self) -> Vec<Handle> {
        self.iter().map(|(h, _)| h).collect()
    }
}
