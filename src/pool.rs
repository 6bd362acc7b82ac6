//! Fixed-capacity arena for transient entities.
//!
//! The backing store is allocated once and never resized. Slots move between
//! a free stack and a packed active list; every index lives in exactly one of
//! the two at all times.

use crate::api::Poolable;
use crate::error::{CoreError, CoreResult};

/// Stable slot index. Valid for the pool's lifetime, but the slot may hold a
/// different logical entity once it has been freed and re-acquired, so do not
/// keep handles across a cleanup pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PoolHandle(pub u32);

impl PoolHandle {
    pub fn index(self) -> usize { self.0 as usize }
}

pub struct ObjectPool<T> {
    slots: Box<[T]>,
    free: Vec<u32>,
    active: Vec<u32>,
    live: Box<[bool]>,
}

impl<T: Poolable + Default> ObjectPool<T> {
    pub fn new(capacity: usize) -> CoreResult<Self> {
        if capacity > u32::MAX as usize {
            return Err(CoreError::InvalidConfig {
                field: "capacity",
                reason: format!("{capacity} exceeds u32 slot indices"),
            });
        }
        let alloc_err = |source| CoreError::PoolAllocation { capacity, source };

        let mut slots = Vec::new();
        slots.try_reserve_exact(capacity).map_err(alloc_err)?;
        slots.resize_with(capacity, T::default);

        let mut free = Vec::new();
        free.try_reserve_exact(capacity).map_err(alloc_err)?;
        // Reversed so the lowest index is handed out first
        free.extend((0..capacity as u32).rev());

        let mut active = Vec::new();
        active.try_reserve_exact(capacity).map_err(alloc_err)?;

        Ok(Self {
            slots: slots.into_boxed_slice(),
            free,
            active,
            live: vec![false; capacity].into_boxed_slice(),
        })
    }
}

impl<T: Poolable> ObjectPool<T> {
    /// Take a free slot, or `None` when the pool is full (the spawn is dropped).
    pub fn acquire(&mut self) -> Option<PoolHandle> {
        let Some(idx) = self.free.pop() else {
            log::debug!("pool full ({} slots), spawn dropped", self.slots.len());
            return None;
        };
        self.active.push(idx);
        self.live[idx as usize] = true;
        self.slots[idx as usize].set_removable(false);
        Some(PoolHandle(idx))
    }

    /// Acquire and initialize in one call.
    pub fn spawn(&mut self, init: impl FnOnce(&mut T)) -> Option<PoolHandle> {
        let h = self.acquire()?;
        let slot = &mut self.slots[h.index()];
        init(slot);
        slot.set_removable(false);
        Some(h)
    }

    /// Tick every live entry, then free those that became removable.
    /// Iteration order is not preserved across removals.
    pub fn update_and_cleanup(&mut self, dt: f32) {
        let mut i = 0;
        while i < self.active.len() {
            let idx = self.active[i];
            let slot = &mut self.slots[idx as usize];
            slot.update(dt);
            if slot.removable() {
                self.active.swap_remove(i);
                self.live[idx as usize] = false;
                self.free.push(idx);
            } else {
                i += 1;
            }
        }
    }

    /// Free every slot (level reload).
    pub fn clear(&mut self) {
        for idx in self.active.drain(..) {
            self.live[idx as usize] = false;
            self.free.push(idx);
        }
    }

    pub fn get(&self, h: PoolHandle) -> Option<&T> {
        if self.is_live(h) { self.slots.get(h.index()) } else { None }
    }

    pub fn get_mut(&mut self, h: PoolHandle) -> Option<&mut T> {
        if self.is_live(h) { self.slots.get_mut(h.index()) } else { None }
    }

    pub fn is_live(&self, h: PoolHandle) -> bool {
        self.live.get(h.index()).copied().unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PoolHandle, &T)> + '_ {
        self.active.iter().map(|&i| (PoolHandle(i), &self.slots[i as usize]))
    }

    /// Visit live entries mutably, in the same order as [`iter`](Self::iter).
    pub fn for_each_mut(&mut self, mut f: impl FnMut(PoolHandle, &mut T)) {
        for &i in &self.active {
            f(PoolHandle(i), &mut self.slots[i as usize]);
        }
    }

    /// Raw backing store, including dead slots.
    pub fn slots(&self) -> &[T] { &self.slots }

    /// Indices of live slots, in current (unspecified) order.
    pub fn active(&self) -> &[u32] { &self.active }

    pub fn len(&self) -> usize { self.active.len() }
    pub fn is_empty(&self) -> bool { self.active.is_empty() }
    pub fn capacity(&self) -> usize { self.slots.len() }
    pub fn available(&self) -> usize { self.free.len() }
}
