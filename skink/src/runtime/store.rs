//! The list store: an arena owning every list instance

use std::fmt;

use serde::Serialize;

use super::error::{RtResult, RuntimeError};
use super::list::List;

/// Default cell budget for a store.
/// 64K cells keeps a runaway script from exhausting the host; embedded
/// hosts pass a much smaller budget sized to their arena.
pub const DEFAULT_CELL_LIMIT: usize = 64 * 1024;

/// Opaque reference to a list living in the store
///
/// Handles are generation-tagged: freeing a list bumps its slot's
/// generation, so a handle kept across a free stops resolving instead of
/// silently aliasing whatever reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ListHandle {
    index: u32,
    generation: u32,
}

impl ListHandle {
    /// Raw slot index, for diagnostics
    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for ListHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    list: Option<List>,
}

/// Arena holding every live list
///
/// The store is the single owner of list storage. Lists are destroyed
/// only by an explicit deallocation, never by reference counting or
/// collection; lifetime is entirely caller-managed. The budget is
/// measured in element cells across all live lists.
#[derive(Debug)]
pub struct ListStore {
    slots: Vec<Slot>,
    free: Vec<u32>,
    cells_in_use: usize,
    cell_limit: usize,
}

/// Point-in-time usage snapshot, serializable for inspection tools
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub live_lists: usize,
    pub cells_in_use: usize,
    pub cell_limit: usize,
}

impl ListStore {
    pub fn new() -> Self {
        Self::with_cell_limit(DEFAULT_CELL_LIMIT)
    }

    /// Store with an explicit cell budget
    pub fn with_cell_limit(cell_limit: usize) -> Self {
        ListStore {
            slots: Vec::new(),
            free: Vec::new(),
            cells_in_use: 0,
            cell_limit,
        }
    }

    /// Take ownership of `list`, returning its handle
    pub fn insert(&mut self, list: List) -> RtResult<ListHandle> {
        let requested = list.capacity();
        let available = self.cell_limit - self.cells_in_use;
        if requested > available {
            return Err(RuntimeError::OutOfMemory {
                requested,
                available,
            });
        }
        self.cells_in_use += requested;

        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.list = Some(list);
                Ok(ListHandle {
                    index,
                    generation: slot.generation,
                })
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    list: Some(list),
                });
                Ok(ListHandle {
                    index,
                    generation: 0,
                })
            }
        }
    }

    /// Reserve storage for `capacity` elements, length zero
    pub fn allocate(&mut self, capacity: usize) -> RtResult<ListHandle> {
        self.insert(List::with_capacity(capacity))
    }

    /// Release the list behind `handle`. The handle (and any copy of it)
    /// stops resolving; other handles are unaffected.
    pub fn deallocate(&mut self, handle: ListHandle) -> RtResult<()> {
        let slot = self
            .slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .ok_or(RuntimeError::InvalidHandle { handle })?;
        let list = slot
            .list
            .take()
            .ok_or(RuntimeError::InvalidHandle { handle })?;
        slot.generation = slot.generation.wrapping_add(1);
        self.cells_in_use -= list.capacity();
        self.free.push(handle.index);
        Ok(())
    }

    pub fn resolve(&self, handle: ListHandle) -> RtResult<&List> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.list.as_ref())
            .ok_or(RuntimeError::InvalidHandle { handle })
    }

    pub fn resolve_mut(&mut self, handle: ListHandle) -> RtResult<&mut List> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.list.as_mut())
            .ok_or(RuntimeError::InvalidHandle { handle })
    }

    /// Whether `handle` still resolves
    pub fn is_live(&self, handle: ListHandle) -> bool {
        self.resolve(handle).is_ok()
    }

    /// Number of live lists
    pub fn live_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn cells_in_use(&self) -> usize {
        self.cells_in_use
    }

    pub fn cell_limit(&self) -> usize {
        self.cell_limit
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            live_lists: self.live_count(),
            cells_in_use: self.cells_in_use,
            cell_limit: self.cell_limit,
        }
    }
}

impl Default for ListStore {
    fn default() -> Self {
        Self::new()
    }
}
