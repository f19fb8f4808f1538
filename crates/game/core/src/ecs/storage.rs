//! Sparse-set storage for a single component type.
//!
//! Values live in a dense array for cheap iteration; a sparse index keyed by
//! entity id maps into it. Removal swaps the last element into the hole.

use super::entity::EntityId;

#[derive(Clone, Debug)]
pub struct SparseSet<T> {
    sparse: Vec<Option<u32>>,
    ids: Vec<EntityId>,
    dense: Vec<T>,
}

impl<T> Default for SparseSet<T> {
    fn default() -> Self {
        Self {
            sparse: Vec::new(),
            ids: Vec::new(),
            dense: Vec::new(),
        }
    }
}

impl<T> SparseSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    fn slot(&self, id: EntityId) -> Option<usize> {
        self.sparse.get(id.index()).copied().flatten().map(|i| i as usize)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.slot(id).is_some()
    }

    /// Inserts or replaces the value for `id`, returning the previous value.
    pub fn insert(&mut self, id: EntityId, value: T) -> Option<T> {
        if let Some(slot) = self.slot(id) {
            return Some(std::mem::replace(&mut self.dense[slot], value));
        }

        if self.sparse.len() <= id.index() {
            self.sparse.resize(id.index() + 1, None);
        }
        self.sparse[id.index()] = Some(self.dense.len() as u32);
        self.ids.push(id);
        self.dense.push(value);
        None
    }

    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        let slot = self.slot(id)?;
        self.sparse[id.index()] = None;

        let last = self.dense.len() - 1;
        if slot != last {
            let moved = self.ids[last];
            self.sparse[moved.index()] = Some(slot as u32);
        }
        self.ids.swap_remove(slot);
        Some(self.dense.swap_remove(slot))
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.slot(id).map(|slot| &self.dense[slot])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.slot(id).map(|slot| &mut self.dense[slot])
    }

    /// Entity ids in dense (unspecified) order.
    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.ids.iter().copied().zip(self.dense.iter())
    }

    pub fn clear(&mut self) {
        self.sparse.clear();
        self.ids.clear();
        self.dense.clear();
    }
}
