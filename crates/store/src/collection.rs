//! Normalized collection: a mapping from id to record plus an ordered
//! id sequence recording insertion/load order.

use std::collections::HashMap;

use api_types::EntityId;

/// Anything held in a [`Collection`] exposes its server-assigned id.
pub trait Record {
    fn id(&self) -> EntityId;
}

#[derive(Debug, Clone)]
pub struct Collection<T> {
    by_id: HashMap<EntityId, T>,
    order: Vec<EntityId>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            by_id: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<T: Record> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards prior contents entirely and rebuilds from `records`
    /// in input order. An empty list yields an empty collection.
    pub fn replace_all(&mut self, records: Vec<T>) {
        self.by_id = HashMap::with_capacity(records.len());
        self.order = Vec::with_capacity(records.len());
        for record in records {
            let id = record.id();
            if self.by_id.insert(id, record).is_none() {
                self.order.push(id);
            }
        }
    }

    /// Appends a record. On a duplicate id the last write wins: the
    /// mapping is overwritten and the id keeps its original position
    /// in the sequence, which never holds duplicates.
    pub fn insert(&mut self, record: T) {
        let id = record.id();
        if self.by_id.insert(id, record).is_none() {
            self.order.push(id);
        }
    }

    /// Replaces the record with the same id in place; other records
    /// and the id sequence are untouched. An unknown id behaves as an
    /// insert, appending to the sequence.
    pub fn replace_one(&mut self, record: T) {
        self.insert(record);
    }

    /// Removes a record; a no-op if the id is absent. Order of the
    /// remaining ids is preserved.
    pub fn remove(&mut self, id: EntityId) {
        if self.by_id.remove(&id).is_some() {
            self.order.retain(|existing| *existing != id);
        }
    }

    /// Empties the collection regardless of prior contents.
    pub fn reset(&mut self) {
        self.by_id.clear();
        self.order.clear();
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.by_id.get(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Ids in insertion/load order.
    pub fn ids(&self) -> &[EntityId] {
        &self.order
    }

    /// Records in insertion/load order.
    pub fn records(&self) -> impl Iterator<Item = &T> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
