//! In-memory Item store.
//!
//! The map and the id counter sit behind a single `RwLock`, so issuing an id and
//! inserting the record is one atomic step and readers only ever see whole items.
//! Ids are never reused, even after the item they named is deleted.

pub mod item;

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;
use tracing::instrument;
use validator::Validate;

pub use item::{field_messages, Item, ItemCandidate};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("item {0} not found")]
    NotFound(u64),

    #[error("invalid item: {0}")]
    InvalidArgument(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Default)]
struct Inner {
    items: BTreeMap<u64, Item>,
    last_id: u64,
}

#[derive(Debug, Default)]
pub struct ItemStore {
    inner: RwLock<Inner>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the two sample items (ids 1 and 2)
    pub fn with_seed() -> Self {
        let store = Self::new();
        let samples = [
            ("Sample Item 1", "This is the first sample item."),
            ("Sample Item 2", "This is the second sample item."),
        ];
        {
            let mut inner = store.write();
            for (name, description) in samples {
                inner.last_id += 1;
                let id = inner.last_id;
                let item = ItemCandidate::new(name, Some(description.to_string())).into_item(id);
                inner.items.insert(id, item);
            }
        }
        store
    }

    /// All items in ascending id order, which is also creation order
    pub fn list(&self) -> Vec<Item> {
        self.read().items.values().cloned().collect()
    }

    pub fn get(&self, id: u64) -> StoreResult<Item> {
        self.read().items.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    #[instrument(skip(self, candidate), fields(name = %candidate.name))]
    pub fn create(&self, candidate: ItemCandidate) -> StoreResult<Item> {
        check(&candidate)?;

        let mut inner = self.write();
        inner.last_id += 1;
        let id = inner.last_id;
        let item = candidate.into_item(id);
        inner.items.insert(id, item.clone());
        drop(inner);

        tracing::debug!(id, "item created");
        Ok(item)
    }

    #[instrument(skip(self, candidate))]
    pub fn update(&self, id: u64, candidate: ItemCandidate) -> StoreResult<Item> {
        check(&candidate)?;

        let mut inner = self.write();
        let slot = inner.items.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        slot.name = candidate.name;
        slot.description = candidate.description;
        let item = slot.clone();
        drop(inner);

        tracing::debug!("item updated");
        Ok(item)
    }

    #[instrument(skip(self))]
    pub fn delete(&self, id: u64) -> StoreResult<()> {
        self.write()
            .items
            .remove(&id)
            .map(|_| tracing::debug!("item deleted"))
            .ok_or(StoreError::NotFound(id))
    }

    pub fn len(&self) -> usize {
        self.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Every write completes its map mutation before anything that could panic,
    // so a poisoned lock still guards a consistent map.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn check(candidate: &ItemCandidate) -> StoreResult<()> {
    candidate.validate().map_err(|errors| {
        let mut messages: Vec<String> = field_messages(&errors)
            .into_iter()
            .map(|(field, msg)| format!("{}: {}", field, msg))
            .collect();
        messages.sort();
        StoreError::InvalidArgument(messages.join(", "))
    })
}
