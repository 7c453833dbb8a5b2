use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::ItemRecord;

/// Item persistence as seen by the retention core.
///
/// `modify` is the read-modify-write primitive: implementations must run the closure
/// with exclusive access to the record so that concurrent study events on one item
/// are applied one after another.
pub trait ItemStore: Send + Sync {
    fn insert(&self, record: ItemRecord) -> Result<ItemRecord, StoreError>;

    fn get(&self, id: Uuid) -> Result<ItemRecord, StoreError>;

    fn list(&self, owner_id: &str) -> Vec<ItemRecord>;

    fn modify(
        &self,
        id: Uuid,
        apply: &mut dyn FnMut(&mut ItemRecord) -> Result<(), StoreError>,
    ) -> Result<ItemRecord, StoreError>;

    fn remove(&self, id: Uuid) -> Result<ItemRecord, StoreError>;
}

/// In-process store. The map lock covers lookup only; each record has its own mutex
/// so updates to different items never wait on each other.
#[derive(Default)]
pub struct MemoryItemStore {
    items: RwLock<HashMap<Uuid, Arc<Mutex<ItemRecord>>>>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    fn slot(&self, id: Uuid) -> Result<Arc<Mutex<ItemRecord>>, StoreError> {
        self.items
            .read()
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }
}

impl ItemStore for MemoryItemStore {
    fn insert(&self, record: ItemRecord) -> Result<ItemRecord, StoreError> {
        record.learning.validate()?;
        let mut items = self.items.write();
        if items.contains_key(&record.id) {
            return Err(StoreError::Validation(format!("item {} already exists", record.id)));
        }
        items.insert(record.id, Arc::new(Mutex::new(record.clone())));
        Ok(record)
    }

    fn get(&self, id: Uuid) -> Result<ItemRecord, StoreError> {
        let slot = self.slot(id)?;
        let record = slot.lock().clone();
        Ok(record)
    }

    fn list(&self, owner_id: &str) -> Vec<ItemRecord> {
        let slots: Vec<_> = self.items.read().values().cloned().collect();
        let mut records: Vec<ItemRecord> = slots
            .iter()
            .map(|slot| slot.lock().clone())
            .filter(|record| record.owner_id == owner_id)
            .collect();
        records.sort_by(|a, b| {
            a.learning
                .created_at
                .cmp(&b.learning.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        records
    }

    fn modify(
        &self,
        id: Uuid,
        apply: &mut dyn FnMut(&mut ItemRecord) -> Result<(), StoreError>,
    ) -> Result<ItemRecord, StoreError> {
        let slot = self.slot(id)?;
        let mut guard = slot.lock();
        let mut draft = guard.clone();
        apply(&mut draft)?;
        *guard = draft;
        Ok(guard.clone())
    }

    fn remove(&self, id: Uuid) -> Result<ItemRecord, StoreError> {
        let slot = self
            .items
            .write()
            .remove(&id)
            .ok_or(StoreError::NotFound(id))?;
        let record = slot.lock().clone();
        Ok(record)
    }
}
