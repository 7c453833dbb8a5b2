use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{ItemRecord, ItemUpdate, NewItem};
use crate::retention::{Clock, RetentionEngine, RetentionSnapshot};
use crate::store::ItemStore;

const MAX_TITLE_LEN: usize = 200;

/// A stored item together with its retention values as of the read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    #[serde(flatten)]
    pub record: ItemRecord,
    pub retention_snapshot: RetentionSnapshot,
}

/// Item-store side of the retention flow: reads come back with time-adjusted
/// retention, study requests run through the engine inside a per-item update.
#[derive(Clone)]
pub struct StudyService {
    store: Arc<dyn ItemStore>,
    engine: RetentionEngine,
    clock: Arc<dyn Clock>,
}

impl StudyService {
    pub fn new(store: Arc<dyn ItemStore>, engine: RetentionEngine, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            engine,
            clock,
        }
    }

    pub fn create_item(&self, owner_id: &str, input: NewItem) -> Result<ItemView, StoreError> {
        let input = NewItem {
            title: validate_title(&input.title)?,
            description: input.description,
        };
        let record = self
            .store
            .insert(ItemRecord::new(owner_id, input, self.clock.now()))?;
        info!(item_id = %record.id, owner_id, "item created");
        self.view(record)
    }

    pub fn get_item(&self, owner_id: &str, id: Uuid) -> Result<ItemView, StoreError> {
        let record = self.owned(owner_id, id)?;
        self.view(record)
    }

    pub fn list_items(&self, owner_id: &str) -> Result<Vec<ItemView>, StoreError> {
        self.store
            .list(owner_id)
            .into_iter()
            .map(|record| self.view(record))
            .collect()
    }

    pub fn update_item(
        &self,
        owner_id: &str,
        id: Uuid,
        mut update: ItemUpdate,
    ) -> Result<ItemView, StoreError> {
        if let Some(title) = update.title.as_deref() {
            update.title = Some(validate_title(title)?);
        }
        let now = self.clock.now();
        let mut update = Some(update);
        let record = self.store.modify(id, &mut |record| {
            ensure_owner(record, owner_id)?;
            if let Some(update) = update.take() {
                record.apply_update(update, now);
            }
            Ok(())
        })?;
        self.view(record)
    }

    pub fn delete_item(&self, owner_id: &str, id: Uuid) -> Result<ItemRecord, StoreError> {
        self.owned(owner_id, id)?;
        let record = self.store.remove(id)?;
        info!(item_id = %id, owner_id, "item deleted");
        Ok(record)
    }

    /// Records one study event on the item.
    pub fn record_study(&self, owner_id: &str, id: Uuid) -> Result<ItemView, StoreError> {
        let now = self.clock.now();
        let engine = &self.engine;
        let result = self.store.modify(id, &mut |record| {
            ensure_owner(record, owner_id)?;
            record.learning = engine.apply_study_event(&record.learning, now)?;
            record.updated_at = now;
            Ok(())
        });

        match result {
            Ok(record) => {
                info!(
                    item_id = %id,
                    study_count = record.learning.study_count,
                    retention = record.learning.retention,
                    "study event recorded"
                );
                self.view(record)
            }
            Err(err) => {
                warn!(item_id = %id, error = %err, "study event rejected");
                Err(err)
            }
        }
    }

    fn owned(&self, owner_id: &str, id: Uuid) -> Result<ItemRecord, StoreError> {
        let record = self.store.get(id)?;
        ensure_owner(&record, owner_id)?;
        Ok(record)
    }

    fn view(&self, record: ItemRecord) -> Result<ItemView, StoreError> {
        let retention_snapshot = self.engine.snapshot(&record.learning, self.clock.now())?;
        Ok(ItemView {
            record,
            retention_snapshot,
        })
    }
}

fn ensure_owner(record: &ItemRecord, owner_id: &str) -> Result<(), StoreError> {
    if record.owner_id == owner_id {
        Ok(())
    } else {
        Err(StoreError::Forbidden {
            item_id: record.id,
            owner_id: owner_id.to_string(),
        })
    }
}

fn validate_title(title: &str) -> Result<String, StoreError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(StoreError::Validation("title must not be empty".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(StoreError::Validation(format!(
            "title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(title.to_string())
}
