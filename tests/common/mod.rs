#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use retention_engine::models::NewItem;
use retention_engine::{ManualClock, MemoryItemStore, RetentionEngine, StudyService};

pub const OWNER: &str = "user_1";

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap()
}

pub struct TestHarness {
    pub service: StudyService,
    pub store: Arc<MemoryItemStore>,
    pub clock: Arc<ManualClock>,
}

pub fn create_test_service() -> TestHarness {
    let store = Arc::new(MemoryItemStore::new());
    let clock = Arc::new(ManualClock::new(start_time()));
    let service = StudyService::new(store.clone(), RetentionEngine::default(), clock.clone());
    TestHarness {
        service,
        store,
        clock,
    }
}

pub fn new_item(title: &str) -> NewItem {
    NewItem {
        title: title.to_string(),
        description: Some("flash card".to_string()),
    }
}

impl TestHarness {
    pub fn clock_now(&self) -> DateTime<Utc> {
        use retention_engine::Clock;
        self.clock.now()
    }
}
