//! Spaced-repetition retention model.
//!
//! - [`retention`] - decay laws, forgetting curve sampling and the stateless [`RetentionEngine`]
//! - [`models`] - the learning item state and its persisted record shape
//! - [`store`] - the item store seam and an in-process reference store
//! - [`services`] - study/read orchestration between a store and the engine
//! - [`config`] / [`logging`] - runtime configuration and tracing setup

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod retention;
pub mod services;
pub mod store;

pub use config::{Config, EngineConfig};
pub use error::{EngineError, StoreError};
pub use models::{ItemRecord, LearningItem};
pub use retention::{
    Clock, CurvePoint, CurveSamples, DecayLaw, ManualClock, RetentionEngine, RetentionSnapshot,
    RetentionUnit, SystemClock, RETENTION_CAP, STUDY_BOOST,
};
pub use services::StudyService;
pub use store::{ItemStore, MemoryItemStore};
