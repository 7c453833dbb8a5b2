use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;

/// Retention state of one studied item. The engine reads and produces these but never keeps them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningItem {
    pub study_count: u32,
    pub retention: f64,
    pub created_at: DateTime<Utc>,
    pub last_studied_at: DateTime<Utc>,
}

impl LearningItem {
    /// A freshly learned item: full retention, decay clock starting at creation.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            study_count: 0,
            retention: 1.0,
            created_at: now,
            last_studied_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        validate_retention(self.retention)
    }

    pub fn hours_since_created(&self, now: DateTime<Utc>) -> f64 {
        hours_between(self.created_at, now)
    }

    pub fn hours_since_studied(&self, now: DateTime<Utc>) -> f64 {
        hours_between(self.last_studied_at, now)
    }
}

pub fn validate_retention(retention: f64) -> Result<(), EngineError> {
    if retention.is_finite() && (0.0..=1.0).contains(&retention) {
        Ok(())
    } else {
        Err(EngineError::RetentionOutOfRange(retention))
    }
}

/// Elapsed hours from `from` to `to`; an origin in the future yields zero.
pub fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let millis = (to - from).num_milliseconds();
    (millis.max(0) as f64) / 3_600_000.0
}

/// Stored shape of an item as kept by an item store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawItemRecord")]
pub struct ItemRecord {
    pub id: Uuid,
    pub owner_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    #[serde(flatten)]
    pub learning: LearningItem,
    pub updated_at: DateTime<Utc>,
}

impl ItemRecord {
    pub fn new(owner_id: impl Into<String>, input: NewItem, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            title: input.title,
            description: input.description,
            completed: false,
            learning: LearningItem::new(now),
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: ItemUpdate, now: DateTime<Utc>) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(completed) = update.completed {
            self.completed = completed;
        }
        self.updated_at = now;
    }
}

/// Wire shape before validation. Signed count and optional decay origin so that
/// malformed or older records can be recognised and reported.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItemRecord {
    id: Uuid,
    owner_id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    study_count: i64,
    #[serde(default = "full_retention")]
    retention: f64,
    created_at: DateTime<Utc>,
    #[serde(default)]
    last_studied_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

fn full_retention() -> f64 {
    1.0
}

impl TryFrom<RawItemRecord> for ItemRecord {
    type Error = EngineError;

    fn try_from(raw: RawItemRecord) -> Result<Self, Self::Error> {
        if raw.study_count < 0 {
            return Err(EngineError::NegativeStudyCount(raw.study_count));
        }
        let study_count = u32::try_from(raw.study_count)
            .map_err(|_| EngineError::StudyCountOverflow(u32::MAX))?;
        validate_retention(raw.retention)?;

        Ok(Self {
            id: raw.id,
            owner_id: raw.owner_id,
            title: raw.title,
            description: raw.description,
            completed: raw.completed,
            learning: LearningItem {
                study_count,
                retention: raw.retention,
                created_at: raw.created_at,
                last_studied_at: raw.last_studied_at.unwrap_or(raw.created_at),
            },
            updated_at: raw.updated_at.unwrap_or(raw.created_at),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
}
