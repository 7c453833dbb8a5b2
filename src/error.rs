use uuid::Uuid;

/// Rejections raised by the retention engine. Inputs are never clamped silently;
/// only decay-law outputs are.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("invalid state: retention {0} is outside [0, 1]")]
    RetentionOutOfRange(f64),
    #[error("invalid state: study count {0} is negative")]
    NegativeStudyCount(i64),
    #[error("invalid state: study count {0} cannot be incremented")]
    StudyCountOverflow(u32),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("item {0} not found")]
    NotFound(Uuid),
    #[error("item {item_id} does not belong to {owner_id}")]
    Forbidden { item_id: Uuid, owner_id: String },
    #[error("validation error: {0}")]
    Validation(String),
    #[error(transparent)]
    InvalidState(#[from] EngineError),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
