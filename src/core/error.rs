use thiserror::Error;

use super::EntityId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Invalid entity: {0}")]
    InvalidEntity(String),

    #[error("Entity stored under {expected} resolved to identifier {}", describe_id(.found))]
    IdentifierMismatch {
        expected: EntityId,
        found: Option<EntityId>,
    },

    #[error("Identifier {0} already exists in collection '{1}'")]
    DuplicateIdentifier(EntityId, String),

    #[error("Identifier count mismatch: {0} old ids, {1} new ids")]
    IdCountMismatch(usize, usize),

    #[error("Index {index} out of bounds for collection of {len} entities")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Lock error: {0}")]
    LockError(String),
}

fn describe_id(id: &Option<EntityId>) -> String {
    id.as_ref().map_or_else(|| "<none>".to_string(), |id| id.to_string())
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockError(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidEntity(err.to_string())
    }
}
