//! Narrow persistence capabilities used by grading.

mod memory;
mod sea;

use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Question, Submission};

pub use memory::MemoryStore;
pub use sea::SeaStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// A stored document does not fit the typed model.
    #[error("Malformed {entity} {id}: {reason}")]
    Decode {
        entity: &'static str,
        id: Uuid,
        reason: String,
    },

    #[error("Record {0} already exists")]
    Duplicate(Uuid),
}

/// Question lookup, including the ordered test cases.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn find_question(&self, id: Uuid) -> Result<Option<Question>, StoreError>;
}

/// Submission persistence. Records are written once and never updated.
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn create(&self, submission: &Submission) -> Result<Uuid, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Submission>, StoreError>;
}
