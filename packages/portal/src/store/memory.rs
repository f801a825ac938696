use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use super::{QuestionRepository, StoreError, SubmissionRepository};
use crate::models::{Question, Submission};

/// In-process store backed by concurrent maps.
#[derive(Clone, Default)]
pub struct MemoryStore {
    questions: Arc<DashMap<Uuid, Question>>,
    submissions: Arc<DashMap<Uuid, Submission>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_question(&self, question: Question) {
        self.questions.insert(question.id, question);
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.len()
    }
}

#[async_trait]
impl QuestionRepository for MemoryStore {
    async fn find_question(&self, id: Uuid) -> Result<Option<Question>, StoreError> {
        Ok(self.questions.get(&id).map(|q| q.value().clone()))
    }
}

#[async_trait]
impl SubmissionRepository for MemoryStore {
    async fn create(&self, submission: &Submission) -> Result<Uuid, StoreError> {
        match self.submissions.entry(submission.id) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(submission.id)),
            Entry::Vacant(slot) => {
                slot.insert(submission.clone());
                Ok(submission.id)
            }
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Submission>, StoreError> {
        Ok(self.submissions.get(&id).map(|s| s.value().clone()))
    }
}
