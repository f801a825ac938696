use chrono::{DateTime, Utc};
use common::SubmissionStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::grading::GradeOutcome;

use super::grading::ValidatedGradeRequest;

/// A grading attempt.
///
/// Built in memory when a request arrives, finalized once after every test
/// case resolved, and written to the store exactly once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub user_id: Uuid,
    pub question_id: Uuid,
    pub contest_id: Uuid,
    pub code: String,
    /// Passed through to the judge untouched.
    pub language_id: String,
    pub status: SubmissionStatus,
    /// 0 to 100.
    pub score: u8,
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    pub fn pending(user_id: Uuid, request: &ValidatedGradeRequest) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            question_id: request.question_id,
            contest_id: request.contest_id,
            code: request.code.clone(),
            language_id: request.language_id.clone(),
            status: SubmissionStatus::Pending,
            score: 0,
            submitted_at: Utc::now(),
        }
    }

    /// Set status and score together from an aggregated outcome.
    pub fn finalize(&mut self, outcome: &GradeOutcome) {
        self.status = outcome.status;
        self.score = outcome.score;
    }
}
