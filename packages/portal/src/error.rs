use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::grading::GradeOutcome;
use crate::judge::JudgeError;
use crate::models::GradeSummary;
use crate::store::StoreError;

/// Structured error returned to callers on failure.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `NOT_FOUND`,
    /// `JUDGE_UNAVAILABLE`, `GRADING_TIMEOUT`, `CANCELLED`,
    /// `PERSISTENCE_ERROR`, `INTERNAL_ERROR`.
    pub code: &'static str,
    /// Human-readable error description.
    pub message: String,
    /// Grade that was computed but could not be stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission: Option<GradeSummary>,
}

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Submitting a test case failed; the job was never queued.
    #[error("Judge unavailable: {0}")]
    JudgeUnavailable(#[source] JudgeError),

    #[error("Grading exceeded its deadline of {0:?}")]
    GradingTimedOut(Duration),

    #[error("Grading was cancelled")]
    Cancelled,

    #[error("Failed to store submission {submission_id}: {source}")]
    Persistence {
        submission_id: Uuid,
        outcome: GradeOutcome,
        #[source]
        source: StoreError,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_and_body(&self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg.clone(),
                    submission: None,
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg.clone(),
                    submission: None,
                },
            ),
            AppError::JudgeUnavailable(err) => {
                tracing::error!(error = %err, "Judge submit failed");
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody {
                        code: "JUDGE_UNAVAILABLE",
                        message: "The judge service is unavailable".into(),
                        submission: None,
                    },
                )
            }
            AppError::GradingTimedOut(deadline) => (
                StatusCode::GATEWAY_TIMEOUT,
                ErrorBody {
                    code: "GRADING_TIMEOUT",
                    message: format!(
                        "Grading did not finish within {} seconds",
                        deadline.as_secs()
                    ),
                    submission: None,
                },
            ),
            AppError::Cancelled => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorBody {
                    code: "CANCELLED",
                    message: "Grading was cancelled".into(),
                    submission: None,
                },
            ),
            AppError::Persistence {
                submission_id,
                outcome,
                source,
            } => {
                tracing::error!(%submission_id, error = %source, "Submission not stored");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "PERSISTENCE_ERROR",
                        message: "Submission was graded but could not be saved".into(),
                        submission: Some(GradeSummary {
                            status: outcome.status,
                            score: outcome.score,
                        }),
                    },
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                        submission: None,
                    },
                )
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Internal(err.to_string())
    }
}
