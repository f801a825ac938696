use common::SubmissionStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Request body for grading a submission.
///
/// Fields default to empty so a missing field is reported by validation
/// rather than as an opaque decode failure.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct GradeRequest {
    #[serde(default)]
    pub question_id: String,
    #[serde(default)]
    pub contest_id: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub language_id: String,
}

/// A grade request whose references parsed and whose payload is within limits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedGradeRequest {
    pub question_id: Uuid,
    pub contest_id: Uuid,
    pub code: String,
    pub language_id: String,
}

/// Response returned once a submission is graded and stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeResponse {
    pub submission_id: Uuid,
    pub status: SubmissionStatus,
    pub score: u8,
}

/// Grade computed but not durably recorded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeSummary {
    pub status: SubmissionStatus,
    pub score: u8,
}

fn parse_reference(field: &str, value: &str) -> Result<Uuid, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Uuid::parse_str(value)
        .map_err(|_| AppError::Validation(format!("{field} is not a valid identifier")))
}

/// Validate a grade request.
pub fn validate_grade_request(
    req: &GradeRequest,
    max_code_size: usize,
) -> Result<ValidatedGradeRequest, AppError> {
    let question_id = parse_reference("question_id", &req.question_id)?;
    let contest_id = parse_reference("contest_id", &req.contest_id)?;

    if req.code.trim().is_empty() {
        return Err(AppError::Validation("code is required".into()));
    }
    if req.code.len() > max_code_size {
        return Err(AppError::Validation(format!(
            "code exceeds maximum size of {max_code_size} bytes"
        )));
    }

    let language_id = req.language_id.trim();
    if language_id.is_empty() {
        return Err(AppError::Validation("language_id is required".into()));
    }

    Ok(ValidatedGradeRequest {
        question_id,
        contest_id,
        code: req.code.clone(),
        language_id: language_id.to_string(),
    })
}
