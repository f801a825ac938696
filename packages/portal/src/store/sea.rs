use async_trait::async_trait;
use common::{SubmissionStatus, Visibility};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr,
};
use tracing::debug;
use uuid::Uuid;

use super::{QuestionRepository, StoreError, SubmissionRepository};
use crate::entity::{question, submission, test_case};
use crate::models::{Question, Submission, TestCase};

/// Store backed by a SeaORM connection.
#[derive(Clone, Debug)]
pub struct SeaStore {
    db: DatabaseConnection,
}

impl SeaStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn decode_error(entity: &'static str, id: Uuid, reason: impl Into<String>) -> StoreError {
    StoreError::Decode {
        entity,
        id,
        reason: reason.into(),
    }
}

fn non_negative(entity: &'static str, id: Uuid, field: &str, value: i32) -> Result<u32, StoreError> {
    u32::try_from(value).map_err(|_| decode_error(entity, id, format!("{field} is {value}")))
}

fn decode_question(
    model: question::Model,
    cases: Vec<test_case::Model>,
) -> Result<Question, StoreError> {
    let test_cases = cases
        .into_iter()
        .map(|tc| {
            let visibility = tc
                .visibility
                .parse::<Visibility>()
                .map_err(|e| decode_error("test case", tc.id, e.to_string()))?;
            Ok(TestCase {
                id: tc.id,
                input: tc.input,
                expected_output: tc.expected_output,
                visibility,
            })
        })
        .collect::<Result<Vec<_>, StoreError>>()?;

    Ok(Question {
        id: model.id,
        cpu_time_limit_ms: non_negative("question", model.id, "cpu_time_limit", model.cpu_time_limit)?,
        memory_limit_kb: non_negative("question", model.id, "memory_limit", model.memory_limit)?,
        title: model.title,
        test_cases,
    })
}

fn decode_submission(model: submission::Model) -> Result<Submission, StoreError> {
    let status = model
        .status
        .parse::<SubmissionStatus>()
        .map_err(|e| decode_error("submission", model.id, e.to_string()))?;
    let score = u8::try_from(model.score)
        .ok()
        .filter(|score| *score <= 100)
        .ok_or_else(|| decode_error("submission", model.id, format!("score is {}", model.score)))?;

    Ok(Submission {
        id: model.id,
        user_id: model.user_id,
        question_id: model.question_id,
        contest_id: model.contest_id,
        code: model.code,
        language_id: model.language_id,
        status,
        score,
        submitted_at: model.submitted_at,
    })
}

#[async_trait]
impl QuestionRepository for SeaStore {
    async fn find_question(&self, id: Uuid) -> Result<Option<Question>, StoreError> {
        let Some(model) = question::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let cases = test_case::Entity::find()
            .filter(test_case::Column::QuestionId.eq(id))
            .order_by_asc(test_case::Column::Position)
            .all(&self.db)
            .await?;

        debug!(question_id = %id, test_cases = cases.len(), "Loaded question");
        decode_question(model, cases).map(Some)
    }
}

#[async_trait]
impl SubmissionRepository for SeaStore {
    async fn create(&self, submission: &Submission) -> Result<Uuid, StoreError> {
        let model = submission::ActiveModel {
            id: Set(submission.id),
            user_id: Set(submission.user_id),
            question_id: Set(submission.question_id),
            contest_id: Set(submission.contest_id),
            code: Set(submission.code.clone()),
            language_id: Set(submission.language_id.clone()),
            status: Set(submission.status.as_str().to_string()),
            score: Set(i16::from(submission.score)),
            submitted_at: Set(submission.submitted_at),
        };

        submission::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await
            .map_err(|err| match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    StoreError::Duplicate(submission.id)
                }
                _ => StoreError::Database(err),
            })?;

        Ok(submission.id)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Submission>, StoreError> {
        submission::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(decode_submission)
            .transpose()
    }
}
