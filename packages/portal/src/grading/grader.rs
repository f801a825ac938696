use std::sync::Arc;
use std::time::Duration;

use common::GradingConfig;
use futures::{StreamExt, TryStreamExt, stream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::outcome::{CaseOutcome, GradeOutcome};
use super::poll::poll_until_terminal;
use crate::error::AppError;
use crate::judge::{JudgeBackend, JudgeRequest};
use crate::models::{GradeRequest, GradeResponse, Question, Submission, validate_grade_request};
use crate::store::{QuestionRepository, SubmissionRepository};

/// Drives a submission from request to stored verdict.
///
/// Holds no per-request state; one instance serves concurrent gradings.
#[derive(Clone)]
pub struct Grader {
    judge: Arc<dyn JudgeBackend>,
    questions: Arc<dyn QuestionRepository>,
    submissions: Arc<dyn SubmissionRepository>,
    settings: GradingConfig,
    request_timeout: Duration,
}

impl Grader {
    pub fn new(
        judge: Arc<dyn JudgeBackend>,
        questions: Arc<dyn QuestionRepository>,
        submissions: Arc<dyn SubmissionRepository>,
        settings: GradingConfig,
        request_timeout: Duration,
    ) -> Self {
        Self {
            judge,
            questions,
            submissions,
            settings,
            request_timeout,
        }
    }

    /// Grade `request` on behalf of `user_id` and store the result.
    ///
    /// Nothing is written unless every test case resolved. Cancelling
    /// `cancel` aborts grading without a write.
    pub async fn grade(
        &self,
        user_id: Uuid,
        request: &GradeRequest,
        cancel: &CancellationToken,
    ) -> Result<GradeResponse, AppError> {
        let request = validate_grade_request(request, self.settings.max_code_size)?;

        let question = self
            .questions
            .find_question(request.question_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Question not found".into()))?;

        let mut submission = Submission::pending(user_id, &request);
        let deadline = self
            .settings
            .submission_timeout(question.test_cases.len(), self.request_timeout);

        info!(
            submission_id = %submission.id,
            question_id = %question.id,
            test_cases = question.test_cases.len(),
            deadline_secs = deadline.as_secs(),
            "Grading submission"
        );

        let cases = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!(submission_id = %submission.id, "Grading cancelled");
                return Err(AppError::Cancelled);
            }
            result = tokio::time::timeout(deadline, self.run_cases(&submission, &question, cancel)) => {
                match result {
                    Ok(cases) => cases?,
                    Err(_) => {
                        warn!(submission_id = %submission.id, "Grading deadline exceeded");
                        return Err(AppError::GradingTimedOut(deadline));
                    }
                }
            }
        };

        let outcome = GradeOutcome::from_cases(&cases);
        submission.finalize(&outcome);

        if cancel.is_cancelled() {
            warn!(submission_id = %submission.id, "Grading cancelled before saving");
            return Err(AppError::Cancelled);
        }

        let submission_id =
            self.submissions
                .create(&submission)
                .await
                .map_err(|source| AppError::Persistence {
                    submission_id: submission.id,
                    outcome,
                    source,
                })?;

        info!(
            %submission_id,
            status = %outcome.status,
            score = outcome.score,
            passed = outcome.passed,
            total = outcome.total,
            timed_out = outcome.timed_out,
            "Submission graded"
        );

        Ok(GradeResponse {
            submission_id,
            status: submission.status,
            score: submission.score,
        })
    }

    /// Grade every test case, at most `max_concurrency` at a time.
    ///
    /// Results keep test case order. The first submit failure stops the run
    /// and drops whatever is still in flight.
    async fn run_cases(
        &self,
        submission: &Submission,
        question: &Question,
        cancel: &CancellationToken,
    ) -> Result<Vec<CaseOutcome>, AppError> {
        stream::iter(0..question.test_cases.len())
            .map(|index| self.run_case(submission, question, index, cancel))
            .buffered(self.settings.concurrency())
            .try_collect()
            .await
    }

    async fn run_case(
        &self,
        submission: &Submission,
        question: &Question,
        index: usize,
        cancel: &CancellationToken,
    ) -> Result<CaseOutcome, AppError> {
        let test_case = &question.test_cases[index];
        let request = JudgeRequest {
            source_code: submission.code.clone(),
            language_id: submission.language_id.clone(),
            stdin: test_case.input.clone(),
            expected_output: test_case.expected_output.clone(),
            time_limit: question.cpu_time_limit_secs(),
            memory_limit: question.memory_limit_kb,
        };

        let token = self.judge.submit(&request).await.map_err(|err| {
            error!(
                submission_id = %submission.id,
                case = index,
                error = %err,
                "Failed to submit test case"
            );
            AppError::JudgeUnavailable(err)
        })?;

        let polled =
            poll_until_terminal(self.judge.as_ref(), &token, self.settings.poll_schedule(), cancel)
                .await?;

        let outcome = CaseOutcome {
            index,
            status: polled.status,
            exhausted: polled.exhausted,
        };
        debug!(
            submission_id = %submission.id,
            case = index,
            %token,
            status = ?outcome.status,
            passed = outcome.passed(),
            "Test case resolved"
        );
        Ok(outcome)
    }
}
