use std::sync::Arc;
use std::time::Duration;

use ::common::SubmissionStatus;
use portal::error::AppError;
use portal::grading::Grader;
use portal::store::{MemoryStore, SubmissionRepository};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::common::{
    ACCEPTED, BrokenSubmissions, COMPILATION_ERROR, IN_QUEUE, PROCESSING, ScriptedJudge, Step,
    TestGrader, WRONG_ANSWER, fast_settings, question, request_for,
};

fn all_accepted(cases: usize) -> ScriptedJudge {
    (0..cases).fold(ScriptedJudge::new(), |judge, i| {
        judge.script(
            &format!("case-{i}"),
            &[Step::Status(PROCESSING), Step::Status(ACCEPTED)],
        )
    })
}

mod scoring {
    use super::*;

    #[tokio::test]
    async fn all_cases_accepted_scores_100() {
        let question = question(3);
        let app = TestGrader::new(all_accepted(3), &question);
        let user = Uuid::new_v4();

        let response = app
            .grader
            .grade(user, &request_for(&question), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.status, SubmissionStatus::Accepted);
        assert_eq!(response.score, 100);
        assert_eq!(app.judge.submits(), 3);
        assert_eq!(app.store.submission_count(), 1);

        let stored = app
            .store
            .find_by_id(response.submission_id)
            .await
            .unwrap()
            .expect("submission stored");
        assert_eq!(stored.user_id, user);
        assert_eq!(stored.question_id, question.id);
        assert_eq!(stored.status, SubmissionStatus::Accepted);
        assert_eq!(stored.score, 100);
    }

    #[tokio::test]
    async fn three_of_four_scores_75() {
        let question = question(4);
        let judge = all_accepted(4).script("case-2", &[Step::Status(WRONG_ANSWER)]);
        let app = TestGrader::new(judge, &question);

        let response = app
            .grader
            .grade(Uuid::new_v4(), &request_for(&question), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.status, SubmissionStatus::WrongAnswer);
        assert_eq!(response.score, 75);
    }

    #[tokio::test]
    async fn compilation_error_case_does_not_pass() {
        let question = question(2);
        let judge = all_accepted(2).script("case-1", &[Step::Status(COMPILATION_ERROR)]);
        let app = TestGrader::new(judge, &question);

        let response = app
            .grader
            .grade(Uuid::new_v4(), &request_for(&question), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.status, SubmissionStatus::WrongAnswer);
        assert_eq!(response.score, 50);
    }

    #[tokio::test]
    async fn question_without_test_cases_scores_zero() {
        let question = question(0);
        let app = TestGrader::new(ScriptedJudge::new(), &question);

        let response = app
            .grader
            .grade(Uuid::new_v4(), &request_for(&question), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.status, SubmissionStatus::WrongAnswer);
        assert_eq!(response.score, 0);
        assert_eq!(app.judge.submits(), 0);
        assert_eq!(app.store.submission_count(), 1);
    }

    #[tokio::test]
    async fn judge_receives_question_limits_and_case_data() {
        let question = question(1);
        let app = TestGrader::new(all_accepted(1), &question);

        app.grader
            .grade(Uuid::new_v4(), &request_for(&question), &CancellationToken::new())
            .await
            .unwrap();

        let requests = app.judge.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].source_code, "print(input())");
        assert_eq!(requests[0].language_id, "71");
        assert_eq!(requests[0].stdin, "case-0");
        assert_eq!(requests[0].expected_output, "out-0");
        assert_eq!(requests[0].time_limit, 1.5);
        assert_eq!(requests[0].memory_limit, 131_072);
    }

    #[tokio::test]
    async fn in_flight_cases_never_exceed_concurrency() {
        let question = question(6);
        let judge = (0..6).fold(ScriptedJudge::new(), |judge, i| {
            judge.script(
                &format!("case-{i}"),
                &[
                    Step::Status(IN_QUEUE),
                    Step::Status(PROCESSING),
                    Step::Status(ACCEPTED),
                ],
            )
        });
        let app = TestGrader::new(judge, &question);

        let response = app
            .grader
            .grade(Uuid::new_v4(), &request_for(&question), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.score, 100);
        assert_eq!(app.judge.submits(), 6);
        assert!(app.judge.max_in_flight() <= 2);
    }
}

mod polling {
    use super::*;

    #[tokio::test]
    async fn transient_poll_failures_are_retried() {
        let question = question(1);
        let judge = ScriptedJudge::new().script(
            "case-0",
            &[Step::Fail, Step::Fail, Step::Status(ACCEPTED)],
        );
        let app = TestGrader::new(judge, &question);

        let response = app
            .grader
            .grade(Uuid::new_v4(), &request_for(&question), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.score, 100);
        assert_eq!(app.judge.polls(), 3);
    }

    #[tokio::test]
    async fn exhausted_budget_fails_only_that_case() {
        let question = question(2);
        let judge = ScriptedJudge::new()
            .script("case-0", &[Step::Status(PROCESSING)])
            .script("case-1", &[Step::Status(ACCEPTED)]);
        let app = TestGrader::new(judge, &question);

        let response = app
            .grader
            .grade(Uuid::new_v4(), &request_for(&question), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.status, SubmissionStatus::WrongAnswer);
        assert_eq!(response.score, 50);
        assert!(app.judge.polls() > 2);
        assert_eq!(app.store.submission_count(), 1);
    }

    #[tokio::test]
    async fn every_poll_failing_counts_as_not_passed() {
        let question = question(1);
        let judge = ScriptedJudge::new().script("case-0", &[Step::Fail]);
        let app = TestGrader::new(judge, &question);

        let response = app
            .grader
            .grade(Uuid::new_v4(), &request_for(&question), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.score, 0);
        assert_eq!(response.status, SubmissionStatus::WrongAnswer);
    }
}

mod failures {
    use super::*;

    #[tokio::test]
    async fn submit_failure_aborts_without_writing() {
        let question = question(3);
        let judge = all_accepted(3).reject_submit("case-0");
        let app = TestGrader::new(judge, &question);

        let err = app
            .grader
            .grade(Uuid::new_v4(), &request_for(&question), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::JudgeUnavailable(_)));
        assert_eq!(err.status_and_body().1.code, "JUDGE_UNAVAILABLE");
        assert_eq!(app.store.submission_count(), 0);
    }

    #[tokio::test]
    async fn failed_write_still_reports_the_grade() {
        let question = question(2);
        let store = MemoryStore::new();
        store.insert_question(question.clone());
        let grader = Grader::new(
            Arc::new(all_accepted(2)),
            Arc::new(store),
            Arc::new(BrokenSubmissions),
            fast_settings(),
            Duration::from_secs(1),
        );

        let err = grader
            .grade(Uuid::new_v4(), &request_for(&question), &CancellationToken::new())
            .await
            .unwrap_err();

        match &err {
            AppError::Persistence { outcome, .. } => {
                assert_eq!(outcome.score, 100);
                assert_eq!(outcome.status, SubmissionStatus::Accepted);
            }
            other => panic!("expected persistence error, got {other:?}"),
        }
        let (status, body) = err.status_and_body();
        assert_eq!(status.as_u16(), 500);
        assert_eq!(body.code, "PERSISTENCE_ERROR");
        let summary = body.submission.expect("grade is reported");
        assert_eq!(summary.score, 100);
    }

    #[tokio::test]
    async fn unknown_question_is_not_found() {
        let question = question(1);
        let app = TestGrader::new(all_accepted(1), &question);
        let mut request = request_for(&question);
        request.question_id = Uuid::new_v4().to_string();

        let err = app
            .grader
            .grade(Uuid::new_v4(), &request, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(app.judge.submits(), 0);
    }

    #[tokio::test]
    async fn invalid_request_is_rejected_before_judging() {
        let question = question(1);
        let app = TestGrader::new(all_accepted(1), &question);
        let mut request = request_for(&question);
        request.code = String::new();

        let err = app
            .grader
            .grade(Uuid::new_v4(), &request, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(app.judge.submits(), 0);
        assert_eq!(app.store.submission_count(), 0);
    }

    #[tokio::test]
    async fn oversized_code_is_rejected() {
        let question = question(1);
        let app = TestGrader::new(all_accepted(1), &question);
        let mut request = request_for(&question);
        request.code = "x".repeat(4097);

        let err = app
            .grader
            .grade(Uuid::new_v4(), &request, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }
}

mod deadlines {
    use super::*;

    #[tokio::test]
    async fn cancellation_stops_grading_without_writing() {
        let question = question(2);
        let judge = ScriptedJudge::new()
            .script("case-0", &[Step::Status(IN_QUEUE)])
            .script("case-1", &[Step::Status(IN_QUEUE)]);
        let app = TestGrader::new(judge, &question);

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let err = app
            .grader
            .grade(Uuid::new_v4(), &request_for(&question), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Cancelled));
        assert_eq!(app.store.submission_count(), 0);
    }

    #[tokio::test]
    async fn already_cancelled_token_submits_nothing() {
        let question = question(2);
        let app = TestGrader::new(all_accepted(2), &question);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = app
            .grader
            .grade(Uuid::new_v4(), &request_for(&question), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Cancelled));
        assert_eq!(app.judge.submits(), 0);
        assert_eq!(app.store.submission_count(), 0);
    }

    #[tokio::test]
    async fn submission_deadline_is_enforced() {
        let question = question(1);
        let judge = ScriptedJudge::new().script("case-0", &[Step::Status(PROCESSING)]);
        let mut settings = fast_settings();
        settings.submission_timeout_secs = Some(0);
        let app = TestGrader::with_settings(judge, &question, settings);

        let err = app
            .grader
            .grade(Uuid::new_v4(), &request_for(&question), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::GradingTimedOut(_)));
        assert_eq!(err.status_and_body().1.code, "GRADING_TIMEOUT");
        assert_eq!(app.store.submission_count(), 0);
    }
}
