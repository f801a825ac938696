use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ::common::Visibility;
use portal::config::GradingConfig;
use portal::grading::Grader;
use portal::judge::{JudgeBackend, JudgeError, JudgeRequest, JudgeToken, JudgeVerdict, StatusInfo};
use portal::models::{GradeRequest, Question, Submission, TestCase};
use portal::store::{MemoryStore, StoreError, SubmissionRepository};
use sea_orm::DbErr;
use uuid::Uuid;

pub const IN_QUEUE: i32 = 1;
pub const PROCESSING: i32 = 2;
pub const ACCEPTED: i32 = 3;
pub const WRONG_ANSWER: i32 = 4;
pub const COMPILATION_ERROR: i32 = 6;

/// One scripted answer to a poll call.
#[derive(Clone, Copy, Debug)]
pub enum Step {
    Status(i32),
    Fail,
}

/// Judge fake keyed by test case input.
///
/// Each input gets a queue of poll answers; the last answer repeats forever.
#[derive(Default)]
pub struct ScriptedJudge {
    scripts: Mutex<HashMap<String, VecDeque<Step>>>,
    reject_submit: Mutex<Option<String>>,
    requests: Mutex<Vec<JudgeRequest>>,
    submits: AtomicUsize,
    polls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedJudge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, input: &str, steps: &[Step]) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(input.to_string(), steps.iter().copied().collect());
        self
    }

    /// Submitting the case with this input fails.
    pub fn reject_submit(self, input: &str) -> Self {
        *self.reject_submit.lock().unwrap() = Some(input.to_string());
        self
    }

    pub fn submits(&self) -> usize {
        self.submits.load(Ordering::SeqCst)
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<JudgeRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn verdict(id: i32) -> JudgeVerdict {
    JudgeVerdict {
        status: StatusInfo {
            id,
            description: String::new(),
        },
        stdout: None,
        time: None,
        memory: None,
        stderr: None,
        message: None,
        exit_code: None,
    }
}

#[async_trait]
impl JudgeBackend for ScriptedJudge {
    async fn submit(&self, request: &JudgeRequest) -> Result<JudgeToken, JudgeError> {
        self.submits.fetch_add(1, Ordering::SeqCst);
        if self.reject_submit.lock().unwrap().as_deref() == Some(request.stdin.as_str()) {
            return Err(JudgeError::UnexpectedStatus {
                status: 503,
                body: "queue full".into(),
            });
        }
        self.requests.lock().unwrap().push(request.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        Ok(JudgeToken(request.stdin.clone()))
    }

    async fn poll(&self, token: &JudgeToken) -> Result<JudgeVerdict, JudgeError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let step = {
            let mut scripts = self.scripts.lock().unwrap();
            let steps = scripts
                .get_mut(&token.0)
                .unwrap_or_else(|| panic!("no script for {token}"));
            if steps.len() > 1 {
                steps.pop_front().unwrap()
            } else {
                *steps.front().unwrap()
            }
        };

        // Yield so concurrent cases interleave.
        tokio::task::yield_now().await;

        match step {
            Step::Status(id) => {
                if !(1..=2).contains(&id) {
                    self.in_flight.fetch_sub(1, Ordering::SeqCst);
                }
                Ok(verdict(id))
            }
            Step::Fail => Err(JudgeError::UnexpectedStatus {
                status: 500,
                body: "boom".into(),
            }),
        }
    }
}

/// Submission store whose writes always fail.
pub struct BrokenSubmissions;

#[async_trait]
impl SubmissionRepository for BrokenSubmissions {
    async fn create(&self, _submission: &Submission) -> Result<Uuid, StoreError> {
        Err(StoreError::Database(DbErr::Custom("disk full".into())))
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Submission>, StoreError> {
        Ok(None)
    }
}

/// Question whose test case inputs are `"case-0"`, `"case-1"`, ...
pub fn question(cases: usize) -> Question {
    Question {
        id: Uuid::new_v4(),
        title: "Echo".into(),
        cpu_time_limit_ms: 1500,
        memory_limit_kb: 131_072,
        test_cases: (0..cases)
            .map(|i| TestCase {
                id: Uuid::new_v4(),
                input: format!("case-{i}"),
                expected_output: format!("out-{i}"),
                visibility: if i == 0 {
                    Visibility::Public
                } else {
                    Visibility::Private
                },
            })
            .collect(),
    }
}

pub fn request_for(question: &Question) -> GradeRequest {
    GradeRequest {
        question_id: question.id.to_string(),
        contest_id: Uuid::new_v4().to_string(),
        code: "print(input())".into(),
        language_id: "71".into(),
    }
}

pub fn fast_settings() -> GradingConfig {
    GradingConfig {
        poll_interval_ms: 10,
        poll_timeout_secs: 1,
        max_concurrency: 2,
        submission_timeout_secs: None,
        max_code_size: 4096,
    }
}

/// A grader over a memory store that already holds `question`.
pub struct TestGrader {
    pub grader: Grader,
    pub judge: Arc<ScriptedJudge>,
    pub store: MemoryStore,
}

impl TestGrader {
    pub fn new(judge: ScriptedJudge, question: &Question) -> Self {
        Self::with_settings(judge, question, fast_settings())
    }

    pub fn with_settings(judge: ScriptedJudge, question: &Question, settings: GradingConfig) -> Self {
        let judge = Arc::new(judge);
        let store = MemoryStore::new();
        store.insert_question(question.clone());
        let grader = Grader::new(
            judge.clone(),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            settings,
            Duration::from_secs(1),
        );
        Self {
            grader,
            judge,
            store,
        }
    }
}
