use std::time::Duration;

use serde::Deserialize;

use crate::poll::PollSchedule;

/// Connection settings for the external execution service.
#[derive(Debug, Deserialize, Clone)]
pub struct JudgeConfig {
    /// Base URL of the service. Default: "http://localhost:2358".
    #[serde(default = "default_judge_base_url")]
    pub base_url: String,
    /// Sent as `X-Auth-Token` when set.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Timeout applied to every submit/poll call. Default: 10.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_judge_base_url() -> String {
    "http://localhost:2358".into()
}
fn default_request_timeout_secs() -> u64 {
    10
}

impl JudgeConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            base_url: default_judge_base_url(),
            api_key: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Grading pipeline tuning.
#[derive(Debug, Deserialize, Clone)]
pub struct GradingConfig {
    /// Pause between polls of one judge job. Default: 1000.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Wall-clock budget for polling one judge job. Default: 10.
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
    /// Test cases graded at once per submission. Default: 4.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Overall deadline for one submission. Derived from the other
    /// settings when absent.
    #[serde(default)]
    pub submission_timeout_secs: Option<u64>,
    /// Maximum source size in bytes. Default: 1 MiB.
    #[serde(default = "default_max_code_size")]
    pub max_code_size: usize,
}

fn default_poll_interval_ms() -> u64 {
    1000
}
fn default_poll_timeout_secs() -> u64 {
    10
}
fn default_max_concurrency() -> usize {
    4
}
fn default_max_code_size() -> usize {
    1_048_576
}

impl GradingConfig {
    pub fn poll_schedule(&self) -> PollSchedule {
        PollSchedule::new(
            Duration::from_millis(self.poll_interval_ms),
            Duration::from_secs(self.poll_timeout_secs),
        )
    }

    /// Number of test cases in flight at once, never below one.
    pub fn concurrency(&self) -> usize {
        self.max_concurrency.max(1)
    }

    /// Deadline for grading `case_count` test cases.
    ///
    /// Without an explicit setting this is one poll budget plus a submit and
    /// a final poll call per wave of concurrent test cases.
    pub fn submission_timeout(&self, case_count: usize, request_timeout: Duration) -> Duration {
        if let Some(secs) = self.submission_timeout_secs {
            return Duration::from_secs(secs);
        }
        let waves = case_count.div_ceil(self.concurrency()).max(1) as u32;
        let per_case = Duration::from_secs(self.poll_timeout_secs) + request_timeout * 2;
        per_case * waves
    }
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            poll_timeout_secs: default_poll_timeout_secs(),
            max_concurrency: default_max_concurrency(),
            submission_timeout_secs: None,
            max_code_size: default_max_code_size(),
        }
    }
}
