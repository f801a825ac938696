use common::Visibility;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Read-only question bundle consumed by grading.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub title: String,
    /// CPU time limit in milliseconds.
    pub cpu_time_limit_ms: u32,
    /// Memory limit in kilobytes.
    pub memory_limit_kb: u32,
    /// In grading order.
    pub test_cases: Vec<TestCase>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: Uuid,
    pub input: String,
    pub expected_output: String,
    pub visibility: Visibility,
}

impl Question {
    /// CPU time limit in the seconds the judge expects.
    pub fn cpu_time_limit_secs(&self) -> f64 {
        f64::from(self.cpu_time_limit_ms) / 1000.0
    }
}
