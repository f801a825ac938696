use common::JudgeStatus;
use serde::{Deserialize, Serialize};

/// Body of a job creation request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct JudgeRequest {
    pub source_code: String,
    pub language_id: String,
    pub stdin: String,
    pub expected_output: String,
    /// CPU time limit in seconds.
    pub time_limit: f64,
    /// Memory limit in kilobytes.
    pub memory_limit: u32,
}

/// Opaque job identifier assigned by the judge.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JudgeToken(pub String);

impl std::fmt::Display for JudgeToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedResponse {
    pub token: JudgeToken,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInfo {
    pub id: i32,
    #[serde(default)]
    pub description: String,
}

/// Current state of a judge job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JudgeVerdict {
    pub status: StatusInfo,
    #[serde(default)]
    pub stdout: Option<String>,
    /// Execution time in seconds, as the judge formats it.
    #[serde(default)]
    pub time: Option<String>,
    /// Memory used in kilobytes.
    #[serde(default)]
    pub memory: Option<i64>,
    #[serde(default)]
    pub stderr: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub exit_code: Option<i32>,
}

impl JudgeVerdict {
    pub fn status(&self) -> JudgeStatus {
        JudgeStatus::from_id(self.status.id)
    }

    /// Execution time in seconds, if the judge reported a parseable one.
    pub fn time_secs(&self) -> Option<f64> {
        self.time.as_deref().and_then(|t| t.trim().parse().ok())
    }
}
