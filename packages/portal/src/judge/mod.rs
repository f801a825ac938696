//! Client side of the external execution service's submit/poll protocol.

mod client;
mod models;

use async_trait::async_trait;
use thiserror::Error;

pub use client::Judge0Client;
pub use models::{JudgeRequest, JudgeToken, JudgeVerdict, StatusInfo};

#[derive(Debug, Error)]
pub enum JudgeError {
    /// Transport failure, including the per-call timeout.
    #[error("Judge service unavailable: {0}")]
    ServiceUnavailable(#[from] reqwest::Error),

    #[error("Judge returned unexpected status {status}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Failed to decode judge response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid judge client configuration: {0}")]
    Configuration(String),
}

/// An execution backend that queues one job per test case and reports its
/// progress.
#[async_trait]
pub trait JudgeBackend: Send + Sync {
    /// Queue a job. Returns the token used to poll it.
    async fn submit(&self, request: &JudgeRequest) -> Result<JudgeToken, JudgeError>;

    /// Fetch the current state of a queued job.
    async fn poll(&self, token: &JudgeToken) -> Result<JudgeVerdict, JudgeError>;
}
