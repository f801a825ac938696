use common::{JudgeStatus, PollSchedule};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::judge::{JudgeBackend, JudgeToken};

/// Result of polling one judge job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollResult {
    pub status: Option<JudgeStatus>,
    pub exhausted: bool,
}

/// Poll `token` until the judge reports a terminal status or the schedule's
/// budget runs out.
///
/// Poll failures are logged and retried within the same budget. On
/// exhaustion the last observed status is returned as is.
pub async fn poll_until_terminal(
    judge: &dyn JudgeBackend,
    token: &JudgeToken,
    schedule: PollSchedule,
    cancel: &CancellationToken,
) -> Result<PollResult, AppError> {
    let mut budget = schedule.start();
    let mut last = None;

    loop {
        let attempt = budget.record_attempt();
        match judge.poll(token).await {
            Ok(verdict) => {
                let status = verdict.status();
                if status.is_terminal() {
                    debug!(%token, attempt, %status, "Judge job finished");
                    return Ok(PollResult {
                        status: Some(status),
                        exhausted: false,
                    });
                }
                last = Some(status);
            }
            Err(err) => {
                warn!(%token, attempt, error = %err, "Poll failed, will retry");
            }
        }

        let Some(delay) = budget.next_delay() else {
            warn!(
                %token,
                attempts = budget.attempts(),
                last_status = ?last,
                "Poll budget exhausted before a terminal status"
            );
            return Ok(PollResult {
                status: last,
                exhausted: true,
            });
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AppError::Cancelled),
            _ = tokio::time::sleep(delay) => {}
        }
    }
}
