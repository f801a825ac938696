pub mod config;
pub mod judge_status;
pub mod poll;
pub mod submission_status;
pub mod visibility;

pub use config::{GradingConfig, JudgeConfig};
pub use judge_status::JudgeStatus;
pub use poll::{PollBudget, PollSchedule};
pub use submission_status::SubmissionStatus;
pub use visibility::Visibility;
