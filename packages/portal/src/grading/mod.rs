mod grader;
mod outcome;
mod poll;

pub use grader::Grader;
pub use outcome::{CaseOutcome, GradeOutcome};
pub use poll::{PollResult, poll_until_terminal};
