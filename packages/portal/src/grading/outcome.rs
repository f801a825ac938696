use common::{JudgeStatus, SubmissionStatus};
use serde::Serialize;

/// What grading learned about one test case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaseOutcome {
    /// Position in the question's test case list.
    pub index: usize,
    /// Last status observed, `None` if every poll failed.
    pub status: Option<JudgeStatus>,
    /// The poll budget ran out before a terminal status was seen.
    pub exhausted: bool,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.status.is_some_and(|s| s.is_accepted())
    }
}

/// Aggregate over every test case of a submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GradeOutcome {
    pub passed: usize,
    pub total: usize,
    /// Cases that were still queued or running when their budget ran out.
    pub timed_out: usize,
    pub score: u8,
    pub status: SubmissionStatus,
}

impl GradeOutcome {
    pub fn from_cases(cases: &[CaseOutcome]) -> Self {
        let passed = cases.iter().filter(|c| c.passed()).count();
        let timed_out = cases.iter().filter(|c| c.exhausted).count();
        Self::from_counts(passed, cases.len(), timed_out)
    }

    /// `score = floor(passed * 100 / total)`, 0 when there is nothing to run.
    /// Only a perfect score is accepted.
    pub fn from_counts(passed: usize, total: usize, timed_out: usize) -> Self {
        let passed = passed.min(total);
        let score = if total == 0 {
            0
        } else {
            (passed * 100 / total) as u8
        };
        let status = if score == 100 {
            SubmissionStatus::Accepted
        } else {
            SubmissionStatus::WrongAnswer
        };

        Self {
            passed,
            total,
            timed_out,
            score,
            status,
        }
    }
}
