pub mod grading;
pub mod question;
pub mod submission;

pub use grading::{
    GradeRequest, GradeResponse, GradeSummary, ValidatedGradeRequest, validate_grade_request,
};
pub use question::{Question, TestCase};
pub use submission::Submission;
