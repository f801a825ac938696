//! Status ids reported by the external execution service.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Execution status of a single judge job, decoded from the service's numeric id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JudgeStatus {
    InQueue,
    Processing,
    Accepted,
    WrongAnswer,
    TimeLimitExceeded,
    CompilationError,
    RuntimeError(RuntimeSignal),
    InternalError,
    ExecFormatError,
    /// An id outside the documented table. Treated as terminal and not accepted.
    Other(i32),
}

/// Flavours of runtime failure the service distinguishes (ids 7 to 12).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuntimeSignal {
    Sigsegv,
    Sigxfsz,
    Sigfpe,
    Sigabrt,
    Nzec,
    Other,
}

impl JudgeStatus {
    pub fn from_id(id: i32) -> Self {
        match id {
            1 => Self::InQueue,
            2 => Self::Processing,
            3 => Self::Accepted,
            4 => Self::WrongAnswer,
            5 => Self::TimeLimitExceeded,
            6 => Self::CompilationError,
            7 => Self::RuntimeError(RuntimeSignal::Sigsegv),
            8 => Self::RuntimeError(RuntimeSignal::Sigxfsz),
            9 => Self::RuntimeError(RuntimeSignal::Sigfpe),
            10 => Self::RuntimeError(RuntimeSignal::Sigabrt),
            11 => Self::RuntimeError(RuntimeSignal::Nzec),
            12 => Self::RuntimeError(RuntimeSignal::Other),
            13 => Self::InternalError,
            14 => Self::ExecFormatError,
            other => Self::Other(other),
        }
    }

    pub fn id(&self) -> i32 {
        match self {
            Self::InQueue => 1,
            Self::Processing => 2,
            Self::Accepted => 3,
            Self::WrongAnswer => 4,
            Self::TimeLimitExceeded => 5,
            Self::CompilationError => 6,
            Self::RuntimeError(RuntimeSignal::Sigsegv) => 7,
            Self::RuntimeError(RuntimeSignal::Sigxfsz) => 8,
            Self::RuntimeError(RuntimeSignal::Sigfpe) => 9,
            Self::RuntimeError(RuntimeSignal::Sigabrt) => 10,
            Self::RuntimeError(RuntimeSignal::Nzec) => 11,
            Self::RuntimeError(RuntimeSignal::Other) => 12,
            Self::InternalError => 13,
            Self::ExecFormatError => 14,
            Self::Other(id) => *id,
        }
    }

    /// Returns true once the job has finished, successfully or not.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InQueue | Self::Processing)
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl fmt::Display for JudgeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InQueue => f.write_str("In Queue"),
            Self::Processing => f.write_str("Processing"),
            Self::Accepted => f.write_str("Accepted"),
            Self::WrongAnswer => f.write_str("Wrong Answer"),
            Self::TimeLimitExceeded => f.write_str("Time Limit Exceeded"),
            Self::CompilationError => f.write_str("Compilation Error"),
            Self::RuntimeError(signal) => write!(f, "Runtime Error ({signal:?})"),
            Self::InternalError => f.write_str("Internal Error"),
            Self::ExecFormatError => f.write_str("Exec Format Error"),
            Self::Other(id) => write!(f, "Unknown ({id})"),
        }
    }
}
