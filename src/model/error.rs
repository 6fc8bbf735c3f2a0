use thiserror::Error as ThisError;

pub type ModelResult<T> = Result<T, ModelError>;

/// Every failure is a local validation failure surfaced to the caller; nothing
/// is retried or recovered inside the model.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum ModelError {
    #[error("{0}")]
    Validation(String),

    #[error("{kind} {key} not found")]
    Lookup { kind: &'static str, key: String },

    #[error("expected {expected} values (one per enrolled student), got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("invalid assessment type {0:?}, must be one of TD, TP, Quizz, Exam")]
    UnknownAssessmentType(String),

    #[error("unknown attendance status {0:?}, must be one of Present, Late, Absent")]
    UnknownStatus(String),

    #[error("attendance status undefined for {0} late minutes (must be below 180)")]
    StatusUndefined(i64),
}

impl ModelError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn lookup(kind: &'static str, key: impl ToString) -> Self {
        Self::Lookup {
            kind,
            key: key.to_string(),
        }
    }

    /// Stable machine-readable code, used as the IPC error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Lookup { .. } => "not_found",
            Self::ArityMismatch { .. } => "arity_mismatch",
            Self::UnknownAssessmentType(_) => "unknown_assessment_type",
            Self::UnknownStatus(_) => "unknown_status",
            Self::StatusUndefined(_) => "status_undefined",
        }
    }
}

pub(crate) mod msg {
    pub const NEG_MINUTES: &str = "number of minutes cannot be negative";
    pub const BAD_TOTAL: &str = "total minutes should be more than or equal to the late minutes";
    pub const BAD_LATE: &str = "late minutes should be less than or equal to the total minutes";
    pub const BAD_WEIGHT: &str = "weight must be a finite, non-negative number";
    pub const BAD_RATE: &str = "rate must be a finite, non-negative number";
    pub const BAD_GRADE: &str = "invalid grade value, grade should be between 0 and 20";
    pub const BAD_NAME: &str = "invalid name, name cannot be empty";
}
