//! In-memory class record: subjects, students, and their assessment and
//! attendance records.

mod assessment;
mod attendance;
mod error;
mod ids;
mod student;
mod subject;
mod term;

pub use assessment::{Assessment, AssessmentType, MAX_GRADE};
pub use attendance::{
    day_name, parse_day, Attendance, AttendanceStatus, DAYS_OF_WEEK, MAX_LATE_MINUTES,
};
pub use error::{ModelError, ModelResult};
pub use ids::{next_id, EventId, RecordId, StudentId, SubjectId};
pub use student::{Gender, Group, Student};
pub use subject::{default_rates, default_weights, Subject, DEFAULT_WEIGHT};
pub use term::{AttendanceLine, StudentSummary, SubjectRef, SubjectSummary, Term};
