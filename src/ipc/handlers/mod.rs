pub mod assessments;
pub mod attendance;
pub mod core;
pub mod reports;
pub mod students;
pub mod subjects;
