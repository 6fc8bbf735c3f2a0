use crate::model::{Gender, Group, ModelError, ModelResult, Student, StudentId, SubjectRef, Term};
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// One student entry of a roster file.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterRecord {
    pub name: String,
    pub gender: String,
    pub group: String,
}

pub fn parse_roster(text: &str) -> anyhow::Result<Vec<RosterRecord>> {
    serde_json::from_str(text).context("roster must be a JSON array of {name, gender, group}")
}

pub fn load_roster(path: &Path) -> anyhow::Result<Vec<RosterRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read roster {}", path.display()))?;
    parse_roster(&text)
}

fn build_student(rec: &RosterRecord) -> ModelResult<Student> {
    let gender: Gender = rec.gender.trim().parse()?;
    let group: Group = rec.group.trim().parse()?;
    Student::new(&rec.name, gender, group)
}

/// Creates a student per record and, when `subject` is given, enrolls each
/// one in file order. Every record is validated before the term is touched.
pub fn import_roster(
    term: &mut Term,
    records: &[RosterRecord],
    subject: Option<SubjectRef>,
) -> ModelResult<Vec<StudentId>> {
    let subject_id = subject.map(|s| term.resolve(&s)).transpose()?;

    let mut students = Vec::with_capacity(records.len());
    for (idx, rec) in records.iter().enumerate() {
        let student = build_student(rec)
            .map_err(|e| ModelError::Validation(format!("roster record {idx}: {e}")))?;
        students.push(student);
    }

    let mut ids = Vec::with_capacity(students.len());
    for student in students {
        let id = term.insert_student(student)?;
        if let Some(subject_id) = subject_id {
            term.enroll(subject_id, id)?;
        }
        ids.push(id);
    }
    tracing::info!(students = ids.len(), "roster imported");
    Ok(ids)
}
