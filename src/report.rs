use crate::model::{day_name, EventId, ModelResult, SubjectId, SubjectRef, Term};
use serde::Serialize;

pub const MISSING: &str = "NaN";

/// Roster table of one subject: identity columns, then one column per
/// assessment event and one per attendance event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectTable {
    pub subject_id: SubjectId,
    pub subject_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub fn subject_table(term: &Term, subject: impl Into<SubjectRef>) -> ModelResult<SubjectTable> {
    let subject = term.subject(subject)?;
    let subject_id = subject.id();

    let mut students = Vec::with_capacity(subject.participants().len());
    for id in subject.participants() {
        students.push(term.student(*id)?);
    }

    // Event columns in first-recorded order across the roster.
    let mut assessment_cols: Vec<(EventId, String)> = Vec::new();
    let mut attendance_cols: Vec<(EventId, String)> = Vec::new();
    for student in &students {
        for a in student.assessments(subject_id) {
            if !assessment_cols.iter().any(|(ev, _)| *ev == a.event_id()) {
                assessment_cols.push((a.event_id(), format!("{} ({})", a.assessment_type(), a.event_id())));
            }
        }
        for a in student.attendances(subject_id) {
            if !attendance_cols.iter().any(|(ev, _)| *ev == a.event_id()) {
                attendance_cols.push((a.event_id(), format!("{} ({})", day_name(a.day()), a.event_id())));
            }
        }
    }

    let mut columns: Vec<String> = ["ID", "Students", "Gender", "Group"]
        .into_iter()
        .map(String::from)
        .collect();
    columns.extend(assessment_cols.iter().map(|(_, label)| label.clone()));
    columns.extend(attendance_cols.iter().map(|(_, label)| label.clone()));

    let rows = students
        .iter()
        .map(|student| {
            let mut row = vec![
                student.id().to_string(),
                student.name().to_string(),
                student.gender().to_string(),
                student.group().to_string(),
            ];
            for (ev, _) in &assessment_cols {
                let cell = student
                    .assessments(subject_id)
                    .iter()
                    .find(|a| a.event_id() == *ev)
                    .map(|a| a.grade().to_string());
                row.push(cell.unwrap_or_else(|| MISSING.to_string()));
            }
            for (ev, _) in &attendance_cols {
                let cell = student
                    .attendances(subject_id)
                    .iter()
                    .find(|a| a.event_id() == *ev)
                    .map(|a| format!("{}/{}", a.late_minutes(), a.total_minutes()));
                row.push(cell.unwrap_or_else(|| MISSING.to_string()));
            }
            row
        })
        .collect();

    Ok(SubjectTable {
        subject_id,
        subject_name: subject.name().to_string(),
        columns,
        rows,
    })
}

impl SubjectTable {
    /// Fixed-width rendering, one line per student under a header line.
    pub fn render_text(&self) -> String {
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &self.rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let line = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, w)| format!("{cell:<w$}", w = *w))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut out = line(&self.columns);
        for row in &self.rows {
            out.push('\n');
            out.push_str(&line(row));
        }
        out.push('\n');
        out
    }
}
