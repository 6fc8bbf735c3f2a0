use crate::ipc::error::{reply, HandlerErr, HandlerResult};
use crate::ipc::params::{optional_str, optional_subject_ref, required_str, student_id};
use crate::ipc::types::{AppState, Request};
use crate::model::{Gender, Group, Student};
use crate::roster::{self, RosterRecord};
use serde_json::json;
use std::path::Path;

fn student_json(student: &Student) -> serde_json::Value {
    json!({
        "studentId": student.id(),
        "name": student.name(),
        "gender": student.gender(),
        "group": student.group(),
        "subjects": student.subjects(),
    })
}

fn handle_create(state: &mut AppState, req: &Request) -> HandlerResult {
    let name = required_str(&req.params, "name")?;
    let gender: Gender = required_str(&req.params, "gender")?.parse()?;
    let group: Group = required_str(&req.params, "group")?.parse()?;
    let id = state.term.add_student(name, gender, group)?;
    Ok(student_json(state.term.student(id)?))
}

fn handle_list(state: &mut AppState, _req: &Request) -> HandlerResult {
    let students: Vec<_> = state.term.students().map(student_json).collect();
    Ok(json!({ "students": students }))
}

fn handle_get(state: &mut AppState, req: &Request) -> HandlerResult {
    let id = student_id(&req.params)?;
    Ok(student_json(state.term.student(id)?))
}

fn handle_update(state: &mut AppState, req: &Request) -> HandlerResult {
    let id = student_id(&req.params)?;
    let name = optional_str(&req.params, "name")?;
    let gender = optional_str(&req.params, "gender")?
        .map(str::parse::<Gender>)
        .transpose()?;
    let group = optional_str(&req.params, "group")?
        .map(str::parse::<Group>)
        .transpose()?;
    state.term.update_student(id, name, gender, group)?;
    Ok(student_json(state.term.student(id)?))
}

/// Roster from either `path` (a JSON file) or inline `records`.
fn handle_import_roster(state: &mut AppState, req: &Request) -> HandlerResult {
    let records: Vec<RosterRecord> = match (optional_str(&req.params, "path")?, req.params.get("records")) {
        (Some(path), _) => roster::load_roster(Path::new(path)).map_err(|e| HandlerErr {
            code: "roster_load_failed",
            message: format!("{e:#}"),
            details: Some(json!({ "path": path })),
        })?,
        (None, Some(raw)) => serde_json::from_value(raw.clone()).map_err(|e| HandlerErr {
            code: "roster_load_failed",
            message: e.to_string(),
            details: None,
        })?,
        (None, None) => return Err(HandlerErr::bad_params("missing path or records")),
    };
    let subject = optional_subject_ref(&req.params)?;
    let ids = roster::import_roster(&mut state.term, &records, subject)?;
    Ok(json!({ "studentIds": ids }))
}

fn handle_final_grade(state: &mut AppState, req: &Request) -> HandlerResult {
    let id = student_id(&req.params)?;
    let final_grade = state.term.final_grade(id)?;
    Ok(json!({ "studentId": id, "finalGrade": final_grade }))
}

fn handle_summary(state: &mut AppState, req: &Request) -> HandlerResult {
    let id = student_id(&req.params)?;
    let summary = state.term.student_summary(id)?;
    serde_json::to_value(summary).map_err(|e| HandlerErr {
        code: "serialize_failed",
        message: e.to_string(),
        details: None,
    })
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let res = match req.method.as_str() {
        "students.create" => handle_create(state, req),
        "students.list" => handle_list(state, req),
        "students.get" => handle_get(state, req),
        "students.update" => handle_update(state, req),
        "students.importRoster" => handle_import_roster(state, req),
        "students.finalGrade" => handle_final_grade(state, req),
        "students.summary" => handle_summary(state, req),
        _ => return None,
    };
    Some(reply(&req.id, res))
}
