use crate::ipc::error::{reply, HandlerResult};
use crate::ipc::params::{day, event_id, i64_list, required_i64, student_id, subject_ref};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_record(state: &mut AppState, req: &Request) -> HandlerResult {
    let subject = subject_ref(&req.params)?;
    let total_minutes = required_i64(&req.params, "totalMinutes")?;
    let late_minutes = i64_list(&req.params, "lateMinutes")?;
    let day = day(&req.params)?;
    let attendance_id = state
        .term
        .record_attendance_for_roster(subject, total_minutes, &late_minutes, day)?;
    Ok(json!({ "attendanceId": attendance_id }))
}

fn handle_modify(state: &mut AppState, req: &Request) -> HandlerResult {
    let subject = subject_ref(&req.params)?;
    let student = student_id(&req.params)?;
    let attendance_id = event_id(&req.params, "attendanceId")?;
    let late_minutes = required_i64(&req.params, "lateMinutes")?;
    state
        .term
        .modify_attendance_by_id(subject, student, attendance_id, late_minutes)?;
    Ok(json!({ "ok": true }))
}

fn handle_remove(state: &mut AppState, req: &Request) -> HandlerResult {
    let subject = subject_ref(&req.params)?;
    let attendance_id = event_id(&req.params, "attendanceId")?;
    let removed = state.term.remove_attendance(subject, attendance_id)?;
    Ok(json!({ "removed": removed }))
}

fn handle_by_day(state: &mut AppState, req: &Request) -> HandlerResult {
    let subject = subject_ref(&req.params)?;
    let student = student_id(&req.params)?;
    let day = day(&req.params)?;
    let records = state.term.attendance_on(subject, student, day)?;
    Ok(json!({ "records": records }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let res = match req.method.as_str() {
        "attendance.record" => handle_record(state, req),
        "attendance.modify" => handle_modify(state, req),
        "attendance.remove" => handle_remove(state, req),
        "attendance.byDay" => handle_by_day(state, req),
        _ => return None,
    };
    Some(reply(&req.id, res))
}
