use crate::ipc::error::{reply, HandlerResult};
use crate::ipc::params::{assessment_type, event_id, i64_list, required_i64, student_id, subject_ref};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_record(state: &mut AppState, req: &Request) -> HandlerResult {
    let subject = subject_ref(&req.params)?;
    let t = assessment_type(&req.params)?;
    let grades = i64_list(&req.params, "grades")?;
    let assessment_id = state.term.record_assessment_for_roster(subject, t, &grades)?;
    Ok(json!({ "assessmentId": assessment_id }))
}

fn handle_modify(state: &mut AppState, req: &Request) -> HandlerResult {
    let subject = subject_ref(&req.params)?;
    let student = student_id(&req.params)?;
    let assessment_id = event_id(&req.params, "assessmentId")?;
    let grade = required_i64(&req.params, "grade")?;
    state
        .term
        .modify_assessment_by_id(subject, student, assessment_id, grade)?;
    Ok(json!({ "ok": true }))
}

fn handle_remove(state: &mut AppState, req: &Request) -> HandlerResult {
    let subject = subject_ref(&req.params)?;
    let assessment_id = event_id(&req.params, "assessmentId")?;
    let removed = state.term.remove_assessment(subject, assessment_id)?;
    Ok(json!({ "removed": removed }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let res = match req.method.as_str() {
        "assessments.record" => handle_record(state, req),
        "assessments.modify" => handle_modify(state, req),
        "assessments.remove" => handle_remove(state, req),
        _ => return None,
    };
    Some(reply(&req.id, res))
}
