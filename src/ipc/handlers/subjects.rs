use crate::ipc::error::{reply, HandlerErr, HandlerResult};
use crate::ipc::params::{assessment_type, required_f64, required_str, status, student_id, subject_ref};
use crate::ipc::types::{AppState, Request};
use crate::model::{AssessmentType, Subject};
use serde_json::json;
use std::collections::BTreeMap;

fn subject_json(subject: &Subject) -> serde_json::Value {
    json!({
        "subjectId": subject.id(),
        "name": subject.name(),
        "weights": subject.weights(),
        "rates": subject.rates(),
        "participants": subject.participants(),
    })
}

/// `weights` is an optional object keyed by assessment type.
fn parse_weights(params: &serde_json::Value) -> Result<Option<BTreeMap<AssessmentType, f64>>, HandlerErr> {
    let Some(raw) = params.get("weights").filter(|v| !v.is_null()) else {
        return Ok(None);
    };
    let Some(obj) = raw.as_object() else {
        return Err(HandlerErr::bad_params("weights must be an object"));
    };
    let mut weights = BTreeMap::new();
    for (k, v) in obj {
        let t: AssessmentType = k.parse()?;
        let w = v
            .as_f64()
            .ok_or_else(|| HandlerErr::bad_params(format!("weights.{} must be a number", k)))?;
        weights.insert(t, w);
    }
    Ok(Some(weights))
}

fn handle_create(state: &mut AppState, req: &Request) -> HandlerResult {
    let name = required_str(&req.params, "name")?;
    let weights = parse_weights(&req.params)?;
    let id = state.term.add_subject(name, weights)?;
    Ok(subject_json(state.term.subject(id)?))
}

fn handle_list(state: &mut AppState, _req: &Request) -> HandlerResult {
    let subjects: Vec<_> = state
        .term
        .subjects()
        .map(|s| {
            json!({
                "subjectId": s.id(),
                "name": s.name(),
                "studentCount": s.participants().len(),
            })
        })
        .collect();
    Ok(json!({ "subjects": subjects }))
}

fn handle_get(state: &mut AppState, req: &Request) -> HandlerResult {
    let subject = subject_ref(&req.params)?;
    Ok(subject_json(state.term.subject(subject)?))
}

fn handle_rename(state: &mut AppState, req: &Request) -> HandlerResult {
    let subject = subject_ref(&req.params)?;
    let name = required_str(&req.params, "name")?;
    let id = state.term.resolve(&subject)?;
    state.term.rename_subject(id, name)?;
    Ok(subject_json(state.term.subject(id)?))
}

fn handle_delete(state: &mut AppState, req: &Request) -> HandlerResult {
    let subject = subject_ref(&req.params)?;
    let removed = state.term.remove_subject(subject)?;
    Ok(json!({
        "subjectId": removed.id(),
        "withdrawn": removed.participants().len(),
    }))
}

fn handle_enroll(state: &mut AppState, req: &Request) -> HandlerResult {
    let subject = subject_ref(&req.params)?;
    let student = student_id(&req.params)?;
    let enrolled = state.term.enroll(subject, student)?;
    Ok(json!({ "enrolled": enrolled }))
}

fn handle_set_weight(state: &mut AppState, req: &Request) -> HandlerResult {
    let subject = subject_ref(&req.params)?;
    let t = assessment_type(&req.params)?;
    let weight = required_f64(&req.params, "weight")?;
    let updated = state.term.change_weight(subject, t, weight)?;
    Ok(json!({ "updated": updated }))
}

fn handle_set_rate(state: &mut AppState, req: &Request) -> HandlerResult {
    let subject = subject_ref(&req.params)?;
    let status = status(&req.params)?;
    let rate = required_f64(&req.params, "rate")?;
    state.term.set_rate(subject, status, rate)?;
    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let res = match req.method.as_str() {
        "subjects.create" => handle_create(state, req),
        "subjects.list" => handle_list(state, req),
        "subjects.get" => handle_get(state, req),
        "subjects.rename" => handle_rename(state, req),
        "subjects.delete" => handle_delete(state, req),
        "subjects.enroll" => handle_enroll(state, req),
        "subjects.setWeight" => handle_set_weight(state, req),
        "subjects.setRate" => handle_set_rate(state, req),
        _ => return None,
    };
    Some(reply(&req.id, res))
}
