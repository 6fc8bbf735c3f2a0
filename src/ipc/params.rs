use super::error::HandlerErr;
use crate::model::{parse_day, AssessmentType, AttendanceStatus, EventId, StudentId, SubjectRef};
use chrono::Weekday;

pub fn required_str<'a>(params: &'a serde_json::Value, key: &str) -> Result<&'a str, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

pub fn optional_str<'a>(params: &'a serde_json::Value, key: &str) -> Result<Option<&'a str>, HandlerErr> {
    match params.get(key) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(v) => v
            .as_str()
            .map(Some)
            .ok_or_else(|| HandlerErr::bad_params(format!("{} must be a string", key))),
    }
}

pub fn required_i64(params: &serde_json::Value, key: &str) -> Result<i64, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_i64())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing integer {}", key)))
}

pub fn required_f64(params: &serde_json::Value, key: &str) -> Result<f64, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing number {}", key)))
}

fn required_id(params: &serde_json::Value, key: &str) -> Result<u64, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_u64())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing id {}", key)))
}

pub fn student_id(params: &serde_json::Value) -> Result<StudentId, HandlerErr> {
    required_id(params, "studentId").map(StudentId::from)
}

pub fn event_id(params: &serde_json::Value, key: &str) -> Result<EventId, HandlerErr> {
    required_id(params, key).map(EventId::from)
}

pub fn i64_list(params: &serde_json::Value, key: &str) -> Result<Vec<i64>, HandlerErr> {
    let Some(items) = params.get(key).and_then(|v| v.as_array()) else {
        return Err(HandlerErr::bad_params(format!("missing array {}", key)));
    };
    items
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_i64()
                .ok_or_else(|| HandlerErr::bad_params(format!("{}[{}] must be an integer", key, i)))
        })
        .collect()
}

/// `subject` is either a numeric id or a registered name.
pub fn subject_ref(params: &serde_json::Value) -> Result<SubjectRef, HandlerErr> {
    match params.get("subject") {
        Some(serde_json::Value::String(name)) => Ok(SubjectRef::Name(name.clone())),
        Some(v) => match v.as_u64() {
            Some(id) => Ok(SubjectRef::Id(id.into())),
            None => Err(HandlerErr::bad_params("subject must be an id or a name")),
        },
        None => Err(HandlerErr::bad_params("missing subject")),
    }
}

pub fn optional_subject_ref(params: &serde_json::Value) -> Result<Option<SubjectRef>, HandlerErr> {
    match params.get("subject") {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(_) => subject_ref(params).map(Some),
    }
}

pub fn assessment_type(params: &serde_json::Value) -> Result<AssessmentType, HandlerErr> {
    Ok(required_str(params, "assessmentType")?.parse()?)
}

pub fn status(params: &serde_json::Value) -> Result<AttendanceStatus, HandlerErr> {
    Ok(required_str(params, "status")?.parse()?)
}

pub fn day(params: &serde_json::Value) -> Result<Weekday, HandlerErr> {
    Ok(parse_day(required_str(params, "day")?)?)
}
