use crate::ipc::error::{reply, HandlerResult};
use crate::ipc::params::subject_ref;
use crate::ipc::types::{AppState, Request};
use crate::report;
use serde_json::json;

fn handle_subject_table(state: &mut AppState, req: &Request) -> HandlerResult {
    let subject = subject_ref(&req.params)?;
    let table = report::subject_table(&state.term, subject)?;
    let text = table.render_text();
    Ok(json!({
        "subjectId": table.subject_id,
        "subjectName": table.subject_name,
        "columns": table.columns,
        "rows": table.rows,
        "text": text,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let res = match req.method.as_str() {
        "reports.subjectTable" => handle_subject_table(state, req),
        _ => return None,
    };
    Some(reply(&req.id, res))
}
