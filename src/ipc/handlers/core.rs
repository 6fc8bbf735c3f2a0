use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};
use crate::model::Term;
use serde_json::json;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "sessionId": state.term.session_id().to_string(),
            "subjectCount": state.term.subjects().count(),
            "studentCount": state.term.students().count(),
        }),
    )
}

/// Starts a fresh term; every subject and student of the old one is dropped.
fn handle_term_reset(state: &mut AppState, req: &Request) -> serde_json::Value {
    let previous = state.term.session_id();
    state.term = Term::new();
    tracing::info!(%previous, session_id = %state.term.session_id(), "term reset");
    ok(
        &req.id,
        json!({ "sessionId": state.term.session_id().to_string() }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "term.reset" => Some(handle_term_reset(state, req)),
        _ => None,
    }
}
