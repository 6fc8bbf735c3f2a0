use crate::model::Term;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

#[derive(Debug, Default)]
pub struct AppState {
    pub term: Term,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
