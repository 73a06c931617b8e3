use actix_web::http::StatusCode;
use serde::Serialize;

use crate::app::AppState;
use crate::error::Result;
use crate::pipeline::{WebRequest, WebResponse};

#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub active_sessions: usize,
}

pub fn health_check(state: &AppState, _req: &mut WebRequest, res: &mut WebResponse) -> Result<()> {
    let response = HealthCheckResponse {
        status: "healthy".to_string(),
        active_sessions: state.sessions.active_count(),
    };

    res.json(StatusCode::OK, &response)
}
