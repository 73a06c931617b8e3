use actix_web::http::StatusCode;
use serde::Serialize;
use serde_json::json;

use crate::app::AppState;
use crate::error::Result;
use crate::middleware::login_member;
use crate::pipeline::{WebRequest, WebResponse};

pub fn home(state: &AppState, req: &mut WebRequest, res: &mut WebResponse) -> Result<()> {
    match login_member(req, &state.sessions, state.cookie_name()) {
        Some(member) => res.view("loginHome", json!({ "member": member })),
        None => res.view("home", json!({})),
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionInfo {
    session_id: String,
    max_inactive_interval: i64,
    creation_time: String,
    last_accessed_time: String,
}

pub fn session_info(state: &AppState, req: &mut WebRequest, res: &mut WebResponse) -> Result<()> {
    let session = req
        .cookie(state.cookie_name())
        .and_then(|token| state.sessions.session(token));

    let Some(session) = session else {
        res.text(StatusCode::OK, "no session");
        return Ok(());
    };

    let info = SessionInfo {
        session_id: session.token,
        max_inactive_interval: state.sessions.max_inactive_secs(),
        creation_time: session.created_at.to_rfc3339(),
        last_accessed_time: session.last_accessed_at.to_rfc3339(),
    };
    log::info!("sessionId={}, maxInactiveInterval={}", info.session_id, info.max_inactive_interval);

    res.json(StatusCode::OK, &info)
}
