//! Endpoints that fail on purpose, one per resolution path.

use actix_web::http::StatusCode;
use serde::Serialize;

use crate::app::AppState;
use crate::error::{AppError, Result};
use crate::pipeline::{WebRequest, WebResponse};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MemberDto {
    member_id: String,
    name: String,
}

/// Unresolved failure: error dispatch with 500.
pub fn error_ex(_state: &AppState, _req: &mut WebRequest, _res: &mut WebResponse) -> Result<()> {
    Err(AppError::Runtime("exception occurred!".to_string()))
}

pub fn error_404(_state: &AppState, _req: &mut WebRequest, res: &mut WebResponse) -> Result<()> {
    res.send_error(StatusCode::NOT_FOUND, Some("404 error!".to_string()));
    Ok(())
}

pub fn error_500(_state: &AppState, _req: &mut WebRequest, res: &mut WebResponse) -> Result<()> {
    res.send_error(StatusCode::INTERNAL_SERVER_ERROR, None);
    Ok(())
}

pub fn get_member(_state: &AppState, req: &mut WebRequest, res: &mut WebResponse) -> Result<()> {
    let id = req.path_param("id").unwrap_or_default();

    match id {
        "ex" => Err(AppError::Runtime("wrong user".to_string())),
        "bad" => Err(AppError::IllegalArgument("wrong input value".to_string())),
        "user-ex" => Err(AppError::User("user error".to_string())),
        _ => res.json(
            StatusCode::OK,
            &MemberDto {
                member_id: id.to_string(),
                name: format!("hello {}", id),
            },
        ),
    }
}

/// Carries its own 400 and `error.bad` reason.
pub fn response_status_ex1(
    _state: &AppState,
    _req: &mut WebRequest,
    _res: &mut WebResponse,
) -> Result<()> {
    Err(AppError::BadRequest)
}

pub fn response_status_ex2(
    _state: &AppState,
    _req: &mut WebRequest,
    _res: &mut WebResponse,
) -> Result<()> {
    Err(AppError::response_status_with(
        StatusCode::NOT_FOUND,
        "error.bad",
        Some(AppError::IllegalArgument(String::new())),
    ))
}

/// `data` must be an integer; anything else is a 400 from the default resolver.
pub fn default_handler_ex(
    _state: &AppState,
    req: &mut WebRequest,
    res: &mut WebResponse,
) -> Result<()> {
    let data: i32 = req.required_param("data")?;
    log::debug!("data = {}", data);

    res.text(StatusCode::OK, "ok");
    Ok(())
}
