use actix_web::http::StatusCode;
use common::{format_grouped, parse_grouped, IpPort};
use serde_json::json;

use crate::app::AppState;
use crate::error::{AppError, Result};
use crate::pipeline::{WebRequest, WebResponse};

pub fn hello_v2(_state: &AppState, req: &mut WebRequest, res: &mut WebResponse) -> Result<()> {
    let data: i32 = req.required_param("data")?;
    log::info!("data = {}", data);

    res.text(StatusCode::OK, "ok");
    Ok(())
}

/// `?ipPort=127.0.0.1:8080`
pub fn ip_port(_state: &AppState, req: &mut WebRequest, res: &mut WebResponse) -> Result<()> {
    let ip_port: IpPort = req.required_param("ipPort")?;
    log::info!("ipPort IP = {}", ip_port.ip);
    log::info!("ipPort PORT = {}", ip_port.port);

    res.json(
        StatusCode::OK,
        &json!({
            "ip": ip_port.ip,
            "port": ip_port.port,
            "ipPort": ip_port.to_string(),
        }),
    )
}

/// Accepts `10000` or `10,000` and answers with both forms.
pub fn number_format(_state: &AppState, req: &mut WebRequest, res: &mut WebResponse) -> Result<()> {
    let raw: String = req.required_param("number")?;
    let number = parse_grouped(&raw).map_err(|e| {
        log::debug!("number rejected: {}", e);
        AppError::TypeMismatch {
            name: "number".to_string(),
            value: raw.clone(),
            target: "i64",
        }
    })?;

    res.json(
        StatusCode::OK,
        &json!({ "number": number, "formatted": format_grouped(number) }),
    )
}
