use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::pipeline::{Gate, GateDecision, WebRequest, WebResponse};

/// Per-request id shared by the REQUEST and RESPONSE log lines.
#[derive(Debug, Clone)]
pub struct LogId(pub String);

pub struct LogGate;

impl Gate for LogGate {
    fn name(&self) -> &str {
        "log"
    }

    fn before(&self, req: &mut WebRequest, _res: &mut WebResponse) -> Result<GateDecision> {
        let id = Uuid::new_v4().to_string();

        log::info!(
            "REQUEST [{}][{}][{} {}]",
            id,
            req.dispatch_kind(),
            req.method(),
            req.path()
        );
        req.insert_attribute(LogId(id));

        Ok(GateDecision::Continue)
    }

    fn after(&self, req: &WebRequest, res: &WebResponse, failure: Option<&AppError>) {
        let id = req
            .attribute::<LogId>()
            .map(|LogId(id)| id.as_str())
            .unwrap_or("-");

        log::info!(
            "RESPONSE [{}][{}][{}][{}] {}",
            id,
            req.dispatch_kind(),
            req.path(),
            req.handler().unwrap_or("-"),
            res.status()
        );

        if let Some(failure) = failure {
            log::error!("afterCompletion error [{}]: {}", id, failure);
        }
    }
}
