use actix_web::http::StatusCode;

use super::{ExceptionResolver, Resolution};
use crate::error::{AppError, ErrorCategory, Result};
use crate::pipeline::{WebRequest, WebResponse};

/// Binding and conversion failures become a plain 400.
pub struct DefaultResolver;

impl ExceptionResolver for DefaultResolver {
    fn name(&self) -> &str {
        "defaultHandlers"
    }

    fn resolve(
        &self,
        req: &WebRequest,
        failure: &AppError,
        res: &mut WebResponse,
    ) -> Result<Resolution> {
        if failure.category() != ErrorCategory::ClientInput {
            return Ok(Resolution::Unhandled);
        }

        log::warn!("Resolved [{}] on {}: {}", failure.kind().name(), req.path(), failure);
        res.send_error(StatusCode::BAD_REQUEST, Some(failure.to_string()));
        Ok(Resolution::Empty)
    }
}
