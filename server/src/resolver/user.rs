use actix_web::http::StatusCode;
use serde_json::json;

use super::{ExceptionResolver, Resolution};
use crate::dispatch::Representation;
use crate::error::{AppError, FailureKind, Result};
use crate::pipeline::{WebRequest, WebResponse};

/// Answers `User` failures itself: JSON for API callers, the `error/500`
/// view for everyone else. Either way the status is 400 and no error
/// dispatch happens.
pub struct UserResolver;

impl ExceptionResolver for UserResolver {
    fn name(&self) -> &str {
        "user"
    }

    fn resolve(
        &self,
        req: &WebRequest,
        failure: &AppError,
        res: &mut WebResponse,
    ) -> Result<Resolution> {
        if failure.kind() != FailureKind::User {
            return Ok(Resolution::Unhandled);
        }

        let body = json!({
            "ex": failure.kind().name(),
            "message": failure.to_string(),
        });

        match Representation::negotiate(req.accept()) {
            Representation::Json => {
                res.json(StatusCode::BAD_REQUEST, &body)?;
                Ok(Resolution::Empty)
            }
            Representation::Html => {
                res.set_status(StatusCode::BAD_REQUEST);
                Ok(Resolution::View {
                    name: "error/500".to_string(),
                    model: body,
                })
            }
        }
    }
}
