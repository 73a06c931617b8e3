use actix_web::http::StatusCode;

use super::{ExceptionResolver, Resolution};
use crate::error::{AppError, FailureKind, Result};
use crate::pipeline::{WebRequest, WebResponse};

/// Turns `IllegalArgument` failures into a 400 error dispatch.
pub struct IllegalArgumentResolver;

impl ExceptionResolver for IllegalArgumentResolver {
    fn name(&self) -> &str {
        "illegalArgument"
    }

    fn resolve(
        &self,
        _req: &WebRequest,
        failure: &AppError,
        res: &mut WebResponse,
    ) -> Result<Resolution> {
        if failure.kind() != FailureKind::IllegalArgument {
            return Ok(Resolution::Unhandled);
        }

        log::info!("IllegalArgument resolved to 400");
        res.send_error(StatusCode::BAD_REQUEST, Some(failure.to_string()));
        Ok(Resolution::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::Method;

    #[test]
    fn test_only_illegal_argument_is_handled() {
        let req = WebRequest::new(Method::GET, "/api/members/bad");

        let mut res = WebResponse::new();
        let failure = AppError::IllegalArgument("bad input".into());
        assert_eq!(
            IllegalArgumentResolver.resolve(&req, &failure, &mut res).unwrap(),
            Resolution::Empty
        );
        assert_eq!(res.sent_error().unwrap().message.as_deref(), Some("bad input"));

        let mut res = WebResponse::new();
        let failure = AppError::User("user error".into());
        assert_eq!(
            IllegalArgumentResolver.resolve(&req, &failure, &mut res).unwrap(),
            Resolution::Unhandled
        );
    }
}
