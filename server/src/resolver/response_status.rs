use std::sync::Arc;

use super::{ExceptionResolver, Resolution};
use crate::error::{AppError, Result};
use crate::messages::MessageSource;
use crate::pipeline::{WebRequest, WebResponse};

/// Sends the status carried by the failure. The reason is treated as a
/// message code first and used verbatim when no message exists for it.
pub struct ResponseStatusResolver {
    messages: Arc<MessageSource>,
}

impl ResponseStatusResolver {
    pub fn new(messages: Arc<MessageSource>) -> Self {
        Self { messages }
    }
}

impl ExceptionResolver for ResponseStatusResolver {
    fn name(&self) -> &str {
        "responseStatus"
    }

    fn resolve(
        &self,
        _req: &WebRequest,
        failure: &AppError,
        res: &mut WebResponse,
    ) -> Result<Resolution> {
        let Some((status, reason)) = failure.response_status() else {
            return Ok(Resolution::Unhandled);
        };

        let message = self
            .messages
            .message(reason, &[])
            .unwrap_or_else(|| reason.to_string());

        res.send_error(status, Some(message));
        Ok(Resolution::Empty)
    }
}
