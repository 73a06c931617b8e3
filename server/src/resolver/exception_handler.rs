use actix_web::http::StatusCode;
use serde::Serialize;
use std::sync::Arc;

use super::{ExceptionResolver, Resolution};
use crate::error::{AppError, FailureKind, Result};
use crate::pipeline::{WebRequest, WebResponse};

pub type ExceptionHandlerFn =
    Arc<dyn Fn(&AppError, &WebRequest, &mut WebResponse) -> Result<Resolution> + Send + Sync>;

/// Body written by the API exception handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResult {
    pub code: String,
    pub message: String,
}

impl ErrorResult {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// Handlers keyed by failure kind.
///
/// A failure goes to the handler registered for the nearest kind in its
/// lineage. Two handlers for the same kind: the first one registered wins.
#[derive(Default, Clone)]
pub struct ExceptionHandlers {
    handlers: Vec<(FailureKind, ExceptionHandlerFn)>,
}

impl ExceptionHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(mut self, kind: FailureKind, handler: F) -> Self
    where
        F: Fn(&AppError, &WebRequest, &mut WebResponse) -> Result<Resolution> + Send + Sync + 'static,
    {
        self.handlers.push((kind, Arc::new(handler)));
        self
    }

    /// `IllegalArgument` and `User` failures answered as 400 JSON.
    pub fn api_defaults() -> Self {
        Self::new()
            .on(FailureKind::IllegalArgument, |failure, _req, res| {
                log::error!("[exceptionHandle] ex: {}", failure);
                res.json(StatusCode::BAD_REQUEST, &ErrorResult::new("BAD", failure.to_string()))?;
                Ok(Resolution::Empty)
            })
            .on(FailureKind::User, |failure, _req, res| {
                log::error!("[exceptionHandle] ex: {}", failure);
                res.json(
                    StatusCode::BAD_REQUEST,
                    &ErrorResult::new("USER-EX", failure.to_string()),
                )?;
                Ok(Resolution::Empty)
            })
    }

    /// Adds a last-resort handler for the root `Exception` kind. Its message
    /// is fixed so failure details stay in the log.
    pub fn with_catch_all(self) -> Self {
        self.on(FailureKind::Exception, |failure, _req, res| {
            log::error!("[exceptionHandle] ex: {}", failure);
            res.json(
                StatusCode::INTERNAL_SERVER_ERROR,
                &ErrorResult::new("EX", "Internal error"),
            )?;
            Ok(Resolution::Empty)
        })
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    fn find(&self, kind: FailureKind) -> Option<&ExceptionHandlerFn> {
        self.handlers
            .iter()
            .enumerate()
            .filter_map(|(order, (registered, handler))| {
                kind.depth_to(*registered).map(|depth| (depth, order, handler))
            })
            .min_by_key(|(depth, order, _)| (*depth, *order))
            .map(|(_, _, handler)| handler)
    }
}

impl ExceptionResolver for ExceptionHandlers {
    fn name(&self) -> &str {
        "exceptionHandlers"
    }

    fn resolve(
        &self,
        req: &WebRequest,
        failure: &AppError,
        res: &mut WebResponse,
    ) -> Result<Resolution> {
        match self.find(failure.kind()) {
            Some(handler) => handler(failure, req, res),
            None => Ok(Resolution::Unhandled),
        }
    }
}
