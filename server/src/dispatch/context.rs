use actix_web::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{AppError, ErrorCategory, FailureKind};
use crate::pipeline::{SentError, WebRequest};

const GENERIC_MESSAGE: &str = "Internal Server Error";
const NO_MESSAGE: &str = "No message available";

/// What went wrong, attached to the error dispatch as a request attribute.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub status: StatusCode,
    pub failure: Option<Arc<AppError>>,
    pub message: Option<String>,
    pub request_path: String,
    /// Route that was handling the request when it failed.
    pub origin: Option<String>,
    pub exception_type: Option<&'static str>,
}

/// Structured error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
}

impl ErrorContext {
    /// A failure that no resolver handled. Always a 500.
    pub fn from_failure(failure: AppError, req: &WebRequest) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: Some(failure.to_string()),
            exception_type: Some(failure.kind().name()),
            failure: Some(Arc::new(failure)),
            request_path: req.path().to_string(),
            origin: req.handler().map(str::to_string),
        }
    }

    pub fn from_sent_error(sent: SentError, req: &WebRequest) -> Self {
        Self {
            status: sent.status,
            failure: None,
            message: sent.message,
            request_path: req.path().to_string(),
            origin: req.handler().map(str::to_string),
            exception_type: None,
        }
    }

    /// Context for a direct request to an error path.
    pub fn missing(req: &WebRequest) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            failure: None,
            message: None,
            request_path: req.path().to_string(),
            origin: None,
            exception_type: None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.failure.as_ref().map(|failure| failure.kind())
    }

    pub fn reason(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("Unknown")
    }

    /// Message safe to show the caller. Unclassified failures are replaced
    /// with a generic text.
    pub fn public_message(&self) -> String {
        let unclassified = self
            .failure
            .as_ref()
            .is_some_and(|failure| failure.category() == ErrorCategory::Unclassified);

        if unclassified {
            return GENERIC_MESSAGE.to_string();
        }

        match self.message.as_deref() {
            Some(message) if !message.is_empty() => message.to_string(),
            _ => NO_MESSAGE.to_string(),
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            timestamp: Utc::now(),
            status: self.status.as_u16(),
            error: self.reason().to_string(),
            message: self.public_message(),
            path: self.request_path.clone(),
        }
    }

    pub fn log(&self) {
        log::info!("ERROR_EXCEPTION: {:?}", self.failure);
        log::info!("ERROR_EXCEPTION_TYPE: {:?}", self.exception_type);
        log::info!("ERROR_MESSAGE: {:?}", self.message);
        log::info!("ERROR_REQUEST_URI: {}", self.request_path);
        log::info!("ERROR_ORIGIN: {:?}", self.origin);
        log::info!("ERROR_STATUS_CODE: {}", self.status.as_u16());
    }
}
