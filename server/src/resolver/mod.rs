//! Exception resolvers.
//!
//! A failure that escapes a handler is offered to each resolver in order.
//! The first one that returns something other than [`Resolution::Unhandled`]
//! wins. If none does, the failure goes on to the error dispatch as a 500.

pub mod default;
pub mod exception_handler;
pub mod illegal_argument;
pub mod response_status;
pub mod user;

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::messages::MessageSource;
use crate::pipeline::{WebRequest, WebResponse};

pub use default::DefaultResolver;
pub use exception_handler::{ErrorResult, ExceptionHandlers};
pub use illegal_argument::IllegalArgumentResolver;
pub use response_status::ResponseStatusResolver;
pub use user::UserResolver;

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Try the next resolver.
    Unhandled,
    /// Handled; the response is already written or an error was sent.
    Empty,
    /// Handled; render this view.
    View {
        name: String,
        model: serde_json::Value,
    },
}

pub trait ExceptionResolver: Send + Sync {
    fn name(&self) -> &str;

    fn resolve(
        &self,
        req: &WebRequest,
        failure: &AppError,
        res: &mut WebResponse,
    ) -> Result<Resolution>;
}

#[derive(Default, Clone)]
pub struct ResolverChain {
    resolvers: Vec<Arc<dyn ExceptionResolver>>,
}

impl ResolverChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exception handlers, then explicit statuses, then binding failures.
    pub fn with_defaults(handlers: ExceptionHandlers, messages: Arc<MessageSource>) -> Self {
        Self::new()
            .extend(handlers)
            .extend(ResponseStatusResolver::new(messages))
            .extend(DefaultResolver)
    }

    /// Appends after everything registered so far.
    pub fn extend(mut self, resolver: impl ExceptionResolver + 'static) -> Self {
        self.resolvers.push(Arc::new(resolver));
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }

    pub fn resolve(&self, req: &WebRequest, failure: &AppError, res: &mut WebResponse) -> Resolution {
        for resolver in &self.resolvers {
            match resolver.resolve(req, failure, res) {
                Ok(Resolution::Unhandled) => continue,
                Ok(resolution) => {
                    log::debug!(
                        "{} on {} resolved by {}",
                        failure.kind().name(),
                        req.path(),
                        resolver.name()
                    );
                    return resolution;
                }
                Err(e) => {
                    log::error!(
                        "Resolver {} failed while handling '{}': {}",
                        resolver.name(),
                        failure,
                        e
                    );
                }
            }
        }

        Resolution::Unhandled
    }
}
