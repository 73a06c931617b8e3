//! Error dispatch: where a failed request is re-routed and how the error
//! is represented once it gets there.

pub mod context;
pub mod negotiation;
pub mod pages;
pub mod view;

pub use context::{ErrorBody, ErrorContext};
pub use negotiation::Representation;
pub use pages::{ErrorPages, DEFAULT_ERROR_PATH};
pub use view::{ViewCatalog, ViewSource};
