pub mod api;
pub mod auth;
pub mod convert;
pub mod error_page;
pub mod health;
pub mod home;
pub mod members;
pub mod upload;
pub mod validation;

pub use validation::{resolve_errors, ResolvedError};
