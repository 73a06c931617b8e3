// Library exports for testing and reuse

pub mod app;
pub mod config;
pub mod db;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod messages;
pub mod middleware;
pub mod pipeline;
pub mod resolver;
pub mod session;
