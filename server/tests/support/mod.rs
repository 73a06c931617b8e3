#![allow(dead_code)]

use std::path::PathBuf;

use webmvc::app::AppState;
use webmvc::config::AppConfig;

pub fn manifest_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

/// Default config pointed at this crate's resources, with a cheap bcrypt cost.
pub fn config() -> AppConfig {
    let mut config = AppConfig::default();
    config.login.password_cost = 4;
    config.views.templates_dir = Some(manifest_path("resources/templates"));
    config.views.static_dir = Some(manifest_path("resources/static"));
    config.views.messages_path = Some(manifest_path("config/messages.toml"));
    config
}

pub fn state_with(config: AppConfig) -> AppState {
    let state = AppState::from_config(config).expect("Failed to build state");
    state.seed().expect("Failed to seed");
    state
}

pub fn state() -> AppState {
    state_with(config())
}
