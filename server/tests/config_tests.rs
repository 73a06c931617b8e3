mod support;

use serial_test::serial;
use webmvc::config::AppConfig;
use webmvc::dispatch::ErrorPages;
use webmvc::messages::MessageSource;

#[test]
#[serial]
fn test_load_app_config() {
    let config = AppConfig::load(support::manifest_path("config/app.toml"))
        .expect("Failed to load config");

    assert_eq!(config.server.port, 8080);
    assert_eq!(config.session.cookie_name, "session_id");
    assert_eq!(config.login.redirect_param, "redirectURL");
    assert!(config.error_pages.is_empty());
}

#[test]
#[serial]
fn test_env_overrides_file() {
    std::env::set_var("WEBMVC__SERVER__PORT", "9090");
    let config = AppConfig::load(support::manifest_path("config/app.toml"));
    std::env::remove_var("WEBMVC__SERVER__PORT");

    let config = config.expect("Failed to load config");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.server.host, "0.0.0.0");
}

#[test]
#[serial]
fn test_missing_config_file_uses_defaults() {
    let config = AppConfig::load("nonexistent/app.toml").expect("Failed to load config");

    assert_eq!(config.server.port, 8080);
    assert_eq!(config.session.max_inactive_secs, 1800);
}

#[test]
fn test_error_pages_from_config() {
    let config = AppConfig::from_toml_str(
        r#"
[error_pages]
404 = "/error-page/404"
RuntimeException = "/error-page/500"
        "#,
    )
    .expect("Failed to parse config");

    let pages = ErrorPages::from_config(&config.error_pages);
    assert_eq!(
        pages.path_for(None, actix_web::http::StatusCode::NOT_FOUND),
        "/error-page/404"
    );
    assert_eq!(
        pages.path_for(
            Some(webmvc::error::FailureKind::IllegalArgument),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        ),
        "/error-page/500"
    );
}

#[test]
fn test_load_messages() {
    let messages = MessageSource::load(support::manifest_path("config/messages.toml"))
        .expect("Failed to load messages");

    assert_eq!(messages.message("error.bad", &[]).as_deref(), Some("Bad request error"));
    assert_eq!(
        messages.message("range.item.price", &[1_000, 1_000_000]).as_deref(),
        Some("Price must be between 1,000 and 1,000,000.")
    );
}
