use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{AppError, Result};

pub const ENV_PREFIX: &str = "WEBMVC";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: HttpConfig,
    pub session: SessionConfig,
    pub login: LoginConfig,
    pub views: ViewConfig,
    pub exceptions: ExceptionConfig,
    pub upload: UploadConfig,
    /// Status code or failure kind name -> error page path.
    pub error_pages: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub max_inactive_secs: u64,
    pub cleanup_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoginConfig {
    pub login_path: String,
    pub redirect_param: String,
    pub whitelist: Vec<String>,
    pub password_cost: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub templates_dir: Option<PathBuf>,
    pub static_dir: Option<PathBuf>,
    pub messages_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExceptionConfig {
    /// Registers the `BAD` / `USER-EX` JSON exception handlers. Without them
    /// the appended illegal-argument and user resolvers answer instead.
    pub api_handlers: bool,
    /// Catch-all `Exception` handler answering 500 `{code: "EX"}`.
    pub catch_all: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub file_dir: PathBuf,
    pub max_request_size: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "session_id".to_string(),
            max_inactive_secs: 1800,
            cleanup_interval_secs: 60,
        }
    }
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            redirect_param: "redirectURL".to_string(),
            whitelist: [
                "/",
                "/members/add",
                "/login",
                "/logout",
                "/css/*",
                "/session-info",
                "/health",
                // exception, conversion and validation demos
                "/api/*",
                "/error-*",
                "/hello-v2",
                "/ip-port",
                "/number-format",
                "/validation/api/*",
                "/servlet/*",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            password_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl Default for ExceptionConfig {
    fn default() -> Self {
        Self {
            api_handlers: true,
            catch_all: false,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            file_dir: std::env::temp_dir().join("webmvc-uploads"),
            max_request_size: 10 * 1024 * 1024,
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            templates_dir: Some(PathBuf::from("server/resources/templates")),
            static_dir: Some(PathBuf::from("server/resources/static")),
            messages_path: Some(PathBuf::from("server/config/messages.toml")),
        }
    }
}

impl AppConfig {
    /// Layers an optional TOML file under `WEBMVC__SECTION__KEY` environment
    /// variables, e.g. `WEBMVC__SERVER__PORT=9090`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(
                config::File::from(path.as_ref())
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::Config(format!("Failed to read config: {}", e)))?;

        settings
            .try_deserialize()
            .map_err(|e| AppError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session.max_inactive_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.session.cleanup_interval_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.session.cookie_name, "session_id");
        assert_eq!(config.session_timeout(), Duration::from_secs(1800));
        assert_eq!(config.login.login_path, "/login");
        assert!(config.login.whitelist.contains(&"/css/*".to_string()));
        assert!(config.exceptions.api_handlers);
        assert!(!config.exceptions.catch_all);
        assert_eq!(config.upload.max_request_size, 10 * 1024 * 1024);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
[server]
port = 9090

[session]
max_inactive_secs = 60

[exceptions]
api_handlers = false

[upload]
file_dir = "/srv/files/"

[error_pages]
404 = "/error-page/404"
500 = "/error-page/500"
teapot = "/nowhere"
        "#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.session.max_inactive_secs, 60);
        assert_eq!(config.session.cookie_name, "session_id");
        assert!(!config.exceptions.api_handlers);
        assert_eq!(config.upload.file_dir, PathBuf::from("/srv/files/"));
        assert_eq!(config.error_pages.len(), 3);
        assert_eq!(config.error_pages["404"], "/error-page/404");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(AppConfig::from_toml_str("[server\nport = ").is_err());
    }
}
