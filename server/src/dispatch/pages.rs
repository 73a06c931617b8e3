use actix_web::http::StatusCode;
use std::collections::HashMap;

use crate::error::FailureKind;

pub const DEFAULT_ERROR_PATH: &str = "/error";

/// Where an error dispatch goes.
///
/// Lookup order: the failure kind and its ancestors, then the status code,
/// then the default path.
#[derive(Debug, Clone)]
pub struct ErrorPages {
    by_kind: Vec<(FailureKind, String)>,
    by_status: HashMap<u16, String>,
    default_path: String,
}

impl Default for ErrorPages {
    fn default() -> Self {
        Self {
            by_kind: Vec::new(),
            by_status: HashMap::new(),
            default_path: DEFAULT_ERROR_PATH.to_string(),
        }
    }
}

impl ErrorPages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys are either numeric statuses (`"404"`) or failure kind names
    /// (`"RuntimeException"`).
    pub fn from_config(mappings: &HashMap<String, String>) -> Self {
        let mut keys: Vec<&String> = mappings.keys().collect();
        keys.sort();

        keys.into_iter().fold(Self::new(), |pages, key| {
            let path = &mappings[key];

            if let Ok(code) = key.parse::<u16>() {
                match StatusCode::from_u16(code) {
                    Ok(status) => pages.on_status(status, path),
                    Err(_) => {
                        log::warn!("Ignoring error page for invalid status {}", code);
                        pages
                    }
                }
            } else if let Some(kind) = FailureKind::from_name(key) {
                pages.on_kind(kind, path)
            } else {
                log::warn!("Ignoring error page with unknown key '{}'", key);
                pages
            }
        })
    }

    pub fn on_kind(mut self, kind: FailureKind, path: &str) -> Self {
        self.by_kind.retain(|(registered, _)| *registered != kind);
        self.by_kind.push((kind, path.to_string()));
        self
    }

    pub fn on_status(mut self, status: StatusCode, path: &str) -> Self {
        self.by_status.insert(status.as_u16(), path.to_string());
        self
    }

    pub fn with_default(mut self, path: &str) -> Self {
        self.default_path = path.to_string();
        self
    }

    pub fn default_path(&self) -> &str {
        &self.default_path
    }

    pub fn path_for(&self, kind: Option<FailureKind>, status: StatusCode) -> &str {
        let by_kind = kind.and_then(|kind| {
            kind.lineage().find_map(|candidate| {
                self.by_kind
                    .iter()
                    .find(|(registered, _)| *registered == candidate)
                    .map(|(_, path)| path.as_str())
            })
        });

        by_kind
            .or_else(|| self.by_status.get(&status.as_u16()).map(String::as_str))
            .unwrap_or(self.default_path.as_str())
    }

    /// Every path error dispatches can be routed to.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self
            .by_kind
            .iter()
            .map(|(_, path)| path.as_str())
            .chain(self.by_status.values().map(String::as_str))
            .chain(std::iter::once(self.default_path.as_str()))
            .collect();
        paths.sort_unstable();
        paths.dedup();
        paths
    }
}
