use actix_web::http::StatusCode;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewSource {
    /// `{{key}}` placeholders are filled from the model.
    Template,
    /// Served as is.
    Static,
}

/// HTML views keyed by their path relative to the view root, without the
/// extension (`error/404`).
#[derive(Debug, Clone, Default)]
pub struct ViewCatalog {
    templates: HashMap<String, String>,
    statics: HashMap<String, String>,
}

impl ViewCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every `.html` file under both roots. A missing root is skipped.
    pub fn load(templates_dir: Option<&Path>, static_dir: Option<&Path>) -> Result<Self> {
        let mut catalog = Self::new();

        if let Some(dir) = templates_dir {
            scan_root(dir, &mut catalog.templates)?;
        }
        if let Some(dir) = static_dir {
            scan_root(dir, &mut catalog.statics)?;
        }

        log::info!(
            "Loaded {} template views and {} static pages",
            catalog.templates.len(),
            catalog.statics.len()
        );
        Ok(catalog)
    }

    pub fn with_template(mut self, name: &str, content: &str) -> Self {
        self.templates.insert(name.to_string(), content.to_string());
        self
    }

    pub fn with_static(mut self, name: &str, content: &str) -> Self {
        self.statics.insert(name.to_string(), content.to_string());
        self
    }

    /// Templates shadow static pages of the same name.
    pub fn find(&self, name: &str) -> Option<(ViewSource, &str)> {
        self.templates
            .get(name)
            .map(|content| (ViewSource::Template, content.as_str()))
            .or_else(|| {
                self.statics
                    .get(name)
                    .map(|content| (ViewSource::Static, content.as_str()))
            })
    }

    pub fn render(&self, name: &str, model: &Value) -> Option<String> {
        self.find(name).map(|(source, content)| match source {
            ViewSource::Template => substitute(content, model),
            ViewSource::Static => content.to_string(),
        })
    }

    /// Most specific error view for `status`: `error/404`, then `error/4xx`,
    /// then `error`.
    pub fn error_view(&self, status: StatusCode) -> Option<(String, ViewSource)> {
        let code = status.as_u16();
        let candidates = [
            format!("error/{}", code),
            format!("error/{}xx", code / 100),
            "error".to_string(),
        ];

        candidates
            .into_iter()
            .find_map(|name| self.find(&name).map(|(source, _)| (name, source)))
    }

    pub fn fallback_page(model: &Value) -> String {
        substitute(FALLBACK_PAGE, model)
    }
}

const FALLBACK_PAGE: &str = "<!DOCTYPE html>
<html>
<body>
<h1>Error Page</h1>
<p>This application has no explicit mapping for this error.</p>
<div>{{timestamp}}</div>
<div>There was an unexpected error (type={{error}}, status={{status}}).</div>
<div>{{message}}</div>
</body>
</html>
";

fn scan_root(root: &Path, views: &mut HashMap<String, String>) -> Result<()> {
    if !root.is_dir() {
        log::warn!("View directory '{}' not found, skipping", root.display());
        return Ok(());
    }

    scan(root, "", views)?;
    Ok(())
}

fn scan(dir: &Path, prefix: &str, views: &mut HashMap<String, String>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if path.is_dir() {
            scan(&path, &format!("{}{}/", prefix, file_name), views)?;
        } else if let Some(stem) = file_name.strip_suffix(".html") {
            let name = format!("{}{}", prefix, stem);
            log::debug!("Found view {}", name);
            views.insert(name, fs::read_to_string(&path)?);
        }
    }

    Ok(())
}

/// Replaces `{{key}}` with the HTML-escaped model value. Unknown keys
/// render as nothing.
fn substitute(template: &str, model: &Value) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let Some(len) = rest[start + 2..].find("}}") else {
            break;
        };

        out.push_str(&rest[..start]);
        let key = rest[start + 2..start + 2 + len].trim();
        out.push_str(&escape_html(&value_text(model.get(key))));
        rest = &rest[start + 2 + len + 2..];
    }

    out.push_str(rest);
    out
}

fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_substitution() {
        let model = json!({"status": 404, "message": "<b>gone</b>", "path": "/x"});

        assert_eq!(
            substitute("{{status}} {{ message }} {{missing}}!", &model),
            "404 &lt;b&gt;gone&lt;/b&gt; !"
        );
        assert_eq!(substitute("no placeholders", &model), "no placeholders");
        assert_eq!(substitute("broken {{status", &model), "broken {{status");
    }

    #[test]
    fn test_exact_status_beats_class_and_generic() {
        let catalog = ViewCatalog::new()
            .with_static("error/404", "404 page")
            .with_static("error/4xx", "4xx page")
            .with_template("error", "generic");

        assert_eq!(
            catalog.error_view(StatusCode::NOT_FOUND),
            Some(("error/404".to_string(), ViewSource::Static))
        );
        assert_eq!(
            catalog.error_view(StatusCode::BAD_REQUEST),
            Some(("error/4xx".to_string(), ViewSource::Static))
        );
        assert_eq!(
            catalog.error_view(StatusCode::INTERNAL_SERVER_ERROR),
            Some(("error".to_string(), ViewSource::Template))
        );
        assert_eq!(ViewCatalog::new().error_view(StatusCode::NOT_FOUND), None);
    }

    #[test]
    fn test_template_beats_static() {
        let catalog = ViewCatalog::new()
            .with_static("error/500", "static")
            .with_template("error/500", "template {{status}}");

        assert_eq!(
            catalog.error_view(StatusCode::INTERNAL_SERVER_ERROR),
            Some(("error/500".to_string(), ViewSource::Template))
        );
        assert_eq!(
            catalog.render("error/500", &json!({"status": 500})).as_deref(),
            Some("template 500")
        );
    }

    #[test]
    fn test_load_from_directories() {
        let root = std::env::temp_dir().join(format!("webmvc-views-{}", uuid::Uuid::new_v4()));
        let templates = root.join("templates");
        fs::create_dir_all(templates.join("error")).unwrap();
        fs::write(templates.join("error").join("5xx.html"), "5xx {{status}}").unwrap();
        fs::write(templates.join("notes.txt"), "ignored").unwrap();

        let catalog = ViewCatalog::load(Some(&templates), Some(&root.join("missing"))).unwrap();

        assert_eq!(
            catalog.error_view(StatusCode::BAD_GATEWAY),
            Some(("error/5xx".to_string(), ViewSource::Template))
        );
        assert!(catalog.find("notes").is_none());

        fs::remove_dir_all(&root).unwrap();
    }
}
