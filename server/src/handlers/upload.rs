use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

use crate::app::AppState;
use crate::error::{AppError, Result};
use crate::pipeline::multipart::Part;
use crate::pipeline::{WebRequest, WebResponse};

pub fn new_file(_state: &AppState, _req: &mut WebRequest, res: &mut WebResponse) -> Result<()> {
    res.view("upload-form", json!({}));
    Ok(())
}

/// Logs every part of a `multipart/form-data` body and stores the parts
/// that carry a file name under `upload.file_dir`.
pub fn save_file(state: &AppState, req: &mut WebRequest, res: &mut WebResponse) -> Result<()> {
    log::info!("request={:?}", req);

    let parts = req.multipart()?;
    let item_name = req
        .param("itemName")
        .map(str::to_string)
        .or_else(|| text_field(&parts, "itemName"));
    log::info!("itemName={:?}", item_name);
    log::info!("parts={}", parts.len());

    let mut saved = Vec::new();
    for part in &parts {
        log::info!("==== PART ====");
        log::info!("name={}", part.name);
        for (name, value) in &part.headers {
            log::info!("header {}: {}", name, value);
        }
        log::info!("submittedFileName={:?}", part.file_name);
        log::info!("size={}", part.size());

        let Some(submitted) = part.file_name.as_deref().filter(|n| !n.trim().is_empty()) else {
            continue;
        };
        let full_path = store(&state.config.upload.file_dir, submitted, &part.data)?;
        saved.push(json!({
            "name": part.name,
            "fileName": full_path.file_name().map(|n| n.to_string_lossy().into_owned()),
            "size": part.size(),
        }));
    }

    res.view(
        "upload-form",
        json!({ "itemName": item_name, "savedFiles": saved }),
    );
    Ok(())
}

fn text_field(parts: &[Part], name: &str) -> Option<String> {
    parts
        .iter()
        .find(|part| part.name == name && !part.is_file())
        .and_then(Part::text)
        .map(str::to_string)
}

/// Last path segment of a submitted file name. Some browsers send the
/// full client path, with either separator.
fn stored_name(submitted: &str) -> Result<&str> {
    let name = submitted
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim();

    match name {
        "" | "." | ".." => Err(AppError::IllegalArgument(format!(
            "Invalid file name '{}'",
            submitted
        ))),
        name => Ok(name),
    }
}

fn store(dir: &Path, submitted: &str, data: &[u8]) -> Result<PathBuf> {
    let full_path = dir.join(stored_name(submitted)?);

    fs::create_dir_all(dir)?;
    log::info!("Saving file fullPath={}", full_path.display());
    fs::write(&full_path, data)?;

    Ok(full_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_name_keeps_last_segment() {
        assert_eq!(stored_name("hello.txt").unwrap(), "hello.txt");
        assert_eq!(stored_name("../../etc/passwd").unwrap(), "passwd");
        assert_eq!(stored_name("C:\\Users\\kim\\photo.png").unwrap(), "photo.png");
    }

    #[test]
    fn test_stored_name_rejects_empty_segments() {
        for submitted in ["", "dir/", "..", "a/.."] {
            assert!(matches!(
                stored_name(submitted),
                Err(AppError::IllegalArgument(_))
            ));
        }
    }

    #[test]
    fn test_store_creates_the_directory() {
        let dir = std::env::temp_dir().join(format!("webmvc-store-{}", uuid::Uuid::new_v4()));

        let path = store(&dir, "nested/hello.txt", b"hello").unwrap();

        assert_eq!(path, dir.join("hello.txt"));
        assert_eq!(fs::read(&path).unwrap(), b"hello");
        fs::remove_dir_all(&dir).unwrap();
    }
}
