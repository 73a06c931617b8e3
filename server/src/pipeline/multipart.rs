//! `multipart/form-data` bodies, split into parts with multer.

use actix_web::web::Bytes;
use futures::{executor, stream};
use mime::Mime;
use std::convert::Infallible;

use crate::error::{AppError, Result};

/// One part of a multipart body, fully read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub name: String,
    pub headers: Vec<(String, String)>,
    /// `filename` of the part's `Content-Disposition`, as the client sent it.
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl Part {
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_file(&self) -> bool {
        self.file_name.is_some()
    }

    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }
}

/// Boundary of a `multipart/form-data` content type.
pub fn boundary(content_type: Option<&str>) -> Option<String> {
    content_type
        .and_then(|value| value.parse::<Mime>().ok())
        .filter(|mime| mime.type_() == mime::MULTIPART && mime.subtype() == mime::FORM_DATA)
        .and_then(|mime| mime.get_param(mime::BOUNDARY).map(|b| b.as_str().to_string()))
}

/// Splits an already buffered body. The body is in memory, so driving the
/// parser to completion never waits on I/O.
pub fn parse(content_type: Option<&str>, body: Bytes) -> Result<Vec<Part>> {
    let boundary = boundary(content_type).ok_or_else(|| {
        AppError::MessageNotReadable("Missing multipart/form-data boundary".to_string())
    })?;

    let body = stream::once(async move { Ok::<Bytes, Infallible>(body) });
    let mut multipart = multer::Multipart::new(body, boundary);

    executor::block_on(async move {
        let mut parts = Vec::new();

        while let Some(field) = multipart.next_field().await.map_err(unreadable)? {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(|mime| mime.to_string());
            let headers = field
                .headers()
                .iter()
                .map(|(name, value)| {
                    let value = value.to_str().unwrap_or("<binary>");
                    (name.as_str().to_string(), value.to_string())
                })
                .collect();

            let data = field.bytes().await.map_err(unreadable)?;

            parts.push(Part {
                name,
                headers,
                file_name,
                content_type,
                data,
            });
        }

        Ok(parts)
    })
}

fn unreadable(e: multer::Error) -> AppError {
    AppError::MessageNotReadable(format!("Malformed multipart body: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT_TYPE: &str = "multipart/form-data; boundary=XBOUNDARY";

    fn body() -> Bytes {
        Bytes::from(
            "--XBOUNDARY\r\n\
             Content-Disposition: form-data; name=\"itemName\"\r\n\
             \r\n\
             itemA\r\n\
             --XBOUNDARY\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"hello.txt\"\r\n\
             Content-Type: text/plain\r\n\
             \r\n\
             hello world\r\n\
             --XBOUNDARY--\r\n",
        )
    }

    #[test]
    fn test_boundary() {
        assert_eq!(boundary(Some(CONTENT_TYPE)).as_deref(), Some("XBOUNDARY"));
        assert_eq!(boundary(Some("application/json")), None);
        assert_eq!(boundary(None), None);
    }

    #[test]
    fn test_parse_parts() {
        let parts = parse(Some(CONTENT_TYPE), body()).unwrap();

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].name, "itemName");
        assert!(!parts[0].is_file());
        assert_eq!(parts[0].text(), Some("itemA"));

        assert_eq!(parts[1].file_name.as_deref(), Some("hello.txt"));
        assert_eq!(parts[1].content_type.as_deref(), Some("text/plain"));
        assert_eq!(parts[1].size(), 11);
        assert!(parts[1]
            .headers
            .iter()
            .any(|(name, _)| name == "content-disposition"));
    }

    #[test]
    fn test_missing_boundary_is_unreadable() {
        let err = parse(Some("text/plain"), body()).unwrap_err();
        assert!(matches!(err, AppError::MessageNotReadable(_)));
    }
}
