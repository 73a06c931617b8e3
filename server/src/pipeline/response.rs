use actix_web::cookie::Cookie;
use actix_web::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;

use crate::error::{AppError, Result};

/// Recorded by [`WebResponse::send_error`]; turned into an error dispatch
/// once the current pass finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentError {
    pub status: StatusCode,
    pub message: Option<String>,
}

/// A view the handler asked for. Rendered by the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingView {
    pub name: String,
    pub model: serde_json::Value,
}

#[derive(Debug)]
pub struct WebResponse {
    status: StatusCode,
    headers: HeaderMap,
    cookies: Vec<Cookie<'static>>,
    body: Vec<u8>,
    view: Option<PendingView>,
    sent_error: Option<SentError>,
}

impl Default for WebResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl WebResponse {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            cookies: Vec::new(),
            body: Vec::new(),
            view: None,
            sent_error: None,
        }
    }

    /// Plain text response used when the error pass itself fails.
    pub fn last_resort(status: StatusCode) -> Self {
        let mut response = Self::new();
        let reason = status.canonical_reason().unwrap_or("Error");
        response.text(status, format!("{} {}", status.as_u16(), reason));
        response
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn insert_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn cookies(&self) -> &[Cookie<'static>] {
        &self.cookies
    }

    pub fn add_cookie(&mut self, cookie: Cookie<'static>) {
        self.cookies.push(cookie);
    }

    pub fn json<T: Serialize>(&mut self, status: StatusCode, value: &T) -> Result<()> {
        let body = serde_json::to_vec(value)?;
        self.write(status, "application/json", body);
        Ok(())
    }

    pub fn text(&mut self, status: StatusCode, text: impl Into<String>) {
        self.write(status, "text/plain; charset=utf-8", text.into().into_bytes());
    }

    pub fn html(&mut self, status: StatusCode, html: impl Into<String>) {
        self.write(status, "text/html; charset=utf-8", html.into().into_bytes());
    }

    fn write(&mut self, status: StatusCode, content_type: &'static str, body: Vec<u8>) {
        self.status = status;
        self.headers
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        self.body = body;
    }

    pub fn redirect(&mut self, location: &str) -> Result<()> {
        let value = HeaderValue::from_str(location)
            .map_err(|e| AppError::Internal(format!("Invalid redirect location '{}': {}", location, e)))?;

        self.status = StatusCode::FOUND;
        self.headers.insert(header::LOCATION, value);
        self.body.clear();
        Ok(())
    }

    /// Marks the response as failed. The pass keeps running to completion and
    /// the dispatcher then re-dispatches to the matching error path.
    pub fn send_error(&mut self, status: StatusCode, message: Option<String>) {
        self.status = status;
        self.body.clear();
        self.sent_error = Some(SentError { status, message });
    }

    pub fn sent_error(&self) -> Option<&SentError> {
        self.sent_error.as_ref()
    }

    pub(crate) fn take_sent_error(&mut self) -> Option<SentError> {
        self.sent_error.take()
    }

    pub fn view(&mut self, name: impl Into<String>, model: serde_json::Value) {
        self.view = Some(PendingView {
            name: name.into(),
            model,
        });
    }

    pub(crate) fn take_view(&mut self) -> Option<PendingView> {
        self.view.take()
    }

    /// Copies the headers of `earlier` that this response does not set
    /// itself. The content type always stays with the body that is sent.
    pub(crate) fn inherit_headers(&mut self, earlier: &WebResponse) {
        let own: Vec<HeaderName> = self.headers.keys().cloned().collect();

        for (name, value) in earlier.headers.iter() {
            if *name == header::CONTENT_TYPE || own.contains(name) {
                continue;
            }
            self.headers.append(name.clone(), value.clone());
        }
    }

    pub(crate) fn take_cookies(&mut self) -> Vec<Cookie<'static>> {
        std::mem::take(&mut self.cookies)
    }

    pub fn into_http_response(self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status);

        for (name, value) in self.headers.iter() {
            builder.append_header((name.clone(), value.clone()));
        }
        for cookie in self.cookies {
            builder.cookie(cookie);
        }

        builder.body(self.body)
    }
}
