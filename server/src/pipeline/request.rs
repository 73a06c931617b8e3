use actix_web::dev::Extensions;
use actix_web::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use actix_web::http::Method;
use actix_web::web::{self, Bytes};
use actix_web::HttpRequest;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::multipart::{self, Part};
use crate::error::{AppError, Result};

/// Why a request is going through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchKind {
    /// A request sent by the client.
    Request,
    /// An internal re-dispatch to an error path.
    Error,
}

impl fmt::Display for DispatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchKind::Request => write!(f, "REQUEST"),
            DispatchKind::Error => write!(f, "ERROR"),
        }
    }
}

/// The request as seen by gates, handlers and resolvers.
pub struct WebRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    cookies: HashMap<String, String>,
    body: Bytes,
    dispatch: DispatchKind,
    handler: Option<String>,
    path_params: HashMap<String, String>,
    attributes: Extensions,
}

impl WebRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            cookies: HashMap::new(),
            body: Bytes::new(),
            dispatch: DispatchKind::Request,
            handler: None,
            path_params: HashMap::new(),
            attributes: Extensions::new(),
        }
    }

    pub fn from_http(req: &HttpRequest, body: Bytes) -> Self {
        let mut request = Self::new(req.method().clone(), req.path())
            .with_query(req.query_string())
            .with_body(body);

        request.headers = req.headers().clone();

        match req.cookies() {
            Ok(cookies) => {
                for cookie in cookies.iter() {
                    request
                        .cookies
                        .insert(cookie.name().to_string(), cookie.value().to_string());
                }
            }
            Err(e) => log::warn!("Ignoring malformed cookie header on {}: {}", req.path(), e),
        }

        request
    }

    pub fn with_query(mut self, query: &str) -> Self {
        if query.is_empty() {
            return self;
        }

        match web::Query::<Vec<(String, String)>>::from_query(query) {
            Ok(pairs) => self.query = pairs.into_inner(),
            Err(e) => log::warn!("Ignoring malformed query string '{}': {}", query, e),
        }
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_cookie(mut self, name: &str, value: &str) -> Self {
        self.cookies.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Copy of this request routed to `path` as an error dispatch.
    ///
    /// Method, headers, cookies and query survive; the body and every
    /// attribute of the failed pass do not.
    pub fn for_error_dispatch(&self, path: &str) -> Self {
        Self {
            method: self.method.clone(),
            path: path.to_string(),
            query: self.query.clone(),
            headers: self.headers.clone(),
            cookies: self.cookies.clone(),
            body: Bytes::new(),
            dispatch: DispatchKind::Error,
            handler: None,
            path_params: HashMap::new(),
            attributes: Extensions::new(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn dispatch_kind(&self) -> DispatchKind {
        self.dispatch
    }

    /// Name of the route that matched, once routing has happened.
    pub fn handler(&self) -> Option<&str> {
        self.handler.as_deref()
    }

    pub(crate) fn set_route(&mut self, handler: &str, params: HashMap<String, String>) {
        self.handler = Some(handler.to_string());
        self.path_params = params;
    }

    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Query parameter converted to `T`.
    ///
    /// A missing parameter is a `MissingParameter` failure and one that does
    /// not convert is a `TypeMismatch`; both are client input errors.
    pub fn required_param<T>(&self, name: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let raw = self
            .param(name)
            .ok_or_else(|| AppError::MissingParameter(name.to_string()))?;

        raw.parse::<T>().map_err(|e| {
            log::debug!("Parameter '{}' rejected: {}", name, e);
            AppError::TypeMismatch {
                name: name.to_string(),
                value: raw.to_string(),
                target: std::any::type_name::<T>(),
            }
        })
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn accept(&self) -> Option<&str> {
        self.headers
            .get(header::ACCEPT)
            .and_then(|value| value.to_str().ok())
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| AppError::MessageNotReadable(e.to_string()))
    }

    /// Decodes an `application/x-www-form-urlencoded` body.
    pub fn form<T: DeserializeOwned>(&self) -> Result<T> {
        let body = std::str::from_utf8(&self.body)
            .map_err(|e| AppError::MessageNotReadable(e.to_string()))?;

        // form bodies share the query string encoding
        web::Query::<T>::from_query(body)
            .map(web::Query::into_inner)
            .map_err(|e| AppError::MessageNotReadable(e.to_string()))
    }

    /// Splits a `multipart/form-data` body into its parts.
    pub fn multipart(&self) -> Result<Vec<Part>> {
        multipart::parse(self.header("content-type"), self.body.clone())
    }

    pub fn insert_attribute<T: 'static>(&mut self, value: T) {
        self.attributes.insert(value);
    }

    pub fn attribute<T: 'static>(&self) -> Option<&T> {
        self.attributes.get::<T>()
    }
}

impl fmt::Debug for WebRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("dispatch", &self.dispatch)
            .field("handler", &self.handler)
            .finish()
    }
}
