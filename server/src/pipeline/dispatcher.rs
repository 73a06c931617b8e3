use actix_web::http::header::{self, HeaderValue};
use actix_web::http::StatusCode;
use std::sync::Arc;

use super::gate::{Gate, GateChain, GateDecision};
use super::request::WebRequest;
use super::response::WebResponse;
use super::router::{RouteMatch, RouteTable};
use crate::dispatch::{ErrorContext, ErrorPages, ViewCatalog};
use crate::error::{AppError, Result};
use crate::resolver::{Resolution, ResolverChain};

/// Runs a request through gates, routing and the resolver chain, and
/// re-dispatches to an error path when the pass ends in an unresolved
/// failure or a sent error.
pub struct Dispatcher {
    routes: RouteTable,
    gates: GateChain,
    resolvers: ResolverChain,
    error_pages: ErrorPages,
    views: Arc<ViewCatalog>,
    payload_limit: usize,
}

/// actix's own body limit.
pub const DEFAULT_PAYLOAD_LIMIT: usize = 256 * 1024;

impl Dispatcher {
    pub fn new(
        routes: RouteTable,
        gates: GateChain,
        resolvers: ResolverChain,
        error_pages: ErrorPages,
        views: Arc<ViewCatalog>,
    ) -> Self {
        Self {
            routes,
            gates,
            resolvers,
            error_pages,
            views,
            payload_limit: DEFAULT_PAYLOAD_LIMIT,
        }
    }

    pub fn with_payload_limit(mut self, limit: usize) -> Self {
        self.payload_limit = limit;
        self
    }

    pub fn payload_limit(&self) -> usize {
        self.payload_limit
    }

    pub fn dispatch(&self, mut req: WebRequest) -> WebResponse {
        let mut res = WebResponse::new();

        let mut sent_error = false;
        let context = match self.process(&mut req, &mut res) {
            Ok(()) => match res.take_sent_error() {
                Some(sent) => {
                    sent_error = true;
                    ErrorContext::from_sent_error(sent, &req)
                }
                None => return res,
            },
            Err(failure) => {
                log::error!(
                    "Unresolved {} on {} {}: {}",
                    failure.kind().name(),
                    req.method(),
                    req.path(),
                    failure
                );
                ErrorContext::from_failure(failure, &req)
            }
        };

        let mut error_res = self.dispatch_error(&req, context);
        if sent_error {
            // headers set before send_error (e.g. Allow on a 405) survive it
            error_res.inherit_headers(&res);
        }
        for cookie in res.take_cookies() {
            error_res.add_cookie(cookie);
        }
        error_res
    }

    fn dispatch_error(&self, original: &WebRequest, context: ErrorContext) -> WebResponse {
        let status = context.status;
        let path = self.error_pages.path_for(context.failure_kind(), status);
        log::debug!("Error dispatch for {} ({}) to {}", original.path(), status, path);

        let mut req = original.for_error_dispatch(path);
        req.insert_attribute(context);

        let mut res = WebResponse::new();
        res.set_status(status);

        match self.process(&mut req, &mut res) {
            Ok(()) => match res.sent_error() {
                None => res,
                Some(sent) => {
                    log::error!(
                        "Error path {} sent {} while handling {}",
                        path,
                        sent.status,
                        status
                    );
                    WebResponse::last_resort(status)
                }
            },
            Err(failure) => {
                log::error!("Error path {} failed while handling {}: {}", path, status, failure);
                WebResponse::last_resort(status)
            }
        }
    }

    /// One pass: gates, handler, resolvers, then `after` hooks.
    ///
    /// Returns the failure only when no resolver handled it.
    fn process(&self, req: &mut WebRequest, res: &mut WebResponse) -> Result<()> {
        let gates = self.gates.applicable(req);
        let mut entered: Vec<&Arc<dyn Gate>> = Vec::with_capacity(gates.len());
        let mut outcome = Ok(());
        let mut halted = false;

        for gate in &gates {
            match gate.before(req, res) {
                Ok(GateDecision::Continue) => entered.push(gate),
                Ok(GateDecision::Halt) => {
                    log::debug!("Gate {} halted {}", gate.name(), req.path());
                    halted = true;
                    break;
                }
                Err(failure) => {
                    outcome = Err(failure);
                    break;
                }
            }
        }

        if !halted && outcome.is_ok() {
            outcome = self.handle(req, res);
        }

        let outcome = match outcome {
            Ok(()) => Ok(()),
            Err(failure) => self.resolve(req, res, failure),
        };

        for gate in entered.iter().rev() {
            gate.after(req, res, outcome.as_ref().err());
        }

        outcome
    }

    fn handle(&self, req: &mut WebRequest, res: &mut WebResponse) -> Result<()> {
        let handler = match self.routes.find(req.method(), req.path()) {
            RouteMatch::Found(route, captures) => {
                req.set_route(route.name(), captures);
                Arc::clone(route.handler())
            }
            RouteMatch::MethodNotAllowed(allowed) => {
                let allow = allowed
                    .iter()
                    .map(|method| method.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                if let Ok(value) = HeaderValue::from_str(&allow) {
                    res.insert_header(header::ALLOW, value);
                }
                res.send_error(StatusCode::METHOD_NOT_ALLOWED, None);
                return Ok(());
            }
            RouteMatch::NotFound => {
                log::debug!("No route for {} {}", req.method(), req.path());
                res.send_error(StatusCode::NOT_FOUND, None);
                return Ok(());
            }
        };

        handler(req, res)?;
        self.render(res);
        Ok(())
    }

    fn resolve(&self, req: &WebRequest, res: &mut WebResponse, failure: AppError) -> Result<()> {
        match self.resolvers.resolve(req, &failure, res) {
            Resolution::Unhandled => Err(failure),
            Resolution::Empty => Ok(()),
            Resolution::View { name, model } => {
                res.view(name, model);
                self.render(res);
                Ok(())
            }
        }
    }

    /// Renders a pending view. Names without an HTML view are answered with
    /// the view name and model as JSON.
    fn render(&self, res: &mut WebResponse) {
        let Some(view) = res.take_view() else {
            return;
        };
        let status = res.status();

        match self.views.render(&view.name, &view.model) {
            Some(html) => res.html(status, html),
            None => {
                let body = serde_json::json!({ "view": view.name, "model": view.model });
                if let Err(e) = res.json(status, &body) {
                    log::error!("Failed to write view {}: {}", view.name, e);
                    res.send_error(StatusCode::INTERNAL_SERVER_ERROR, None);
                }
            }
        }
    }
}
