use std::sync::Arc;

use super::pattern::matches_any;
use super::request::{DispatchKind, WebRequest};
use super::response::WebResponse;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Continue,
    /// Stop here. The gate has already written the response.
    Halt,
}

/// A check that runs around route handling.
///
/// `after` runs for every gate whose `before` returned `Continue`, in
/// reverse registration order, whether or not the handler failed.
pub trait Gate: Send + Sync {
    fn name(&self) -> &str;

    fn before(&self, _req: &mut WebRequest, _res: &mut WebResponse) -> Result<GateDecision> {
        Ok(GateDecision::Continue)
    }

    fn after(&self, _req: &WebRequest, _res: &WebResponse, _failure: Option<&AppError>) {}
}

pub struct GateRegistration {
    gate: Arc<dyn Gate>,
    include: Vec<String>,
    exclude: Vec<String>,
    dispatch_kinds: Vec<DispatchKind>,
}

impl GateRegistration {
    /// Applies to every path on client requests until narrowed.
    pub fn new(gate: impl Gate + 'static) -> Self {
        Self {
            gate: Arc::new(gate),
            include: vec!["*".to_string()],
            exclude: Vec::new(),
            dispatch_kinds: vec![DispatchKind::Request],
        }
    }

    pub fn include(mut self, patterns: &[&str]) -> Self {
        self.include = patterns.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn exclude(mut self, patterns: &[&str]) -> Self {
        self.exclude = patterns.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn dispatch_kinds(mut self, kinds: &[DispatchKind]) -> Self {
        self.dispatch_kinds = kinds.to_vec();
        self
    }

    pub fn applies(&self, req: &WebRequest) -> bool {
        self.dispatch_kinds.contains(&req.dispatch_kind())
            && matches_any(&self.include, req.path())
            && !matches_any(&self.exclude, req.path())
    }
}

#[derive(Default)]
pub struct GateChain {
    registrations: Vec<GateRegistration>,
}

impl GateChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, registration: GateRegistration) -> Self {
        log::debug!("Registered gate '{}'", registration.gate.name());
        self.registrations.push(registration);
        self
    }

    /// Gates for this request in declared order.
    pub fn applicable(&self, req: &WebRequest) -> Vec<Arc<dyn Gate>> {
        self.registrations
            .iter()
            .filter(|registration| registration.applies(req))
            .map(|registration| Arc::clone(&registration.gate))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::Method;

    struct Named(&'static str);

    impl Gate for Named {
        fn name(&self) -> &str {
            self.0
        }
    }

    fn names(chain: &GateChain, req: &WebRequest) -> Vec<String> {
        chain
            .applicable(req)
            .iter()
            .map(|gate| gate.name().to_string())
            .collect()
    }

    #[test]
    fn test_include_and_exclude() {
        let chain = GateChain::new().register(
            GateRegistration::new(Named("log")).exclude(&["/css/*", "/*.ico", "/error", "/error-page/*"]),
        );

        let req = WebRequest::new(Method::GET, "/orders");
        assert_eq!(names(&chain, &req), vec!["log"]);

        let req = WebRequest::new(Method::GET, "/css/app.css");
        assert!(names(&chain, &req).is_empty());

        let req = WebRequest::new(Method::GET, "/favicon.ico");
        assert!(names(&chain, &req).is_empty());
    }

    #[test]
    fn test_dispatch_kinds() {
        let chain = GateChain::new()
            .register(GateRegistration::new(Named("request-only")))
            .register(
                GateRegistration::new(Named("both"))
                    .dispatch_kinds(&[DispatchKind::Request, DispatchKind::Error]),
            );

        let req = WebRequest::new(Method::GET, "/orders");
        assert_eq!(names(&chain, &req), vec!["request-only", "both"]);

        let error_req = req.for_error_dispatch("/error");
        assert_eq!(names(&chain, &error_req), vec!["both"]);
    }
}
