use actix_web::http::Method;
use std::collections::HashMap;
use std::sync::Arc;

use super::pattern::PathPattern;
use super::request::WebRequest;
use super::response::WebResponse;
use crate::error::Result;

pub type Handler = Arc<dyn Fn(&mut WebRequest, &mut WebResponse) -> Result<()> + Send + Sync>;

pub struct Route {
    pattern: PathPattern,
    /// Empty means every method.
    methods: Vec<Method>,
    name: String,
    handler: Handler,
}

impl Route {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    fn allows(&self, method: &Method) -> bool {
        self.methods.is_empty() || self.methods.contains(method)
    }
}

pub enum RouteMatch<'a> {
    Found(&'a Route, HashMap<String, String>),
    /// The path is known but not for this method. Carries the allowed ones.
    MethodNotAllowed(Vec<Method>),
    NotFound,
}

/// Routes are tried in registration order; the first match wins.
#[derive(Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route<F>(mut self, methods: &[Method], pattern: &str, name: &str, handler: F) -> Self
    where
        F: Fn(&mut WebRequest, &mut WebResponse) -> Result<()> + Send + Sync + 'static,
    {
        self.routes.push(Route {
            pattern: PathPattern::parse(pattern),
            methods: methods.to_vec(),
            name: name.to_string(),
            handler: Arc::new(handler),
        });
        self
    }

    pub fn get<F>(self, pattern: &str, name: &str, handler: F) -> Self
    where
        F: Fn(&mut WebRequest, &mut WebResponse) -> Result<()> + Send + Sync + 'static,
    {
        self.route(&[Method::GET], pattern, name, handler)
    }

    pub fn post<F>(self, pattern: &str, name: &str, handler: F) -> Self
    where
        F: Fn(&mut WebRequest, &mut WebResponse) -> Result<()> + Send + Sync + 'static,
    {
        self.route(&[Method::POST], pattern, name, handler)
    }

    pub fn any<F>(self, pattern: &str, name: &str, handler: F) -> Self
    where
        F: Fn(&mut WebRequest, &mut WebResponse) -> Result<()> + Send + Sync + 'static,
    {
        self.route(&[], pattern, name, handler)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn find(&self, method: &Method, path: &str) -> RouteMatch<'_> {
        let mut allowed = Vec::new();

        for route in &self.routes {
            let Some(captures) = route.pattern.matches(path) else {
                continue;
            };

            if route.allows(method) {
                return RouteMatch::Found(route, captures);
            }
            allowed.extend(route.methods.iter().cloned());
        }

        if allowed.is_empty() {
            RouteMatch::NotFound
        } else {
            allowed.dedup();
            RouteMatch::MethodNotAllowed(allowed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(_: &mut WebRequest, _: &mut WebResponse) -> Result<()> {
        Ok(())
    }

    fn table() -> RouteTable {
        RouteTable::new()
            .get("/login", "loginForm", ok)
            .post("/login", "login", ok)
            .get("/api/members/{id}", "getMember", ok)
            .any("/error", "basicError", ok)
    }

    #[test]
    fn test_method_selects_route() {
        let table = table();

        match table.find(&Method::POST, "/login") {
            RouteMatch::Found(route, _) => assert_eq!(route.name(), "login"),
            _ => panic!("expected a route"),
        }
        match table.find(&Method::GET, "/login") {
            RouteMatch::Found(route, _) => assert_eq!(route.name(), "loginForm"),
            _ => panic!("expected a route"),
        }
    }

    #[test]
    fn test_captures_are_returned() {
        let table = table();

        match table.find(&Method::GET, "/api/members/bad") {
            RouteMatch::Found(route, captures) => {
                assert_eq!(route.pattern(), "/api/members/{id}");
                assert_eq!(captures["id"], "bad");
            }
            _ => panic!("expected a route"),
        }
    }

    #[test]
    fn test_method_not_allowed() {
        let table = table();

        match table.find(&Method::DELETE, "/login") {
            RouteMatch::MethodNotAllowed(allowed) => {
                assert_eq!(allowed, vec![Method::GET, Method::POST])
            }
            _ => panic!("expected 405"),
        }
    }

    #[test]
    fn test_any_method_and_not_found() {
        let table = table();

        assert!(matches!(table.find(&Method::PUT, "/error"), RouteMatch::Found(..)));
        assert!(matches!(table.find(&Method::GET, "/orders"), RouteMatch::NotFound));
    }
}
