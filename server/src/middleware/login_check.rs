use common::Member;

use crate::error::Result;
use crate::pipeline::pattern::matches_any;
use crate::pipeline::{Gate, GateDecision, WebRequest, WebResponse};
use crate::session::SessionStore;

/// The logged-in member, attached to the request by [`LoginCheckGate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginMember(pub Member);

/// Redirects requests without a live session to the login page.
#[derive(Clone)]
pub struct LoginCheckGate {
    sessions: SessionStore,
    cookie_name: String,
    login_path: String,
    redirect_param: String,
    whitelist: Vec<String>,
}

impl LoginCheckGate {
    pub fn new(sessions: SessionStore, cookie_name: &str, login_path: &str) -> Self {
        Self {
            sessions,
            cookie_name: cookie_name.to_string(),
            login_path: login_path.to_string(),
            redirect_param: "redirectURL".to_string(),
            whitelist: Vec::new(),
        }
    }

    pub fn redirect_param(mut self, name: &str) -> Self {
        self.redirect_param = name.to_string();
        self
    }

    /// Paths that never require a session. `*` matches anything.
    pub fn whitelist<S: AsRef<str>>(mut self, patterns: &[S]) -> Self {
        self.whitelist = patterns.iter().map(|p| p.as_ref().to_string()).collect();
        self
    }

    pub fn is_login_check_path(&self, path: &str) -> bool {
        !matches_any(&self.whitelist, path)
    }
}

impl Gate for LoginCheckGate {
    fn name(&self) -> &str {
        "loginCheck"
    }

    fn before(&self, req: &mut WebRequest, res: &mut WebResponse) -> Result<GateDecision> {
        let path = req.path().to_string();

        if !self.is_login_check_path(&path) {
            return Ok(GateDecision::Continue);
        }

        let member = req
            .cookie(&self.cookie_name)
            .and_then(|token| self.sessions.lookup(token));

        match member {
            Some(member) => {
                req.insert_attribute(LoginMember(member));
                Ok(GateDecision::Continue)
            }
            None => {
                log::info!("Unauthenticated request to {}", path);
                res.redirect(&format!("{}?{}={}", self.login_path, self.redirect_param, path))?;
                Ok(GateDecision::Halt)
            }
        }
    }
}

/// Member behind the request, if any. Prefers the attribute set by the gate
/// and falls back to a session lookup for whitelisted paths. Never creates a
/// session.
pub fn login_member(req: &WebRequest, sessions: &SessionStore, cookie_name: &str) -> Option<Member> {
    if let Some(LoginMember(member)) = req.attribute::<LoginMember>() {
        return Some(member.clone());
    }

    req.cookie(cookie_name)
        .and_then(|token| sessions.lookup(token))
}
