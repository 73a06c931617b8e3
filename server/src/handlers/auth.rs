use actix_web::cookie::{time::Duration, Cookie};
use common::{BindingResult, Member};
use serde::Deserialize;
use serde_json::json;

use super::validation::write_errors;
use crate::app::AppState;
use crate::error::Result;
use crate::pipeline::{WebRequest, WebResponse};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    #[serde(default)]
    pub login_id: String,
    #[serde(default)]
    pub password: String,
}

pub fn login_form(_state: &AppState, _req: &mut WebRequest, res: &mut WebResponse) -> Result<()> {
    res.view("login/loginForm", json!({ "loginId": "" }));
    Ok(())
}

pub fn login(state: &AppState, req: &mut WebRequest, res: &mut WebResponse) -> Result<()> {
    let form: LoginForm = req.form()?;
    let mut errors = BindingResult::new("loginForm");

    if form.login_id.trim().is_empty() {
        errors.reject_value("loginId", "String", form.login_id.as_str(), "required", &[]);
    }
    if form.password.is_empty() {
        errors.reject_value("password", "String", "", "required", &[]);
    }
    if errors.has_errors() {
        return write_errors(state, res, &errors);
    }

    log::info!("Login attempt for user: {}", form.login_id);

    let Some(member) = authenticate(state, &form.login_id, &form.password)? else {
        log::warn!("Failed login attempt for user: {}", form.login_id);
        errors.reject("loginFail", &[]);
        return write_errors(state, res, &errors);
    };

    let token = state.sessions.create(member);
    log::info!("Successful login for user: {} (session: {})", form.login_id, token);

    let cookie = Cookie::build(state.cookie_name().to_string(), token)
        .path("/")
        .http_only(true)
        .finish();
    res.add_cookie(cookie);

    let target = redirect_target(req.param(&state.config.login.redirect_param));
    res.redirect(target)
}

fn authenticate(state: &AppState, login_id: &str, password: &str) -> Result<Option<Member>> {
    let Some(member) = state.members.find_by_login_id(login_id) else {
        return Ok(None);
    };

    if bcrypt::verify(password, &member.password_hash)? {
        Ok(Some(member))
    } else {
        Ok(None)
    }
}

/// Only same-site absolute paths are followed after login. Browsers read
/// `/\` like `//`, so both are refused.
fn redirect_target(requested: Option<&str>) -> &str {
    match requested {
        Some(path) if is_local_path(path) => path,
        _ => "/",
    }
}

fn is_local_path(path: &str) -> bool {
    let mut chars = path.chars();
    chars.next() == Some('/') && !matches!(chars.next(), Some('/') | Some('\\'))
}

pub fn logout(state: &AppState, req: &mut WebRequest, res: &mut WebResponse) -> Result<()> {
    if let Some(token) = req.cookie(state.cookie_name()) {
        state.sessions.invalidate(token);
        log::info!("User logged out (session: {})", token);
    }

    let cookie = Cookie::build(state.cookie_name().to_string(), "")
        .path("/")
        .max_age(Duration::seconds(0))
        .finish();
    res.add_cookie(cookie);

    res.redirect("/")
}
