use actix_web::http::StatusCode;
use common::BindingResult;
use serde::Deserialize;
use serde_json::json;

use super::validation::write_errors;
use crate::app::AppState;
use crate::error::Result;
use crate::pipeline::{WebRequest, WebResponse};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemberSaveForm {
    pub login_id: String,
    pub name: String,
    pub password: String,
}

pub fn add_form(_state: &AppState, _req: &mut WebRequest, res: &mut WebResponse) -> Result<()> {
    res.view(
        "members/addMemberForm",
        json!({ "member": { "loginId": "", "name": "" } }),
    );
    Ok(())
}

/// Registers a member. A taken login id is an `IllegalArgument` failure.
pub fn add(state: &AppState, req: &mut WebRequest, res: &mut WebResponse) -> Result<()> {
    let form: MemberSaveForm = req.json()?;

    let mut errors = BindingResult::new("member");
    for (field, value) in [
        ("loginId", &form.login_id),
        ("name", &form.name),
        ("password", &form.password),
    ] {
        if value.trim().is_empty() {
            errors.reject_value(field, "String", value.as_str(), "required", &[]);
        }
    }
    if errors.has_errors() {
        return write_errors(state, res, &errors);
    }

    let member = state.members.register(
        &form.login_id,
        &form.name,
        &form.password,
        state.config.login.password_cost,
    )?;

    res.json(StatusCode::OK, &member)
}
