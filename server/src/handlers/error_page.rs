//! Handlers reached only through error dispatch.

use serde_json::json;

use crate::app::AppState;
use crate::dispatch::{ErrorContext, Representation, ViewCatalog};
use crate::error::Result;
use crate::pipeline::{WebRequest, WebResponse};

fn context(req: &WebRequest) -> ErrorContext {
    req.attribute::<ErrorContext>()
        .cloned()
        .unwrap_or_else(|| ErrorContext::missing(req))
}

/// `/error`: JSON body or the most specific error view, by `Accept`.
pub fn basic_error(state: &AppState, req: &mut WebRequest, res: &mut WebResponse) -> Result<()> {
    let context = context(req);
    let body = context.body();

    match Representation::negotiate(req.accept()) {
        Representation::Json => res.json(context.status, &body),
        Representation::Html => {
            let model = serde_json::to_value(&body)?;
            let html = state
                .views
                .error_view(context.status)
                .and_then(|(name, _)| state.views.render(&name, &model))
                .unwrap_or_else(|| ViewCatalog::fallback_page(&model));

            res.html(context.status, html);
            Ok(())
        }
    }
}

pub fn error_page_404(_state: &AppState, req: &mut WebRequest, res: &mut WebResponse) -> Result<()> {
    log::info!("errorPage 404");
    let context = context(req);
    context.log();

    res.view("error-page/404", serde_json::to_value(context.body())?);
    Ok(())
}

/// JSON callers get `{status, message}`; everyone else the 500 page.
pub fn error_page_500(_state: &AppState, req: &mut WebRequest, res: &mut WebResponse) -> Result<()> {
    let context = context(req);

    if Representation::negotiate(req.accept()) == Representation::Json {
        log::info!("API errorPage 500");
        return res.json(
            context.status,
            &json!({
                "status": context.status.as_u16(),
                "message": context.public_message(),
            }),
        );
    }

    log::info!("errorPage 500");
    context.log();
    res.view("error-page/500", serde_json::to_value(context.body())?);
    Ok(())
}
