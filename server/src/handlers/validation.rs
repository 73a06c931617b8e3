use actix_web::http::StatusCode;
use common::{BindingResult, Item, ItemSaveForm, ItemValidator, RejectedValue};
use serde::Serialize;

use crate::app::AppState;
use crate::error::Result;
use crate::messages::MessageSource;
use crate::pipeline::{WebRequest, WebResponse};

/// A binding error with its message resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedError {
    pub object_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_value: Option<RejectedValue>,
    /// Most specific code of the error.
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct ErrorsResponse {
    errors: Vec<ResolvedError>,
}

/// Field errors first, then global errors. Errors without a message fall
/// back to their least specific code.
pub fn resolve_errors(messages: &MessageSource, errors: &BindingResult) -> Vec<ResolvedError> {
    let fields = errors.field_errors().iter().map(|error| ResolvedError {
        object_name: error.object_name.clone(),
        field: Some(error.field.clone()),
        rejected_value: Some(error.rejected_value.clone()),
        code: error.codes.first().cloned().unwrap_or_default(),
        message: message_for(messages, &error.codes, &error.arguments),
    });

    let globals = errors.global_errors().iter().map(|error| ResolvedError {
        object_name: error.object_name.clone(),
        field: None,
        rejected_value: None,
        code: error.codes.first().cloned().unwrap_or_default(),
        message: message_for(messages, &error.codes, &error.arguments),
    });

    fields.chain(globals).collect()
}

fn message_for(messages: &MessageSource, codes: &[String], arguments: &[i64]) -> String {
    messages
        .resolve(codes, arguments)
        .or_else(|| codes.last().cloned())
        .unwrap_or_default()
}

pub(crate) fn write_errors(state: &AppState, res: &mut WebResponse, errors: &BindingResult) -> Result<()> {
    let errors = resolve_errors(&state.messages, errors);
    log::info!("Rejected with {} errors: {:?}", errors.len(), errors);
    res.json(StatusCode::BAD_REQUEST, &ErrorsResponse { errors })
}

pub fn add_item(state: &AppState, req: &mut WebRequest, res: &mut WebResponse) -> Result<()> {
    let form: ItemSaveForm = req.json()?;
    log::info!("API controller call");

    let item = Item::from(form);
    let mut errors = BindingResult::new("item");
    ItemValidator.validate(&item, &mut errors);

    if errors.has_errors() {
        log::info!("Validation errors occurred");
        return write_errors(state, res, &errors);
    }

    let saved = state.items.save(item);
    log::info!("Saved item {} ({})", saved.id, saved.item_name);
    res.json(StatusCode::OK, &saved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_resolved_most_specific_first() {
        let mut errors = BindingResult::new("item");
        ItemValidator.validate(&Item::new("", 100, 1), &mut errors);

        let resolved = resolve_errors(&MessageSource::default(), &errors);

        assert_eq!(resolved[0].field.as_deref(), Some("itemName"));
        assert_eq!(resolved[0].message, "Item name is required.");
        assert_eq!(resolved[1].code, "range.item.price");
        assert_eq!(resolved[1].message, "Price must be between 1,000 and 1,000,000.");
        // 100 * 1 is below the total minimum
        let global = resolved.last().unwrap();
        assert_eq!(global.field, None);
        assert_eq!(
            global.message,
            "Price * quantity must be at least 10,000. Current value: 100"
        );
    }

    #[test]
    fn test_unknown_codes_fall_back_to_plain_code() {
        let mut errors = BindingResult::new("order");
        errors.reject("outOfStock", &[]);

        let resolved = resolve_errors(&MessageSource::default(), &errors);
        assert_eq!(resolved[0].message, "outOfStock");
    }
}
