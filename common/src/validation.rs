//! Binding results and the item validator.
//!
//! Errors carry message *codes*, not messages. Each error expands its code into
//! a list ordered from most to least specific, and the web layer resolves the
//! first code it has a message for:
//!
//! - field errors: `code.object.field`, `code.field`, `code.type`, `code`
//! - global errors: `code.object`, `code`

use serde::Serialize;

use crate::item::Item;

pub const PRICE_MIN: i32 = 1_000;
pub const PRICE_MAX: i32 = 1_000_000;
pub const QUANTITY_MAX: i32 = 9_999;
pub const TOTAL_PRICE_MIN: i64 = 10_000;

/// The value the client sent for a rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RejectedValue {
    Text(String),
    Number(i64),
    Missing,
}

impl From<&str> for RejectedValue {
    fn from(value: &str) -> Self {
        RejectedValue::Text(value.to_string())
    }
}

impl From<Option<i32>> for RejectedValue {
    fn from(value: Option<i32>) -> Self {
        value.map_or(RejectedValue::Missing, |v| RejectedValue::Number(i64::from(v)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub object_name: String,
    pub field: String,
    pub rejected_value: RejectedValue,
    pub codes: Vec<String>,
    pub arguments: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectError {
    pub object_name: String,
    pub codes: Vec<String>,
    pub arguments: Vec<i64>,
}

/// Collects validation failures for one bound object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingResult {
    object_name: String,
    field_errors: Vec<FieldError>,
    global_errors: Vec<ObjectError>,
}

impl BindingResult {
    pub fn new(object_name: impl Into<String>) -> Self {
        Self {
            object_name: object_name.into(),
            field_errors: Vec::new(),
            global_errors: Vec::new(),
        }
    }

    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    /// Rejects `field` with `code`. `type_name` feeds the `code.type` fallback.
    pub fn reject_value(
        &mut self,
        field: &str,
        type_name: &str,
        rejected_value: impl Into<RejectedValue>,
        code: &str,
        arguments: &[i64],
    ) {
        let codes = vec![
            format!("{}.{}.{}", code, self.object_name, field),
            format!("{}.{}", code, field),
            format!("{}.{}", code, type_name),
            code.to_string(),
        ];

        self.field_errors.push(FieldError {
            object_name: self.object_name.clone(),
            field: field.to_string(),
            rejected_value: rejected_value.into(),
            codes,
            arguments: arguments.to_vec(),
        });
    }

    /// Records an error that is not tied to a single field.
    pub fn reject(&mut self, code: &str, arguments: &[i64]) {
        let codes = vec![format!("{}.{}", code, self.object_name), code.to_string()];

        self.global_errors.push(ObjectError {
            object_name: self.object_name.clone(),
            codes,
            arguments: arguments.to_vec(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.field_errors.is_empty() || !self.global_errors.is_empty()
    }

    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    pub fn global_errors(&self) -> &[ObjectError] {
        &self.global_errors
    }

    pub fn field_error(&self, field: &str) -> Option<&FieldError> {
        self.field_errors.iter().find(|e| e.field == field)
    }
}

/// Registration rules for items.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemValidator;

impl ItemValidator {
    pub fn validate(&self, item: &Item, errors: &mut BindingResult) {
        if item.item_name.trim().is_empty() {
            errors.reject_value("itemName", "String", item.item_name.as_str(), "required", &[]);
        }

        match item.price {
            Some(price) if (PRICE_MIN..=PRICE_MAX).contains(&price) => {}
            price => errors.reject_value(
                "price",
                "Integer",
                price,
                "range",
                &[i64::from(PRICE_MIN), i64::from(PRICE_MAX)],
            ),
        }

        match item.quantity {
            Some(quantity) if quantity <= QUANTITY_MAX => {}
            quantity => errors.reject_value(
                "quantity",
                "Integer",
                quantity,
                "max",
                &[i64::from(QUANTITY_MAX)],
            ),
        }

        if let Some(total) = item.total_price() {
            if total < TOTAL_PRICE_MIN {
                errors.reject("totalPriceMin", &[TOTAL_PRICE_MIN, total]);
            }
        }
    }
}
