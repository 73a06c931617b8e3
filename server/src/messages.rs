//! Message codes to human readable text.
//!
//! Messages use `{0}`, `{1}`, ... placeholders. Numeric arguments are
//! rendered with thousands separators, so `range.item.price` with
//! `[1000, 1000000]` reads "between 1,000 and 1,000,000".

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{AppError, Result};

const DEFAULT_MESSAGES: &[(&str, &str)] = &[
    ("error.bad", "Bad request error"),
    ("loginFail", "Login ID or password is incorrect."),
    ("required.item.itemName", "Item name is required."),
    ("range.item.price", "Price must be between {0} and {1}."),
    ("max.item.quantity", "Quantity can be at most {0}."),
    ("totalPriceMin", "Price * quantity must be at least {0}. Current value: {1}"),
    ("required", "This value is required."),
    ("range", "Value must be between {0} and {1}."),
    ("max", "Value can be at most {0}."),
    ("typeMismatch", "Value has the wrong type."),
];

#[derive(Debug, Clone)]
pub struct MessageSource {
    messages: HashMap<String, String>,
}

impl Default for MessageSource {
    fn default() -> Self {
        Self {
            messages: DEFAULT_MESSAGES
                .iter()
                .map(|(code, message)| (code.to_string(), message.to_string()))
                .collect(),
        }
    }
}

impl MessageSource {
    /// Built-in messages overlaid with the entries of a flat TOML table.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            AppError::Config(format!(
                "Failed to read messages from '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let overrides: HashMap<String, String> = toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse messages: {}", e)))?;

        let mut source = Self::default();
        source.messages.extend(overrides);
        Ok(source)
    }

    pub fn with_message(mut self, code: &str, message: &str) -> Self {
        self.messages.insert(code.to_string(), message.to_string());
        self
    }

    pub fn message(&self, code: &str, args: &[i64]) -> Option<String> {
        self.messages
            .get(code)
            .map(|template| format_message(template, args))
    }

    /// First code with a registered message wins.
    pub fn resolve<S: AsRef<str>>(&self, codes: &[S], args: &[i64]) -> Option<String> {
        codes
            .iter()
            .find_map(|code| self.message(code.as_ref(), args))
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

fn format_message(template: &str, args: &[i64]) -> String {
    args.iter()
        .enumerate()
        .fold(template.to_string(), |message, (index, arg)| {
            message.replace(&format!("{{{}}}", index), &common::format_grouped(*arg))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arguments_are_grouped() {
        let messages = MessageSource::default();

        assert_eq!(
            messages.message("range.item.price", &[1_000, 1_000_000]).unwrap(),
            "Price must be between 1,000 and 1,000,000."
        );
    }

    #[test]
    fn test_resolve_takes_most_specific_code() {
        let messages = MessageSource::default().with_message("required.itemName", "unused");

        let codes = [
            "required.item.itemName",
            "required.itemName",
            "required.String",
            "required",
        ];
        assert_eq!(
            messages.resolve(&codes, &[]).unwrap(),
            "Item name is required."
        );

        let codes = ["required.member.name", "required.name", "required.String", "required"];
        assert_eq!(messages.resolve(&codes, &[]).unwrap(), "This value is required.");
    }

    #[test]
    fn test_unknown_code() {
        let messages = MessageSource::default();
        assert!(messages.message("nope", &[]).is_none());
        assert!(messages.resolve(&["a", "b"], &[]).is_none());
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let messages = MessageSource::from_toml_str(
            r#"
"error.bad" = "Custom bad request"
"custom.code" = "Hello {0}"
            "#,
        )
        .unwrap();

        assert_eq!(messages.message("error.bad", &[]).unwrap(), "Custom bad request");
        assert_eq!(messages.message("custom.code", &[5]).unwrap(), "Hello 5");
        assert_eq!(messages.message("loginFail", &[]).unwrap(), "Login ID or password is incorrect.");
    }
}
