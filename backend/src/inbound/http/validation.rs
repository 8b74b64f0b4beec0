//! Field checks shared by the JSON handlers.
//!
//! Every rejection is an `invalid_request` error whose details name the
//! offending field, a `snake_case` reason and, when useful, the raw value.

use serde_json::{Map, Value};

use crate::domain::{Error, Language};

/// Request body field, named as the client sends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn reject(self, reason: &str, message: String, value: Option<&str>) -> Error {
        let mut details = Map::new();
        details.insert("field".into(), Value::from(self.0));
        details.insert("code".into(), Value::from(reason));
        if let Some(value) = value {
            details.insert("value".into(), Value::from(value));
        }
        Error::invalid_request(message).with_details(Value::Object(details))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field.reject(
        "missing_field",
        format!("missing required field: {}", field.0),
        None,
    )
}

pub(crate) fn invalid_value_error(
    field: FieldName,
    message: impl Into<String>,
    value: &str,
) -> Error {
    field.reject("invalid_value", message.into(), Some(value))
}

/// Present and not only whitespace; the text itself is returned untouched.
pub(crate) fn required_text(value: Option<String>, field: FieldName) -> Result<String, Error> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(missing_field_error(field)),
    }
}

pub(crate) fn parse_language(value: &str, field: FieldName) -> Result<Language, Error> {
    Language::parse(value).map_err(|err| {
        field.reject("invalid_language", format!("{}: {err}", field.0), Some(value))
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    const TITLE: FieldName = FieldName::new("title");
    const LANGUAGE: FieldName = FieldName::new("language");

    #[rstest]
    #[case(None)]
    #[case(Some(String::new()))]
    #[case(Some("  \n".to_owned()))]
    fn blank_text_is_missing(#[case] value: Option<String>) {
        let error = required_text(value, TITLE).expect_err("missing");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.message(), "missing required field: title");
        assert_eq!(
            error.details(),
            Some(&serde_json::json!({ "field": "title", "code": "missing_field" }))
        );
    }

    #[rstest]
    fn text_is_returned_untrimmed() {
        let value = required_text(Some(" keep ".to_owned()), TITLE).expect("present");
        assert_eq!(value, " keep ");
    }

    #[rstest]
    #[case("c#")]
    #[case("")]
    fn malformed_language_reports_the_value(#[case] raw: &str) {
        let error = parse_language(raw, LANGUAGE).expect_err("invalid tag");
        let details = error.details().expect("details");
        assert_eq!(details["field"], "language");
        assert_eq!(details["value"], raw);
        assert_eq!(details["code"], "invalid_language");
    }

    #[rstest]
    fn invalid_values_echo_the_input() {
        let error = invalid_value_error(TITLE, "too long", "abc");
        assert_eq!(error.message(), "too long");
        assert_eq!(error.details().expect("details")["code"], "invalid_value");
    }

    #[rstest]
    fn known_language_parses() {
        assert_eq!(
            parse_language("Python", LANGUAGE).expect("valid"),
            Language::Python
        );
    }
}
