//! Lenient scalar fields for JSON request bodies.
//!
//! Clients built around HTML forms often send numbers and flags as strings
//! (`"rating": "5"`, `"availability": "false"`). These helpers accept either
//! form for `Option` fields used with `#[serde(default, deserialize_with)]`.
//! `null` and blank strings read as absent; any other text that does not
//! parse is a deserialization error.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagOrText {
    Flag(bool),
    Text(String),
}

/// Reads a JSON number or a numeric string.
///
/// # Errors
///
/// Fails on text that is not a number, or on any other JSON type.
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)
        .map_err(|_| D::Error::custom("expected a number"))?
    {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<f64>()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("expected a number, got \"{text}\"")))
        }
    }
}

/// Reads a JSON boolean or the strings `"true"` / `"false"`.
///
/// # Errors
///
/// Fails on any other text or JSON type.
pub fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<FlagOrText>::deserialize(deserializer)
        .map_err(|_| D::Error::custom("expected a boolean"))?
    {
        None => Ok(None),
        Some(FlagOrText::Flag(b)) => Ok(Some(b)),
        Some(FlagOrText::Text(text)) => match text.trim() {
            "" => Ok(None),
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            other => Err(D::Error::custom(format!(
                "expected a boolean, got \"{other}\""
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "number")]
        count: Option<f64>,
        #[serde(default, deserialize_with = "flag")]
        open: Option<bool>,
    }

    fn parse(value: serde_json::Value) -> Result<Body, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn numbers_accept_json_numbers_and_numeric_text() {
        assert!(matches!(parse(json!({"count": 5})), Ok(Body { count: Some(n), .. }) if n == 5.0));
        assert!(matches!(parse(json!({"count": 4.5})), Ok(Body { count: Some(n), .. }) if n == 4.5));
        assert!(matches!(parse(json!({"count": " 2 "})), Ok(Body { count: Some(n), .. }) if n == 2.0));
    }

    #[test]
    fn absent_null_and_blank_read_as_none() {
        assert!(matches!(parse(json!({})), Ok(Body { count: None, open: None })));
        assert!(matches!(
            parse(json!({"count": null, "open": null})),
            Ok(Body { count: None, open: None })
        ));
        assert!(matches!(
            parse(json!({"count": "", "open": " "})),
            Ok(Body { count: None, open: None })
        ));
    }

    #[test]
    fn flags_accept_booleans_and_literal_text() {
        assert!(matches!(parse(json!({"open": false})), Ok(Body { open: Some(false), .. })));
        assert!(matches!(parse(json!({"open": "true"})), Ok(Body { open: Some(true), .. })));
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse(json!({"count": "five"})).is_err());
        assert!(parse(json!({"count": [1]})).is_err());
        assert!(parse(json!({"open": "yes"})).is_err());
        assert!(parse(json!({"open": 1})).is_err());
    }
}
