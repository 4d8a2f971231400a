use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

static FENCED_JSON: OnceLock<Regex> = OnceLock::new();

fn fenced_json() -> &'static Regex {
    FENCED_JSON.get_or_init(|| {
        Regex::new(r"```json\s*([\s\S]*?)\s*```").expect("fenced json pattern is valid")
    })
}

/// Why a model response could not be read as a structured payload.
#[derive(Debug, thiserror::Error)]
pub(crate) enum PayloadError {
    #[error("invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),
    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// Contents of the first ```json fence, or the whole response when there is none.
pub(crate) fn payload_text(raw: &str) -> &str {
    fenced_json()
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .map(|body| body.as_str())
        .unwrap_or(raw)
}

pub(crate) fn parse_payload(raw: &str) -> Result<Map<String, Value>, PayloadError> {
    match serde_json::from_str::<Value>(payload_text(raw))? {
        Value::Object(map) => Ok(map),
        other => Err(PayloadError::NotAnObject(json_kind(&other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Non-empty string field, if present.
pub(crate) fn text_field<'a>(payload: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

/// String entries of an array field; anything else yields an empty list.
pub(crate) fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_text_prefers_fenced_block() {
        let raw = "Narito ang resulta:\n```json\n{\"grade\": \"16/20\"}\n```\nSalamat!";
        assert_eq!(payload_text(raw), "{\"grade\": \"16/20\"}");
    }

    #[test]
    fn payload_text_uses_whole_response_without_fence() {
        let raw = "{\"grade\": \"16/20\"}";
        assert_eq!(payload_text(raw), raw);
    }

    #[test]
    fn untagged_fence_is_not_extracted() {
        let raw = "```\n{\"grade\": \"16/20\"}\n```";
        assert_eq!(payload_text(raw), raw);
        assert!(parse_payload(raw).is_err());
    }

    #[test]
    fn parse_payload_rejects_non_objects() {
        match parse_payload("[1, 2, 3]") {
            Err(PayloadError::NotAnObject(kind)) => assert_eq!(kind, "an array"),
            other => panic!("expected non-object error, got {other:?}"),
        }
        assert!(matches!(
            parse_payload("not json at all"),
            Err(PayloadError::Syntax(_))
        ));
    }

    #[test]
    fn string_list_skips_non_strings() {
        let value = json!(["Malinaw ang layunin", 4, null, "Maayos ang daloy"]);
        assert_eq!(
            string_list(Some(&value)),
            vec!["Malinaw ang layunin", "Maayos ang daloy"]
        );
        assert!(string_list(Some(&json!("hindi listahan"))).is_empty());
        assert!(string_list(None).is_empty());
    }
}
