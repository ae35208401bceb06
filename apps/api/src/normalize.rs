//! Response Normalizer — turns raw completion text into fixed-shape records.
//!
//! Models frequently wrap their JSON in a markdown code fence, sometimes with
//! prose around it. `extract_json_block` finds the payload, `parse_payload`
//! parses it, and `FromPayload` implementations coerce the parsed object
//! into a record whose every field has a value. Missing fields are filled
//! with documented defaults and never reach callers as `null`.

use serde_json::{Map, Value};
use thiserror::Error;

const FENCE: &str = "```";

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("payload is JSON but not an object (found {0})")]
    NotAnObject(&'static str),
}

/// A record that can be built from a parsed JSON object, defaulting every
/// field the object does not provide.
pub trait FromPayload: Sized {
    fn from_payload(payload: &Map<String, Value>) -> Self;
}

/// Returns the JSON text inside the first fenced block, or the whole text
/// when there is no fence.
///
/// The language tag on the opening fence line (`json`, `JSON`, ...) is
/// dropped. An unterminated fence yields everything after the opening marker.
pub fn extract_json_block(text: &str) -> &str {
    let Some(start) = text.find(FENCE) else {
        return text.trim();
    };

    let after = &text[start + FENCE.len()..];
    let body = match after.find(FENCE) {
        Some(end) => &after[..end],
        None => after,
    };

    strip_language_tag(body).trim()
}

/// Drops a leading tag token (`json`, `JSON`, `jsonc`, ...) when it is
/// followed by whitespace or by the payload itself.
fn strip_language_tag(body: &str) -> &str {
    let tag_len = body
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(body.len());
    if tag_len == 0 {
        return body;
    }

    let rest = &body[tag_len..];
    match rest.chars().next() {
        None => rest,
        Some(c) if c.is_whitespace() || c == '{' || c == '[' => rest,
        Some(_) => body,
    }
}

/// Extracts and parses the payload. Anything but a JSON object is malformed.
pub fn parse_payload(text: &str) -> Result<Map<String, Value>, NormalizeError> {
    let value: Value = serde_json::from_str(extract_json_block(text))?;
    match value {
        Value::Object(map) => Ok(map),
        Value::Array(_) => Err(NormalizeError::NotAnObject("array")),
        Value::String(_) => Err(NormalizeError::NotAnObject("string")),
        Value::Number(_) => Err(NormalizeError::NotAnObject("number")),
        Value::Bool(_) => Err(NormalizeError::NotAnObject("bool")),
        Value::Null => Err(NormalizeError::NotAnObject("null")),
    }
}

/// Parses `text` and builds a `T`, defaulting missing fields.
pub fn normalize<T: FromPayload>(text: &str) -> Result<T, NormalizeError> {
    parse_payload(text).map(|payload| T::from_payload(&payload))
}

/// Reads a text field. Missing, null and blank values give `default`;
/// numbers and bools are stringified; lists of strings are joined with ", ".
pub fn text_or(payload: &Map<String, Value>, key: &str, default: &str) -> String {
    let text = match payload.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    };

    if text.is_empty() {
        default.to_string()
    } else {
        text
    }
}

/// Reads a list-of-strings field. A missing or non-list value gives
/// `default`; a lone string becomes a one-element list. Non-string items are
/// dropped. An explicitly empty list stays empty.
pub fn list_or(payload: &Map<String, Value>, key: &str, default: &[&str]) -> Vec<String> {
    match payload.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => default.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_json_from_tagged_fence() {
        let input = "```json\n{\"a\":1}\n```";
        assert_eq!(extract_json_block(input), "{\"a\":1}");
    }

    #[test]
    fn test_extracts_json_from_untagged_fence() {
        let input = "```\n{\"a\":1}\n```";
        assert_eq!(extract_json_block(input), "{\"a\":1}");
    }

    #[test]
    fn test_unfenced_text_is_returned_whole() {
        assert_eq!(extract_json_block("  {\"a\":1}\n"), "{\"a\":1}");
    }

    #[test]
    fn test_fence_surrounded_by_prose() {
        let input = "Sure! Here is the result:\n```json\n{\"a\": 1}\n```\nGood luck.";
        assert_eq!(extract_json_block(input), "{\"a\": 1}");
    }

    #[test]
    fn test_only_first_fenced_block_is_used() {
        let input = "```json\n{\"a\":1}\n```\n```json\n{\"b\":2}\n```";
        assert_eq!(extract_json_block(input), "{\"a\":1}");
    }

    #[test]
    fn test_single_line_fence_with_tag() {
        assert_eq!(extract_json_block("```json {\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn test_tag_followed_by_payload_on_the_same_line() {
        let input = "```json {\n\"a\":1}\n```";
        assert_eq!(extract_json_block(input), "{\n\"a\":1}");
        assert_eq!(parse_payload(input).unwrap().get("a"), Some(&json!(1)));
        assert_eq!(extract_json_block("```json{\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn test_unterminated_fence_takes_the_rest() {
        assert_eq!(extract_json_block("```json\n{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn test_parse_payload_accepts_fenced_and_plain() {
        let fenced = parse_payload("```json\n{\"a\":1}\n```").unwrap();
        let plain = parse_payload("{\"a\":1}").unwrap();
        assert_eq!(fenced, plain);
        assert_eq!(plain.get("a"), Some(&json!(1)));
    }

    #[test]
    fn test_parse_payload_rejects_non_json() {
        assert!(matches!(
            parse_payload("not json"),
            Err(NormalizeError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_parse_payload_rejects_non_object() {
        assert!(matches!(
            parse_payload("[1, 2]"),
            Err(NormalizeError::NotAnObject("array"))
        ));
    }

    #[test]
    fn test_text_or_defaults_missing_null_and_blank() {
        let payload = json!({"null": null, "blank": "  "});
        let payload = payload.as_object().unwrap();
        assert_eq!(text_or(payload, "missing", "fallback"), "fallback");
        assert_eq!(text_or(payload, "null", "fallback"), "fallback");
        assert_eq!(text_or(payload, "blank", "fallback"), "fallback");
    }

    #[test]
    fn test_text_or_coerces_scalars_and_lists() {
        let payload = json!({"n": 42, "list": ["AWS", " PMP ", 3]});
        let payload = payload.as_object().unwrap();
        assert_eq!(text_or(payload, "n", "x"), "42");
        assert_eq!(text_or(payload, "list", "x"), "AWS, PMP");
    }

    #[test]
    fn test_list_or_handles_shapes() {
        let payload = json!({"list": ["a", 1, "b"], "single": "only", "empty": [], "obj": {}});
        let payload = payload.as_object().unwrap();
        assert_eq!(list_or(payload, "list", &["d"]), vec!["a", "b"]);
        assert_eq!(list_or(payload, "single", &["d"]), vec!["only"]);
        assert!(list_or(payload, "empty", &["d"]).is_empty());
        assert_eq!(list_or(payload, "obj", &["d"]), vec!["d"]);
        assert_eq!(list_or(payload, "missing", &["d", "e"]), vec!["d", "e"]);
    }
}
