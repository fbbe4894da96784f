//! Fault-tolerant extraction of display text from a raw engine result.
//!
//! Depending on transport, the engine's result arrives either as a typed
//! output or as an already-serialized blob whose structure only
//! approximates one, with the answer buried in a `"raw"` field next to
//! noisy siblings. Extraction is an ordered fallback chain from cheapest to
//! most expensive; the last arm returns the input verbatim, so the function
//! always produces some text.

use std::sync::LazyLock;

use regex::Regex;

use crate::engine::RawResult;

/// `"raw":"…"` terminated at the next `","` or closing brace.
static RAW_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""raw":"(.*?)(?:","|\})"#).expect("raw field pattern"));

/// `"raw":"…"` terminated at the next quote, for pre-cleaned text.
static RAW_FIELD_LOOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""raw":"(.*?)""#).expect("loose raw field pattern"));

/// Sibling fields that crowd the answer out of serialized blobs. Each span
/// runs from its key to the next `,"` or `}}` boundary, which stays in place.
static NOISE_FIELDS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    let span = |key: &str| {
        Regex::new(&format!(r#""{key}":.*?(,"|\}}\}})"#)).expect("noise span pattern")
    };
    [span("pydantic"), span("json_dict"), span("tasks_output")]
});

/// `"token_usage"` trails the blob, so its span runs to the next `}` or the
/// end of the text.
static TOKEN_USAGE_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""token_usage":[^}]*"#).expect("token usage pattern"));

/// Reduce a raw engine result to display-ready text.
///
/// Total: never fails, whatever shape the input takes. Re-applying it to
/// plain prose output is a no-op. Known limitation: the pattern extraction
/// does not survive adversarial embedded escaped quotes inside the `raw`
/// payload; the structural-parse arm is the backstop for well-formed JSON.
pub fn normalize(raw: &RawResult) -> String {
    match raw {
        RawResult::Typed(output) => unescape(&output.raw),
        RawResult::Text(text) => unescape(&extract_from_text(text)),
    }
}

/// The ordered fallback chain over serialized text.
fn extract_from_text(text: &str) -> String {
    // Well-formed blob: answer sits between the marker and the next field.
    if let Some(found) = RAW_FIELD.captures(text).and_then(|c| c.get(1)) {
        return found.as_str().trim().to_string();
    }

    // Strip noisy siblings, then retry with the looser terminator.
    let mut cleaned = text.to_string();
    for pattern in NOISE_FIELDS.iter() {
        cleaned = pattern.replace_all(&cleaned, "$1").into_owned();
    }
    cleaned = TOKEN_USAGE_FIELD.replace_all(&cleaned, "").into_owned();

    if let Some(found) = RAW_FIELD_LOOSE.captures(&cleaned).and_then(|c| c.get(1)) {
        return found.as_str().trim().to_string();
    }

    // Structural parse as the last resort before giving up.
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(&cleaned) {
        return match map.get("raw") {
            Some(serde_json::Value::String(answer)) => answer.clone(),
            Some(other) => other.to_string(),
            None => text.to_string(),
        };
    }

    text.to_string()
}

/// Turn the literal two-character sequences `\n` and `\"` back into the
/// characters they encode. Everything else passes through untouched.
fn unescape(text: &str) -> String {
    text.replace("\\n", "\n").replace("\\\"", "\"")
}
