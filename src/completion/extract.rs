//! Reply extraction from upstream response bodies
//!
//! Upstream response shapes are not fixed: standard chat bodies, legacy text
//! completions and vendor envelopes all put the reply somewhere different.
//! Candidates are tried in order and the first non-empty string wins:
//!
//! 1. `choices[0].message.content`
//! 2. `choices[0].text`
//! 3. top-level `data`
//! 4. top-level `message`
//! 5. the whole body re-serialized

use serde_json::Value;

/// Extract the reply text from a parsed upstream response
pub fn extract_reply(body: &Value) -> String {
    let first_choice = body.pointer("/choices/0");

    let candidates = [
        first_choice.and_then(|c| c.pointer("/message/content")),
        first_choice.and_then(|c| c.get("text")),
        body.get("data"),
        body.get("message"),
    ];

    candidates
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .find(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}
