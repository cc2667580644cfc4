//! Details pulled out of failed responses for error reports.

use crate::Auth;
use http::HeaderMap;

use super::redact::{redact_text, truncate_utf8};

const MAX_BODY_SNIPPET_BYTES: usize = 4096;

const REQUEST_ID_HEADERS: [&str; 3] = ["x-request-id", "x-correlation-id", "x-amzn-requestid"];

pub(crate) fn request_id(headers: &HeaderMap) -> Option<Box<str>> {
    REQUEST_ID_HEADERS
        .iter()
        .filter_map(|name| headers.get(*name)?.to_str().ok())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(Into::into)
}

/// Human-readable message from a JSON error body, or from the `<title>` of the HTML
/// error pages Jenkins renders.
pub(crate) fn extract_message(body: &[u8]) -> Option<Box<str>> {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        return ["message", "error", "errorMessage"]
            .iter()
            .filter_map(|key| value.get(*key)?.as_str())
            .map(str::trim)
            .find(|msg| !msg.is_empty())
            .map(Into::into);
    }

    let text = String::from_utf8_lossy(body);
    let start = text.find("<title>")? + "<title>".len();
    let len = text[start..].find("</title>")?;
    let title = text[start..start + len].trim();
    (!title.is_empty()).then(|| title.into())
}

/// Leading part of `body` with credentials masked; `None` for an empty body.
pub(crate) fn body_snippet(body: &[u8], auth: Option<&Auth>) -> Option<Box<str>> {
    if body.is_empty() {
        return None;
    }
    let body = String::from_utf8_lossy(body);
    let snippet = truncate_utf8(&body, MAX_BODY_SNIPPET_BYTES).to_owned();
    Some(redact_text(snippet, auth).into_boxed_str())
}
