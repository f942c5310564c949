//! Helper utilities for request handling.

use chrono::{DateTime, Utc};
use log::warn;
use reqwest::header::{
    ACCEPT, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue, RETRY_AFTER, USER_AGENT,
};
use serde_json::Value;
use tokio::time::Duration;

use crate::boxed::BoxedStr;
use crate::config::Config;
use crate::error::Error;

/// Maximum number of characters to keep when logging response body snippets.
pub(super) const BODY_SNIPPET_LEN: usize = 500;
/// Maximum number of characters to keep when logging request payload snippets.
pub(super) const REQUEST_SNIPPET_LEN: usize = 1024;
/// Maximum number of characters to keep when logging individual value snippets.
pub(super) const VALUE_SNIPPET_LEN: usize = 200;

pub(super) const NOTION_VERSION_HEADER: HeaderName = HeaderName::from_static("notion-version");

/// Upper bound on an honored `Retry-After` delay. Anything larger would stall
/// the call for longer than any sane throttle window.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Trim `text` to `max` characters, appending `...` when truncated.
///
/// Returns an empty string when `max` is zero.
pub(super) fn snippet(text: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut out = text.chars().take(max).collect::<String>();
        out.push_str("...");
        out
    }
}

/// Recursively redact sensitive values from a JSON structure.
fn redact_sensitive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (k, v) in map.iter_mut() {
                if matches!(
                    k.to_ascii_lowercase().as_str(),
                    "token"
                        | "authorization"
                        | "password"
                        | "secret"
                        | "access_token"
                        | "refresh_token"
                        | "api_key"
                        | "apikey"
                        | "bearer"
                        | "auth"
                        | "credentials"
                        | "credential"
                        | "private_key"
                ) {
                    *v = Value::String("<redacted>".into());
                } else {
                    redact_sensitive(v);
                }
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(redact_sensitive),
        _ => {}
    }
}

/// Build a snippet of the redacted request payload.
///
/// Falls back to a placeholder when serialisation fails, logging the error.
pub(super) fn payload_snippet(payload: &Value) -> String {
    let mut redacted = payload.clone();
    redact_sensitive(&mut redacted);
    let json = match serde_json::to_string(&redacted) {
        Ok(s) => s,
        Err(e) => {
            warn!("Failed to serialise redacted payload: {e}");
            "<failed to serialise payload>".into()
        }
    };
    snippet(&json, REQUEST_SNIPPET_LEN)
}

/// Build the standard header set: user agent, JSON accept, API version and an
/// optional bearer token.
pub(super) fn build_headers(config: &Config) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static("notion-client"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    let version = config
        .version
        .parse()
        .map_err(|e| Error::Config(format!("invalid API version header: {e}").boxed()))?;
    headers.insert(NOTION_VERSION_HEADER, version);
    if !config.token.is_empty() {
        let value = format!("Bearer {}", config.token.as_str())
            .parse()
            .map_err(|e| Error::Config(format!("invalid authorization header: {e}").boxed()))?;
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

/// Extract a retry delay from a `Retry-After` header.
///
/// Both forms from RFC 9110 are accepted: delta-seconds and an HTTP-date.
/// Dates in the past collapse to a zero delay; delays above
/// [`MAX_RETRY_AFTER`] are capped there.
pub(super) fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
    if let Ok(secs) = raw.parse::<u64>() {
        return Some(Duration::from_secs(secs).min(MAX_RETRY_AFTER));
    }
    let date = DateTime::parse_from_rfc2822(raw).ok()?;
    let delta = date.with_timezone(&Utc) - Utc::now();
    Some(delta.to_std().unwrap_or_default().min(MAX_RETRY_AFTER))
}
