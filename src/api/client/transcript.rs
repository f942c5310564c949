//! Transcript logging for API requests.

use log::warn;
use serde_json::json;

use super::NotionClient;
use super::helpers::{BODY_SNIPPET_LEN, payload_snippet, snippet};
use super::http::HttpResponse;

impl NotionClient {
    /// Write the request and response to the transcript if enabled.
    ///
    /// Payloads are redacted before being written so tokens never land on
    /// disk.
    pub(super) fn log_transcript(
        &self,
        payload: Option<&serde_json::Value>,
        operation: &str,
        resp: &HttpResponse,
    ) {
        let Some(t) = &self.transcript else {
            return;
        };
        use std::io::Write as _;
        let line = json!({
            "operation": operation,
            "status": resp.status,
            "request": payload.map(|p| payload_snippet(p)),
            "response": snippet(&resp.body, BODY_SNIPPET_LEN),
        });
        match t.lock() {
            Ok(mut f) => {
                if let Err(e) = writeln!(f, "{line}") {
                    warn!("failed to write transcript for op={operation}: {e}");
                    return;
                }
                if let Err(e) = f.flush() {
                    warn!("failed to flush transcript for op={operation}: {e}");
                }
            }
            Err(e) => {
                warn!("failed to lock transcript for op={operation}: {e}");
            }
        }
    }
}
