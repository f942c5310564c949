//! Wire types used by the client.

use serde::Deserialize;

/// The error envelope Notion returns on non-2xx responses.
///
/// ```json
/// {"object": "error", "status": 400, "code": "validation_error", "message": "..."}
/// ```
#[derive(Debug, Deserialize)]
pub(super) struct ErrorEnvelope {
    pub(super) object: String,
    #[allow(dead_code, reason = "mirrors the HTTP status; the transport status is authoritative")]
    pub(super) status: Option<u16>,
    pub(super) code: String,
    pub(super) message: String,
}

impl ErrorEnvelope {
    pub(super) fn is_error(&self) -> bool {
        self.object == "error"
    }
}
