//! The list envelope wrapping every paginated response.

use serde::Deserialize;

use crate::boxed::BoxedStr;
use crate::error::Error;

/// One page of results from a list endpoint.
///
/// ```json
/// {"object": "list", "results": [...], "next_cursor": "abc", "has_more": true}
/// ```
#[derive(Debug, Deserialize, Default)]
pub struct ObjectList<T> {
    pub object: String,
    pub results: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

impl<T> ObjectList<T> {
    /// Cursor for the next page, when one exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadResponse`] when more results are advertised but
    /// no cursor was supplied; following such a page would silently drop
    /// results.
    pub fn next_cursor(&self) -> Result<Option<&str>, Error> {
        if !self.has_more {
            return Ok(None);
        }
        self.next_cursor
            .as_deref()
            .map(Some)
            .ok_or_else(|| Error::BadResponse("has_more=true but next_cursor is missing".boxed()))
    }
}
