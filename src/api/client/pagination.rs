//! Pagination over cursor-based list endpoints.

use serde::de::DeserializeOwned;

use super::NotionClient;
use crate::api::request::Request;
use crate::boxed::BoxedStr;
use crate::error::Error;
use crate::models::ObjectList;

/// Pagination stops after this many pages to avoid infinite loops when
/// cursors repeat or the API misbehaves.
const MAX_PAGES: usize = 1000;

impl NotionClient {
    /// Fetch and concatenate all pages of a list endpoint.
    ///
    /// The request is re-issued with `start_cursor` injected (query for
    /// `GET`, body otherwise) until the API reports no further pages.
    /// Results are returned in page order.
    ///
    /// # Errors
    ///
    /// Propagates any [`Error`] from the underlying requests, and returns
    /// [`Error::BadResponse`] when a page advertises more results without a
    /// cursor or the page cap is exceeded.
    pub async fn paginate_all<T>(&self, request: Request) -> Result<Vec<T>, Error>
    where
        T: DeserializeOwned,
    {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages_seen = 0usize;
        loop {
            pages_seen += 1;
            if pages_seen > MAX_PAGES {
                return Err(Error::BadResponse(
                    format!("pagination exceeded max pages {MAX_PAGES}").boxed(),
                ));
            }
            let page_request = match cursor.take() {
                Some(c) => request.with_cursor(&c)?,
                None => request.clone(),
            };
            let page: ObjectList<T> = self.execute(page_request).await?;
            let next = page.next_cursor()?.map(str::to_string);
            items.extend(page.results);
            match next {
                Some(c) => cursor = Some(c),
                None => break,
            }
        }
        Ok(items)
    }
}
