//! Request descriptors.
//!
//! A [`Request`] captures one logical API operation: method, path, query
//! parameters and an optional JSON body. Descriptors are built once and are
//! not mutated after being handed to the client; retries re-send the same
//! descriptor.

use reqwest::Method;
use serde_json::Value;

use crate::boxed::BoxedStr;
use crate::error::Error;

/// Description of a single API operation.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: Box<str>,
    query: Vec<(Box<str>, Box<str>)>,
    body: Option<Value>,
}

impl Request {
    fn new(method: Method, path: impl Into<Box<str>>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn get(path: impl Into<Box<str>>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<Box<str>>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn patch(path: impl Into<Box<str>>) -> Self {
        Self::new(Method::PATCH, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<Box<str>>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<Box<str>>, value: impl Into<Box<str>>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach any serialisable value as the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] when the value does not serialise.
    pub fn json<T: serde::Serialize>(self, body: &T) -> Result<Self, Error> {
        let value = serde_json::to_value(body)
            .map_err(|e| Error::InvalidRequest(format!("serialising request body: {e}").boxed()))?;
        Ok(self.body(value))
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn query_params(&self) -> &[(Box<str>, Box<str>)] {
        &self.query
    }

    #[must_use]
    pub fn body_value(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Human-readable label for logs, transcripts and error contexts.
    #[must_use]
    pub fn operation(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    /// Produce a copy of this request carrying the given pagination cursor.
    ///
    /// `GET` requests receive `start_cursor` as a query parameter; every
    /// other method carries it in the JSON body, as the API expects.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] when a non-`GET` request has a body
    /// that is not a JSON object.
    pub(crate) fn with_cursor(&self, cursor: &str) -> Result<Self, Error> {
        let mut next = self.clone();
        if next.method == Method::GET {
            next.query.retain(|(key, _)| &**key != "start_cursor");
            next.query.push(("start_cursor".into(), cursor.into()));
            return Ok(next);
        }
        let mut body = next.body.take().unwrap_or_else(|| Value::Object(serde_json::Map::new()));
        let obj = body.as_object_mut().ok_or_else(|| {
            Error::InvalidRequest("paginated request body must be a JSON object".boxed())
        })?;
        obj.insert("start_cursor".into(), Value::String(cursor.to_string()));
        next.body = Some(body);
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::Request;
    use crate::error::Error;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn operation_label_includes_method_and_path() {
        let req = Request::get("/v1/users");
        assert_eq!(req.operation(), "GET /v1/users");
    }

    #[test]
    fn json_body_round_trips() {
        let req = Request::post("/v1/databases/abc/query")
            .json(&json!({"page_size": 50}))
            .expect("body");
        assert_eq!(req.body_value(), Some(&json!({"page_size": 50})));
    }

    #[rstest]
    #[case(Request::get("/v1/users"), true)]
    #[case(Request::post("/v1/search"), false)]
    fn with_cursor_targets_query_or_body(#[case] req: Request, #[case] in_query: bool) {
        let next = req.with_cursor("cur_1").expect("cursor");
        if in_query {
            assert!(
                next.query_params()
                    .iter()
                    .any(|(k, v)| &**k == "start_cursor" && &**v == "cur_1")
            );
            assert!(next.body_value().is_none());
        } else {
            let body = next.body_value().expect("body");
            assert_eq!(body.get("start_cursor"), Some(&json!("cur_1")));
        }
    }

    #[test]
    fn with_cursor_replaces_stale_query_cursor() {
        let req = Request::get("/v1/users").query("start_cursor", "stale");
        let next = req.with_cursor("fresh").expect("cursor");
        let cursors: Vec<_> = next
            .query_params()
            .iter()
            .filter(|(k, _)| &**k == "start_cursor")
            .collect();
        assert_eq!(cursors.len(), 1);
        assert_eq!(&*cursors.first().expect("cursor param").1, "fresh");
    }

    #[test]
    fn with_cursor_rejects_non_object_body() {
        let req = Request::post("/v1/search").body(json!([1, 2, 3]));
        let err = req.with_cursor("cur").expect_err("error");
        assert!(matches!(err, Error::InvalidRequest(_)));
    }
}
