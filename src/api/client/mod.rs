//! Client implementation and request orchestration.

mod helpers;
mod http;
mod pagination;
mod transcript;
mod types;

use backon::Retryable;
use log::warn;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use tokio::time::{Duration, sleep};
use url::Url;

use crate::api::request::Request;
use crate::api::retry::{RetryConfig, adjust_delay, build_retry_builder, should_retry};
use crate::boxed::BoxedStr;
use crate::config::Config;
use crate::error::Error;

use self::helpers::{
    BODY_SNIPPET_LEN, VALUE_SNIPPET_LEN, build_headers, parse_retry_after, payload_snippet, snippet,
};
use self::http::HttpResponse;
use self::types::ErrorEnvelope;

/// Asynchronous client for the Notion REST API.
///
/// The client owns a shared connection pool, prebuilt authentication and
/// version headers, and the retry policy. One client can serve many
/// concurrent calls; each call is independent.
pub struct NotionClient {
    client: reqwest::Client,
    headers: HeaderMap,
    base_url: Url,
    timeout: Duration,
    retry: RetryConfig,
    transcript: Option<std::sync::Mutex<std::io::BufWriter<std::fs::File>>>,
}

impl NotionClient {
    /// Create a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the authorization or version header
    /// cannot be constructed from the configuration.
    pub fn new(config: &Config) -> Result<Self, Error> {
        Self::build(config, None)
    }

    /// Create a client that records every request and response to a
    /// transcript file, one JSON document per line.
    ///
    /// The transcript is a debugging aid; request payloads are redacted
    /// before being written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the transcript file cannot be created, or
    /// [`Error::Config`] for invalid header values.
    pub fn with_transcript(config: &Config, path: std::path::PathBuf) -> Result<Self, Error> {
        Self::build(config, Some(path))
    }

    fn build(config: &Config, transcript: Option<std::path::PathBuf>) -> Result<Self, Error> {
        let transcript = transcript
            .map(|p| {
                std::fs::File::create(p)
                    .map(|file| std::sync::Mutex::new(std::io::BufWriter::new(file)))
            })
            .transpose()
            .map_err(|e| Error::Io(Box::new(e)))?;
        let headers = build_headers(config)?;
        Ok(Self {
            client: reqwest::Client::new(),
            headers,
            base_url: config.base_url.clone(),
            timeout: config.timeout,
            retry: config.retry,
            transcript,
        })
    }

    fn build_url(&self, request: &Request) -> Result<Url, Error> {
        let mut url = self
            .base_url
            .join(request.path())
            .map_err(|e| Error::InvalidRequest(format!("invalid path {}: {e}", request.path()).boxed()))?;
        if !request.query_params().is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in request.query_params() {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Execute one HTTP attempt and classify the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] when the request cannot be sent or the
    /// body cannot be read, [`Error::RateLimited`] on HTTP 429 and
    /// [`Error::Http`] on any other non-2xx status.
    async fn execute_single_request(
        &self,
        request: &Request,
        operation: &str,
    ) -> Result<HttpResponse, Error> {
        let url = self.build_url(request)?;
        let payload = request.body_value().cloned();
        let snip = payload.as_ref().map(payload_snippet).unwrap_or_default();
        let make_ctx = |status: Option<u16>| {
            let base = format!("{operation}; {snip}");
            match status {
                Some(s) => format!("{base}; status {s}"),
                None => base,
            }
            .boxed()
        };

        let mut builder = self
            .client
            .request(request.method().clone(), url)
            .headers(self.headers.clone())
            .timeout(self.timeout);
        if let Some(body) = request.body_value() {
            builder = builder.json(body);
        }
        let response = builder.send().await.map_err(|e| Error::Transport {
            context: make_ctx(None),
            source: e.into(),
        })?;
        let status = response.status().as_u16();
        let retry_after = parse_retry_after(response.headers());
        let body = response.text().await.map_err(|e| Error::Transport {
            context: make_ctx(Some(status)),
            source: e.into(),
        })?;
        let resp = HttpResponse { status, body };
        self.log_transcript(payload.as_ref(), operation, &resp);
        if resp.status == 429 {
            return Err(Error::RateLimited {
                retry_after,
                snippet: snippet(&resp.body, BODY_SNIPPET_LEN).boxed(),
            });
        }
        if !(200..300).contains(&resp.status) {
            return Err(classify_http_error(&resp));
        }
        Ok(resp)
    }

    /// Parse a successful response body into the desired type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the failing path when the body
    /// does not conform to the expected schema.
    fn process_response<T>(resp: &HttpResponse) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let mut de = serde_json::Deserializer::from_str(&resp.body);
        match serde_path_to_error::deserialize::<_, T>(&mut de) {
            Ok(v) => Ok(v),
            Err(e) => {
                let path = e.path().to_string();
                let inner = e.into_inner();
                Err(Error::Validation {
                    status: resp.status,
                    message: format!("{inner} at {path}").boxed(),
                    snippet: snippet(&resp.body, VALUE_SNIPPET_LEN).boxed(),
                })
            }
        }
    }

    /// Execute one logical API operation end-to-end.
    ///
    /// Transport failures and rate limits are retried with exponential
    /// backoff and jitter; a `Retry-After` signal overrides the computed
    /// delay. Any other failure surfaces immediately.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the retry budget is exhausted, the API
    /// rejects the request, or the response fails validation.
    pub async fn execute<T>(&self, request: Request) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let operation = request.operation();
        let builder = build_retry_builder(self.retry);
        (|| async {
            let resp = self.execute_single_request(&request, &operation).await?;
            Self::process_response::<T>(&resp)
        })
        .retry(builder)
        .sleep(sleep)
        .when(should_retry)
        .adjust(adjust_delay)
        .notify(|err: &Error, dur| warn!("retrying {operation} after {dur:?}: {err}"))
        .await
    }

    /// Execute an operation, aborting when `cancel` completes first.
    ///
    /// The in-flight transport call is dropped on cancellation and
    /// [`Error::Cancelled`] is returned; a response that has not been
    /// returned to the caller by then is discarded, never surfaced later.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] on cancellation, otherwise whatever
    /// [`execute`](Self::execute) returns.
    #[allow(
        clippy::integer_division_remainder_used,
        reason = "tokio::select! uses % internally"
    )]
    pub async fn execute_cancellable<T, C>(&self, request: Request, cancel: C) -> Result<T, Error>
    where
        T: DeserializeOwned,
        C: std::future::Future<Output = ()>,
    {
        let operation = request.operation();
        tokio::select! {
            biased;
            () = cancel => Err(Error::Cancelled {
                operation: operation.boxed(),
            }),
            result = self.execute(request) => result,
        }
    }
}

/// Turn a non-2xx response into an [`Error::Http`], preferring the parsed
/// Notion error envelope over a raw body snippet.
fn classify_http_error(resp: &HttpResponse) -> Error {
    match serde_json::from_str::<ErrorEnvelope>(&resp.body) {
        Ok(envelope) if envelope.is_error() => Error::Http {
            status: resp.status,
            code: envelope.code.boxed(),
            message: envelope.message.boxed(),
        },
        _ => Error::Http {
            status: resp.status,
            code: "unknown".boxed(),
            message: snippet(&resp.body, BODY_SNIPPET_LEN).boxed(),
        },
    }
}
