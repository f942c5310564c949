//! Client configuration.
//!
//! Configuration is environment-driven with the `NOTION_` prefix, with an
//! optional `.env` file picked up from the working directory. Explicit values
//! passed by the caller always win over the environment.

use tokio::time::Duration;
use url::Url;

use crate::api::retry::RetryConfig;
use crate::boxed::BoxedStr;
use crate::environment;
use crate::error::Error;

/// Default API endpoint.
pub const NOTION_API_URL: &str = "https://api.notion.com";
/// API revision sent in the `Notion-Version` header.
pub const DEFAULT_API_VERSION: &str = "2022-06-28";

const DEFAULT_TIMEOUT_MS: u64 = 60_000;
/// Notion recommends generous request timeouts; anything below this is almost
/// certainly a caller mistake and is rejected.
const MIN_TIMEOUT_MS: u64 = 30_000;

/// A Notion integration token.
///
/// `Debug` redacts the value so tokens never leak through logs or panics.
#[derive(Clone, Default)]
pub struct Token(String);

impl Token {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

/// Settings consumed by [`crate::NotionClient`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Base API URL; requests join their path onto this.
    pub base_url: Url,
    /// Value for the `Notion-Version` header.
    pub version: Box<str>,
    /// Bearer token. An empty token sends unauthenticated requests.
    pub token: Token,
    /// Per-attempt request timeout.
    pub timeout: Duration,
    /// Retry policy for transient failures.
    pub retry: RetryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Url::parse(NOTION_API_URL).expect("static base URL"),
            version: DEFAULT_API_VERSION.into(),
            token: Token::default(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            retry: RetryConfig::default(),
        }
    }
}

impl Config {
    /// Default configuration with the given token.
    pub fn new(token: impl Into<Token>) -> Self {
        Self {
            token: token.into(),
            ..Self::default()
        }
    }

    /// Load configuration from the environment.
    ///
    /// Reads `NOTION_TOKEN`, `NOTION_BASE_URL`, `NOTION_VERSION` and
    /// `NOTION_TIMEOUT_MS`, falling back to defaults for anything unset. A
    /// `.env` file in the working directory is loaded first when present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the base URL is not an http(s) URL with
    /// a host, or the timeout is malformed or below 30 000 ms.
    pub fn from_env() -> Result<Self, Error> {
        dotenvy::dotenv().ok();
        let mut config = Self::default();
        config.token = resolve_token(None);
        if let Ok(raw) = environment::var("NOTION_BASE_URL") {
            config.base_url = parse_base_url(&raw)?;
        }
        if let Ok(version) = environment::var("NOTION_VERSION") {
            if !version.is_empty() {
                config.version = version.boxed();
            }
        }
        if let Ok(raw) = environment::var("NOTION_TIMEOUT_MS") {
            config.timeout = parse_timeout_ms(&raw)?;
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

/// Resolve the integration token.
///
/// Prefers an explicit value, then `NOTION_TOKEN`. Empty values are ignored.
#[must_use]
pub fn resolve_token(explicit: Option<&str>) -> Token {
    explicit
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .or_else(|| {
            environment::var("NOTION_TOKEN")
                .ok()
                .filter(|token| !token.is_empty())
        })
        .map(Token::new)
        .unwrap_or_default()
}

fn parse_base_url(raw: &str) -> Result<Url, Error> {
    let url = Url::parse(raw)
        .map_err(|e| Error::Config(format!("invalid NOTION_BASE_URL '{raw}': {e}").boxed()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Config(
            format!("NOTION_BASE_URL must be http or https, got '{}'", url.scheme()).boxed(),
        ));
    }
    if url.host_str().is_none() {
        return Err(Error::Config(
            format!("NOTION_BASE_URL must contain a host: '{raw}'").boxed(),
        ));
    }
    Ok(url)
}

fn parse_timeout_ms(raw: &str) -> Result<Duration, Error> {
    let ms: u64 = raw
        .parse()
        .map_err(|e| Error::Config(format!("invalid NOTION_TIMEOUT_MS '{raw}': {e}").boxed()))?;
    if ms < MIN_TIMEOUT_MS {
        return Err(Error::Config(
            format!("NOTION_TIMEOUT_MS must be at least {MIN_TIMEOUT_MS}, got {ms}").boxed(),
        ));
    }
    Ok(Duration::from_millis(ms))
}
