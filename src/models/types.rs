//! Core value types shared across Notion objects.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::boxed::BoxedStr;

/// Identifier assigned by Notion to every object.
pub type ObjectId = uuid::Uuid;

/// Validation failures for model values.
///
/// Model construction is all-or-nothing: a failed validation never yields a
/// partially populated record.
#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("invalid ISO 8601 datetime: {0}")]
    InvalidDatetime(Box<str>),
    #[error("invalid IANA timezone: {0}")]
    InvalidTimezone(Box<str>),
    #[error("`{field}` should not have a UTC offset when `time_zone` is provided: {value}")]
    OffsetWithTimezone {
        field: &'static str,
        value: Box<str>,
    },
    #[error("invalid URL: {0}")]
    InvalidUrl(Box<str>),
    #[error("invalid email address: {0}")]
    InvalidEmail(Box<str>),
}

/// Object kinds in Notion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Block,
    Database,
    Page,
    User,
    Comment,
}

/// Foreground colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Blue,
    Brown,
    Default,
    Gray,
    Green,
    Orange,
    Purple,
    Pink,
    Red,
    Yellow,
}

/// Background colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundColor {
    BlueBackground,
    BrownBackground,
    GrayBackground,
    GreenBackground,
    OrangeBackground,
    PurpleBackground,
    PinkBackground,
    RedBackground,
    YellowBackground,
}

/// An http(s) URL with a host.
///
/// Notion rejects other schemes, so they are rejected here rather than at
/// the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NotionUrl(Url);

impl NotionUrl {
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidUrl`] when the value does not parse, is
    /// not http(s), or lacks a host.
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        let url = Url::parse(raw).map_err(|e| ModelError::InvalidUrl(format!("{raw}: {e}").boxed()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ModelError::InvalidUrl(
                format!("only http and https are allowed, got scheme '{}'", url.scheme()).boxed(),
            ));
        }
        if url.host_str().is_none() {
            return Err(ModelError::InvalidUrl(
                format!("URL must contain a valid domain: {raw}").boxed(),
            ));
        }
        Ok(Self(url))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for NotionUrl {
    type Error = ModelError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<NotionUrl> for String {
    fn from(url: NotionUrl) -> Self {
        url.0.into()
    }
}

impl std::fmt::Display for NotionUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// An email address, checked for the shape Notion accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NotionEmail(Box<str>);

impl NotionEmail {
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidEmail`] when the value has no `@`, an
    /// empty local part, or a domain without a dot.
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        let invalid = || ModelError::InvalidEmail(raw.boxed());
        let (local, domain) = raw.split_once('@').ok_or_else(invalid)?;
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(invalid());
        }
        let dot_ok = domain
            .split_once('.')
            .is_some_and(|(head, tail)| !head.is_empty() && !tail.is_empty());
        if !dot_ok {
            return Err(invalid());
        }
        Ok(Self(raw.boxed()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NotionEmail {
    type Error = ModelError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<NotionEmail> for String {
    fn from(email: NotionEmail) -> Self {
        email.0.into()
    }
}

/// A simple link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotionLink {
    pub url: NotionUrl,
}

/// A mathematical expression in KaTeX syntax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotionEquation {
    pub expression: String,
}
