//! Date values and their timezone rules.
//!
//! Notion accepts three ISO 8601 shapes: a bare date, a wall-clock datetime
//! without offset, and a datetime with an explicit UTC offset (`Z` included).
//! When an IANA `time_zone` accompanies a date, the start and end values must
//! not carry their own offsets; without one, offsets are allowed.

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::types::ModelError;
use crate::boxed::BoxedStr;

/// One ISO 8601 value as Notion represents it on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Timestamp {
    /// Date-only value, `2023-05-17`.
    Date(NaiveDate),
    /// Wall-clock datetime carrying no offset.
    Floating(NaiveDateTime),
    /// Instant with an explicit UTC offset.
    Fixed(DateTime<FixedOffset>),
}

impl Timestamp {
    /// Whether the value pins down an instant with its own offset.
    #[must_use]
    pub fn has_offset(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }

    fn naive(self) -> NaiveDateTime {
        match self {
            Self::Date(d) => d.and_hms_opt(0, 0, 0).unwrap_or_default(),
            Self::Floating(dt) => dt,
            Self::Fixed(dt) => dt.naive_local(),
        }
    }
}

impl FromStr for Timestamp {
    type Err = ModelError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(Self::Date(date));
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(Self::Fixed(dt));
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
                return Ok(Self::Floating(dt));
            }
        }
        Err(ModelError::InvalidDatetime(raw.boxed()))
    }
}

impl TryFrom<String> for Timestamp {
    type Error = ModelError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<Timestamp> for String {
    fn from(ts: Timestamp) -> Self {
        ts.to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Floating(dt) if dt.and_utc().timestamp_subsec_nanos() == 0 => {
                write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S"))
            }
            Self::Floating(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            Self::Fixed(dt) => write!(f, "{}", dt.to_rfc3339()),
        }
    }
}

/// A date or date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDate", into = "RawDate")]
pub struct NotionDate {
    start: Timestamp,
    end: Option<Timestamp>,
    time_zone: Option<Tz>,
}

impl NotionDate {
    /// Build a date, enforcing the offset/timezone exclusivity rule.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::OffsetWithTimezone`] when `time_zone` is set
    /// and `start` or `end` carries its own UTC offset.
    pub fn new(
        start: Timestamp,
        end: Option<Timestamp>,
        time_zone: Option<Tz>,
    ) -> Result<Self, ModelError> {
        if time_zone.is_some() {
            if start.has_offset() {
                return Err(ModelError::OffsetWithTimezone {
                    field: "start",
                    value: start.to_string().boxed(),
                });
            }
            if let Some(end) = end.filter(Timestamp::has_offset) {
                return Err(ModelError::OffsetWithTimezone {
                    field: "end",
                    value: end.to_string().boxed(),
                });
            }
        }
        Ok(Self {
            start,
            end,
            time_zone,
        })
    }

    /// Parse a date from its wire strings.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] for malformed datetimes, unknown IANA zone
    /// names, or offset-carrying values combined with a `time_zone`.
    pub fn parse(
        start: &str,
        end: Option<&str>,
        time_zone: Option<&str>,
    ) -> Result<Self, ModelError> {
        let time_zone = time_zone
            .map(|tz| {
                tz.parse::<Tz>()
                    .map_err(|_| ModelError::InvalidTimezone(tz.boxed()))
            })
            .transpose()?;
        let start = start.parse()?;
        let end = end.map(str::parse).transpose()?;
        Self::new(start, end, time_zone)
    }

    #[must_use]
    pub fn start(&self) -> Timestamp {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> Option<Timestamp> {
        self.end
    }

    #[must_use]
    pub fn time_zone(&self) -> Option<Tz> {
        self.time_zone
    }

    /// The start instant localised into the attached timezone, when one is
    /// set. Ambiguous wall-clock times (DST transitions) resolve to the
    /// earlier instant.
    #[must_use]
    pub fn resolved_start(&self) -> Option<DateTime<Tz>> {
        let tz = self.time_zone?;
        tz.from_local_datetime(&self.start.naive()).earliest()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDate {
    start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_zone: Option<String>,
}

impl TryFrom<RawDate> for NotionDate {
    type Error = ModelError;

    fn try_from(raw: RawDate) -> Result<Self, Self::Error> {
        Self::parse(&raw.start, raw.end.as_deref(), raw.time_zone.as_deref())
    }
}

impl From<NotionDate> for RawDate {
    fn from(date: NotionDate) -> Self {
        Self {
            start: date.start.to_string(),
            end: date.end.map(|ts| ts.to_string()),
            time_zone: date.time_zone.map(|tz| tz.name().to_string()),
        }
    }
}
