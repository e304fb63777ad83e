//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs should carry these wrappers instead of raw primitives so that
//! identifiers, text values and numeric constraints are enforced at the
//! boundary.

use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Storage format of run identifiers, matching ISO-8601 with microseconds.
pub const RUN_ID_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Human readable rendering of run identifiers and log times.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const RUN_ID_PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A numeric value required to be positive was zero.
    #[error("{0} must be greater than zero")]
    NonPositiveNumber(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// A time of day did not match `HH:MM`.
    #[error("invalid time of day `{0}`, expected HH:MM")]
    InvalidTimeOfDay(String),
    /// Catch-all for custom validation failures.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId($field))
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }
    };
}

/// Shared accessors for string-backed newtypes.
macro_rules! string_newtype_common {
    ($name:ident) => {
        impl $name {
            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }

        impl PartialEq<$name> for &str {
            fn eq(&self, other: &$name) -> bool {
                *self == other.as_str()
            }
        }
    };
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                trim_and_require_non_empty(value, $field).map(Self)
            }
        }

        string_newtype_common!($name);

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

/// Free-text attribute observed on a listing page, stored as observed. May be empty.
///
/// Equality between observations goes through `same_as` so the comparison
/// rule can change per attribute without touching callers.
macro_rules! observed_text_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps the observed text unchanged. Empty text is allowed.
            pub fn new<S: Into<String>>(value: S) -> Self {
                Self(value.into())
            }

            /// Whether two observations count as the same value.
            pub fn same_as(&self, other: &Self) -> bool {
                self.0 == other.0
            }
        }

        string_newtype_common!($name);

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }
    };
}

id_newtype!(
    ComparisonId,
    "Unique identifier for a comparison log row.",
    "comparison_id"
);

non_empty_string_newtype!(
    ProductName,
    "Product name enforcing non-empty values. Natural key within a run.",
    "product name"
);

observed_text_newtype!(
    ProductAvailability,
    "Availability status as shown on the listing, e.g. `In stock`."
);
observed_text_newtype!(
    ProductPrice,
    "Price text as shown on the listing. Compared textually, never parsed."
);
observed_text_newtype!(
    ProductLink,
    "Link to the product page. Usually absolute, may be empty."
);

/// Identifier of one acquisition run.
///
/// Identifiers are local ISO-8601 timestamps. Fixed-width formatting keeps the
/// lexicographic order equal to the chronological one, so `Ord` on the raw
/// text is the run ordering.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Wraps an existing identifier, trimming whitespace.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        trim_and_require_non_empty(value, "run id").map(Self)
    }

    /// Formats a timestamp as a run identifier.
    pub fn from_datetime(value: NaiveDateTime) -> Self {
        Self(value.format(RUN_ID_FORMAT).to_string())
    }

    /// Returns an identifier for `now` that is strictly greater than `latest`.
    ///
    /// When the clock has not moved past `latest`, the result is `latest`
    /// plus one microsecond.
    pub fn next_after(
        now: NaiveDateTime,
        latest: Option<&RunId>,
    ) -> Result<Self, TypeConstraintError> {
        let candidate = Self::from_datetime(now);
        match latest {
            Some(latest) if candidate <= *latest => {
                let previous = latest.timestamp().ok_or_else(|| {
                    TypeConstraintError::InvalidValue(format!(
                        "run id `{latest}` is not a timestamp"
                    ))
                })?;
                Ok(Self::from_datetime(previous + TimeDelta::microseconds(1)))
            }
            _ => Ok(candidate),
        }
    }

    /// Parses the identifier back into a timestamp, if it is one.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.0, RUN_ID_PARSE_FORMAT).ok()
    }

    /// Display label, `YYYY-MM-DD HH:MM:SS`, or the raw text if unparsable.
    pub fn label(&self) -> String {
        self.timestamp()
            .map(|ts| ts.format(DISPLAY_FORMAT).to_string())
            .unwrap_or_else(|| self.0.clone())
    }
}

string_newtype_common!(RunId);

impl TryFrom<String> for RunId {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for RunId {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Number of most recent runs kept by retention pruning.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct RetentionWindow(usize);

impl RetentionWindow {
    /// Ten most recent runs.
    pub const DEFAULT: Self = Self(10);

    /// Constructs a window of at least one run.
    pub fn new(value: usize) -> Result<Self, TypeConstraintError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NonPositiveNumber("retention window"))
        }
    }

    /// Returns the raw run count.
    pub const fn get(self) -> usize {
        self.0
    }
}

impl Default for RetentionWindow {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Display for RetentionWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<usize> for RetentionWindow {
    type Error = TypeConstraintError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Recurrence of the scheduled scrape.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl ScheduleFrequency {
    /// String representation used in persistence.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl Display for ScheduleFrequency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for ScheduleFrequency {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "schedule frequency: {other}"
            ))),
        }
    }
}

impl TryFrom<String> for ScheduleFrequency {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

/// Non-empty list of `HH:MM` times, persisted comma-separated.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub struct ScheduleTimes(Vec<NaiveTime>);

impl ScheduleTimes {
    /// Parses `08:00, 12:00` style input.
    pub fn parse(value: &str) -> Result<Self, TypeConstraintError> {
        let times = value
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| {
                NaiveTime::parse_from_str(t, "%H:%M")
                    .map_err(|_| TypeConstraintError::InvalidTimeOfDay(t.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if times.is_empty() {
            return Err(TypeConstraintError::EmptyString("time of day"));
        }
        Ok(Self(times))
    }

    /// Borrow the parsed times.
    pub fn times(&self) -> &[NaiveTime] {
        &self.0
    }
}

impl Display for ScheduleTimes {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let rendered = self
            .0
            .iter()
            .map(|t| t.format("%H:%M").to_string())
            .collect::<Vec<_>>();
        write!(f, "{}", rendered.join(","))
    }
}

impl TryFrom<String> for ScheduleTimes {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ScheduleTimes> for String {
    fn from(value: ScheduleTimes) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32, micro: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_micro_opt(h, m, s, micro)
            .unwrap()
    }

    #[test]
    fn trims_product_names() {
        let value = ProductName::new("  Widget  ").unwrap();
        assert_eq!(value.as_str(), "Widget");
    }

    #[test]
    fn rejects_blank_product_names() {
        let err = ProductName::new("   ").unwrap_err();
        assert_eq!(err, TypeConstraintError::EmptyString("product name"));
    }

    #[test]
    fn observed_text_allows_empty_and_compares_textually() {
        assert_eq!(ProductLink::new("").as_str(), "");
        assert_eq!(ProductAvailability::new(" In stock ").as_str(), " In stock ");
        assert!(ProductPrice::new("$10").same_as(&ProductPrice::new("$10")));
        assert!(!ProductPrice::new("$10").same_as(&ProductPrice::new(" $10 ")));
        assert!(!ProductPrice::new("$10").same_as(&ProductPrice::new("$10.00")));
    }

    #[test]
    fn rejects_non_positive_ids() {
        let err = ComparisonId::new(0).unwrap_err();
        assert_eq!(err, TypeConstraintError::NonPositiveId("comparison_id"));
    }

    #[test]
    fn run_ids_format_with_microseconds() {
        let id = RunId::from_datetime(at(10, 0, 0, 0));
        assert_eq!(id.as_str(), "2025-03-01T10:00:00.000000");
        assert_eq!(id.label(), "2025-03-01 10:00:00");
        assert_eq!(id.timestamp(), Some(at(10, 0, 0, 0)));
    }

    #[test]
    fn run_ids_order_chronologically() {
        let legacy = RunId::new("2025-03-01T10:00:00").unwrap();
        let later = RunId::from_datetime(at(10, 0, 0, 1));
        let much_later = RunId::from_datetime(at(11, 0, 0, 0));
        assert!(legacy < later);
        assert!(later < much_later);
        assert_eq!(legacy.timestamp(), Some(at(10, 0, 0, 0)));
    }

    #[test]
    fn next_run_id_is_strictly_greater_when_clock_stalls() {
        let latest = RunId::from_datetime(at(10, 0, 0, 5));
        let next = RunId::next_after(at(9, 0, 0, 0), Some(&latest)).unwrap();
        assert!(next > latest);
        assert_eq!(next.as_str(), "2025-03-01T10:00:00.000006");

        let fresh = RunId::next_after(at(12, 0, 0, 0), Some(&latest)).unwrap();
        assert_eq!(fresh, RunId::from_datetime(at(12, 0, 0, 0)));
    }

    #[test]
    fn next_run_id_rejects_unorderable_latest() {
        let latest = RunId::new("zzz").unwrap();
        assert!(RunId::next_after(at(9, 0, 0, 0), Some(&latest)).is_err());
    }

    #[test]
    fn unparsable_run_id_labels_with_raw_text() {
        assert_eq!(RunId::new("t5").unwrap().label(), "t5");
    }

    #[test]
    fn retention_window_must_be_positive() {
        assert_eq!(RetentionWindow::default().get(), 10);
        assert_eq!(
            RetentionWindow::new(0).unwrap_err(),
            TypeConstraintError::NonPositiveNumber("retention window")
        );
    }

    #[test]
    fn parses_schedule_frequency() {
        assert_eq!(
            ScheduleFrequency::try_from(" Weekly ").unwrap(),
            ScheduleFrequency::Weekly
        );
        assert!(ScheduleFrequency::try_from("hourly").is_err());
    }

    #[test]
    fn parses_schedule_times() {
        let times = ScheduleTimes::parse("08:00, 12:30,18:00").unwrap();
        assert_eq!(times.times().len(), 3);
        assert_eq!(times.to_string(), "08:00,12:30,18:00");
        assert_eq!(
            ScheduleTimes::parse("8am").unwrap_err(),
            TypeConstraintError::InvalidTimeOfDay("8am".into())
        );
        assert_eq!(
            ScheduleTimes::parse(" , ").unwrap_err(),
            TypeConstraintError::EmptyString("time of day")
        );
    }
}
