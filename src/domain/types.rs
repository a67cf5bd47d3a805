//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (trimmed non-empty identifiers,
//! a closed set of categories, calendar-only birth dates) so that once a
//! value reaches the domain layer it can be sent to the remote API as is.
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Date format used on the wire and in every rendered table.
pub const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Category was neither `A` nor `B`.
    #[error("invalid category: {0}")]
    InvalidCategory(String),
    /// Date could not be read as a calendar date.
    #[error("invalid date: {0}")]
    InvalidDate(String),
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let trimmed = value.into().trim().to_string();
                if trimmed.is_empty() {
                    return Err(TypeConstraintError::EmptyString);
                }
                Ok(Self(trimmed))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

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

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(
    RecordKey,
    "Server-assigned key addressing a stored member (`_id` on the wire)."
);

non_empty_string_newtype!(
    MemberIdNo,
    "Member identification number, unique within the directory."
);

non_empty_string_newtype!(MemberName, "Full name of a member.");

non_empty_string_newtype!(
    MemberPhone,
    "Contact phone number, kept verbatim apart from trimming."
);

/// Free-text postal address with unsafe markup removed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PresentAddress(String);

impl PresentAddress {
    /// Sanitizes and trims the address; empty input yields `None`.
    pub fn parse<S: Into<String>>(value: S) -> Option<Self> {
        let sanitized = ammonia::clean(&value.into());
        let trimmed = sanitized.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PresentAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the two member categories known to the directory.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B")]
    B,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::A, Category::B];

    pub const fn as_str(self) -> &'static str {
        match self {
            Category::A => "A",
            Category::B => "B",
        }
    }

    /// Reads an optional filter value where an empty string means "unset".
    pub fn parse_filter(value: &str) -> Result<Option<Self>, TypeConstraintError> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == "-" {
            Ok(None)
        } else {
            trimmed.parse().map(Some)
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Category::A),
            "B" | "b" => Ok(Category::B),
            other => Err(TypeConstraintError::InvalidCategory(other.to_string())),
        }
    }
}

/// Calendar date of birth, always rendered as `YYYY-MM-DD`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BirthDate(NaiveDate);

impl BirthDate {
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parses a plain date or an ISO timestamp, keeping only the date part.
    ///
    /// Timestamps carrying an offset are read in their own offset, so
    /// `2000-01-01T00:00:00.000Z` stays on January 1st.
    pub fn parse(value: &str) -> Result<Self, TypeConstraintError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, BIRTH_DATE_FORMAT) {
            return Ok(Self(date));
        }
        if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(stamp.date_naive()));
        }
        if let Ok(stamp) = trimmed.parse::<NaiveDateTime>() {
            return Ok(Self(stamp.date()));
        }
        Err(TypeConstraintError::InvalidDate(trimmed.to_string()))
    }

    /// Like [`BirthDate::parse`] but treats blank input as "no date".
    pub fn parse_optional(value: &str) -> Result<Option<Self>, TypeConstraintError> {
        if value.trim().is_empty() {
            Ok(None)
        } else {
            Self::parse(value).map(Some)
        }
    }

    pub const fn date(self) -> NaiveDate {
        self.0
    }
}

impl Display for BirthDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(BIRTH_DATE_FORMAT))
    }
}

impl FromStr for BirthDate {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for BirthDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BirthDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
