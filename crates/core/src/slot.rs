//! # Slots
//!
//! A slot is a single bookable instant in a shared schedule. Slots are local
//! timestamps: no timezone is attached and none is ever applied, so the value
//! the operator typed is the value that gets stored and shown to patients.
//!
//! The canonical text form is `YYYY-MM-DDTHH:MM:SS`, which is also the JSON
//! representation.

use std::{fmt, str::FromStr, sync::LazyLock};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Canonical slot format used for display, JSON and query strings.
pub const SLOT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

static TIME_INPUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01][0-9]|2[0-3]):([0-5][0-9])$").expect("valid time regex"));

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotInputError {
    #[error("Select a date for the slot")]
    MissingDate,

    #[error("Enter a time for the slot")]
    MissingTime,

    #[error("Invalid time '{0}', expected HH:mm")]
    InvalidTime(String),

    #[error("Invalid slot timestamp '{0}', expected YYYY-MM-DDTHH:MM:SS")]
    InvalidTimestamp(String),
}

/// Parses operator time input. Only `HH:mm` with hour 00-23 and minute 00-59
/// is accepted; surrounding whitespace is not.
pub fn parse_time_input(text: &str) -> Result<NaiveTime, SlotInputError> {
    let captures = TIME_INPUT
        .captures(text)
        .ok_or_else(|| SlotInputError::InvalidTime(text.to_string()))?;

    let hour: u32 = captures[1]
        .parse()
        .map_err(|_| SlotInputError::InvalidTime(text.to_string()))?;
    let minute: u32 = captures[2]
        .parse()
        .map_err(|_| SlotInputError::InvalidTime(text.to_string()))?;

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| SlotInputError::InvalidTime(text.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot(NaiveDateTime);

impl Slot {
    pub fn new(at: NaiveDateTime) -> Self {
        Self(at)
    }

    /// Builds a slot from the wizard's date picker and time text fields.
    pub fn from_input(date: Option<NaiveDate>, time: &str) -> Result<Self, SlotInputError> {
        let date = date.ok_or(SlotInputError::MissingDate)?;
        if time.is_empty() {
            return Err(SlotInputError::MissingTime);
        }
        let time = parse_time_input(time)?;
        Ok(Self(date.and_time(time)))
    }

    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }
}

impl From<NaiveDateTime> for Slot {
    fn from(at: NaiveDateTime) -> Self {
        Self(at)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(SLOT_FORMAT))
    }
}

impl FromStr for Slot {
    type Err = SlotInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDateTime::parse_from_str(s, SLOT_FORMAT)
            .map(Self)
            .map_err(|_| SlotInputError::InvalidTimestamp(s.to_string()))
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Slot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
