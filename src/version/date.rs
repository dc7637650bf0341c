//! Release and end-of-life dates, and the clock they are judged against
//!
//! The dataset records each date either as a literal `YYYY-MM-DD` string or
//! as a boolean standing in for a date that is not known. Both enums below
//! make that distinction explicit so a flag can never be mistaken for a
//! date.

use std::fmt;

use chrono::NaiveDate;
#[cfg(test)]
use mockall::automock;
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Source of "today" for every time-dependent predicate
#[cfg_attr(test, automock)]
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Reads the local calendar date on every call
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Always reports the same date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// When a version was (or will be) released
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseDate {
    /// Released, or scheduled for release, on this date
    Known(NaiveDate),
    /// Known to have been released, but the date was never recorded
    UnknownDate,
    /// Announced but not released, and no date has been set
    NotYetReleased,
}

impl ReleaseDate {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            ReleaseDate::Known(d) => Some(*d),
            ReleaseDate::UnknownDate | ReleaseDate::NotYetReleased => None,
        }
    }

    /// A missing date on a released version still counts as released.
    pub fn is_released_on(&self, today: NaiveDate) -> bool {
        match self {
            ReleaseDate::Known(d) => *d <= today,
            ReleaseDate::UnknownDate => true,
            ReleaseDate::NotYetReleased => false,
        }
    }
}

/// End-of-life state of a version series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EolStatus {
    /// Still maintained and no end date has been decided
    NotYetEol,
    /// Already end-of-life, date unknown
    EolUnknownDate,
    /// End-of-life on this date (which may be in the future)
    EolOn(NaiveDate),
}

impl EolStatus {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            EolStatus::EolOn(d) => Some(*d),
            EolStatus::NotYetEol | EolStatus::EolUnknownDate => None,
        }
    }

    pub fn is_eol_on(&self, today: NaiveDate) -> bool {
        match self {
            EolStatus::EolOn(d) => *d <= today,
            EolStatus::EolUnknownDate => true,
            EolStatus::NotYetEol => false,
        }
    }
}

/// Raw `date | true | false` value as it appears in the JSON document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateOrFlag {
    Date(NaiveDate),
    Flag(bool),
}

struct DateOrFlagVisitor;

impl Visitor<'_> for DateOrFlagVisitor {
    type Value = DateOrFlag;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a YYYY-MM-DD date string or a boolean")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(DateOrFlag::Flag(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        NaiveDate::parse_from_str(v, DATE_FORMAT)
            .map(DateOrFlag::Date)
            .map_err(|e| E::custom(format!("invalid date {v:?}: {e}")))
    }
}

impl<'de> Deserialize<'de> for ReleaseDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match deserializer.deserialize_any(DateOrFlagVisitor)? {
            DateOrFlag::Date(d) => ReleaseDate::Known(d),
            DateOrFlag::Flag(true) => ReleaseDate::UnknownDate,
            DateOrFlag::Flag(false) => ReleaseDate::NotYetReleased,
        })
    }
}

impl<'de> Deserialize<'de> for EolStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match deserializer.deserialize_any(DateOrFlagVisitor)? {
            DateOrFlag::Date(d) => EolStatus::EolOn(d),
            DateOrFlag::Flag(true) => EolStatus::EolUnknownDate,
            DateOrFlag::Flag(false) => EolStatus::NotYetEol,
        })
    }
}
