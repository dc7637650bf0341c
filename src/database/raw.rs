//! Serde shapes of the published JSON document
//!
//! Keys are parsed at the level they must have, so a release-date table
//! keyed by `"3.7"` is rejected here instead of surfacing later as an
//! unknown version.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::database::error::DatabaseError;
use crate::version::{EolStatus, MicroVersion, MinorVersion, ReleaseDate};

#[derive(Debug, Deserialize)]
pub(crate) struct RawDatabase {
    pub last_modified: String,
    pub cpython: RawCPython,
    pub pypy: RawPyPy,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCPython {
    pub release_dates: HashMap<MicroVersion, ReleaseDate>,
    pub eol_dates: HashMap<MinorVersion, EolStatus>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPyPy {
    pub release_dates: HashMap<MicroVersion, ReleaseDate>,
    pub cpython_versions: HashMap<MicroVersion, Vec<MicroVersion>>,
}

/// RFC 3339 with an offset, or a naive ISO 8601 timestamp taken as UTC
pub(crate) fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| DatabaseError::InvalidTimestamp(s.to_string()))
}
