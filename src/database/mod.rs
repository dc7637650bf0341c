//! Loading the version database from a file or over HTTP
//!
//! The document is validated in full before anything is built; a document
//! with a single bad key or value yields an error and no database.

pub mod cache;
pub mod error;
pub mod fetch;
mod raw;

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::database::error::DatabaseError;
use crate::database::fetch::Fetcher;
use crate::database::raw::{RawDatabase, parse_timestamp};
use crate::version::{CPythonInfo, PyPyInfo};

/// Where to read the version document from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
}

impl DataSource {
    /// `http://` and `https://` strings (any case) are URLs, everything else
    /// is a file path
    pub fn parse(s: &str) -> Self {
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(s.to_string())
        } else {
            DataSource::File(PathBuf::from(s))
        }
    }
}

/// Release information for every supported Python implementation
#[derive(Debug, Clone, PartialEq)]
pub struct VersionDatabase {
    /// When the document was last updated
    pub last_modified: DateTime<Utc>,
    pub cpython: CPythonInfo,
    pub pypy: PyPyInfo,
}

impl VersionDatabase {
    pub fn from_json_str(s: &str) -> Result<Self, DatabaseError> {
        let raw: RawDatabase = serde_json::from_str(s)?;
        Self::from_raw(raw)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatabaseError> {
        let raw: RawDatabase = serde_json::from_reader(reader)?;
        Self::from_raw(raw)
    }

    pub fn from_file(path: &Path) -> Result<Self, DatabaseError> {
        debug!("Reading version database from {:?}", path);
        let file = std::fs::File::open(path).map_err(|source| DatabaseError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub async fn load(source: &DataSource, fetcher: &Fetcher) -> Result<Self, DatabaseError> {
        match source {
            DataSource::File(path) => Self::from_file(path),
            DataSource::Url(url) => {
                let body = fetcher.fetch(url).await?;
                Self::from_json_str(&body)
            }
        }
    }

    fn from_raw(raw: RawDatabase) -> Result<Self, DatabaseError> {
        let last_modified = parse_timestamp(&raw.last_modified)?;
        debug!(
            "Loaded {} CPython and {} PyPy releases (last modified {})",
            raw.cpython.release_dates.len(),
            raw.pypy.release_dates.len(),
            last_modified
        );
        Ok(Self {
            last_modified,
            cpython: CPythonInfo::new(raw.cpython.release_dates, raw.cpython.eol_dates),
            pypy: PyPyInfo::new(raw.pypy.release_dates, raw.pypy.cpython_versions),
        })
    }
}
