//! Dotted version identifiers with one, two or three numeric components
//!
//! Each arity is its own type, so a major version can never be compared
//! against a micro version by accident. [`Version`] is the parsed form of an
//! arbitrary user-supplied string when its level is not known up front.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::version::error::VersionError;

/// Granularity of a version identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Major,
    Minor,
    Micro,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Major => "major",
            Level::Minor => "minor",
            Level::Micro => "micro",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "major" => Ok(Level::Major),
            "minor" => Ok(Level::Minor),
            "micro" => Ok(Level::Micro),
            other => Err(format!("unknown version level: {other}")),
        }
    }
}

/// A major version such as `3`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MajorVersion {
    pub major: u64,
}

/// A minor version (series) such as `3.9`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MinorVersion {
    pub major: u64,
    pub minor: u64,
}

/// A micro version such as `3.9.1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MicroVersion {
    pub major: u64,
    pub minor: u64,
    pub micro: u64,
}

impl MajorVersion {
    pub fn new(major: u64) -> Self {
        Self { major }
    }

    pub fn with_minor(self, minor: u64) -> MinorVersion {
        MinorVersion::new(self.major, minor)
    }
}

impl MinorVersion {
    pub fn new(major: u64, minor: u64) -> Self {
        Self { major, minor }
    }

    pub fn major_version(&self) -> MajorVersion {
        MajorVersion::new(self.major)
    }

    pub fn with_micro(self, micro: u64) -> MicroVersion {
        MicroVersion::new(self.major, self.minor, micro)
    }
}

impl MicroVersion {
    pub fn new(major: u64, minor: u64, micro: u64) -> Self {
        Self {
            major,
            minor,
            micro,
        }
    }

    /// The series this release belongs to
    pub fn minor_version(&self) -> MinorVersion {
        MinorVersion::new(self.major, self.minor)
    }
}

/// Split `s` on dots and convert every segment to an integer.
///
/// Segments must be non-empty runs of ASCII digits; signs, whitespace and
/// suffixes such as `rc1` are rejected.
fn parse_components(s: &str) -> Option<Vec<u64>> {
    s.split('.')
        .map(|segment| {
            if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            segment.parse().ok()
        })
        .collect()
}

impl FromStr for MajorVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_components(s).as_deref() {
            Some(&[x]) => Ok(Self::new(x)),
            _ => Err(VersionError::InvalidLevelString {
                level: Level::Major,
                input: s.to_string(),
            }),
        }
    }
}

impl FromStr for MinorVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_components(s).as_deref() {
            Some(&[x, y]) => Ok(Self::new(x, y)),
            _ => Err(VersionError::InvalidLevelString {
                level: Level::Minor,
                input: s.to_string(),
            }),
        }
    }
}

impl FromStr for MicroVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_components(s).as_deref() {
            Some(&[x, y, z]) => Ok(Self::new(x, y, z)),
            _ => Err(VersionError::InvalidLevelString {
                level: Level::Micro,
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for MajorVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.major)
    }
}

impl fmt::Display for MinorVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl fmt::Display for MicroVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)
    }
}

// Identifiers travel through JSON as their dotted string form.
macro_rules! impl_string_serde {
    ($($ty:ty),+) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.collect_str(self)
                }
            }

            impl<'de> Deserialize<'de> for $ty {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    let s = String::deserialize(deserializer)?;
                    s.parse().map_err(de::Error::custom)
                }
            }
        )+
    };
}

impl_string_serde!(MajorVersion, MinorVersion, MicroVersion, Version);

/// A version identifier of any level
///
/// There is no ordering between identifiers of different levels, so this
/// type is not `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Version {
    Major(MajorVersion),
    Minor(MinorVersion),
    Micro(MicroVersion),
}

impl Version {
    pub fn level(&self) -> Level {
        match self {
            Version::Major(_) => Level::Major,
            Version::Minor(_) => Level::Minor,
            Version::Micro(_) => Level::Micro,
        }
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_components(s).as_deref() {
            Some(&[x]) => Ok(Version::Major(MajorVersion::new(x))),
            Some(&[x, y]) => Ok(Version::Minor(MinorVersion::new(x, y))),
            Some(&[x, y, z]) => Ok(Version::Micro(MicroVersion::new(x, y, z))),
            _ => Err(VersionError::InvalidVersionString(s.to_string())),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::Major(v) => fmt::Display::fmt(v, f),
            Version::Minor(v) => fmt::Display::fmt(v, f),
            Version::Micro(v) => fmt::Display::fmt(v, f),
        }
    }
}

impl From<MajorVersion> for Version {
    fn from(v: MajorVersion) -> Self {
        Version::Major(v)
    }
}

impl From<MinorVersion> for Version {
    fn from(v: MinorVersion) -> Self {
        Version::Minor(v)
    }
}

impl From<MicroVersion> for Version {
    fn from(v: MicroVersion) -> Self {
        Version::Micro(v)
    }
}
