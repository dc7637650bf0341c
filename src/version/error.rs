use thiserror::Error;

use crate::version::identifier::Level;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("Invalid version string: '{0}'")]
    InvalidVersionString(String),

    #[error("Invalid {level} version: '{input}'")]
    InvalidLevelString { level: Level, input: String },

    #[error("{0}")]
    InvalidOperation(String),

    /// The version is well-formed but absent from the loaded database.
    ///
    /// A later reload of the database (after new releases are announced) may
    /// know about it, so callers should not treat this as permanent.
    #[error("Unknown version: '{0}'")]
    UnknownVersion(String),
}

impl VersionError {
    pub fn unknown(version: impl ToString) -> Self {
        Self::UnknownVersion(version.to_string())
    }

    /// Whether retrying against a freshly fetched database could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::UnknownVersion(_))
    }
}
