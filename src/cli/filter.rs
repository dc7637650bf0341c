//! Implementation selection and version filtering shared by `list` and `show`

use std::fmt;

use clap::ValueEnum;

use crate::cli::CommandError;
use crate::database::VersionDatabase;
use crate::version::{
    Clock, CPythonInfo, Level, PyPyInfo, Version, VersionCatalog, VersionInfo,
};

/// Which versions a listing keeps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    All,
    /// Supported plus not-yet-released versions
    NotEol,
    #[default]
    Released,
    Supported,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::All => "all",
            Mode::NotEol => "not-eol",
            Mode::Released => "released",
            Mode::Supported => "supported",
        }
    }

    fn requires_eol_data(&self) -> bool {
        matches!(self, Mode::NotEol | Mode::Supported)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Implementation {
    #[default]
    CPython,
    PyPy,
}

impl Implementation {
    pub fn select(self, db: &VersionDatabase) -> Info<'_> {
        match self {
            Implementation::CPython => Info::CPython(&db.cpython),
            Implementation::PyPy => Info::PyPy(&db.pypy),
        }
    }
}

/// One implementation's data, borrowed from a [`VersionDatabase`]
#[derive(Debug, Clone, Copy)]
pub enum Info<'a> {
    CPython(&'a CPythonInfo),
    PyPy(&'a PyPyInfo),
}

impl VersionInfo for Info<'_> {
    fn catalog(&self) -> &VersionCatalog {
        match self {
            Info::CPython(info) => info.catalog(),
            Info::PyPy(info) => info.catalog(),
        }
    }
}

impl Info<'_> {
    /// Every known version at `level`, released or not, in version order
    pub fn versions_at(&self, level: Level) -> Vec<Version> {
        match level {
            Level::Major => self.major_versions().into_iter().map(Version::from).collect(),
            Level::Minor => self.minor_versions().into_iter().map(Version::from).collect(),
            Level::Micro => self.micro_versions().into_iter().map(Version::from).collect(),
        }
    }

    /// Keep the members of `versions` that satisfy `mode`, preserving order
    ///
    /// EOL-based modes fail on implementations without EOL data, even when
    /// `versions` is empty.
    pub fn filter(
        &self,
        mode: Mode,
        versions: Vec<Version>,
        clock: &dyn Clock,
    ) -> Result<Vec<Version>, CommandError> {
        if mode.requires_eol_data() && matches!(self, Info::PyPy(_)) {
            return Err(CommandError::CPythonOnly(mode));
        }

        let mut kept = Vec::with_capacity(versions.len());
        for version in versions {
            let keep = match (mode, self) {
                (Mode::All, _) => true,
                (Mode::Released, _) => self.is_released(&version, clock)?,
                (Mode::Supported, Info::CPython(info)) => info.is_supported(&version, clock)?,
                (Mode::NotEol, Info::CPython(info)) => !info.is_eol(&version, clock)?,
                (_, Info::PyPy(_)) => return Err(CommandError::CPythonOnly(mode)),
            };
            if keep {
                kept.push(version);
            }
        }
        Ok(kept)
    }
}
