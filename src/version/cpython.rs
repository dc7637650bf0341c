//! CPython versions: release dates plus per-series end-of-life tracking

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::version::catalog::{VersionCatalog, VersionInfo};
use crate::version::date::{Clock, EolStatus, ReleaseDate};
use crate::version::error::VersionError;
use crate::version::identifier::{MajorVersion, MicroVersion, MinorVersion, Version};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CPythonInfo {
    catalog: VersionCatalog,
    eol_dates: HashMap<MinorVersion, EolStatus>,
}

impl CPythonInfo {
    pub fn new(
        release_dates: HashMap<MicroVersion, ReleaseDate>,
        eol_dates: HashMap<MinorVersion, EolStatus>,
    ) -> Self {
        Self {
            catalog: VersionCatalog::new(release_dates),
            eol_dates,
        }
    }

    fn series_eol(&self, series: MinorVersion, requested: &Version) -> Result<EolStatus, VersionError> {
        self.eol_dates
            .get(&series)
            .copied()
            .ok_or_else(|| VersionError::unknown(requested))
    }

    /// A major version is only end-of-life once every one of its series is,
    /// and then takes the status of its last series.
    fn major_eol(&self, major: MajorVersion, clock: &dyn Clock) -> Result<EolStatus, VersionError> {
        let requested = Version::Major(major);
        let series = self
            .catalog
            .trie()
            .minors_under(major)
            .map_err(|_| VersionError::unknown(requested))?;

        let today = clock.today();
        let mut last = EolStatus::NotYetEol;
        for minor in series {
            let status = self.series_eol(minor, &requested)?;
            if !status.is_eol_on(today) {
                return Ok(EolStatus::NotYetEol);
            }
            last = status;
        }
        Ok(last)
    }

    /// End-of-life status of `version` as recorded in the dataset
    ///
    /// Micro versions share the status of their series. The result for a
    /// major version depends on `clock`, see [`CPythonInfo::is_eol`].
    pub fn eol_status(&self, version: &Version, clock: &dyn Clock) -> Result<EolStatus, VersionError> {
        match version {
            Version::Major(v) => self.major_eol(*v, clock),
            Version::Minor(v) => self.series_eol(*v, version),
            Version::Micro(v) => self.series_eol(v.minor_version(), version),
        }
    }

    /// `None` both when no end-of-life has been scheduled and when the
    /// version is end-of-life on an unrecorded date; use
    /// [`CPythonInfo::is_eol`] to tell them apart.
    pub fn eol_date(&self, version: &Version, clock: &dyn Clock) -> Result<Option<NaiveDate>, VersionError> {
        Ok(self.eol_status(version, clock)?.date())
    }

    pub fn is_eol(&self, version: &Version, clock: &dyn Clock) -> Result<bool, VersionError> {
        Ok(self.eol_status(version, clock)?.is_eol_on(clock.today()))
    }

    /// Whether `version` currently receives updates
    ///
    /// - micro: released, and its series is not end-of-life
    /// - minor: not end-of-life, and at least one micro release is out
    /// - major: at least one of its series is supported
    pub fn is_supported(&self, version: &Version, clock: &dyn Clock) -> Result<bool, VersionError> {
        match version {
            Version::Major(_) => {
                for minor in self.subversions(version)? {
                    if self.is_supported(&minor, clock)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Version::Minor(_) => {
                if self.is_eol(version, clock)? {
                    return Ok(false);
                }
                for micro in self.subversions(version)? {
                    if self.is_released(&micro, clock)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Version::Micro(v) => {
                // Series first: a micro of an EOL series is unsupported even
                // when the micro itself is not in the dataset.
                let series_eol = self.series_eol(v.minor_version(), version)?;
                if series_eol.is_eol_on(clock.today()) {
                    return Ok(false);
                }
                self.is_released(version, clock)
            }
        }
    }

    /// Every series that has had a release and is not yet end-of-life, in
    /// version order
    pub fn supported_series(&self, clock: &dyn Clock) -> Result<Vec<MinorVersion>, VersionError> {
        let mut supported = Vec::new();
        for minor in self.minor_versions() {
            let series = Version::Minor(minor);
            if self.is_released(&series, clock)? && !self.is_eol(&series, clock)? {
                supported.push(minor);
            }
        }
        Ok(supported)
    }
}

impl VersionInfo for CPythonInfo {
    fn catalog(&self) -> &VersionCatalog {
        &self.catalog
    }
}
