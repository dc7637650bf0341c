//! PyPy versions: release dates plus the CPython versions each release
//! implements

use std::collections::{BTreeSet, HashMap};

use crate::version::catalog::{VersionCatalog, VersionInfo};
use crate::version::date::{Clock, ReleaseDate};
use crate::version::error::VersionError;
use crate::version::identifier::{MicroVersion, MinorVersion, Version};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PyPyInfo {
    catalog: VersionCatalog,
    cpython_versions: HashMap<MicroVersion, Vec<MicroVersion>>,
}

impl PyPyInfo {
    pub fn new(
        release_dates: HashMap<MicroVersion, ReleaseDate>,
        cpython_versions: HashMap<MicroVersion, Vec<MicroVersion>>,
    ) -> Self {
        let cpython_versions = cpython_versions
            .into_iter()
            .map(|(pypy, mut cpythons)| {
                cpythons.sort_unstable();
                (pypy, cpythons)
            })
            .collect();
        Self {
            catalog: VersionCatalog::new(release_dates),
            cpython_versions,
        }
    }

    /// CPython micro versions implemented by the PyPy micro version
    /// `version`, in version order
    pub fn supported_cpython(&self, version: &MicroVersion) -> Result<&[MicroVersion], VersionError> {
        self.cpython_versions
            .get(version)
            .map(Vec::as_slice)
            .ok_or_else(|| VersionError::unknown(version))
    }

    /// Distinct CPython series implemented by `version` or any of its
    /// subversions, in version order
    ///
    /// With `released` set, only PyPy micro versions that are out according
    /// to `clock` contribute. The CPython versions themselves are never
    /// filtered.
    pub fn supported_cpython_series(
        &self,
        version: &Version,
        released: bool,
        clock: &dyn Clock,
    ) -> Result<Vec<MinorVersion>, VersionError> {
        let trie = self.catalog.trie();
        let micros = match version {
            Version::Major(v) => trie.micro_versions_under_major(*v),
            Version::Minor(v) => trie.micro_versions_under_minor(*v),
            Version::Micro(v) => Ok(vec![*v]),
        }
        .map_err(|_| VersionError::unknown(version))?;

        let mut series = BTreeSet::new();
        for micro in micros {
            if released {
                let is_out = self
                    .is_released(&micro.into(), clock)
                    .map_err(|_| VersionError::unknown(version))?;
                if !is_out {
                    continue;
                }
            }
            let cpythons = self
                .cpython_versions
                .get(&micro)
                .ok_or_else(|| VersionError::unknown(version))?;
            series.extend(cpythons.iter().map(MicroVersion::minor_version));
        }
        Ok(series.into_iter().collect())
    }
}

impl VersionInfo for PyPyInfo {
    fn catalog(&self) -> &VersionCatalog {
        &self.catalog
    }
}
