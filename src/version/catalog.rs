//! Release-date catalog shared by every Python implementation

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::version::date::{Clock, ReleaseDate};
use crate::version::error::VersionError;
use crate::version::identifier::{MajorVersion, MicroVersion, MinorVersion, Version};
use crate::version::trie::VersionTrie;

/// Known micro versions of one implementation and their release dates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersionCatalog {
    release_dates: HashMap<MicroVersion, ReleaseDate>,
    trie: VersionTrie,
}

impl VersionCatalog {
    pub fn new(release_dates: HashMap<MicroVersion, ReleaseDate>) -> Self {
        let trie = VersionTrie::new(release_dates.keys().copied());
        debug!("Indexed {} micro versions", release_dates.len());
        Self {
            release_dates,
            trie,
        }
    }

    pub fn trie(&self) -> &VersionTrie {
        &self.trie
    }

    pub fn major_versions(&self) -> Vec<MajorVersion> {
        self.trie.majors().collect()
    }

    pub fn minor_versions(&self) -> Vec<MinorVersion> {
        self.trie.minors().collect()
    }

    pub fn micro_versions(&self) -> Vec<MicroVersion> {
        self.trie.micros().collect()
    }

    /// Direct children of `version`: the minors of a major, or the micros of
    /// a minor
    pub fn subversions(&self, version: &Version) -> Result<Vec<Version>, VersionError> {
        match version {
            Version::Major(v) => Ok(self
                .trie
                .minors_under(*v)?
                .into_iter()
                .map(Version::from)
                .collect()),
            Version::Minor(v) => Ok(self
                .trie
                .micro_versions_under_minor(*v)?
                .into_iter()
                .map(Version::from)
                .collect()),
            Version::Micro(v) => Err(VersionError::InvalidOperation(format!(
                "Micro versions do not have subversions: '{v}'"
            ))),
        }
    }

    /// The micro version whose release marks the release of `version`
    pub fn first_release(&self, version: &Version) -> Result<MicroVersion, VersionError> {
        let resolved = match version {
            Version::Major(v) => self.trie.first_micro_under_major(*v),
            Version::Minor(v) => self.trie.first_micro_under_minor(*v),
            Version::Micro(v) => Ok(*v),
        };
        resolved.map_err(|_| VersionError::unknown(version))
    }

    pub fn raw_release_date(&self, version: &Version) -> Result<ReleaseDate, VersionError> {
        let micro = self.first_release(version)?;
        self.release_dates
            .get(&micro)
            .copied()
            .ok_or_else(|| VersionError::unknown(version))
    }

    pub fn release_date(&self, version: &Version) -> Result<Option<NaiveDate>, VersionError> {
        Ok(self.raw_release_date(version)?.date())
    }

    /// Evaluated against `clock` on every call; results are not cached.
    pub fn is_released(&self, version: &Version, clock: &dyn Clock) -> Result<bool, VersionError> {
        Ok(self.raw_release_date(version)?.is_released_on(clock.today()))
    }
}

/// Listing and release queries common to every implementation's database
pub trait VersionInfo {
    fn catalog(&self) -> &VersionCatalog;

    fn major_versions(&self) -> Vec<MajorVersion> {
        self.catalog().major_versions()
    }

    fn minor_versions(&self) -> Vec<MinorVersion> {
        self.catalog().minor_versions()
    }

    fn micro_versions(&self) -> Vec<MicroVersion> {
        self.catalog().micro_versions()
    }

    fn subversions(&self, version: &Version) -> Result<Vec<Version>, VersionError> {
        self.catalog().subversions(version)
    }

    fn release_date(&self, version: &Version) -> Result<Option<NaiveDate>, VersionError> {
        self.catalog().release_date(version)
    }

    fn is_released(&self, version: &Version, clock: &dyn Clock) -> Result<bool, VersionError> {
        self.catalog().is_released(version, clock)
    }
}

impl VersionInfo for VersionCatalog {
    fn catalog(&self) -> &VersionCatalog {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::date::{FixedClock, MockClock};
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn v(s: &str) -> Version {
        s.parse().unwrap()
    }

    fn catalog() -> VersionCatalog {
        let entries = [
            ("0.9.0", ReleaseDate::Known(date(1991, 2, 20))),
            ("0.9.1", ReleaseDate::Known(date(1991, 2, 21))),
            ("0.9.2", ReleaseDate::UnknownDate),
            ("3.7.0", ReleaseDate::Known(date(2018, 6, 27))),
            ("3.7.4", ReleaseDate::Known(date(2019, 6, 24))),
            ("3.8.0", ReleaseDate::Known(date(2019, 10, 21))),
            ("4.0.0", ReleaseDate::NotYetReleased),
        ];
        VersionCatalog::new(
            entries
                .into_iter()
                .map(|(s, d)| (s.parse().unwrap(), d))
                .collect(),
        )
    }

    fn strings(versions: impl IntoIterator<Item = impl ToString>) -> Vec<String> {
        versions.into_iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn listings_include_unreleased_versions_in_order() {
        let c = catalog();
        assert_eq!(strings(c.major_versions()), vec!["0", "3", "4"]);
        assert_eq!(strings(c.minor_versions()), vec!["0.9", "3.7", "3.8", "4.0"]);
        assert_eq!(
            strings(c.micro_versions()),
            vec!["0.9.0", "0.9.1", "0.9.2", "3.7.0", "3.7.4", "3.8.0", "4.0.0"]
        );
    }

    #[rstest]
    #[case("3", vec!["3.7", "3.8"])]
    #[case("3.7", vec!["3.7.0", "3.7.4"])]
    #[case("4.0", vec!["4.0.0"])]
    fn subversions_lists_direct_children(#[case] version: &str, #[case] expected: Vec<&str>) {
        assert_eq!(strings(catalog().subversions(&v(version)).unwrap()), expected);
    }

    #[test]
    fn subversions_contains_every_micro_of_its_parent() {
        let c = catalog();
        for micro in c.micro_versions() {
            let subs = c.subversions(&micro.minor_version().into()).unwrap();
            assert!(subs.contains(&Version::Micro(micro)));
        }
    }

    #[test]
    fn subversions_of_micro_is_invalid_operation() {
        let err = catalog().subversions(&v("3.7.4")).unwrap_err();
        assert_eq!(
            err,
            VersionError::InvalidOperation("Micro versions do not have subversions: '3.7.4'".into())
        );
        assert!(!err.is_transient());
    }

    #[rstest]
    #[case("0.8")]
    #[case("3.9")]
    #[case("5")]
    fn subversions_of_unknown_version_fails(#[case] version: &str) {
        assert_eq!(
            catalog().subversions(&v(version)),
            Err(VersionError::UnknownVersion(version.into()))
        );
    }

    #[rstest]
    #[case("0", Some(date(1991, 2, 20)))]
    #[case("0.9", Some(date(1991, 2, 20)))]
    #[case("0.9.1", Some(date(1991, 2, 21)))]
    #[case("0.9.2", None)]
    #[case("3", Some(date(2018, 6, 27)))]
    #[case("3.8", Some(date(2019, 10, 21)))]
    #[case("4", None)]
    fn release_date_resolves_to_first_micro(#[case] version: &str, #[case] expected: Option<NaiveDate>) {
        assert_eq!(catalog().release_date(&v(version)).unwrap(), expected);
    }

    #[rstest]
    #[case("0.8")]
    #[case("3.7.3")]
    #[case("3.9.0")]
    #[case("5")]
    fn release_date_of_unknown_version_fails(#[case] version: &str) {
        let err = catalog().release_date(&v(version)).unwrap_err();
        assert_eq!(err, VersionError::UnknownVersion(version.into()));
        assert!(err.is_transient());
    }

    #[rstest]
    #[case("0", true)]
    #[case("0.9.2", true)]
    #[case("3.7", true)]
    #[case("3.7.4", false)]
    #[case("3.8", false)]
    #[case("4", false)]
    #[case("4.0.0", false)]
    fn is_released_compares_first_release_with_today(#[case] version: &str, #[case] expected: bool) {
        let clock = FixedClock(date(2019, 4, 23));
        assert_eq!(catalog().is_released(&v(version), &clock).unwrap(), expected);
    }

    #[test]
    fn is_released_reads_the_clock_on_every_call() {
        let mut clock = MockClock::new();
        let mut days = vec![date(2019, 6, 24), date(2019, 6, 23)];
        clock.expect_today().times(2).returning(move || days.pop().unwrap());

        let c = catalog();
        assert!(!c.is_released(&v("3.7.4"), &clock).unwrap());
        assert!(c.is_released(&v("3.7.4"), &clock).unwrap());
    }
}
