//! Three-level index of known micro versions: major -> minor -> [micro]

use std::collections::BTreeMap;

use crate::version::error::VersionError;
use crate::version::identifier::{MajorVersion, MicroVersion, MinorVersion};

/// Ordered index of every micro version known for one implementation
///
/// Keys at both map levels iterate in ascending numeric order and every
/// micro list is ascending and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionTrie {
    nodes: BTreeMap<u64, BTreeMap<u64, Vec<u64>>>,
}

impl VersionTrie {
    pub fn new<I>(versions: I) -> Self
    where
        I: IntoIterator<Item = MicroVersion>,
    {
        let mut sorted: Vec<MicroVersion> = versions.into_iter().collect();
        sorted.sort_unstable();
        sorted.dedup();

        let mut nodes: BTreeMap<u64, BTreeMap<u64, Vec<u64>>> = BTreeMap::new();
        for v in sorted {
            nodes
                .entry(v.major)
                .or_default()
                .entry(v.minor)
                .or_default()
                .push(v.micro);
        }

        Self { nodes }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, version: MicroVersion) -> bool {
        self.micros_under(version.minor_version())
            .is_ok_and(|micros| micros.binary_search(&version.micro).is_ok())
    }

    pub fn majors(&self) -> impl Iterator<Item = MajorVersion> + '_ {
        self.nodes.keys().map(|&x| MajorVersion::new(x))
    }

    pub fn minors(&self) -> impl Iterator<Item = MinorVersion> + '_ {
        self.nodes
            .iter()
            .flat_map(|(&x, minors)| minors.keys().map(move |&y| MinorVersion::new(x, y)))
    }

    pub fn micros(&self) -> impl Iterator<Item = MicroVersion> + '_ {
        self.nodes.iter().flat_map(|(&x, minors)| {
            minors.iter().flat_map(move |(&y, micros)| {
                micros.iter().map(move |&z| MicroVersion::new(x, y, z))
            })
        })
    }

    fn minor_node(&self, major: MajorVersion) -> Result<&BTreeMap<u64, Vec<u64>>, VersionError> {
        self.nodes
            .get(&major.major)
            .ok_or_else(|| VersionError::unknown(major))
    }

    /// Micro components recorded under `minor`, ascending
    pub fn micros_under(&self, minor: MinorVersion) -> Result<&[u64], VersionError> {
        self.minor_node(minor.major_version())
            .ok()
            .and_then(|minors| minors.get(&minor.minor))
            .map(Vec::as_slice)
            .ok_or_else(|| VersionError::unknown(minor))
    }

    pub fn minors_under(&self, major: MajorVersion) -> Result<Vec<MinorVersion>, VersionError> {
        let minors = self.minor_node(major)?;
        Ok(minors.keys().map(|&y| major.with_minor(y)).collect())
    }

    pub fn micro_versions_under_minor(
        &self,
        minor: MinorVersion,
    ) -> Result<Vec<MicroVersion>, VersionError> {
        let micros = self.micros_under(minor)?;
        Ok(micros.iter().map(|&z| minor.with_micro(z)).collect())
    }

    pub fn micro_versions_under_major(
        &self,
        major: MajorVersion,
    ) -> Result<Vec<MicroVersion>, VersionError> {
        let minors = self.minor_node(major)?;
        Ok(minors
            .iter()
            .flat_map(|(&y, micros)| micros.iter().map(move |&z| MicroVersion::new(major.major, y, z)))
            .collect())
    }

    /// The first release of a major version: its smallest minor and that
    /// minor's smallest micro
    pub fn first_micro_under_major(&self, major: MajorVersion) -> Result<MicroVersion, VersionError> {
        self.minor_node(major)?
            .iter()
            .next()
            .and_then(|(&y, micros)| micros.first().map(|&z| MicroVersion::new(major.major, y, z)))
            .ok_or_else(|| VersionError::unknown(major))
    }

    pub fn first_micro_under_minor(&self, minor: MinorVersion) -> Result<MicroVersion, VersionError> {
        self.micros_under(minor)?
            .first()
            .map(|&z| minor.with_micro(z))
            .ok_or_else(|| VersionError::unknown(minor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn micro(s: &str) -> MicroVersion {
        s.parse().unwrap()
    }

    fn trie(versions: &[&str]) -> VersionTrie {
        VersionTrie::new(versions.iter().map(|s| micro(s)))
    }

    #[test]
    fn new_orders_keys_numerically_regardless_of_input_order() {
        let t = trie(&["3.10.0", "2.7.18", "3.9.1", "3.9.0", "2.7.2", "2.7.10", "10.0.0"]);

        let majors: Vec<String> = t.majors().map(|v| v.to_string()).collect();
        assert_eq!(majors, vec!["2", "3", "10"]);

        let minors: Vec<String> = t.minors().map(|v| v.to_string()).collect();
        assert_eq!(minors, vec!["2.7", "3.9", "3.10", "10.0"]);

        let micros: Vec<String> = t.micros().map(|v| v.to_string()).collect();
        assert_eq!(
            micros,
            vec!["2.7.2", "2.7.10", "2.7.18", "3.9.0", "3.9.1", "3.10.0", "10.0.0"]
        );
    }

    #[test]
    fn new_deduplicates_repeated_versions() {
        let t = trie(&["3.9.1", "3.9.1", "3.9.0"]);
        assert_eq!(t.micros().count(), 2);
        assert_eq!(t.micros_under(MinorVersion::new(3, 9)).unwrap(), &[0, 1]);
    }

    #[test]
    fn every_micro_lands_in_exactly_one_bucket() {
        let input = ["0.9.0", "0.9.1", "1.0.0", "1.0.4", "3.7.0", "3.7.4", "3.8.0"];
        let t = trie(&input);

        for v in input.iter().map(|s| micro(s)) {
            let bucket = t.micro_versions_under_minor(v.minor_version()).unwrap();
            assert_eq!(bucket.iter().filter(|&&m| m == v).count(), 1);
            assert!(t.contains(v));
        }

        let total: usize = t
            .minors()
            .map(|m| t.micros_under(m).unwrap().len())
            .sum();
        assert_eq!(total, input.len());
    }

    #[rstest]
    #[case("2", "2.0.1")]
    #[case("3", "3.1.0")]
    fn first_micro_under_major_uses_smallest_minor_then_micro(
        #[case] major: &str,
        #[case] expected: &str,
    ) {
        let t = trie(&["2.1.0", "2.0.2", "2.0.1", "3.2.0", "3.1.5", "3.1.0"]);
        assert_eq!(
            t.first_micro_under_major(major.parse().unwrap()).unwrap(),
            micro(expected)
        );
    }

    #[test]
    fn first_micro_under_minor_returns_smallest_micro() {
        let t = trie(&["3.6.8", "3.6.0", "3.6.10"]);
        assert_eq!(
            t.first_micro_under_minor(MinorVersion::new(3, 6)).unwrap(),
            micro("3.6.0")
        );
    }

    #[test]
    fn lookups_of_absent_paths_fail_with_unknown_version() {
        let t = trie(&["3.8.0"]);

        assert_eq!(
            t.minors_under(MajorVersion::new(4)),
            Err(VersionError::UnknownVersion("4".into()))
        );
        assert_eq!(
            t.micros_under(MinorVersion::new(3, 9)),
            Err(VersionError::UnknownVersion("3.9".into()))
        );
        assert_eq!(
            t.micros_under(MinorVersion::new(4, 0)),
            Err(VersionError::UnknownVersion("4.0".into()))
        );
        assert_eq!(
            t.first_micro_under_major(MajorVersion::new(5)),
            Err(VersionError::UnknownVersion("5".into()))
        );
        assert!(!t.contains(micro("3.8.1")));
    }

    #[test]
    fn micro_versions_under_major_spans_all_minors() {
        let t = trie(&["7.3.1", "7.0.0", "7.3.0", "8.0.0"]);
        let micros: Vec<String> = t
            .micro_versions_under_major(MajorVersion::new(7))
            .unwrap()
            .iter()
            .map(|v| v.to_string())
            .collect();
        assert_eq!(micros, vec!["7.0.0", "7.3.0", "7.3.1"]);
    }

    #[test]
    fn empty_trie_has_no_versions() {
        let t = VersionTrie::default();
        assert!(t.is_empty());
        assert_eq!(t.majors().count(), 0);
    }
}
