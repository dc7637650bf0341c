//! Detail report for a single version, in text or JSON form

use std::io::Write;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::cli::CommandError;
use crate::cli::filter::{Info, Mode};
use crate::version::{Clock, Version, VersionInfo};

#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Text(String),
    Date(Option<NaiveDate>),
    Flag(bool),
    List(Vec<String>),
}

impl Field {
    fn list<T: ToString>(items: &[T]) -> Self {
        Field::List(items.iter().map(ToString::to_string).collect())
    }

    fn render(&self) -> String {
        match self {
            Field::Text(s) => s.clone(),
            Field::Date(Some(d)) => d.format("%Y-%m-%d").to_string(),
            Field::Date(None) => "UNKNOWN".to_string(),
            Field::Flag(true) => "yes".to_string(),
            Field::Flag(false) => "no".to_string(),
            Field::List(items) => items.join(", "),
        }
    }
}

impl Serialize for Field {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Text(s) => serializer.serialize_str(s),
            Field::Date(Some(d)) => serializer.collect_str(&d.format("%Y-%m-%d")),
            Field::Date(None) => serializer.serialize_none(),
            Field::Flag(b) => serializer.serialize_bool(*b),
            Field::List(items) => items.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    key: &'static str,
    label: &'static str,
    value: Field,
}

/// Ordered set of facts about one version
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    entries: Vec<Entry>,
}

impl Report {
    pub fn build(
        info: Info<'_>,
        version: &Version,
        subversions: Mode,
        clock: &dyn Clock,
    ) -> Result<Self, CommandError> {
        let mut report = Report {
            entries: Vec::new(),
        };
        report.push("version", "Version", Field::Text(version.to_string()));
        report.push("level", "Level", Field::Text(version.level().to_string()));
        report.push("release_date", "Release-Date", Field::Date(info.release_date(version)?));
        report.push("is_released", "Is-Released", Field::Flag(info.is_released(version, clock)?));

        if let Info::CPython(cpython) = info {
            report.push(
                "is_supported",
                "Is-Supported",
                Field::Flag(cpython.is_supported(version, clock)?),
            );
            report.push("eol_date", "EOL-Date", Field::Date(cpython.eol_date(version, clock)?));
            report.push("is_eol", "Is-EOL", Field::Flag(cpython.is_eol(version, clock)?));
        }

        match version {
            Version::Major(_) | Version::Minor(_) => {
                let children = info.filter(subversions, info.subversions(version)?, clock)?;
                report.push("subversions", "Subversions", Field::list(&children));
                if let Info::PyPy(pypy) = info {
                    let released = subversions == Mode::Released;
                    let series = pypy.supported_cpython_series(version, released, clock)?;
                    report.push("cpython_series", "CPython-Series", Field::list(&series));
                }
            }
            Version::Micro(micro) => {
                if let Info::PyPy(pypy) = info {
                    let cpythons = pypy.supported_cpython(micro)?;
                    report.push("cpython", "CPython", Field::list(cpythons));
                }
            }
        }

        Ok(report)
    }

    fn push(&mut self, key: &'static str, label: &'static str, value: Field) {
        self.entries.push(Entry { key, label, value });
    }

    pub fn get(&self, key: &str) -> Option<&Field> {
        self.entries.iter().find(|e| e.key == key).map(|e| &e.value)
    }

    pub fn write_text(&self, out: &mut dyn Write) -> Result<(), CommandError> {
        for entry in &self.entries {
            writeln!(out, "{}: {}", entry.label, entry.value.render())?;
        }
        Ok(())
    }

    /// One JSON object, keys in report order, indented by four spaces
    pub fn write_json(&self, out: &mut dyn Write) -> Result<(), CommandError> {
        let object: IndexMap<&str, &Field> =
            self.entries.iter().map(|e| (e.key, &e.value)).collect();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut *out, PrettyFormatter::with_indent(b"    "));
        object.serialize(&mut serializer)?;
        writeln!(out)?;
        Ok(())
    }
}
