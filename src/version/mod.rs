//! In-memory version database for CPython and PyPy
//!
//! Everything here is built once from a loaded document and only read
//! afterwards. Time-dependent answers (released, end-of-life, supported) are
//! computed against a [`Clock`] supplied by the caller on every query.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ identifier  │────▶│    trie     │────▶│   catalog   │
//! │ (parse/cmp) │     │  (index)    │     │(release qry)│
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                           │        │
//!                                           ▼        ▼
//!                                    ┌─────────┐ ┌─────────┐
//!                                    │ cpython │ │  pypy   │
//!                                    │  (EOL)  │ │(mapping)│
//!                                    └─────────┘ └─────────┘
//! ```
//!
//! # Modules
//!
//! - [`identifier`]: major / minor / micro version types
//! - [`trie`]: ordered major -> minor -> micro index
//! - [`date`]: release dates, EOL status and the [`Clock`] trait
//! - [`catalog`]: listing and release queries shared by both implementations
//! - [`cpython`]: end-of-life and support queries
//! - [`pypy`]: CPython correspondence queries
//! - [`error`]: [`VersionError`]

pub mod catalog;
pub mod cpython;
pub mod date;
pub mod error;
pub mod identifier;
pub mod pypy;
pub mod trie;

pub use catalog::{VersionCatalog, VersionInfo};
pub use cpython::CPythonInfo;
pub use date::{Clock, EolStatus, FixedClock, ReleaseDate, SystemClock};
pub use error::VersionError;
pub use identifier::{Level, MajorVersion, MicroVersion, MinorVersion, Version};
pub use pypy::PyPyInfo;
pub use trie::VersionTrie;
