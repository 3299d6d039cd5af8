//! Aggregation and enrichment engine for the TLD dataset.
//!
//! Turns the independently published TLD registries into one record per TLD.
//!
//! ## Data Flow
//!
//! ```text
//! Sources::load()          read every source once, build the RangeIndex
//!   -> build_record()      one record per root zone entry, merged by precedence
//!   -> link_idn_variants() attach IDN ccTLDs to their ASCII ccTLD
//!   -> write_if_changed()  persist only when non-volatile content differs
//! ```
//!
//! Everything except the final write is in-memory and synchronous.

pub mod analyze;
pub mod asn;
pub mod builder;
pub mod config;
pub mod country;
pub mod crossref;
pub mod persist;
pub mod pipeline;
pub mod sources;

pub use asn::{RangeEntry, RangeIndex};
pub use builder::build_record;
pub use config::BuildPaths;
pub use crossref::link_idn_variants;
pub use persist::{write_if_changed, WriteOutcome, WriteStatus};
pub use pipeline::{build, BuildSummary};
pub use sources::Sources;
pub use tld_core::{Result, TldError};
