//! Core types for the TLD dataset builder.
//!
//! This crate provides the foundational types shared across the workspace:
//!
//! - **Types**: the canonical [`TldRecord`], its nameserver [`IpRecord`]s, the
//!   published [`Dataset`] wrapper, and the shapes of the inbound sources
//! - **Errors**: a single [`TldError`] with a [`Result`] alias
//!
//! # Example
//!
//! ```rust,ignore
//! use tld_core::{Dataset, TldRecord};
//!
//! fn count_cctlds(dataset: &Dataset) -> usize {
//!     dataset.tlds.iter().filter(|r| r.kind.is_country_code()).count()
//! }
//! ```

mod error;
pub mod types;

pub use error::{Result, TldError};
pub use types::*;
