//! # tld-cli
//!
//! Command-line interface for the TLD dataset.
//!
//! ## Commands
//!
//! - **build**: aggregate the downloaded sources into `tlds.json`
//! - **download**: refresh the machine-readable sources with conditional requests
//! - **lookup**: resolve IP addresses against the iptoasn table
//! - **show**: print one record of the generated dataset
//! - **config**: inspect the effective configuration

pub mod cli;
pub mod config;
pub mod output;

pub use cli::run;
