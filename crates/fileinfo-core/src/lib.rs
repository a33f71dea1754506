//! Core types, configuration, and error handling for fileinfo.
//!
//! This crate provides the shared foundation used by the other fileinfo crates:
//! - [`FileinfoError`] — unified error type using `thiserror`
//! - [`FileinfoConfig`] — configuration loaded from `.fileinfo.toml`
//! - Shared output types: [`MetricRecord`], [`FileFinding`], [`OutputFormat`]

mod config;
mod error;
mod types;

pub use config::{ChurnConfig, FileinfoConfig, ScanConfig};
pub use error::FileinfoError;
pub use types::{FileFinding, MetricRecord, OutputFormat, FINDING_ID};

/// A convenience `Result` type for fileinfo operations.
pub type Result<T> = std::result::Result<T, FileinfoError>;
