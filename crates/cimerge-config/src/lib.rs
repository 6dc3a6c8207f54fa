//! Package configuration reading for the cimerge CI helpers.
//!
//! This crate handles:
//! - Parsing sectioned `key = value` documents (the project's `Cargo.toml`)
//! - `${key}` / `${section:key}` interpolation
//! - The conventional package lookups used by CI scripts

pub mod document;
pub mod error;
mod interpolation;
pub mod package;
pub mod reader;

pub use document::{ConfigDocument, DEFAULT_SECTION};
pub use error::{ConfigError, ConfigResult};
pub use package::{PackageSummary, get_app_name, get_package_summary};
pub use reader::{read_configuration, with_configuration};
