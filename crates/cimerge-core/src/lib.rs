//! Core types shared by the cimerge CI helpers.
//!
//! This crate contains:
//! - The explicit environment context handed to every operation
//! - Merge workflow settings and their defaults
//! - The aggregate error type

pub mod env;
pub mod error;
pub mod settings;

pub use env::{EnvError, EnvResult, Environment};
pub use error::{Error, Result};
pub use settings::MergeSettings;
