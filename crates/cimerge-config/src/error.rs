//! Configuration reading errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("no section: '{0}'")]
    MissingSection(String),

    #[error("no option '{key}' in section '{section}'")]
    MissingKey { section: String, key: String },

    #[error("bad interpolation in [{section}] {key}: {message}")]
    Interpolation {
        section: String,
        key: String,
        message: String,
    },

    #[error("interpolation too deep in [{section}] {key}")]
    InterpolationDepth { section: String, key: String },

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
