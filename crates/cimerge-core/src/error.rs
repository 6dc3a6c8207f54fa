//! Error types for cimerge.

use thiserror::Error;

use crate::env::EnvError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Env(#[from] EnvError),

    #[error("missing required setting: {0}")]
    MissingSetting(&'static str),

    #[error("invalid value for {field}: {message}")]
    InvalidSetting { field: &'static str, message: String },

    #[error("invalid remote url: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;
