// SPDX-License-Identifier: MPL-2.0
use crate::application::port::ApiError;
use thiserror::Error;

/// Crate-level error for setup paths (config, client construction).
///
/// Store operations never return this: backend failures there are logged
/// and swallowed.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config Error: {0}")]
    Config(String),

    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("API Error: {0}")]
    Api(#[from] ApiError),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
