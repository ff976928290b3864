use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while resolving a target or retrieving its cutout.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to parse sky coordinate '{input}': {reason}")]
    CoordinateParse { input: String, reason: String },

    #[error("Field of view must be positive and finite, got {arcmin} arcmin")]
    InvalidFieldOfView { arcmin: f64 },

    #[error("Invalid service URL '{0}'")]
    InvalidUrl(String),

    #[error("HTTP request to '{url}' failed: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    #[error("Survey service returned {status} for URL {url}")]
    ServiceStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Malformed FITS data: {0}")]
    MalformedFits(String),

    #[error("cfitsio failed on '{path}': {message}")]
    Fits { path: PathBuf, message: String },

    #[error("Failed to read file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn coordinate(input: &str, reason: impl Into<String>) -> Self {
        Error::CoordinateParse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
