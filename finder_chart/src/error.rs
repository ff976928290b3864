use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or writing a finder chart.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error(transparent)]
    Survey(#[from] skysurvey::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigFile(#[from] common::SerdeFormatError),

    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("Failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ChartError>;
