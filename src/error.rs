//! Error handling for the resume ranker

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Vectorization error: {0}")]
    Vectorization(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RankerError>;

/// Invalid synonym or phrase patterns surface as configuration problems
impl From<regex::Error> for RankerError {
    fn from(err: regex::Error) -> Self {
        RankerError::Configuration(format!("invalid pattern: {}", err))
    }
}
