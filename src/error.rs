use thiserror::Error;

/// Raised when the model's response cannot be turned into a record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("missing JSON block")]
    MissingJsonBlock,

    #[error("invalid JSON: {details}")]
    InvalidJson { details: String },
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Invalid month label '{0}': expected \"Tháng N\" with N between 1 and 12")]
    InvalidMonth(String),

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "gemini")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
