// src/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Formatter responded with status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// `status` is set when the body belonged to a response that arrived.
    #[error("Could not read response body: {reason}")]
    BodyRead { status: Option<u16>, reason: String },

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid form: {0}")]
    InvalidForm(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown format '{0}', expected one of: default, wtc, rus")]
    UnknownFormat(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

impl From<serde_json::Error> for SubmitError {
    fn from(err: serde_json::Error) -> Self {
        SubmitError::BodyRead {
            status: None,
            reason: err.to_string(),
        }
    }
}

impl From<arboard::Error> for SubmitError {
    fn from(err: arboard::Error) -> Self {
        SubmitError::Clipboard(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SubmitError>;
