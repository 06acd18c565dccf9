// src/response.rs
use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;

use crate::errors::{Result, SubmitError};

/// How a successful response body is interpreted. Chosen by configuration,
/// never guessed from the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseMode {
    /// The body is the formatted roster as plain text.
    Text,
    /// The body is a JSON object with `info` and `debug` strings.
    #[default]
    Json,
}

impl std::str::FromStr for ResponseMode {
    type Err = SubmitError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(ResponseMode::Text),
            "json" => Ok(ResponseMode::Json),
            other => Err(SubmitError::Config(format!(
                "Response mode must be 'text' or 'json', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseMode::Text => write!(f, "text"),
            ResponseMode::Json => write!(f, "json"),
        }
    }
}

/// JSON reply of the formatter.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FormatterReply {
    pub info: String,
    #[serde(default)]
    pub debug: String,
}

impl FormatterReply {
    /// Debug output split into lines. An empty `debug` yields nothing.
    pub fn debug_lines(&self) -> impl Iterator<Item = &str> {
        self.debug.lines()
    }
}

/// Status and full text of a response in the success range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// A successfully decoded response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    Text(String),
    Json(FormatterReply),
}

impl ResponseBody {
    pub fn decode(mode: ResponseMode, text: String) -> Result<Self> {
        match mode {
            ResponseMode::Text => Ok(ResponseBody::Text(text)),
            ResponseMode::Json => Ok(ResponseBody::Json(serde_json::from_str(&text)?)),
        }
    }

    /// Text that belongs in the output region.
    pub fn display_text(&self) -> &str {
        match self {
            ResponseBody::Text(text) => text,
            ResponseBody::Json(reply) => &reply.info,
        }
    }
}

/// Result of one submission, produced once and rendered once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(ResponseBody),
    Failure {
        /// HTTP status when a response was received.
        status: Option<u16>,
        message: String,
    },
}

impl Outcome {
    /// Classifies what a transport returned. Errors never escape: every error
    /// becomes a `Failure` with a message fit for the output region.
    pub fn classify(mode: ResponseMode, result: Result<Reply>) -> Self {
        let reply = match result {
            Ok(reply) => reply,
            Err(err) => return Outcome::from_error(mode, err),
        };

        match ResponseBody::decode(mode, reply.body) {
            Ok(body) => Outcome::Success(body),
            Err(err) => Outcome::Failure {
                status: Some(reply.status),
                message: err.to_string(),
            },
        }
    }

    pub fn from_error(mode: ResponseMode, err: SubmitError) -> Self {
        match err {
            SubmitError::HttpStatus { status, body } => Outcome::Failure {
                status: Some(status),
                message: failure_message(mode, status, &body),
            },
            err @ SubmitError::BodyRead { status, .. } => Outcome::Failure {
                status,
                message: err.to_string(),
            },
            other => Outcome::Failure {
                status: None,
                message: other.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn display_text(&self) -> &str {
        match self {
            Outcome::Success(body) => body.display_text(),
            Outcome::Failure { message, .. } => message,
        }
    }
}

/// Picks the best message available for an error response: the `info` of a
/// JSON error body, the raw body, or the status line when the body is empty.
fn failure_message(mode: ResponseMode, status: u16, body: &str) -> String {
    if body.trim().is_empty() {
        let reason = StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or("Unknown Status");
        return format!("HTTP {} {}", status, reason);
    }

    if mode == ResponseMode::Json {
        if let Ok(reply) = serde_json::from_str::<FormatterReply>(body) {
            return reply.info;
        }
    }

    body.to_string()
}
