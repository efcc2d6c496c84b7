//! Failure taxonomy of a fetch cycle.
//!
//! Every way a refresh can fail ends up as one [`CycleError`]. The variants keep
//! the technical detail for the diagnostic log, while [`CycleError::user_message`]
//! collapses them into the short categorical text shown on the status line.

use thiserror::Error;

/// Status text for a missing or placeholder credential.
pub const API_KEY_MESSAGE: &str = "API key not configured";

/// Status text for every other failure kind.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to load data";

#[derive(Error, Debug)]
pub enum CycleError {
    /// The credential is empty or still the placeholder sentinel.
    #[error("API key is not configured; set NEWS_API_KEY or pass --api-key")]
    Configuration,

    /// The request never produced a response (DNS, connect, timeout, body read).
    #[error("network request failed: {0}")]
    Network(String),

    /// The provider answered with a non-2xx status.
    #[error("HTTP error! status: {0}")]
    HttpStatus(u16),

    /// The body was not JSON or had no `articles` array.
    #[error("malformed response body: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CycleError {
    /// Short tag used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            CycleError::Configuration => "configuration",
            CycleError::Network(_) => "network",
            CycleError::HttpStatus(_) => "http_status",
            CycleError::Parse(_) => "parse",
        }
    }

    /// Categorical message for the status line.
    ///
    /// Configuration problems get their own text; network, status and parse
    /// failures all read the same to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            CycleError::Configuration => API_KEY_MESSAGE,
            _ => GENERIC_FAILURE_MESSAGE,
        }
    }
}

pub type CycleResult<T> = Result<T, CycleError>;
