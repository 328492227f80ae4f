//! Error types for the Square Connect client.
//!
//! # Design
//! Every operation completes with one `SquareResult`. Transport failures are
//! carried through untouched; any non-200 status becomes a `NormalizedError`,
//! which is the one failure shape callers inspect for API errors.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transport::TransportError;

pub type SquareResult<T> = Result<T, SquareError>;

/// Errors returned by the client and the response handler.
#[derive(Debug, Error)]
pub enum SquareError {
    /// The request never produced an HTTP response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The API answered with a status other than 200.
    #[error("{0}")]
    Http(NormalizedError),

    /// A 200 response whose body is not the expected JSON.
    #[error("failed to decode response body: {0}")]
    Parse(#[source] serde_json::Error),

    /// A request payload could not be turned into JSON.
    #[error("failed to encode request body: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl SquareError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// HTTP status of a normalized API error.
    pub fn status_code(&self) -> Option<u16> {
        self.as_normalized().map(|e| e.status_code)
    }

    pub fn as_normalized(&self) -> Option<&NormalizedError> {
        match self {
            Self::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NormalizedError> for SquareError {
    fn from(err: NormalizedError) -> Self {
        Self::Http(err)
    }
}

/// Uniform shape of a non-200 response.
///
/// Displays as its JSON text, e.g. `{"statusCode":404,"message":"Not Found"}`.
/// `body` only exists when the client was built with extended debug info.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedError {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl fmt::Display for NormalizedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl std::error::Error for NormalizedError {}
