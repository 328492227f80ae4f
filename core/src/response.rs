//! Decides success or failure for a transport outcome.
//!
//! Only status 200 counts as success. Every other status is folded into a
//! `NormalizedError`; transport failures pass through without one.

use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{NormalizedError, SquareError, SquareResult};
use crate::http::HttpResponse;
use crate::transport::TransportError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseHandler {
    extended_debug_info: bool,
}

impl ResponseHandler {
    /// With `extended_debug_info`, normalized errors carry the raw response body.
    pub fn new(extended_debug_info: bool) -> Self {
        Self { extended_debug_info }
    }

    /// Decode a 200 body as JSON into `T`. An empty body is a parse error.
    pub fn handle<T: DeserializeOwned>(&self, outcome: Result<HttpResponse, TransportError>) -> SquareResult<T> {
        let body = self.handle_bytes(outcome)?;
        serde_json::from_slice(&body).map_err(SquareError::Parse)
    }

    /// Return a 200 body as text, without decoding it.
    pub fn handle_raw(&self, outcome: Result<HttpResponse, TransportError>) -> SquareResult<String> {
        let body = self.handle_bytes(outcome)?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Return a 200 body as bytes.
    pub fn handle_bytes(&self, outcome: Result<HttpResponse, TransportError>) -> SquareResult<Vec<u8>> {
        let response = outcome?;
        if response.status != 200 {
            return Err(SquareError::Http(self.normalize(&response)));
        }
        Ok(response.body)
    }

    pub fn normalize(&self, response: &HttpResponse) -> NormalizedError {
        let message = if response.status_text.is_empty() {
            http::StatusCode::from_u16(response.status)
                .ok()
                .and_then(|status| status.canonical_reason())
                .unwrap_or_default()
                .to_string()
        } else {
            response.status_text.clone()
        };

        NormalizedError {
            status_code: response.status,
            message,
            body: self
                .extended_debug_info
                .then(|| response.text().into_owned()),
        }
    }
}

impl From<&ClientConfig> for ResponseHandler {
    fn from(config: &ClientConfig) -> Self {
        Self::new(config.extended_debug_info())
    }
}
