//! Client configuration.
//!
//! A `ClientConfig` is built once and then owned by the client; nothing
//! mutates it afterwards.

use std::env;
use std::fmt;

use crate::error::{SquareError, SquareResult};

/// Square Connect API host.
pub const API_HOST: &str = "https://connect.squareup.com";

/// Credentials and switches for one Square location.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    location_id: String,
    access_token: String,
    extended_debug_info: bool,
    api_host: String,
}

impl ClientConfig {
    pub fn new(location_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            location_id: location_id.into(),
            access_token: access_token.into(),
            extended_debug_info: false,
            api_host: API_HOST.to_string(),
        }
    }

    /// Read configuration from the environment.
    ///
    /// - `SQUARE_LOCATION_ID` (required)
    /// - `SQUARE_ACCESS_TOKEN` (required)
    /// - `SQUARE_EXTENDED_DEBUG`: `1` or `true` echoes error bodies
    /// - `SQUARE_API_HOST`: overrides [`API_HOST`]
    pub fn from_env() -> SquareResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> SquareResult<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| SquareError::config(format!("missing environment variable {key}")))
        };

        let mut config = Self::new(required("SQUARE_LOCATION_ID")?, required("SQUARE_ACCESS_TOKEN")?);
        if let Some(flag) = lookup("SQUARE_EXTENDED_DEBUG") {
            config.extended_debug_info = matches!(flag.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(host) = lookup("SQUARE_API_HOST") {
            config = config.with_api_host(host);
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_extended_debug_info(mut self, enabled: bool) -> Self {
        self.extended_debug_info = enabled;
        self
    }

    /// Point the client at another host, e.g. a local fake of the API.
    #[must_use]
    pub fn with_api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = host.into().trim_end_matches('/').to_string();
        self
    }

    pub fn location_id(&self) -> &str {
        &self.location_id
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn extended_debug_info(&self) -> bool {
        self.extended_debug_info
    }

    pub fn api_host(&self) -> &str {
        &self.api_host
    }
}

// Keeps the access token out of logs and panic messages.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("location_id", &self.location_id)
            .field("access_token", &"<redacted>")
            .field("extended_debug_info", &self.extended_debug_info)
            .field("api_host", &self.api_host)
            .finish()
    }
}
