//! Small value types shared by the request and receipt paths.
//!
//! Request and response bodies stay `serde_json::Value`: the Square API
//! surface is wide and this crate does not validate schemas.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered `key=value` pairs for a query string.
///
/// Pairs come out in insertion order. Neither keys nor values are
/// percent-encoded; callers must pass values that are already URL-safe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl fmt::Display) {
        self.0.push((key.into(), value.to_string()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `?k1=v1&k2=v2`, or `None` when there are no pairs.
    pub fn to_query_string(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let joined = self
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        Some(format!("?{joined}"))
    }
}

impl<K: Into<String>, V: fmt::Display> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.push(key, value);
        }
        params
    }
}

/// Card details scraped from a payment receipt page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptInfo {
    /// Application Identifier, e.g. `A0000000031010`.
    #[serde(rename = "AID")]
    pub aid: Option<String>,
    #[serde(rename = "nameOnCard")]
    pub name_on_card: String,
}
