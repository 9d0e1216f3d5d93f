//! Simulated request model.
//!
//! # Responsibilities
//! - Carry the routing-relevant parts of a hypothetical request
//! - Normalize header names so lookups are case-insensitive
//! - Build empty-header request templates for callers to fill in
//!
//! # Design Decisions
//! - Header names are stored lowercase; the last write for a name wins
//! - No validation beyond well-formedness; odd methods simply fail to match

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Request headers with case-insensitive names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HeaderMap(BTreeMap<String, String>);

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, replacing any previous value for the same name.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.0
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for HeaderMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = HeaderMap::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

impl<'de> Deserialize<'de> for HeaderMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct HeaderMapVisitor;

        impl<'de> Visitor<'de> for HeaderMapVisitor {
            type Value = HeaderMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of header names to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut headers = HeaderMap::new();
                // Entries arrive in document order, so later duplicates win.
                while let Some((name, value)) = access.next_entry::<String, String>()? {
                    headers.insert(name, value);
                }
                Ok(headers)
            }
        }

        deserializer.deserialize_map(HeaderMapVisitor)
    }
}

/// One hypothetical incoming request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulatedRequest {
    pub method: String,
    pub host: String,
    pub path: String,

    #[serde(default)]
    pub headers: HeaderMap,

    /// Client address, used only by `client_ip` hash balancing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<String>,
}

/// A request skeleton handed to callers, who fill in headers.
pub type RequestTemplate = SimulatedRequest;

impl SimulatedRequest {
    pub fn new(method: &str, host: &str, path: &str) -> Self {
        Self {
            method: method.to_string(),
            host: host.to_string(),
            path: path.to_string(),
            headers: HeaderMap::new(),
            client_ip: None,
        }
    }

    /// Parse a request from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Method in canonical (upper) case.
    pub fn method_upper(&self) -> String {
        self.method.to_ascii_uppercase()
    }
}

/// Build a request template with empty headers.
pub fn create_sample_request(method: &str, host: &str, path: &str) -> RequestTemplate {
    SimulatedRequest::new(method, host, path)
}
