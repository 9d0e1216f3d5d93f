//! Hash-based load balancing strategy.

use std::borrow::Cow;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostic;
use crate::load_balancer::{digest, leading_u64, Pick, UpstreamTarget};
use crate::routing::matcher::{normalize_host, path_without_query};
use crate::simulation::request::SimulatedRequest;

/// Request attribute hashed by `hash` balancing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HashKey {
    #[default]
    Path,
    Host,
    Method,
    ClientIp,
    /// Header value, by lowercase name.
    Header(String),
}

impl FromStr for HashKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "path" => Ok(HashKey::Path),
            "host" => Ok(HashKey::Host),
            "method" => Ok(HashKey::Method),
            "client_ip" => Ok(HashKey::ClientIp),
            other => match other.strip_prefix("header:") {
                Some(name) if !name.trim().is_empty() => {
                    Ok(HashKey::Header(name.trim().to_ascii_lowercase()))
                }
                _ => Err(format!(
                    "unknown hash key '{}'; expected path, host, method, client_ip or header:<name>",
                    s
                )),
            },
        }
    }
}

impl TryFrom<String> for HashKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HashKey> for String {
    fn from(key: HashKey) -> Self {
        key.to_string()
    }
}

impl std::fmt::Display for HashKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashKey::Path => f.write_str("path"),
            HashKey::Host => f.write_str("host"),
            HashKey::Method => f.write_str("method"),
            HashKey::ClientIp => f.write_str("client_ip"),
            HashKey::Header(name) => write!(f, "header:{}", name),
        }
    }
}

impl HashKey {
    /// Extract the key's value from the request, if present.
    ///
    /// Path, host and method are normalized the way the route matcher sees
    /// them, so requests that match the same route also hash alike.
    pub fn value<'a>(&self, request: &'a SimulatedRequest) -> Option<Cow<'a, str>> {
        match self {
            HashKey::Path => Some(Cow::Borrowed(path_without_query(&request.path))),
            HashKey::Host => Some(Cow::Owned(normalize_host(&request.host))),
            HashKey::Method => Some(Cow::Owned(request.method_upper())),
            HashKey::ClientIp => request.client_ip.as_deref().map(Cow::Borrowed),
            HashKey::Header(name) => request.headers.get(name).map(Cow::Borrowed),
        }
    }
}

pub fn select(targets: &[UpstreamTarget], key: &HashKey, request: &SimulatedRequest) -> Pick {
    let mut warnings = Vec::new();
    let value = key.value(request).unwrap_or_else(|| {
        warnings.push(Diagnostic::warning(
            "hash_key_missing",
            format!("hash key {} is absent from the request; hashing an empty value", key),
        ));
        Cow::Borrowed("")
    });

    let bucket = leading_u64(&digest(&[value.as_ref()])) % targets.len() as u64;
    // bucket < targets.len(), which is a usize
    let index = bucket as usize;

    Pick {
        index,
        reason: format!(
            "hash of {} ({:?}) -> bucket {} of {}",
            key,
            value,
            index + 1,
            targets.len()
        ),
        warnings,
    }
}
