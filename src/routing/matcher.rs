//! Route predicate evaluation.
//!
//! # Responsibilities
//! - Match method membership (case-insensitive)
//! - Match host patterns: exact, `*.suffix` wildcard, `*` (case-insensitive)
//! - Match exact paths with `*` single-segment wildcards, and path prefixes
//! - Match header presence or exact header values
//! - Explain every pass or failure in plain words
//!
//! # Design Decisions
//! - Predicates are a closed enum; evaluation is an exhaustive match
//! - Empty predicate set = always matches (wildcard)
//! - Evaluation short-circuits at the first failing predicate
//! - No regex to guarantee O(n) matching

use crate::simulation::request::SimulatedRequest;

/// Outcome of evaluating one predicate or a whole predicate set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass(String),
    Fail(String),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass(_))
    }

    pub fn reason(&self) -> &str {
        match self {
            Verdict::Pass(reason) | Verdict::Fail(reason) => reason,
        }
    }
}

/// Host pattern, compiled from its config form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostPattern {
    /// `*`
    Any,
    /// `*.example.com`: any subdomain of the suffix, not the apex.
    Suffix(String),
    /// `example.com`
    Exact(String),
}

impl HostPattern {
    /// Compile a host pattern. Misplaced wildcards end up as `Exact` and are
    /// reported by config validation.
    pub fn parse(raw: &str) -> Self {
        let host = raw.trim().to_ascii_lowercase();
        if host == "*" {
            HostPattern::Any
        } else if let Some(suffix) = host.strip_prefix("*.") {
            HostPattern::Suffix(suffix.to_string())
        } else {
            HostPattern::Exact(host)
        }
    }

    pub fn matches(&self, host: &str) -> bool {
        let host = normalize_host(host);
        match self {
            HostPattern::Any => true,
            HostPattern::Suffix(suffix) => host
                .strip_suffix(suffix.as_str())
                .is_some_and(|label| label.len() > 1 && label.ends_with('.')),
            HostPattern::Exact(expected) => host == *expected,
        }
    }
}

impl std::fmt::Display for HostPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostPattern::Any => f.write_str("*"),
            HostPattern::Suffix(suffix) => write!(f, "*.{}", suffix),
            HostPattern::Exact(host) => f.write_str(host),
        }
    }
}

/// Host as routing sees it: port dropped, lowercased.
pub fn normalize_host(host: &str) -> String {
    strip_port(host.trim()).to_ascii_lowercase()
}

/// Path as routing sees it: query string and fragment dropped.
pub fn path_without_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

/// Drop a trailing `:port` from a host, leaving IPv6 literals intact.
fn strip_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        return match rest.find(']') {
            Some(end) => &host[..end + 2],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if !name.contains(':') && port.chars().all(|c| c.is_ascii_digit()) => {
            name
        }
        _ => host,
    }
}

/// Exact path pattern where a `*` segment matches any single segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
}

impl PathPattern {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, path: &str) -> bool {
        let path = path_without_query(path);
        if !self.raw.contains('*') {
            return path == self.raw;
        }
        let expected: Vec<&str> = self.raw.split('/').collect();
        let actual: Vec<&str> = path.split('/').collect();
        expected.len() == actual.len()
            && expected
                .iter()
                .zip(&actual)
                .all(|(e, a)| *e == *a || (*e == "*" && !a.is_empty()))
    }
}

/// Header predicate: presence, or presence with an exact value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderPredicate {
    /// Lowercase header name.
    pub name: String,
    pub value: Option<String>,
}

/// A single route predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Allowed methods, upper-cased, in declaration order.
    Method(Vec<String>),
    Host(HostPattern),
    Path(PathPattern),
    PathPrefix(String),
    Header(HeaderPredicate),
}

impl Predicate {
    pub fn evaluate(&self, request: &SimulatedRequest) -> Verdict {
        match self {
            Predicate::Method(allowed) => {
                let method = request.method_upper();
                let set = format!("{{{}}}", allowed.join(","));
                if allowed.is_empty() {
                    Verdict::Fail("method set is empty {}; route can never match".to_string())
                } else if allowed.iter().any(|m| *m == method) {
                    Verdict::Pass(format!("method {} in {}", method, set))
                } else {
                    Verdict::Fail(format!("method {} not in allowed set {}", method, set))
                }
            }
            Predicate::Host(pattern) => {
                if pattern.matches(&request.host) {
                    Verdict::Pass(format!("host {} matches {}", request.host, pattern))
                } else {
                    Verdict::Fail(format!(
                        "host {} does not match {}",
                        request.host, pattern
                    ))
                }
            }
            Predicate::Path(pattern) => {
                if pattern.matches(&request.path) {
                    Verdict::Pass(format!("path {} matches {}", request.path, pattern.as_str()))
                } else {
                    Verdict::Fail(format!(
                        "path {} does not match {}",
                        request.path,
                        pattern.as_str()
                    ))
                }
            }
            Predicate::PathPrefix(prefix) => {
                if path_without_query(&request.path).starts_with(prefix.as_str()) {
                    Verdict::Pass(format!("path {} has prefix {}", request.path, prefix))
                } else {
                    Verdict::Fail(format!(
                        "path {} does not have prefix {}",
                        request.path, prefix
                    ))
                }
            }
            Predicate::Header(header) => match (request.headers.get(&header.name), &header.value) {
                (None, _) => Verdict::Fail(format!("header {} missing", header.name)),
                (Some(_), None) => Verdict::Pass(format!("header {} present", header.name)),
                (Some(actual), Some(expected)) if actual == expected => {
                    Verdict::Pass(format!("header {} is {:?}", header.name, expected))
                }
                (Some(actual), Some(expected)) => Verdict::Fail(format!(
                    "header {} is {:?}, expected {:?}",
                    header.name, actual, expected
                )),
            },
        }
    }
}

/// A route's full predicate set (AND semantics).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSpec {
    pub predicates: Vec<Predicate>,
}

impl MatchSpec {
    /// The method set, if the route restricts methods.
    pub fn methods(&self) -> Option<&[String]> {
        self.predicates.iter().find_map(|p| match p {
            Predicate::Method(methods) => Some(methods.as_slice()),
            _ => None,
        })
    }

    /// Evaluate all predicates, stopping at the first failure.
    pub fn evaluate(&self, request: &SimulatedRequest) -> Verdict {
        if self.predicates.is_empty() {
            return Verdict::Pass("no predicates; matches every request".to_string());
        }

        let mut passed = Vec::with_capacity(self.predicates.len());
        for predicate in &self.predicates {
            match predicate.evaluate(request) {
                Verdict::Pass(reason) => passed.push(reason),
                fail @ Verdict::Fail(_) => return fail,
            }
        }
        Verdict::Pass(passed.join("; "))
    }
}
