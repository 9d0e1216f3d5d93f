//! Configuration parsing and loading from disk.
//!
//! Parsing runs in two steps: serde deserializes the TOML text into the
//! span-carrying schema types, then lowering compiles predicates,
//! normalizes names and converts byte spans into line/column locations.
//! Lowering cannot fail, so a document either parses completely or not at all.

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use thiserror::Error;
use toml::Spanned;

use crate::agents::{AgentDecl, HookBinding};
use crate::config::model::{Config, Defaults, Route, Upstream, UpstreamTarget};
use crate::config::schema::{
    ConfigDocument, HookDocument, MatchDocument, PolicyDocument, RouteDocument,
};
use crate::diagnostics::{Diagnostic, LineIndex, Location};
use crate::policy::PolicyOverride;
use crate::routing::{HeaderPredicate, HostPattern, MatchSpec, PathPattern, Predicate};

/// Configuration text that is not a well-formed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub location: Option<Location>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{}: {}", location, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    /// The error as a diagnostic (code `parse_error`).
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error("parse_error", self.message.clone()).at(self.location)
    }
}

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Parse configuration text into the typed model.
pub fn parse(text: &str) -> Result<Config, ParseError> {
    let index = LineIndex::new(text);

    let document: ConfigDocument = toml::from_str(text).map_err(|e| ParseError {
        message: e.message().trim().to_string(),
        location: e.span().map(|span| index.location(text, span.start)),
    })?;

    let config = Lowering {
        text,
        index: &index,
    }
    .config(document);

    tracing::debug!(
        routes = config.routes.len(),
        upstreams = config.upstreams.len(),
        agents = config.agents.len(),
        "Configuration parsed"
    );

    Ok(config)
}

/// Read and parse a configuration file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse(&content)?)
}

/// Schema → model conversion.
struct Lowering<'a> {
    text: &'a str,
    index: &'a LineIndex,
}

impl Lowering<'_> {
    fn locate(&self, span: Range<usize>) -> Option<Location> {
        Some(self.index.location(self.text, span.start))
    }

    fn config(&self, doc: ConfigDocument) -> Config {
        let defaults = Defaults {
            policies: self.policy(doc.defaults.policies),
            hooks: doc
                .defaults
                .hooks
                .into_iter()
                .map(|hook| self.hook(hook))
                .collect(),
        };

        let agents = doc
            .agents
            .into_iter()
            .map(|(id, agent)| {
                let location = self.locate(agent.span());
                let agent = agent.into_inner();
                let decl = AgentDecl {
                    id: id.clone(),
                    timeout_ms: agent.timeout_ms,
                    failure_mode: agent.failure_mode,
                    location,
                };
                (id, decl)
            })
            .collect();

        let routes = doc
            .routes
            .into_iter()
            .enumerate()
            .map(|(index, route)| self.route(index, route.into_inner()))
            .collect();

        let upstreams = doc
            .upstreams
            .into_iter()
            .map(|(id, upstream)| {
                let location = self.locate(upstream.span());
                let upstream = upstream.into_inner();
                let lowered = Upstream {
                    id: id.clone(),
                    load_balancer: upstream.load_balancer,
                    hash_key: upstream.hash_key,
                    targets: upstream
                        .targets
                        .into_iter()
                        .map(|t| UpstreamTarget {
                            address: t.address,
                            weight: t.weight,
                        })
                        .collect(),
                    location,
                };
                (id, lowered)
            })
            .collect();

        Config {
            routes,
            upstreams,
            agents,
            defaults,
        }
    }

    fn route(&self, index: usize, doc: RouteDocument) -> Route {
        let location = self.locate(doc.id.span());
        let (upstream, upstream_location) = match doc.upstream {
            Some(upstream) => {
                let location = self.locate(upstream.span());
                (Some(upstream.into_inner()), location)
            }
            None => (None, None),
        };

        Route {
            id: doc.id.into_inner(),
            priority: doc.priority,
            index,
            matcher: compile_match(doc.matcher),
            policies: doc.policies.map(|p| self.policy(p)),
            upstream,
            agents: doc.agents.into_iter().map(|hook| self.hook(hook)).collect(),
            location,
            upstream_location,
        }
    }

    fn policy(&self, doc: PolicyDocument) -> PolicyOverride {
        let (timeout_secs, timeout_location) = match doc.timeout_secs {
            Some(timeout) => {
                let location = self.locate(timeout.span());
                (Some(timeout.into_inner()), location)
            }
            None => (None, None),
        };

        PolicyOverride {
            timeout_secs,
            failure_mode: doc.failure_mode,
            retry_attempts: doc.retry_attempts,
            max_body_bytes: doc.max_body_bytes,
            timeout_location,
        }
    }

    fn hook(&self, doc: Spanned<HookDocument>) -> HookBinding {
        let location = self.locate(doc.span());
        let doc = doc.into_inner();
        HookBinding {
            agent_id: doc.agent_id,
            hook: doc.hook,
            timeout_ms: doc.timeout_ms,
            failure_mode: doc.failure_mode,
            location,
        }
    }
}

/// Compile a match table into predicates, in evaluation order:
/// method, host, path, path prefix, headers.
fn compile_match(doc: MatchDocument) -> MatchSpec {
    let mut predicates = Vec::new();

    if let Some(methods) = doc.methods {
        let mut allowed: Vec<String> = Vec::with_capacity(methods.len());
        for method in methods {
            let method = method.trim().to_ascii_uppercase();
            if !allowed.contains(&method) {
                allowed.push(method);
            }
        }
        predicates.push(Predicate::Method(allowed));
    }
    if let Some(host) = doc.host {
        predicates.push(Predicate::Host(HostPattern::parse(&host)));
    }
    if let Some(path) = doc.path {
        predicates.push(Predicate::Path(PathPattern::new(&path)));
    }
    if let Some(prefix) = doc.path_prefix {
        predicates.push(Predicate::PathPrefix(prefix));
    }
    for header in doc.headers {
        predicates.push(Predicate::Header(HeaderPredicate {
            name: header.name.trim().to_ascii_lowercase(),
            value: header.value,
        }));
    }

    MatchSpec { predicates }
}
