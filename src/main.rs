//! Gateway Playground CLI
//!
//! Validates gateway routing configurations and simulates request routing
//! from the command line.
//!
//! ```text
//!   config.toml ──▶ validate ──▶ ValidationResult (JSON on stdout)
//!
//!   config.toml ─┐
//!                ├─▶ simulate ──▶ SimulationResult (JSON on stdout)
//!   request ─────┘
//! ```
//!
//! Logs go to stderr. Exit codes: 0 on success, 1 when the configuration or
//! request is rejected, 2 on I/O failures.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use gateway_playground::config::watcher::{validate_file, ConfigWatcher};
use gateway_playground::config::ConfigError;
use gateway_playground::observability::logging::init_logging;
use gateway_playground::simulation::{self, SimulatedRequest};
use gateway_playground::{init_panic_hook, ValidationResult};

#[derive(Parser)]
#[command(name = "gateway-playground")]
#[command(about = "Validate gateway configurations and simulate request routing", long_about = None)]
struct Cli {
    /// Log level for this tool (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Print single-line JSON
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a configuration file
    Validate {
        config: PathBuf,

        /// Re-validate whenever the file changes
        #[arg(long)]
        watch: bool,
    },
    /// Simulate how one request would be routed
    Simulate {
        config: PathBuf,

        /// Read the request from a JSON file instead of flags
        #[arg(long, conflicts_with_all = ["method", "host", "path", "headers", "client_ip"])]
        request: Option<PathBuf>,

        #[arg(long, default_value = "GET")]
        method: String,

        #[arg(long, default_value = "localhost")]
        host: String,

        #[arg(long, default_value = "/")]
        path: String,

        /// Request header as name:value (repeatable)
        #[arg(short = 'H', long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,

        #[arg(long)]
        client_ip: Option<String>,
    },
    /// Print a request template with empty headers
    Sample {
        #[arg(long, default_value = "GET")]
        method: String,

        #[arg(long, default_value = "localhost")]
        host: String,

        #[arg(long, default_value = "/")]
        path: String,
    },
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    match raw.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected name:value, got '{}'", raw)),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());
    init_panic_hook();

    tracing::debug!("gateway-playground v{} starting", env!("CARGO_PKG_VERSION"));

    let printer = Printer {
        compact: cli.compact,
    };

    match cli.command {
        Commands::Validate { config, watch } => {
            let code = run_validate(&printer, &config);
            if watch {
                return run_watch(&printer, &config);
            }
            code
        }
        Commands::Simulate {
            config,
            request,
            method,
            host,
            path,
            headers,
            client_ip,
        } => {
            let request = match request {
                Some(file) => match read_request(&file) {
                    Ok(request) => request,
                    Err(code) => return code,
                },
                None => {
                    let mut request = simulation::create_sample_request(&method, &host, &path);
                    request.headers = headers.into_iter().collect();
                    request.client_ip = client_ip;
                    request
                }
            };
            run_simulate(&printer, &config, &request)
        }
        Commands::Sample { method, host, path } => {
            printer.print(&simulation::create_sample_request(&method, &host, &path))
        }
    }
}

fn run_validate(printer: &Printer, path: &Path) -> ExitCode {
    match validate_file(path) {
        Ok(result) => {
            tracing::info!(
                valid = result.valid,
                errors = result.errors.len(),
                warnings = result.warnings.len(),
                "Validation complete"
            );
            let code = if result.valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            };
            printer.print(&result);
            code
        }
        Err(ConfigError::Parse(e)) => {
            tracing::error!("Failed to parse config: {}", e);
            printer.print(&ValidationResult::from_diagnostics(vec![e.to_diagnostic()]));
            ExitCode::from(1)
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(2)
        }
    }
}

fn run_watch(printer: &Printer, path: &Path) -> ExitCode {
    let (watcher, updates) = ConfigWatcher::new(path);
    let _watcher = match watcher.run() {
        Ok(w) => w,
        Err(e) => {
            tracing::error!("Failed to watch {}: {}", path.display(), e);
            return ExitCode::from(2);
        }
    };

    for outcome in updates {
        match outcome {
            Ok(result) => {
                printer.print(&result);
            }
            Err(ConfigError::Parse(e)) => {
                printer.print(&ValidationResult::from_diagnostics(vec![e.to_diagnostic()]));
            }
            Err(e) => tracing::error!("{}", e),
        }
    }
    ExitCode::SUCCESS
}

fn read_request(path: &Path) -> Result<SimulatedRequest, ExitCode> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        tracing::error!("Failed to read request {}: {}", path.display(), e);
        ExitCode::from(2)
    })?;
    SimulatedRequest::from_json(&content).map_err(|e| {
        tracing::error!("Invalid request {}: {}", path.display(), e);
        ExitCode::from(1)
    })
}

fn run_simulate(printer: &Printer, path: &Path, request: &SimulatedRequest) -> ExitCode {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("Failed to read config {}: {}", path.display(), e);
            return ExitCode::from(2);
        }
    };

    match simulation::simulate_request(&text, request) {
        Ok(result) => {
            tracing::info!(
                matched = result.matched_route.as_ref().map(|r| r.id.as_str()).unwrap_or("<none>"),
                warnings = result.warnings.len(),
                "Simulation complete"
            );
            printer.print(&result)
        }
        Err(e) => {
            tracing::error!("Simulation refused: {}", e);
            printer.print(&ValidationResult::from_diagnostics(e.diagnostics()));
            ExitCode::from(1)
        }
    }
}

struct Printer {
    compact: bool,
}

impl Printer {
    fn print<T: Serialize>(&self, value: &T) -> ExitCode {
        let rendered = if self.compact {
            serde_json::to_string(value)
        } else {
            serde_json::to_string_pretty(value)
        };
        match rendered {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("Failed to render output: {}", e);
                ExitCode::from(2)
            }
        }
    }
}
