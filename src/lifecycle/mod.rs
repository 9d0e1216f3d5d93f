//! Process lifecycle.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Install panic hook (once) → init logging → run command
//! ```
//!
//! # Design Decisions
//! - Startup steps are idempotent; the WASM host may call them repeatedly

pub mod startup;
