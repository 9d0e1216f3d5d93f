//! Process-wide initialization.
//!
//! # Responsibilities
//! - Install a panic reporter that routes panics through tracing
//!
//! # Design Decisions
//! - Idempotent: guarded by `Once`, so repeated calls are harmless
//! - Chains to the previously installed hook instead of replacing it
//! - Has no effect on the semantics of validate / simulate

use std::panic;
use std::sync::Once;

static PANIC_HOOK: Once = Once::new();

/// Install the panic reporter. Safe to call any number of times.
pub fn init_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let message = info
                .payload()
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| info.payload().downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "<non-string panic payload>".to_string());
            let location = info
                .location()
                .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
                .unwrap_or_default();

            tracing::error!(%message, %location, "Engine panicked");
            previous(info);
        }));
        tracing::debug!("Panic hook installed");
    });
}
