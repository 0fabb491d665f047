//! # Observability & Tracing
//!
//! The [`setup_tracing`] function initializes structured logging with the `tracing` crate.
//! Components log their lifecycle (`Component started`, `Initialized`, `Shutdown`) with
//! `kind` and `address` fields; the orchestrator wraps each run phase in a span.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Step-by-step progress
//! RUST_LOG=info cargo run
//!
//! # Resolved arguments for every call
//! RUST_LOG=debug cargo run
//!
//! # Only the orchestrator
//! RUST_LOG=citadel_bootstrap=debug cargo run
//! ```

/// Initializes the tracing/logging infrastructure for the application.
///
/// Set `RUST_LOG` to control log verbosity:
/// - `RUST_LOG=info` - Show info, warn, and error messages
/// - `RUST_LOG=debug` - Show debug and above
/// - `RUST_LOG=trace` - Show all messages (very verbose)
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Don't show module paths - components log their kind instead
        .compact()
        .init();
}
