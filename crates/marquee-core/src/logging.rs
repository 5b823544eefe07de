//! Logging and tracing initialization for Marquee.
//!
//! Call one of these once at startup, **before** building the [`App`](crate::App),
//! to install the tracing subscriber that prints logs and request traces.
//!
//! ## Configuration
//!
//! The log level is controlled by the `RUST_LOG` environment variable:
//!
//! ```bash
//! # Show all logs including request traces
//! RUST_LOG=debug cargo run
//!
//! # Show only warnings and errors (production)
//! RUST_LOG=warn cargo run
//!
//! # Fine-grained control
//! RUST_LOG=marquee_core=debug,tower_http=debug,sqlx=warn cargo run
//! ```

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize pretty-formatted logging (recommended for development).
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_logging_pretty() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_line_number(true)
                .with_thread_ids(true)
                .with_target(true),
        )
        .init();
}

/// Initialize JSON-formatted logging (recommended for production).
///
/// Ideal for log aggregation systems like ELK, Datadog, or CloudWatch.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_logging_json() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}

/// Pick the subscriber for an environment name: JSON in production, pretty
/// output everywhere else.
pub fn init_for_environment(environment: &str) {
    if environment == "production" {
        init_logging_json();
    } else {
        init_logging_pretty();
    }
}
