//! The `jet` command.
//!
//! Argument parsing and the run loop live here so that they can be driven
//! from tests with in-memory streams; `main.rs` only wires up the process.

mod driver;
mod options;

pub use driver::{run, Exit};
pub use options::{parse_args, Command, FilterSource, Options, UsageError, USAGE};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=jet_eval=debug`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
