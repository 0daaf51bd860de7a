//! Centralised tracing initialisation for stackdiag binaries.
//!
//! Log lines go to stderr: stdout carries exactly one JSON document.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

/// Initialise the global tracing subscriber.
///
/// `json` switches stderr output to newline-delimited JSON. `level` is the
/// default verbosity when `RUST_LOG` is not set.
///
/// Only the first call takes effect.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let stderr_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
    let stderr_layer: Box<dyn Layer<Registry> + Send + Sync> = if json {
        stderr_layer.json().boxed()
    } else {
        stderr_layer.boxed()
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(env_filter)
        .try_init()
        .ok();
}
