pub mod config;
pub mod error;
pub mod graph;
pub mod model;
pub mod outcome;

pub use graph::{Edge, Vertex, VertexId};
pub use outcome::{Outcome, SkipReason};

use crate::config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use tracing_subscriber::util::TryInitError;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level. Returns an error if a global
/// subscriber is already installed.
pub fn init_tracing(logging: &LoggingConfig) -> Result<(), TryInitError> {
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let text_layer = (!logging.json).then(|| tracing_subscriber::fmt::layer().with_target(false));
    let json_layer = logging
        .json
        .then(|| tracing_subscriber::fmt::layer().json().with_target(false));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(text_layer)
        .with(json_layer)
        .try_init()
}
