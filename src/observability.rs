//! Process-global tracing setup.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_LOG_FILTER: &str = "receptor=info,receptor_server=info";

#[derive(Clone, Debug)]
pub struct ObservabilityOptions {
    /// Filter used when `RUST_LOG` is unset or invalid.
    pub default_filter: String,
    /// Emit ANSI colors on the fmt layer.
    pub ansi: bool,
}

impl Default for ObservabilityOptions {
    fn default() -> Self {
        Self {
            default_filter: DEFAULT_LOG_FILTER.to_string(),
            ansi: true,
        }
    }
}

impl ObservabilityOptions {
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_filter))
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// leave the first subscriber in place.
pub fn init(options: ObservabilityOptions) {
    if let Err(err) = tracing_subscriber::registry()
        .with(options.env_filter())
        .with(tracing_subscriber::fmt::layer().with_ansi(options.ansi))
        .try_init()
    {
        eprintln!("tracing init failed: {err}");
    }
}
