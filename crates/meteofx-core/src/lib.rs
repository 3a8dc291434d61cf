pub mod config;
pub mod error;

pub use config::{
    ClientConfig, Config, LogFormat, RateLimitConfig, RateSourceConfig, RatesConfig,
    ServerConfig, SourceTransform, StorageConfig, ValidationResult, WeatherConfig,
};
pub use error::{AppError, ConfigError, NetworkError, ReqwestErrorExt};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global tracing subscriber.
///
/// Honors `RUST_LOG`, falling back to `info`. Calling this twice is harmless;
/// the second registration is ignored.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .try_init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .try_init(),
    };

    if result.is_ok() {
        tracing::info!("meteofx tracing initialized ({:?})", format);
    }
}
