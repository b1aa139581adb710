//! Telemetry setup

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the JSON subscriber. Keep the returned guard alive for the
/// lifetime of the process, dropping it flushes and stops the writer.
pub fn init_telemetry() -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json().with_target(true).with_writer(writer))
        .init();
    guard
}
