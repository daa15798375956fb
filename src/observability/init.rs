//! Subscriber assembly.

use super::exporter;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LEVEL: &str = "info";
const SERVICE_NAME: &str = "dropsearch";

/// Installs the global tracing subscriber.
///
/// Without `trace_file` events are formatted to stderr. With it, spans are
/// exported through OpenTelemetry to the file, creating its parent directory
/// first. If the directory cannot be created nothing is installed.
///
/// Only the first call in a process takes effect; later calls are ignored.
///
/// # Example
///
/// ```rust
/// use dropsearch::observability::init_tracing;
/// use dropsearch::Config;
///
/// let config = Config {
///     trace_level: Some("dropsearch=debug".to_string()),
///     ..Default::default()
/// };
/// init_tracing(&config);
/// ```
pub fn init_tracing(config: &Config) {
    let level = config
        .trace_level
        .clone()
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string());

    let Some(trace_file) = config.trace_file.clone() else {
        let _ = tracing_subscriber::registry()
            .with(EnvFilter::new(level))
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init();
        return;
    };

    if let Some(parent) = trace_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        if std::fs::create_dir_all(parent).is_err() {
            return;
        }
    }

    let resource = Resource::new(vec![opentelemetry::KeyValue::new("service.name", SERVICE_NAME)]);
    let provider = exporter::create_tracer_provider(trace_file, resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(otel_layer)
        .try_init();
}
