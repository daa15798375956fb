//! OpenTelemetry span exporter writing one JSON object per line.
//!
//! Each finished span becomes a single line:
//!
//! ```json
//! {"service":"dropsearch","name":"apply_search_filter","start":"2026-10-18T06:30:00.123456Z",
//!  "durationMicros":41,"traceId":"…","spanId":"…","parentSpanId":"",
//!  "attributes":{"total_options":5},"events":[],"status":"unset"}
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use futures_util::future::BoxFuture;
use opentelemetry::trace::{SpanId, Status, TraceError};
use opentelemetry::KeyValue;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use serde_json::{json, Map, Value as JsonValue};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::SystemTime;

const UNKNOWN_SERVICE: &str = "unknown_service";

/// Appends spans as JSON lines to a file opened on first export.
pub struct JsonLinesExporter {
    path: PathBuf,
    service: String,
    file: Mutex<Option<File>>,
    is_shutdown: bool,
}

impl JsonLinesExporter {
    #[must_use]
    pub fn new(path: PathBuf, resource: &Resource) -> Self {
        Self {
            path,
            service: service_name(resource),
            file: Mutex::new(None),
            is_shutdown: false,
        }
    }

    fn write_lines(&self, lines: &[String]) -> std::io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, format!("Mutex poisoned: {e}")))?;

        if guard.is_none() {
            *guard = Some(OpenOptions::new().create(true).append(true).open(&self.path)?);
        }
        let file = guard
            .as_mut()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "No file available"))?;

        for line in lines {
            writeln!(file, "{line}")?;
        }
        file.flush()
    }

    fn format_span(&self, span: &SpanData) -> JsonValue {
        let duration = span
            .end_time
            .duration_since(span.start_time)
            .unwrap_or_default();

        let parent = if span.parent_span_id == SpanId::INVALID {
            String::new()
        } else {
            format!("{:016x}", span.parent_span_id)
        };

        let events: Vec<JsonValue> = span
            .events
            .iter()
            .map(|event| {
                json!({
                    "name": event.name,
                    "time": rfc3339(event.timestamp),
                    "attributes": attributes(&event.attributes),
                })
            })
            .collect();

        json!({
            "service": self.service,
            "name": span.name,
            "start": rfc3339(span.start_time),
            "durationMicros": u64::try_from(duration.as_micros()).unwrap_or(u64::MAX),
            "traceId": format!("{:032x}", span.span_context.trace_id()),
            "spanId": format!("{:016x}", span.span_context.span_id()),
            "parentSpanId": parent,
            "attributes": attributes(&span.attributes),
            "events": events,
            "status": status(&span.status),
        })
    }
}

impl SpanExporter for JsonLinesExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        if self.is_shutdown {
            return Box::pin(std::future::ready(Err(TraceError::from("exporter is shut down"))));
        }

        let lines: Vec<String> = batch.iter().map(|span| self.format_span(span).to_string()).collect();
        let result = self
            .write_lines(&lines)
            .map_err(|e| TraceError::from(e.to_string()));
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.is_shutdown = true;
    }

    fn set_resource(&mut self, resource: &Resource) {
        self.service = service_name(resource);
    }
}

impl std::fmt::Debug for JsonLinesExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesExporter")
            .field("path", &self.path)
            .field("service", &self.service)
            .field("is_shutdown", &self.is_shutdown)
            .finish_non_exhaustive()
    }
}

/// Builds a tracer provider exporting every finished span to `path` immediately.
#[must_use]
pub fn create_tracer_provider(path: PathBuf, resource: Resource) -> TracerProvider {
    let exporter = JsonLinesExporter::new(path, &resource);

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}

fn service_name(resource: &Resource) -> String {
    resource
        .iter()
        .find(|(key, _)| key.as_str() == "service.name")
        .map_or_else(|| UNKNOWN_SERVICE.to_string(), |(_, value)| value.to_string())
}

fn rfc3339(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn attributes(pairs: &[KeyValue]) -> JsonValue {
    let map: Map<String, JsonValue> = pairs
        .iter()
        .map(|kv| (kv.key.as_str().to_string(), attribute_value(&kv.value)))
        .collect();
    JsonValue::Object(map)
}

fn attribute_value(value: &opentelemetry::Value) -> JsonValue {
    use opentelemetry::Value;

    match value {
        Value::Bool(b) => json!(b),
        Value::I64(i) => json!(i),
        Value::F64(f) => json!(f),
        Value::String(s) => json!(s.as_str()),
        Value::Array(_) => json!(value.to_string()),
    }
}

fn status(status: &Status) -> String {
    match status {
        Status::Unset => "unset".to_string(),
        Status::Ok => "ok".to_string(),
        Status::Error { description } => format!("error: {description}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::trace::TracerProvider as _;
    use tracing_opentelemetry::OpenTelemetryLayer;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn finished_spans_are_written_as_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spans.jsonl");
        let resource = Resource::new(vec![KeyValue::new("service.name", "dropsearch-test")]);
        let provider = create_tracer_provider(path.clone(), resource);

        let subscriber = tracing_subscriber::registry().with(OpenTelemetryLayer::new(provider.tracer("test")));
        tracing::subscriber::with_default(subscriber, || {
            let _span = tracing::info_span!("apply_search_filter", total_options = 5_i64).entered();
        });
        let _ = provider.force_flush();

        let contents = std::fs::read_to_string(&path).unwrap();
        let line: JsonValue = serde_json::from_str(contents.lines().next().unwrap()).unwrap();
        assert_eq!(line["service"], "dropsearch-test");
        assert_eq!(line["name"], "apply_search_filter");
        assert_eq!(line["attributes"]["total_options"], 5);
        assert_eq!(line["parentSpanId"], "");
    }

    #[test]
    fn shut_down_exporter_rejects_batches() {
        let dir = tempfile::tempdir().unwrap();
        let resource = Resource::new(vec![KeyValue::new("service.name", "dropsearch-test")]);
        let mut exporter = JsonLinesExporter::new(dir.path().join("spans.jsonl"), &resource);
        exporter.shutdown();

        let result = futures_util::FutureExt::now_or_never(exporter.export(vec![]));
        assert!(matches!(result, Some(Err(_))));
    }

    #[test]
    fn missing_service_name_falls_back() {
        let exporter = JsonLinesExporter::new(PathBuf::from("unused"), &Resource::empty());
        assert_eq!(exporter.service, UNKNOWN_SERVICE);
    }

    #[test]
    fn rfc3339_uses_utc_microseconds() {
        let text = rfc3339(SystemTime::UNIX_EPOCH);
        assert_eq!(text, "1970-01-01T00:00:00.000000Z");
    }
}
