//! Tracing setup for the control.
//!
//! The engine instruments its operations with `tracing` spans and events.
//! Hosts that want to see them call [`init_tracing`] once at startup:
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer (stderr)
//!                            └→ tracing-opentelemetry → JsonLinesExporter → file
//! ```
//!
//! # Configuration
//!
//! The filter directive is taken from `trace_level` in [`crate::Config`]
//! (default `"info"`). When `trace_file` is set, finished spans are appended
//! to that file as JSON lines instead of being printed.
//!
//! # Usage
//!
//! ```rust
//! use dropsearch::observability::init_tracing;
//! use dropsearch::Config;
//!
//! init_tracing(&Config::default());
//! tracing::debug!("dropdown host started");
//! ```
//!
//! # Modules
//!
//! - [`init`]: Subscriber assembly
//! - [`exporter`]: JSON-lines span exporter and tracer provider

pub mod exporter;
mod init;

pub use exporter::{create_tracer_provider, JsonLinesExporter};
pub use init::init_tracing;
