//! Error types for the dropdown control.
//!
//! This module defines the centralized error type [`DropdownError`] and a type alias
//! [`Result`] used by lookups and construction-time helpers. Event handling itself
//! never fails; see [`crate::app::handler`].

use thiserror::Error;

/// The main error type for dropdown operations.
///
/// Lookup failures are the only kind raised while the control is running, and
/// they are absorbed by the filtering engine (logged, then turned into an empty
/// result set). The remaining variants come from loading configuration or option
/// lists before the control is built.
///
/// # Examples
///
/// ```
/// use dropsearch::DropdownError;
///
/// fn remote_query(term: &str) -> Result<Vec<String>, DropdownError> {
///     Err(DropdownError::Lookup(format!("backend unavailable for {term:?}")))
/// }
/// ```
#[derive(Debug, Error)]
pub enum DropdownError {
    /// A caller-supplied search function rejected or failed.
    ///
    /// The string describes the failure and is reported to the tracing sink.
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// Configuration is invalid.
    ///
    /// Occurs when a TOML document or attribute map cannot be interpreted.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading a configuration or option file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An option list could not be decoded from JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<toml::de::Error> for DropdownError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// A specialized `Result` type for dropdown operations.
pub type Result<T> = std::result::Result<T, DropdownError>;
