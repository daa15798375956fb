//! Selectable option model.
//!
//! The control works over any type implementing [`Selectable`]. The bundled
//! [`OptionItem`] covers the two shapes hosts usually hand over: a bare string, or
//! a structured [`Record`] carrying an identifying `id`/`value` and an optional
//! human-readable `label`/`name`.
//!
//! # Equality
//!
//! Selection equality for records is identity-based: two records are the same
//! selection only when they share one `Arc` allocation. A host that rebuilds its
//! records (for example after a remote lookup) must hand back the instance it put
//! in the option list when setting the selected value, or nothing will render as
//! selected. Text options compare by value.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Behaviour the dropdown needs from an option type.
pub trait Selectable: Clone {
    /// Text used for default filtering and default rendering.
    fn display_text(&self) -> Cow<'_, str>;

    /// Stable identity used as the list key, if the option carries one.
    fn identity_key(&self) -> Option<String> {
        None
    }

    /// Whether `other` denotes the same selection as `self`.
    fn same_selection(&self, other: &Self) -> bool;
}

impl Selectable for String {
    fn display_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }

    fn same_selection(&self, other: &Self) -> bool {
        self == other
    }
}

/// Returns the list key for `option` at `index`, falling back to `option-<index>`.
#[must_use]
pub fn option_key<T: Selectable>(option: &T, index: usize) -> String {
    option
        .identity_key()
        .unwrap_or_else(|| format!("option-{index}"))
}

/// Case-insensitive substring test used by the default filter.
#[must_use]
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// A structured option.
///
/// Only `id`, `value`, `label` and `name` carry meaning for the control; every
/// other field is kept in `extra` for the host's renderers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    /// Creates a record identified by `id`.
    #[must_use]
    pub fn with_id(id: impl Into<Value>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Creates a record identified by `value`.
    #[must_use]
    pub fn with_value(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attaches an arbitrary extra field.
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Display text: non-empty `label`, else non-empty `name`, else the JSON form.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        if let Some(label) = self.label.as_deref().filter(|l| !l.is_empty()) {
            return Cow::Borrowed(label);
        }
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            return Cow::Borrowed(name);
        }
        Cow::Owned(self.to_string())
    }

    /// Identity key: `id` if present, else `value`.
    #[must_use]
    pub fn key(&self) -> Option<String> {
        self.id.as_ref().or(self.value.as_ref()).map(scalar_to_string)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// An option that is either bare text or a shared structured record.
///
/// # Examples
///
/// ```
/// use dropsearch::{OptionItem, Record, Selectable};
///
/// let city = OptionItem::from("Kyiv");
/// let color = OptionItem::from(Record::with_id(2).label("Blue").field("hex", "#0000ff"));
///
/// assert_eq!(city.display_text(), "Kyiv");
/// assert_eq!(color.display_text(), "Blue");
/// assert_eq!(color.identity_key().as_deref(), Some("2"));
/// assert!(color.same_selection(&color.clone()));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionItem {
    Text(String),
    Record(Arc<Record>),
}

impl OptionItem {
    /// Decodes a JSON array whose elements are strings or objects.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DropdownError::Json`] if the document is not such an array.
    pub fn list_from_json(json: &str) -> crate::Result<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns the record behind this option, if it is one.
    #[must_use]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Text(_) => None,
            Self::Record(record) => Some(record),
        }
    }
}

impl Selectable for OptionItem {
    fn display_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text.as_str()),
            Self::Record(record) => record.text(),
        }
    }

    fn identity_key(&self) -> Option<String> {
        match self {
            Self::Text(_) => None,
            Self::Record(record) => record.key(),
        }
    }

    fn same_selection(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl PartialEq for OptionItem {
    fn eq(&self, other: &Self) -> bool {
        self.same_selection(other)
    }
}

impl Eq for OptionItem {}

impl From<&str> for OptionItem {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for OptionItem {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Record> for OptionItem {
    fn from(record: Record) -> Self {
        Self::Record(Arc::new(record))
    }
}

impl From<Arc<Record>> for OptionItem {
    fn from(record: Arc<Record>) -> Self {
        Self::Record(record)
    }
}
