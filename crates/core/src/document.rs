//! Documents of the hierarchical content repository.
//!
//! A [`Document`] is owned by the repository; the mapping layer only ever holds a transient copy
//! for the duration of one mapping or update call. Free-form metadata lives in a property bag
//! keyed by the names in [`crate::constants`].

use crate::constants::{CREATOR_PROPERTY, DESCRIPTION_PROPERTY, TITLE_PROPERTY};
use crate::{BoxError, BoxResult};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Reference to a document by identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocRef(String);

impl DocRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocRef {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DocRef {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Quota capability of a document: cumulative stored size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaInfo {
    inner_size: i64,
}

impl QuotaInfo {
    pub fn new(inner_size: i64) -> Self {
        Self { inner_size }
    }

    /// Size of the document's own content, excluding descendants.
    pub fn inner_size(&self) -> i64 {
        self.inner_size
    }
}

/// A node in the repository (file or folder).
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocRef,
    /// Repository type tag, e.g. `Folder`, `Workspace`, `File`.
    pub doc_type: String,
    pub name: String,
    pub parent_ref: Option<DocRef>,
    /// Absolute path, as maintained by the repository.
    pub path: String,
    /// Whether the document can hold children.
    pub folderish: bool,
    pub cache_key: String,
    pub version_label: String,
    pub lifecycle_state: String,
    pub properties: BTreeMap<String, Value>,
    pub quota: Option<QuotaInfo>,
}

impl Document {
    pub fn doc_ref(&self) -> &DocRef {
        &self.id
    }

    /// The quota capability, if this document exposes one.
    pub fn quota(&self) -> Option<&QuotaInfo> {
        self.quota.as_ref()
    }

    /// Reads a string property. Absent and `null` values are both `None`.
    ///
    /// # Errors
    ///
    /// Returns `BoxError::Property` if the value is present but not a string.
    pub fn string_property(&self, key: &'static str) -> BoxResult<Option<&str>> {
        match self.properties.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(BoxError::property(
                &self.id,
                key,
                format!("expected a string, found {other}"),
            )),
        }
    }

    /// Reads a string property that must be present.
    pub fn required_string_property(&self, key: &'static str) -> BoxResult<&str> {
        self.string_property(key)?
            .ok_or_else(|| BoxError::property(&self.id, key, "property is not set"))
    }

    /// Reads a required RFC 3339 timestamp property.
    ///
    /// # Errors
    ///
    /// Returns `BoxError::Property` if the property is absent or cannot be parsed.
    pub fn timestamp_property(&self, key: &'static str) -> BoxResult<DateTime<FixedOffset>> {
        let raw = self.required_string_property(key)?;
        DateTime::parse_from_rfc3339(raw).map_err(|e| {
            BoxError::property(&self.id, key, format!("unparseable timestamp {raw:?}: {e}"))
        })
    }

    /// Sets a string property, or clears it when `value` is `None`.
    pub fn set_string_property(&mut self, key: &str, value: Option<&str>) {
        let value = value.map_or(Value::Null, |v| Value::String(v.to_string()));
        self.properties.insert(key.to_string(), value);
    }

    pub fn set_title(&mut self, value: Option<&str>) {
        self.set_string_property(TITLE_PROPERTY, value);
    }

    pub fn set_description(&mut self, value: Option<&str>) {
        self.set_string_property(DESCRIPTION_PROPERTY, value);
    }

    pub fn set_creator(&mut self, value: Option<&str>) {
        self.set_string_property(CREATOR_PROPERTY, value);
    }
}
