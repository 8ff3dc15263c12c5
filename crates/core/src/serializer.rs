//! Canonical JSON rendering of Box values.

use crate::constants::COLLECTION_TYPE;
use crate::model::{BoxCollection, BoxItem, ChildSummary, MiniItem, UserSummary};
use crate::{BoxError, BoxResult};
use serde::Serialize;

/// A Box-shaped value with an external type tag.
pub trait BoxObject: Serialize {
    /// The `type` written on the wire (`collection` for collections).
    fn type_tag(&self) -> &str;
}

impl BoxObject for BoxItem {
    fn type_tag(&self) -> &str {
        &self.item_type
    }
}

impl BoxObject for UserSummary {
    fn type_tag(&self) -> &str {
        &self.item_type
    }
}

impl BoxObject for MiniItem {
    fn type_tag(&self) -> &str {
        &self.item_type
    }
}

impl BoxObject for ChildSummary {
    fn type_tag(&self) -> &str {
        match self {
            ChildSummary::Folder(_) => "folder",
            ChildSummary::File(_) => "file",
        }
    }
}

impl<T: Serialize> BoxObject for BoxCollection<T> {
    fn type_tag(&self) -> &str {
        COLLECTION_TYPE
    }
}

/// Renders `value` as compact JSON. Field order is fixed by the type, so equal values always
/// render to the same string.
///
/// # Errors
///
/// Returns `BoxError::Serialization` if the value has an empty type tag or cannot be encoded.
pub fn to_json<T: BoxObject + ?Sized>(value: &T) -> BoxResult<String> {
    if value.type_tag().is_empty() {
        return Err(BoxError::Serialization("box object has no type tag".into()));
    }
    serde_json::to_string(value).map_err(|e| BoxError::Serialization(e.to_string()))
}

/// Parses an inbound Box folder body.
///
/// # Errors
///
/// Returns `BoxError::Deserialization` if the body is not a JSON object of the folder shape.
pub fn folder_from_json(body: &str) -> BoxResult<BoxItem> {
    serde_json::from_str(body).map_err(BoxError::Deserialization)
}
