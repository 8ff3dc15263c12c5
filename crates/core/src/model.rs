//! Box API v2.0 shaped values.
//!
//! These are pure projections of a [`crate::Document`]: built fresh per request, never cached,
//! discarded after serialisation. Field names and nesting follow the external Box schema.
//!
//! Inbound JSON (for example the body of a folder `PUT`) deserialises into the same
//! [`BoxItem`] type. Every field has a default so partial bodies still parse; the update path
//! then treats whatever was parsed as authoritative.

use crate::constants::{PLACEHOLDER_VERSION, UNKNOWN_SIZE, USER_TYPE};
use serde::{Deserialize, Serialize};

/// Box user summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(rename = "type", default = "user_type")]
    pub item_type: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub login: String,
}

fn user_type() -> String {
    USER_TYPE.to_string()
}

/// Minimal item used for `parent` and `path_collection` entries.
///
/// Sequence id and etag are never resolved for ancestors; they carry `"-1"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiniItem {
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default)]
    pub id: String,
    #[serde(default = "placeholder")]
    pub sequence_id: String,
    #[serde(default = "placeholder")]
    pub etag: String,
    #[serde(default)]
    pub name: String,
}

fn placeholder() -> String {
    PLACEHOLDER_VERSION.to_string()
}

pub type ParentSummary = MiniItem;
pub type PathEntry = MiniItem;

/// Shared fields of a child collection entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub modified_at: String,
}

/// One entry of a folder's `item_collection`.
///
/// The variant is chosen per child when the collection is built, so a folder holding both
/// folders and files yields entries of both shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChildSummary {
    Folder(ItemSummary),
    File(ItemSummary),
}

impl ChildSummary {
    pub fn summary(&self) -> &ItemSummary {
        match self {
            ChildSummary::Folder(s) | ChildSummary::File(s) => s,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, ChildSummary::Folder(_))
    }
}

/// Box collection: a count plus an ordered page of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxCollection<T> {
    pub total_count: u64,
    pub entries: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedLink {
    pub url: String,
    #[serde(default)]
    pub access: Option<String>,
}

/// Upload-by-email settings of a folder. Always placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderUploadEmail {
    #[serde(default = "placeholder")]
    pub access: String,
    #[serde(default = "placeholder")]
    pub email: String,
}

impl Default for FolderUploadEmail {
    fn default() -> Self {
        Self {
            access: placeholder(),
            email: placeholder(),
        }
    }
}

/// A file- or folder-shaped Box item.
///
/// Folder-shaped items carry `folder_upload_email` and `item_collection`; file-shaped items
/// omit both from the wire form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxItem {
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub sequence_id: Option<String>,
    #[serde(default)]
    pub etag: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub modified_at: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "unknown_size")]
    pub size: i64,
    #[serde(default)]
    pub path_collection: Option<BoxCollection<PathEntry>>,
    #[serde(default)]
    pub created_by: Option<UserSummary>,
    #[serde(default)]
    pub modified_by: Option<UserSummary>,
    #[serde(default)]
    pub owned_by: Option<UserSummary>,
    #[serde(default)]
    pub shared_link: Option<SharedLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_upload_email: Option<FolderUploadEmail>,
    #[serde(default)]
    pub parent: Option<ParentSummary>,
    #[serde(default)]
    pub item_status: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_collection: Option<BoxCollection<ChildSummary>>,
}

fn unknown_size() -> i64 {
    UNKNOWN_SIZE
}

impl BoxItem {
    pub fn is_folder(&self) -> bool {
        self.item_collection.is_some()
    }
}
