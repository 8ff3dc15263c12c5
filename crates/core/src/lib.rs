//! # Box Core
//!
//! Maps documents of a hierarchical document repository onto Box API v2.0 folder and file
//! representations, and applies inbound Box folder updates back onto the repository.
//!
//! The repository itself is reached through three collaborator traits, bundled per request in a
//! [`BoxContext`]:
//! - [`DocumentSession`] for lookups, child queries, moves and saves,
//! - [`PrincipalDirectory`] for resolving logins to users,
//! - [`TagService`] for per-user document tags.
//!
//! [`MemoryRepository`] implements all three over an in-memory store that can be seeded from
//! YAML.
//!
//! **No transport concerns**: HTTP routing, authentication and CLI parsing belong in `api-rest`
//! and `box-cli`.

pub mod children;
pub mod config;
pub mod constants;
pub mod document;
pub mod error;
pub mod hierarchy;
pub mod mapper;
pub mod memory;
pub mod model;
pub mod serializer;
pub mod session;
pub mod tags;
pub mod update;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;

pub use children::build_children;
pub use config::CoreConfig;
pub use document::{DocRef, Document, QuotaInfo};
pub use error::{BoxError, BoxResult};
pub use hierarchy::walk_ancestors;
pub use mapper::build_item;
pub use memory::{MemoryRepository, MemorySession, RepositorySeed};
pub use model::{
    BoxCollection, BoxItem, ChildSummary, FolderUploadEmail, ItemSummary, MiniItem,
    ParentSummary, PathEntry, SharedLink, UserSummary,
};
pub use serializer::{folder_from_json, to_json, BoxObject};
pub use session::{
    BoxContext, DocumentQuery, DocumentSession, Principal, PrincipalDirectory, Tag, TagService,
};
pub use update::apply_update;
