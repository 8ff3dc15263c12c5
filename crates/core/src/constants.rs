//! Constants used throughout the box core crate.
//!
//! Property keys of the document property bag, wire placeholders and paging defaults live here
//! so the mapping and update paths agree on them.

/// Property holding the document title.
pub const TITLE_PROPERTY: &str = "title";

/// Property holding the free-text description.
pub const DESCRIPTION_PROPERTY: &str = "description";

/// Property holding the login (or id) of the creating principal.
pub const CREATOR_PROPERTY: &str = "creator";

/// Property holding the login (or id) of the last principal to modify the document.
pub const LAST_CONTRIBUTOR_PROPERTY: &str = "last_contributor";

/// Property holding the creation timestamp (RFC 3339).
pub const CREATED_PROPERTY: &str = "created";

/// Property holding the modification timestamp (RFC 3339).
pub const MODIFIED_PROPERTY: &str = "modified";

/// Sequence id and etag written for ancestor and parent summaries.
pub const PLACEHOLDER_VERSION: &str = "-1";

/// Size reported when a document has no quota capability.
pub const UNKNOWN_SIZE: i64 = -1;

/// Type tag of user summaries.
pub const USER_TYPE: &str = "user";

/// Type tag reported for collections.
pub const COLLECTION_TYPE: &str = "collection";

/// Default page size for child collections.
pub const DEFAULT_LIMIT: &str = "100";

/// Default page offset for child collections.
pub const DEFAULT_OFFSET: &str = "0";

/// Default field selector for child collections. Child summaries always carry the same fields.
pub const DEFAULT_FIELDS: &str = "*";

/// Default separator used to count path segments.
pub const DEFAULT_PATH_SEPARATOR: &str = "/";

/// Location of the bundled repository seed, relative to the workspace or crate root.
pub const DEFAULT_SEED_FILE: &str = "fixtures/repository.yaml";
