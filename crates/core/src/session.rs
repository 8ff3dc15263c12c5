//! Boundary collaborators of the mapping layer.
//!
//! The mapping and update functions never locate these through globals; callers pass them in
//! through [`BoxContext`]. Every method is a synchronous call that may block on the backing
//! store, and every failure surfaces unchanged to the caller.

use crate::config::CoreConfig;
use crate::document::{DocRef, Document};
use crate::BoxResult;

/// Filter for [`DocumentSession::query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentQuery {
    /// Direct children of the referenced document.
    ChildrenOf(DocRef),
}

/// An authenticated session on the document store.
pub trait DocumentSession {
    /// Name of the principal the session acts for.
    fn principal_name(&self) -> &str;

    fn get_document(&self, doc_ref: &DocRef) -> BoxResult<Document>;

    /// Parent of the referenced document, or `None` when it is the root.
    ///
    /// # Errors
    ///
    /// Returns `BoxError::Lookup` if the document, or the parent it references, is missing.
    fn get_parent_document(&self, doc_ref: &DocRef) -> BoxResult<Option<Document>>;

    /// Documents matching `query`, in store order, after skipping `offset` and keeping at most
    /// `limit`.
    fn query(&self, query: &DocumentQuery, limit: u64, offset: u64) -> BoxResult<Vec<Document>>;

    /// Moves a document under `new_parent`, renaming it to `new_name`.
    fn move_document(
        &self,
        doc_ref: &DocRef,
        new_parent: &DocRef,
        new_name: &str,
    ) -> BoxResult<Document>;

    /// Writes the document's properties back to the store.
    fn save_document(&self, doc: &Document) -> BoxResult<()>;

    /// Commits the session.
    fn save(&self) -> BoxResult<()>;
}

/// A user known to the principal directory.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Principal {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub login: String,
}

pub trait PrincipalDirectory {
    /// Looks a principal up by login name or by id.
    fn get_principal(&self, login_or_id: &str) -> BoxResult<Principal>;
}

/// A label attached to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub label: String,
}

pub trait TagService {
    /// Tags on `doc_ref` attributed to `username`, in insertion order.
    fn get_document_tags(
        &self,
        session: &dyn DocumentSession,
        doc_ref: &DocRef,
        username: &str,
    ) -> BoxResult<Vec<Tag>>;

    /// Removes every tag on `doc_ref`, whoever added it.
    fn remove_tags(&self, session: &dyn DocumentSession, doc_ref: &DocRef) -> BoxResult<()>;

    fn tag(
        &self,
        session: &dyn DocumentSession,
        doc_ref: &DocRef,
        label: &str,
        username: &str,
    ) -> BoxResult<()>;
}

/// The capability set one mapping or update call works against.
#[derive(Clone, Copy)]
pub struct BoxContext<'a> {
    pub session: &'a dyn DocumentSession,
    pub principals: &'a dyn PrincipalDirectory,
    pub tags: &'a dyn TagService,
    pub config: &'a CoreConfig,
}

impl<'a> BoxContext<'a> {
    pub fn new(
        session: &'a dyn DocumentSession,
        principals: &'a dyn PrincipalDirectory,
        tags: &'a dyn TagService,
        config: &'a CoreConfig,
    ) -> Self {
        Self {
            session,
            principals,
            tags,
            config,
        }
    }
}
