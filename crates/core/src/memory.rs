//! In-memory document repository.
//!
//! [`MemoryRepository`] holds documents, principals and tags behind a shared lock and implements
//! [`PrincipalDirectory`] and [`TagService`]. A [`MemorySession`] pairs the repository with an
//! acting principal and implements [`DocumentSession`].
//!
//! ## Storage model
//!
//! - Documents keep insertion order, which is also the order child queries return.
//! - Paths are derived on read from the parent chain: `/` for the root, then `/`-joined names.
//! - The cache key is `<id>-<change token>`; the token increments on every save.
//! - Saving a document stamps `modified` and `last_contributor` with the current time and the
//!   acting principal.
//!
//! ## Seeding
//!
//! Repositories can be loaded from YAML. Parents must be listed before their children.
//!
//! ```yaml
//! principals:
//!   - { id: u-jdoe, first_name: John, last_name: Doe, login: jdoe }
//! documents:
//!   - { id: root, type: Root, name: "", folderish: true }
//!   - id: "42"
//!     type: Folder
//!     name: Reports
//!     parent: root
//!     folderish: true
//!     properties:
//!       created: "2014-03-01T10:00:00Z"
//! tags:
//!   - { document: "42", label: finance, user: jdoe }
//! ```

use crate::constants::{LAST_CONTRIBUTOR_PROPERTY, MODIFIED_PROPERTY};
use crate::document::{DocRef, Document, QuotaInfo};
use crate::session::{
    DocumentQuery, DocumentSession, Principal, PrincipalDirectory, Tag, TagService,
};
use crate::{BoxError, BoxResult};
use chrono::Utc;
use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Top-level shape of a YAML repository seed.
#[derive(Debug, Default, Deserialize)]
pub struct RepositorySeed {
    #[serde(default)]
    pub principals: Vec<Principal>,
    #[serde(default)]
    pub documents: Vec<DocumentSeed>,
    #[serde(default)]
    pub tags: Vec<TagSeed>,
}

/// A document to insert. A missing `id` is replaced by a fresh UUID.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentSeed {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub folderish: bool,
    #[serde(default = "default_version_label")]
    pub version_label: String,
    #[serde(default = "default_lifecycle_state")]
    pub lifecycle_state: String,
    #[serde(default)]
    pub quota: Option<i64>,
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
}

fn default_version_label() -> String {
    "0.1".into()
}

fn default_lifecycle_state() -> String {
    "project".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagSeed {
    pub document: String,
    pub label: String,
    pub user: String,
}

#[derive(Debug, Clone)]
struct StoredDocument {
    id: DocRef,
    doc_type: String,
    name: String,
    parent: Option<DocRef>,
    folderish: bool,
    version_label: String,
    lifecycle_state: String,
    properties: BTreeMap<String, Value>,
    quota: Option<QuotaInfo>,
    change_token: u64,
}

#[derive(Debug, Clone)]
struct TagEntry {
    doc: DocRef,
    label: String,
    username: String,
}

#[derive(Debug, Default)]
struct RepositoryState {
    documents: Vec<StoredDocument>,
    principals: Vec<Principal>,
    tags: Vec<TagEntry>,
    moves: u64,
    commits: u64,
}

impl RepositoryState {
    fn find(&self, id: &DocRef) -> BoxResult<&StoredDocument> {
        self.documents
            .iter()
            .find(|d| &d.id == id)
            .ok_or_else(|| BoxError::Lookup(id.to_string()))
    }

    fn find_mut(&mut self, id: &DocRef) -> BoxResult<&mut StoredDocument> {
        self.documents
            .iter_mut()
            .find(|d| &d.id == id)
            .ok_or_else(|| BoxError::Lookup(id.to_string()))
    }

    fn path_of(&self, doc: &StoredDocument) -> BoxResult<String> {
        let mut names = Vec::new();
        let mut current = doc;
        while let Some(parent_ref) = &current.parent {
            if names.len() > self.documents.len() {
                return Err(BoxError::Lookup(format!(
                    "parent chain of {} does not reach a root",
                    doc.id
                )));
            }
            names.push(current.name.as_str());
            current = self.find(parent_ref)?;
        }
        names.reverse();
        Ok(format!("/{}", names.join("/")))
    }

    /// Whether `candidate` is `ancestor` or sits below it.
    fn is_within(&self, candidate: &DocRef, ancestor: &DocRef) -> bool {
        let mut cursor = Some(candidate.clone());
        let mut steps = 0;
        while let Some(id) = cursor {
            if &id == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.documents.len() {
                return false;
            }
            cursor = self.find(&id).ok().and_then(|d| d.parent.clone());
        }
        false
    }

    fn materialise(&self, stored: &StoredDocument) -> BoxResult<Document> {
        Ok(Document {
            id: stored.id.clone(),
            doc_type: stored.doc_type.clone(),
            name: stored.name.clone(),
            parent_ref: stored.parent.clone(),
            path: self.path_of(stored)?,
            folderish: stored.folderish,
            cache_key: format!("{}-{}", stored.id, stored.change_token),
            version_label: stored.version_label.clone(),
            lifecycle_state: stored.lifecycle_state.clone(),
            properties: stored.properties.clone(),
            quota: stored.quota,
        })
    }

    fn insert(&mut self, seed: DocumentSeed) -> BoxResult<DocRef> {
        let id = DocRef::new(
            seed.id
                .unwrap_or_else(|| Uuid::new_v4().simple().to_string()),
        );
        if self.find(&id).is_ok() {
            return Err(BoxError::InvalidInput(format!("duplicate document id {id}")));
        }

        let parent = seed.parent.map(DocRef::new);
        if let Some(parent_ref) = &parent {
            let parent_doc = self.find(parent_ref).map_err(|_| {
                BoxError::InvalidInput(format!(
                    "document {id} references unknown parent {parent_ref}"
                ))
            })?;
            if !parent_doc.folderish {
                return Err(BoxError::InvalidInput(format!(
                    "document {id} cannot be placed under non-folderish {parent_ref}"
                )));
            }
        }

        self.documents.push(StoredDocument {
            id: id.clone(),
            doc_type: seed.doc_type,
            name: seed.name,
            parent,
            folderish: seed.folderish,
            version_label: seed.version_label,
            lifecycle_state: seed.lifecycle_state,
            properties: seed.properties,
            quota: seed.quota.map(QuotaInfo::new),
            change_token: 0,
        });
        Ok(id)
    }
}

/// Shared in-memory repository. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    state: Arc<RwLock<RepositoryState>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a repository from a parsed seed.
    ///
    /// # Errors
    ///
    /// Returns `BoxError::InvalidInput` for duplicate ids, unknown parents or parents that cannot
    /// hold children. Tags on unknown documents are skipped with a warning.
    pub fn from_seed(seed: RepositorySeed) -> BoxResult<Self> {
        let repo = Self::new();
        for principal in seed.principals {
            repo.add_principal(principal);
        }
        for document in seed.documents {
            repo.insert_document(document)?;
        }
        for tag in seed.tags {
            let doc = DocRef::new(tag.document);
            if let Err(e) = repo.add_tag(&doc, &tag.label, &tag.user) {
                tracing::warn!("skipping seed tag {:?} on {}: {}", tag.label, doc, e);
            }
        }
        Ok(repo)
    }

    pub fn from_yaml_str(yaml: &str) -> BoxResult<Self> {
        let seed: RepositorySeed = serde_yaml::from_str(yaml).map_err(BoxError::SeedParse)?;
        Self::from_seed(seed)
    }

    pub fn from_yaml_file(path: &Path) -> BoxResult<Self> {
        let yaml = std::fs::read_to_string(path).map_err(BoxError::SeedRead)?;
        let repo = Self::from_yaml_str(&yaml)?;
        tracing::info!(
            "loaded {} documents from {}",
            repo.state.read().documents.len(),
            path.display()
        );
        Ok(repo)
    }

    /// Opens a session acting for `principal`.
    pub fn session(&self, principal: impl Into<String>) -> MemorySession {
        MemorySession::new(self.clone(), principal)
    }

    pub fn insert_document(&self, seed: DocumentSeed) -> BoxResult<DocRef> {
        self.state.write().insert(seed)
    }

    pub fn add_principal(&self, principal: Principal) {
        self.state.write().principals.push(principal);
    }

    /// Attaches `label` to `doc` for `username`. Exact duplicates are ignored.
    ///
    /// # Errors
    ///
    /// Returns `BoxError::Tag` for a blank label or an unknown document.
    pub fn add_tag(&self, doc: &DocRef, label: &str, username: &str) -> BoxResult<()> {
        if label.trim().is_empty() {
            return Err(BoxError::Tag {
                doc: doc.clone(),
                reason: "tag label cannot be blank".into(),
            });
        }
        let mut state = self.state.write();
        if state.find(doc).is_err() {
            return Err(BoxError::Tag {
                doc: doc.clone(),
                reason: "document not found".into(),
            });
        }
        let exists = state
            .tags
            .iter()
            .any(|t| &t.doc == doc && t.label == label && t.username == username);
        if !exists {
            state.tags.push(TagEntry {
                doc: doc.clone(),
                label: label.to_string(),
                username: username.to_string(),
            });
        }
        Ok(())
    }

    pub fn clear_tags(&self, doc: &DocRef) {
        self.state.write().tags.retain(|t| &t.doc != doc);
    }

    pub fn set_quota(&self, doc: &DocRef, quota: Option<QuotaInfo>) -> BoxResult<()> {
        self.state.write().find_mut(doc)?.quota = quota;
        Ok(())
    }

    /// Overwrites a single property without stamping the document.
    pub fn set_property(&self, doc: &DocRef, key: &str, value: Option<&str>) -> BoxResult<()> {
        let value = value.map_or(Value::Null, |v| Value::String(v.to_string()));
        self.state
            .write()
            .find_mut(doc)?
            .properties
            .insert(key.to_string(), value);
        Ok(())
    }

    /// Number of moves performed since creation.
    pub fn move_count(&self) -> u64 {
        self.state.read().moves
    }

    /// Number of session commits since creation.
    pub fn commit_count(&self) -> u64 {
        self.state.read().commits
    }
}

impl PrincipalDirectory for MemoryRepository {
    fn get_principal(&self, login_or_id: &str) -> BoxResult<Principal> {
        self.state
            .read()
            .principals
            .iter()
            .find(|p| p.login == login_or_id || p.id == login_or_id)
            .cloned()
            .ok_or_else(|| BoxError::Principal(login_or_id.to_string()))
    }
}

impl TagService for MemoryRepository {
    fn get_document_tags(
        &self,
        _session: &dyn DocumentSession,
        doc_ref: &DocRef,
        username: &str,
    ) -> BoxResult<Vec<Tag>> {
        Ok(self
            .state
            .read()
            .tags
            .iter()
            .filter(|t| &t.doc == doc_ref && t.username == username)
            .map(|t| Tag {
                label: t.label.clone(),
            })
            .collect())
    }

    fn remove_tags(&self, _session: &dyn DocumentSession, doc_ref: &DocRef) -> BoxResult<()> {
        self.clear_tags(doc_ref);
        Ok(())
    }

    fn tag(
        &self,
        _session: &dyn DocumentSession,
        doc_ref: &DocRef,
        label: &str,
        username: &str,
    ) -> BoxResult<()> {
        self.add_tag(doc_ref, label, username)
    }
}

/// A session on a [`MemoryRepository`] acting for one principal.
#[derive(Debug, Clone)]
pub struct MemorySession {
    repo: MemoryRepository,
    principal: String,
}

impl MemorySession {
    pub fn new(repo: MemoryRepository, principal: impl Into<String>) -> Self {
        Self {
            repo,
            principal: principal.into(),
        }
    }
}

impl DocumentSession for MemorySession {
    fn principal_name(&self) -> &str {
        &self.principal
    }

    fn get_document(&self, doc_ref: &DocRef) -> BoxResult<Document> {
        let state = self.repo.state.read();
        state.materialise(state.find(doc_ref)?)
    }

    fn get_parent_document(&self, doc_ref: &DocRef) -> BoxResult<Option<Document>> {
        let state = self.repo.state.read();
        match &state.find(doc_ref)?.parent {
            None => Ok(None),
            Some(parent_ref) => state.materialise(state.find(parent_ref)?).map(Some),
        }
    }

    fn query(&self, query: &DocumentQuery, limit: u64, offset: u64) -> BoxResult<Vec<Document>> {
        let state = self.repo.state.read();
        let DocumentQuery::ChildrenOf(parent) = query;
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);
        state
            .documents
            .iter()
            .filter(|d| d.parent.as_ref() == Some(parent))
            .skip(skip)
            .take(take)
            .map(|d| state.materialise(d))
            .collect()
    }

    fn move_document(
        &self,
        doc_ref: &DocRef,
        new_parent: &DocRef,
        new_name: &str,
    ) -> BoxResult<Document> {
        let mut state = self.repo.state.write();
        state.find(doc_ref)?;

        match state.find(new_parent) {
            Err(_) => return Err(BoxError::moving(doc_ref, new_parent, "target not found")),
            Ok(target) if !target.folderish => {
                return Err(BoxError::moving(
                    doc_ref,
                    new_parent,
                    "target cannot hold children",
                ))
            }
            Ok(_) => {}
        }
        if state.is_within(new_parent, doc_ref) {
            return Err(BoxError::moving(
                doc_ref,
                new_parent,
                "target is the document itself or one of its descendants",
            ));
        }
        if new_name.trim().is_empty() {
            return Err(BoxError::moving(doc_ref, new_parent, "name cannot be blank"));
        }

        let stored = state.find_mut(doc_ref)?;
        stored.parent = Some(new_parent.clone());
        stored.name = new_name.to_string();
        state.moves += 1;

        let moved = state.find(doc_ref)?;
        state.materialise(moved)
    }

    fn save_document(&self, doc: &Document) -> BoxResult<()> {
        let mut state = self.repo.state.write();
        let stored = state.find_mut(&doc.id)?;
        stored.properties = doc.properties.clone();
        stored.properties.insert(
            MODIFIED_PROPERTY.to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        stored.properties.insert(
            LAST_CONTRIBUTOR_PROPERTY.to_string(),
            Value::String(self.principal.clone()),
        );
        stored.change_token += 1;
        Ok(())
    }

    fn save(&self) -> BoxResult<()> {
        let mut state = self.repo.state.write();
        state.commits += 1;
        tracing::debug!("session for {} committed ({})", self.principal, state.commits);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TITLE_PROPERTY;
    use crate::testing::{reports_repository, seed_child, ADMIN, REPORTS_SEED};
    use std::io::Write;

    #[test]
    fn paths_are_derived_from_the_parent_chain() {
        let session = reports_repository().session(ADMIN);
        assert_eq!(session.get_document(&"root".into()).unwrap().path, "/");
        assert_eq!(session.get_document(&"ws".into()).unwrap().path, "/workspaces");
        assert_eq!(
            session.get_document(&"99".into()).unwrap().path,
            "/workspaces/Reports/one.txt"
        );
    }

    #[test]
    fn unknown_document_is_a_lookup_error() {
        let session = reports_repository().session(ADMIN);
        assert!(matches!(
            session.get_document(&"nope".into()),
            Err(BoxError::Lookup(_))
        ));
        assert!(matches!(
            session.get_parent_document(&"nope".into()),
            Err(BoxError::Lookup(_))
        ));
    }

    #[test]
    fn seed_rejects_unknown_parent() {
        let yaml = "documents:\n  - { id: a, type: Folder, name: A, parent: missing }\n";
        assert!(matches!(
            MemoryRepository::from_yaml_str(yaml),
            Err(BoxError::InvalidInput(_))
        ));
    }

    #[test]
    fn seed_rejects_children_of_files() {
        let repo = reports_repository();
        let err = repo
            .insert_document(DocumentSeed {
                id: Some("x".into()),
                doc_type: "File".into(),
                name: "x.txt".into(),
                parent: Some("99".into()),
                folderish: false,
                version_label: default_version_label(),
                lifecycle_state: default_lifecycle_state(),
                quota: None,
                properties: BTreeMap::new(),
            })
            .unwrap_err();
        assert!(matches!(err, BoxError::InvalidInput(_)));
    }

    #[test]
    fn seed_loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(REPORTS_SEED.as_bytes()).unwrap();
        let repo = MemoryRepository::from_yaml_file(file.path()).unwrap();
        assert_eq!(repo.session(ADMIN).get_document(&"42".into()).unwrap().name, "Reports");
    }

    #[test]
    fn malformed_seed_is_a_parse_error() {
        assert!(matches!(
            MemoryRepository::from_yaml_str("documents: [ {"),
            Err(BoxError::SeedParse(_))
        ));
    }

    #[test]
    fn generated_ids_are_canonical_uuids() {
        let repo = reports_repository();
        let id = repo
            .insert_document(DocumentSeed {
                id: None,
                doc_type: "Folder".into(),
                name: "Generated".into(),
                parent: Some("ws".into()),
                folderish: true,
                version_label: default_version_label(),
                lifecycle_state: default_lifecycle_state(),
                quota: None,
                properties: BTreeMap::new(),
            })
            .unwrap();
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn principals_resolve_by_login_or_id() {
        let repo = reports_repository();
        assert_eq!(repo.get_principal("jdoe").unwrap().id, "u-jdoe");
        assert_eq!(repo.get_principal("u-jdoe").unwrap().login, "jdoe");
        assert!(matches!(
            repo.get_principal("ghost"),
            Err(BoxError::Principal(_))
        ));
    }

    #[test]
    fn tags_are_per_user_and_deduplicated() {
        let repo = reports_repository();
        let session = repo.session(ADMIN);
        repo.add_tag(&"42".into(), "finance", ADMIN).unwrap();

        let admin: Vec<String> = repo
            .get_document_tags(&session, &"42".into(), ADMIN)
            .unwrap()
            .into_iter()
            .map(|t| t.label)
            .collect();
        assert_eq!(admin, vec!["finance", "q1"]);

        let jdoe = repo.get_document_tags(&session, &"42".into(), "jdoe").unwrap();
        assert_eq!(jdoe, vec![Tag { label: "private".into() }]);

        repo.remove_tags(&session, &"42".into()).unwrap();
        assert!(repo
            .get_document_tags(&session, &"42".into(), "jdoe")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn query_pages_children_in_insertion_order() {
        let repo = reports_repository();
        seed_child(&repo, "43", "Archive", "42", true);
        seed_child(&repo, "100", "two.txt", "42", false);
        let session = repo.session(ADMIN);
        let query = DocumentQuery::ChildrenOf("42".into());

        let ids = |limit, offset| -> Vec<String> {
            session
                .query(&query, limit, offset)
                .unwrap()
                .into_iter()
                .map(|d| d.id.to_string())
                .collect()
        };
        assert_eq!(ids(100, 0), vec!["99", "43", "100"]);
        assert_eq!(ids(1, 1), vec!["43"]);
        assert!(ids(10, 5).is_empty());
        assert!(ids(0, 0).is_empty());
    }

    #[test]
    fn save_document_persists_properties_and_stamps() {
        let repo = reports_repository();
        let session = MemorySession::new(repo.clone(), "jdoe");
        let mut doc = session.get_document(&"42".into()).unwrap();
        doc.set_title(Some("Renamed"));
        session.save_document(&doc).unwrap();

        let saved = session.get_document(&"42".into()).unwrap();
        assert_eq!(saved.string_property(TITLE_PROPERTY).unwrap(), Some("Renamed"));
        assert_eq!(
            saved.string_property(LAST_CONTRIBUTOR_PROPERTY).unwrap(),
            Some("jdoe")
        );
        assert!(saved.timestamp_property(MODIFIED_PROPERTY).is_ok());
        assert_ne!(saved.cache_key, doc.cache_key);
    }

    #[test]
    fn move_into_a_file_is_rejected() {
        let repo = reports_repository();
        seed_child(&repo, "43", "Archive", "42", true);
        let session = repo.session(ADMIN);
        let err = session
            .move_document(&"43".into(), &"99".into(), "Archive")
            .unwrap_err();
        assert!(matches!(err, BoxError::Move { .. }));
        assert_eq!(repo.move_count(), 0);
    }
}
