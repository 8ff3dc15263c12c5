//! Ancestor walking for `parent` and `path_collection`.

use crate::constants::PLACEHOLDER_VERSION;
use crate::document::{DocRef, Document};
use crate::model::{ParentSummary, PathEntry};
use crate::session::DocumentSession;
use crate::{BoxError, BoxResult};
use std::collections::HashSet;

/// Lazy walk from a document's immediate parent up to the root.
///
/// Each step fetches the parent of the previously yielded document. The walk ends when the
/// store reports no further parent, or after yielding the first error. A repeated ancestor is
/// reported as a lookup error so a corrupt parent chain cannot loop forever.
pub struct Ancestors<'a> {
    session: &'a dyn DocumentSession,
    cursor: Option<DocRef>,
    seen: HashSet<DocRef>,
}

impl<'a> Ancestors<'a> {
    pub fn new(session: &'a dyn DocumentSession, start: &DocRef) -> Self {
        let mut seen = HashSet::new();
        seen.insert(start.clone());
        Self {
            session,
            cursor: Some(start.clone()),
            seen,
        }
    }
}

impl Iterator for Ancestors<'_> {
    type Item = BoxResult<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        let child = self.cursor.take()?;
        match self.session.get_parent_document(&child) {
            Ok(Some(parent)) => {
                if !self.seen.insert(parent.id.clone()) {
                    return Some(Err(BoxError::Lookup(format!(
                        "ancestor chain of {child} revisits {}",
                        parent.id
                    ))));
                }
                self.cursor = Some(parent.id.clone());
                Some(Ok(parent))
            }
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

/// Minimal summary of an ancestor with placeholder sequence id and etag.
pub fn mini_item(doc: &Document) -> PathEntry {
    PathEntry {
        item_type: doc.doc_type.clone(),
        id: doc.id.to_string(),
        sequence_id: PLACEHOLDER_VERSION.to_string(),
        etag: PLACEHOLDER_VERSION.to_string(),
        name: doc.name.clone(),
    }
}

/// Ordered ancestor summaries, immediate parent first.
///
/// # Errors
///
/// Any failed parent lookup aborts the walk; the partial chain is discarded.
pub fn walk_ancestors(session: &dyn DocumentSession, doc: &Document) -> BoxResult<Vec<PathEntry>> {
    Ancestors::new(session, &doc.id)
        .map(|ancestor| ancestor.map(|d| mini_item(&d)))
        .collect()
}

/// Summary of the document's immediate parent.
///
/// # Errors
///
/// Returns `BoxError::Lookup` if the document has no parent reference or the parent is missing.
pub fn parent_summary(session: &dyn DocumentSession, doc: &Document) -> BoxResult<ParentSummary> {
    let parent_ref = doc
        .parent_ref
        .as_ref()
        .ok_or_else(|| BoxError::Lookup(format!("document {} has no parent", doc.id)))?;
    let parent = session.get_document(parent_ref)?;
    Ok(mini_item(&parent))
}

/// Number of segments in `path` split on `separator`, with trailing empty segments dropped.
///
/// A leading separator contributes an empty first segment, so `/a/b` counts 3. An empty path
/// counts 1.
pub fn path_segment_count(path: &str, separator: &str) -> u64 {
    let mut segments: Vec<&str> = path.split(separator).collect();
    while segments.len() > 1 && segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }
    if segments.len() == 1 && segments[0].is_empty() && !path.is_empty() {
        // the path was nothing but separators
        return 0;
    }
    segments.len() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::DocumentQuery;
    use crate::testing::{reports_repository, ADMIN};
    use crate::MemorySession;

    #[test]
    fn walks_from_parent_to_root() {
        let repo = reports_repository();
        let session = MemorySession::new(repo, ADMIN);
        let file = session.get_document(&"99".into()).unwrap();

        let chain = walk_ancestors(&session, &file).unwrap();
        let ids: Vec<&str> = chain.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["42", "ws", "root"]);
        assert!(chain.iter().all(|e| e.sequence_id == "-1" && e.etag == "-1"));
        assert_eq!(chain[0].item_type, "Folder");
        assert_eq!(chain[0].name, "Reports");
    }

    #[test]
    fn walk_is_restartable() {
        let repo = reports_repository();
        let session = MemorySession::new(repo, ADMIN);
        let file = session.get_document(&"99".into()).unwrap();
        let first = walk_ancestors(&session, &file).unwrap();
        let second = walk_ancestors(&session, &file).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn root_has_no_ancestors_and_no_parent_summary() {
        let repo = reports_repository();
        let session = MemorySession::new(repo, ADMIN);
        let root = session.get_document(&"root".into()).unwrap();
        assert!(walk_ancestors(&session, &root).unwrap().is_empty());
        assert!(matches!(
            parent_summary(&session, &root),
            Err(BoxError::Lookup(_))
        ));
    }

    #[test]
    fn dangling_parent_aborts_the_walk() {
        let repo = reports_repository();
        let session = MemorySession::new(repo, ADMIN);
        let mut orphan = session.get_document(&"99".into()).unwrap();
        orphan.id = DocRef::new("ghost");
        orphan.parent_ref = Some(DocRef::new("missing"));
        // the walk starts from the document id, which the store does not know
        assert!(matches!(
            walk_ancestors(&session, &orphan),
            Err(BoxError::Lookup(_))
        ));
        assert!(matches!(
            parent_summary(&session, &orphan),
            Err(BoxError::Lookup(_))
        ));
    }

    #[test]
    fn segment_count_splits_on_separator() {
        assert_eq!(path_segment_count("/workspaces/Reports/one.txt", "/"), 4);
        assert_eq!(path_segment_count("/workspaces/Reports/", "/"), 3);
        assert_eq!(path_segment_count("Reports", "/"), 1);
        assert_eq!(path_segment_count("", "/"), 1);
        assert_eq!(path_segment_count("/", "/"), 0);
        // a separator absent from the path leaves a single segment
        assert_eq!(path_segment_count("/workspaces/Reports", "\\"), 1);
    }

    /// Session whose parent lookup fails for one document.
    struct BrokenChain {
        inner: MemorySession,
        broken_at: DocRef,
    }

    impl DocumentSession for BrokenChain {
        fn principal_name(&self) -> &str {
            self.inner.principal_name()
        }

        fn get_document(&self, doc_ref: &DocRef) -> BoxResult<Document> {
            self.inner.get_document(doc_ref)
        }

        fn get_parent_document(&self, doc_ref: &DocRef) -> BoxResult<Option<Document>> {
            if doc_ref == &self.broken_at {
                return Err(BoxError::Lookup(format!("parent of {doc_ref}")));
            }
            self.inner.get_parent_document(doc_ref)
        }

        fn query(
            &self,
            query: &DocumentQuery,
            limit: u64,
            offset: u64,
        ) -> BoxResult<Vec<Document>> {
            self.inner.query(query, limit, offset)
        }

        fn move_document(
            &self,
            doc_ref: &DocRef,
            new_parent: &DocRef,
            new_name: &str,
        ) -> BoxResult<Document> {
            self.inner.move_document(doc_ref, new_parent, new_name)
        }

        fn save_document(&self, doc: &Document) -> BoxResult<()> {
            self.inner.save_document(doc)
        }

        fn save(&self) -> BoxResult<()> {
            self.inner.save()
        }
    }

    #[test]
    fn failure_partway_up_the_chain_discards_the_partial_walk() {
        let session = BrokenChain {
            inner: MemorySession::new(reports_repository(), ADMIN),
            broken_at: DocRef::new("42"),
        };
        let file = session.get_document(&"99".into()).unwrap();

        let mut steps = Ancestors::new(&session, &file.id);
        assert_eq!(steps.next().unwrap().unwrap().id, DocRef::new("42"));
        assert!(matches!(steps.next(), Some(Err(BoxError::Lookup(_)))));

        assert!(matches!(
            walk_ancestors(&session, &file),
            Err(BoxError::Lookup(_))
        ));
    }
}
