//! Applying an inbound Box folder onto its backing document.
//!
//! ## Full-replace semantics
//!
//! Every field of the incoming folder is authoritative. A field missing from the inbound JSON is
//! not "left alone": it overwrites the document with its empty value. Omitting `description`
//! clears the description and omitting `tags` removes every tag. Callers wanting to change a
//! single field must send back the complete folder as returned by [`crate::build_item`].
//!
//! Two fields cannot be empty because the folder could no longer be mapped afterwards:
//! `parent.id` and `owned_by.id`. Both are checked before anything is mutated.
//!
//! ## Order of operations
//!
//! 1. title and description from `name` and `description`,
//! 2. a move (with rename to `name`) when `parent.id` differs from the current parent,
//! 3. creator from `owned_by.id`,
//! 4. tags cleared and re-added for the acting principal,
//! 5. document saved and session committed.
//!
//! A failed move aborts the update before anything is saved. A failed tag mutation does not undo
//! the earlier steps: the document is still saved and committed, then the tag error is returned.

use crate::constants::CREATOR_PROPERTY;
use crate::document::Document;
use crate::model::BoxItem;
use crate::session::BoxContext;
use crate::tags::replace_tags;
use crate::{BoxError, BoxResult, DocRef};

/// Applies `incoming` onto `doc` and commits.
///
/// Once the session is committed (including after a tag failure) `doc` is reloaded from the
/// store, so it carries the saved properties, stamps and cache key.
///
/// # Errors
///
/// - `BoxError::Property` if `incoming` has no parent id or no owner id,
/// - `BoxError::Lookup` if the current parent cannot be resolved,
/// - `BoxError::Move` if the store rejects the move,
/// - `BoxError::Tag` if clearing or adding a tag fails (reported after the commit),
/// - any error from saving or committing.
pub fn apply_update(ctx: &BoxContext<'_>, doc: &mut Document, incoming: &BoxItem) -> BoxResult<()> {
    let new_parent = incoming
        .parent
        .as_ref()
        .map(|p| p.id.as_str())
        .filter(|id| !id.is_empty())
        .map(DocRef::new)
        .ok_or_else(|| BoxError::property(&doc.id, "parent", "incoming folder has no parent id"))?;
    let owner = incoming
        .owned_by
        .as_ref()
        .map(|owner| owner.id.as_str())
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| {
            BoxError::property(&doc.id, CREATOR_PROPERTY, "incoming folder has no owner id")
        })?;

    doc.set_title(Some(&incoming.name));
    doc.set_description(incoming.description.as_deref());

    let current_parent = ctx.session.get_parent_document(&doc.id)?;
    if current_parent.as_ref().map(|p| &p.id) != Some(&new_parent) {
        tracing::info!(
            "moving {} from {:?} to {} as {:?}",
            doc.id,
            current_parent.as_ref().map(|p| p.id.as_str()),
            new_parent,
            incoming.name
        );
        let moved = ctx
            .session
            .move_document(&doc.id, &new_parent, &incoming.name)?;
        doc.parent_ref = moved.parent_ref;
        doc.name = moved.name;
        doc.path = moved.path;
    }

    doc.set_creator(Some(owner));

    let tag_result = replace_tags(ctx, doc, &incoming.tags);
    if let Err(e) = &tag_result {
        tracing::warn!("tag update on {} failed: {}", doc.id, e);
    }

    ctx.session.save_document(doc)?;
    ctx.session.save()?;
    *doc = ctx.session.get_document(&doc.id)?;

    tag_result
}
