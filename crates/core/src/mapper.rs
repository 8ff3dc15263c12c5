//! Building Box items from repository documents.
//!
//! ## Derivation rules
//!
//! | Box field            | Source                                                          |
//! |----------------------|-----------------------------------------------------------------|
//! | `type`, `id`, `name` | document type tag, identifier and name                          |
//! | `sequence_id`        | document cache key                                              |
//! | `etag`               | cache key followed by version label                             |
//! | `created_at` …       | `created` / `modified` properties, ISO-8601 with milliseconds   |
//! | `size`               | quota inner size, `-1` without the quota capability             |
//! | `path_collection`    | count: path segments; entries: ancestors, parent first          |
//! | `parent`             | immediate parent, placeholder sequence id and etag              |
//! | `created_by`         | `creator` principal, also used for `owned_by`                   |
//! | `modified_by`        | `last_contributor` principal                                    |
//! | `shared_link`        | always `null`                                                   |
//! | `item_status`        | lifecycle state                                                 |
//! | `tags`               | tag labels for the acting principal                             |
//!
//! Folder-shaped items additionally carry placeholder `folder_upload_email` and the first page
//! of children as `item_collection`.
//!
//! `path_collection.total_count` comes from the path string while `entries` comes from walking
//! parent references; the two are not reconciled and can disagree (the root, or a separator
//! that does not occur in the path).

use crate::children::build_children;
use crate::constants::{
    CREATED_PROPERTY, CREATOR_PROPERTY, DESCRIPTION_PROPERTY, LAST_CONTRIBUTOR_PROPERTY,
    MODIFIED_PROPERTY, UNKNOWN_SIZE,
};
use crate::document::Document;
use crate::hierarchy::{parent_summary, path_segment_count, walk_ancestors};
use crate::model::{BoxCollection, BoxItem, FolderUploadEmail};
use crate::session::BoxContext;
use crate::tags::document_tags;
use crate::user::resolve_user;
use crate::BoxResult;
use chrono::{DateTime, FixedOffset, SecondsFormat};

/// Renders a timestamp as ISO-8601 with milliseconds and a numeric offset.
pub(crate) fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, false)
}

/// Builds the full Box item for `doc`.
///
/// Folderish documents come back folder-shaped, with their first page of children embedded
/// using the configured default paging.
///
/// # Errors
///
/// - `BoxError::Lookup` if the parent (or any ancestor) cannot be resolved,
/// - `BoxError::Principal` if the creator or last contributor is unknown,
/// - `BoxError::Property` if a timestamp or user property is missing or malformed,
/// - any error from the tag service or the child query.
pub fn build_item(ctx: &BoxContext<'_>, doc: &Document) -> BoxResult<BoxItem> {
    tracing::debug!("mapping document {} ({})", doc.id, doc.doc_type);

    let created_at = format_timestamp(&doc.timestamp_property(CREATED_PROPERTY)?);
    let modified_at = format_timestamp(&doc.timestamp_property(MODIFIED_PROPERTY)?);
    let description = doc.string_property(DESCRIPTION_PROPERTY)?.map(str::to_string);

    let size = doc.quota().map_or(UNKNOWN_SIZE, |q| q.inner_size());

    let parent = parent_summary(ctx.session, doc)?;
    let path_collection = BoxCollection {
        total_count: path_segment_count(&doc.path, ctx.config.path_separator()),
        entries: walk_ancestors(ctx.session, doc)?,
    };

    let creator = resolve_user(ctx.principals, doc.required_string_property(CREATOR_PROPERTY)?)?;
    let last_contributor = resolve_user(
        ctx.principals,
        doc.required_string_property(LAST_CONTRIBUTOR_PROPERTY)?,
    )?;

    let tags = document_tags(ctx.tags, ctx.session, doc)?;

    let (folder_upload_email, item_collection) = if doc.folderish {
        let children = build_children(
            ctx,
            doc,
            ctx.config.default_limit(),
            ctx.config.default_offset(),
            ctx.config.default_fields(),
        )?;
        (Some(FolderUploadEmail::default()), Some(children))
    } else {
        (None, None)
    };

    Ok(BoxItem {
        item_type: doc.doc_type.clone(),
        id: doc.id.to_string(),
        sequence_id: Some(doc.cache_key.clone()),
        etag: Some(format!("{}{}", doc.cache_key, doc.version_label)),
        name: doc.name.clone(),
        created_at: Some(created_at),
        modified_at: Some(modified_at),
        description,
        size,
        path_collection: Some(path_collection),
        created_by: Some(creator.clone()),
        modified_by: Some(last_contributor),
        owned_by: Some(creator),
        shared_link: None,
        folder_upload_email,
        parent: Some(parent),
        item_status: Some(doc.lifecycle_state.clone()),
        tags,
        item_collection,
    })
}
