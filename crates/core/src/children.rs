//! Child collections of folders.

use crate::constants::{CREATED_PROPERTY, MODIFIED_PROPERTY};
use crate::document::Document;
use crate::mapper::format_timestamp;
use crate::model::{BoxCollection, ChildSummary, ItemSummary};
use crate::session::{BoxContext, DocumentQuery};
use crate::{BoxError, BoxResult};

fn parse_count(name: &str, value: &str) -> BoxResult<u64> {
    value.trim().parse::<u64>().map_err(|_| {
        BoxError::BadRequest(format!(
            "{name} must be a non-negative integer, got {value:?}"
        ))
    })
}

/// Projects one child, choosing the folder or file shape from the child itself.
pub fn child_summary(child: &Document) -> BoxResult<ChildSummary> {
    let summary = ItemSummary {
        id: child.id.to_string(),
        name: child.name.clone(),
        created_at: format_timestamp(&child.timestamp_property(CREATED_PROPERTY)?),
        modified_at: format_timestamp(&child.timestamp_property(MODIFIED_PROPERTY)?),
    };
    Ok(if child.folderish {
        ChildSummary::Folder(summary)
    } else {
        ChildSummary::File(summary)
    })
}

/// Builds one page of `folder`'s direct children.
///
/// `limit` and `offset` arrive as the raw query-string values. `fields` is accepted for
/// compatibility but ignored: entries always carry the same fixed set of fields.
/// `total_count` is the size of the returned page, not the number of children overall.
///
/// # Errors
///
/// Returns `BoxError::BadRequest` if `limit` or `offset` is not an unsigned integer, and
/// propagates query and property errors.
pub fn build_children(
    ctx: &BoxContext<'_>,
    folder: &Document,
    limit: &str,
    offset: &str,
    fields: &str,
) -> BoxResult<BoxCollection<ChildSummary>> {
    let limit = parse_count("limit", limit)?;
    let offset = parse_count("offset", offset)?;
    tracing::debug!(
        "listing children of {} (limit={}, offset={}, fields={:?} ignored)",
        folder.id,
        limit,
        offset,
        fields
    );

    let children = ctx
        .session
        .query(&DocumentQuery::ChildrenOf(folder.id.clone()), limit, offset)?;

    let entries = children
        .iter()
        .map(child_summary)
        .collect::<BoxResult<Vec<_>>>()?;

    Ok(BoxCollection {
        total_count: entries.len() as u64,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{reports_repository, seed_child, ADMIN};
    use crate::{CoreConfig, DocumentSession, MemoryRepository, MemorySession};

    fn children_of(
        repo: &MemoryRepository,
        id: &str,
        limit: &str,
        offset: &str,
    ) -> BoxResult<BoxCollection<ChildSummary>> {
        let session = MemorySession::new(repo.clone(), ADMIN);
        let config = CoreConfig::default();
        let ctx = BoxContext::new(&session, repo, repo, &config);
        let folder = session.get_document(&id.into())?;
        build_children(&ctx, &folder, limit, offset, "*")
    }

    #[test]
    fn shape_is_chosen_per_child() {
        let repo = reports_repository();
        seed_child(&repo, "43", "Archive", "42", true);
        seed_child(&repo, "100", "two.txt", "42", false);

        let page = children_of(&repo, "42", "100", "0").unwrap();
        let shapes: Vec<(&str, bool)> = page
            .entries
            .iter()
            .map(|c| (c.summary().id.as_str(), c.is_folder()))
            .collect();
        assert_eq!(shapes, vec![("99", false), ("43", true), ("100", false)]);
    }

    #[test]
    fn page_respects_limit_and_offset() {
        let repo = reports_repository();
        seed_child(&repo, "43", "Archive", "42", true);
        seed_child(&repo, "100", "two.txt", "42", false);

        let page = children_of(&repo, "42", "2", "1").unwrap();
        assert_eq!(page.total_count, 2);
        assert_eq!(page.entries[0].summary().id, "43");

        let page = children_of(&repo, "42", "1", "0").unwrap();
        assert!(page.entries.len() <= 1);
        // the count reflects the page, not all three children
        assert_eq!(page.total_count, 1);
    }

    #[test]
    fn non_numeric_paging_is_a_bad_request() {
        let repo = reports_repository();
        assert!(matches!(
            children_of(&repo, "42", "ten", "0"),
            Err(BoxError::BadRequest(_))
        ));
        assert!(matches!(
            children_of(&repo, "42", "10", "-1"),
            Err(BoxError::BadRequest(_))
        ));
    }

    #[test]
    fn empty_folder_has_empty_collection() {
        let repo = reports_repository();
        seed_child(&repo, "43", "Archive", "42", true);
        let page = children_of(&repo, "43", "100", "0").unwrap();
        assert_eq!(page.total_count, 0);
        assert!(page.entries.is_empty());
    }
}
