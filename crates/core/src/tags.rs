//! Reading and replacing a document's tags through the tag service.

use crate::document::Document;
use crate::session::{BoxContext, DocumentSession, TagService};
use crate::BoxResult;

/// Tag labels on `doc` for the session's acting principal, in the order the service returns them.
pub fn document_tags(
    tags: &dyn TagService,
    session: &dyn DocumentSession,
    doc: &Document,
) -> BoxResult<Vec<String>> {
    let found = tags.get_document_tags(session, &doc.id, session.principal_name())?;
    Ok(found.into_iter().map(|t| t.label).collect())
}

/// Clears every tag on `doc` and re-adds `labels` for the acting principal.
///
/// Stops at the first failure; tags added before it stay in place.
pub fn replace_tags(ctx: &BoxContext<'_>, doc: &Document, labels: &[String]) -> BoxResult<()> {
    ctx.tags.remove_tags(ctx.session, &doc.id)?;
    let username = ctx.session.principal_name();
    for label in labels {
        ctx.tags.tag(ctx.session, &doc.id, label, username)?;
    }
    tracing::debug!("replaced tags on {} with {:?}", doc.id, labels);
    Ok(())
}
