//! Box user summaries for repository principals.

use crate::constants::USER_TYPE;
use crate::model::UserSummary;
use crate::session::{Principal, PrincipalDirectory};
use crate::BoxResult;

/// Projects a principal into a Box user summary. The display name is `first + " " + last`.
pub fn user_summary(principal: &Principal) -> UserSummary {
    UserSummary {
        item_type: USER_TYPE.to_string(),
        id: principal.id.clone(),
        name: format!("{} {}", principal.first_name, principal.last_name),
        login: principal.login.clone(),
    }
}

/// Looks a principal up and projects it.
///
/// # Errors
///
/// Propagates the directory's `BoxError::Principal` when the principal is unknown.
pub fn resolve_user(directory: &dyn PrincipalDirectory, login_or_id: &str) -> BoxResult<UserSummary> {
    let principal = directory.get_principal(login_or_id)?;
    Ok(user_summary(&principal))
}
