//! Authenticated caller context

use uuid::Uuid;

/// Who is making a request, resolved from their bearer token.
///
/// Passed explicitly into every per-user operation on [`super::AppState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub user_id: Uuid,
    pub token: String,
}
