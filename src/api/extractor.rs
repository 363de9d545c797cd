//! Bearer-token authentication extractor

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::error::ApiError;
use crate::state::{AppState, SessionContext};

/// Resolves `Authorization: Bearer <token>` into the caller's [`SessionContext`].
/// Missing, malformed, unknown or expired tokens are answered with 401.
#[async_trait]
impl FromRequestParts<Arc<AppState>> for SessionContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;

        Ok(state.authorize(token)?)
    }
}
