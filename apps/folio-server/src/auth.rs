//! Caller identity
//!
//! Sessions are handled upstream. The auth proxy forwards the resolved user id
//! in a trusted header; [`resolve_identity`] moves it into the request
//! extensions and [`RequestContext`] exposes it to handlers.

use std::convert::Infallible;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Resolved identity of the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: String,
}

/// Request-scoped state visible to actions
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    user: Option<UserIdentity>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self {
            user: Some(UserIdentity { id: user_id.into() }),
        }
    }
}

/// Get the caller's identity or fail with `Unauthorized`
pub fn require_authenticated_user(ctx: &RequestContext) -> Result<UserIdentity> {
    ctx.user.clone().ok_or(AppError::Unauthorized)
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        Ok(RequestContext {
            user: parts.extensions.get::<UserIdentity>().cloned(),
        })
    }
}

/// Middleware: read the forwarded user header into a [`UserIdentity`]
///
/// A missing or blank header leaves the request anonymous; rejecting it is
/// up to each action.
pub async fn resolve_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = state.config().auth.user_header.as_str();
    let identity = request
        .headers()
        .get(header)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| UserIdentity { id: id.to_string() });

    if let Some(identity) = identity {
        tracing::debug!(user_id = %identity.id, "Resolved caller identity");
        request.extensions_mut().insert(identity);
    }

    next.run(request).await
}
