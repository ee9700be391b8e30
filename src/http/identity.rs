use super::error::ApiError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// Header carrying the caller's identity
pub const USER_ID_HEADER: &str = "x-user-id";

/// Identity of the caller, used to scope meetings to their owner.
///
/// This is the seam where a real authenticated session plugs in; today it
/// trusts the `x-user-id` header. Use `Option<UserIdentity>` for routes
/// that also accept anonymous callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for UserIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| UserIdentity(v.to_string()))
            .ok_or_else(|| ApiError::BadRequest("User identity is required".to_string()))
    }
}
