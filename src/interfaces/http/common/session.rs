//! Caller context passed explicitly through request handling

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::ApiError;
use crate::domain::DomainError;

/// Header carrying the storefront's user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Longest user id accepted, same bound as the `userId` body field
pub const MAX_USER_ID_CHARS: usize = 128;

/// Who is calling. Built per request from headers; never stored globally.
///
/// Extract in handlers: `session: SessionContext`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub user_id: Option<String>,
}

impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from);

        if let Some(id) = &user_id {
            if id.chars().count() > MAX_USER_ID_CHARS {
                return Err(DomainError::InvalidArgument(format!(
                    "X-User-Id must be at most {MAX_USER_ID_CHARS} characters"
                ))
                .into());
            }
        }

        Ok(Self { user_id })
    }
}
