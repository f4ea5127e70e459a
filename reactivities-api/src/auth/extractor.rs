use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use activities::UserId;

use crate::routes::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The user a request acts on behalf of, taken from the `X-User-Id` header.
///
/// Identity is asserted by whatever sits in front of the API. Returns 401
/// Unauthorized when the header is missing or blank.
#[derive(Debug, Clone)]
pub struct ActingUser(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for ActingUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

        Ok(ActingUser(UserId::new(user)))
    }
}
