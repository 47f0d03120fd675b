//! Owner identity boundary
//!
//! Authentication happens upstream; by the time a request reaches this
//! service the gateway has verified the caller and put their identity in a
//! trusted header. This extractor surfaces that identity and performs no
//! further authorization.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::Error;

/// Header carrying the verified owner identity
pub const OWNER_ID_HEADER: &str = "x-user-id";

/// Verified owner identity of the current request
#[derive(Debug, Clone)]
pub struct OwnerIdentity(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for OwnerIdentity
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        parts
            .headers
            .get(OWNER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|owner| !owner.is_empty())
            .map(|owner| OwnerIdentity(owner.to_string()))
            .ok_or_else(|| {
                Error::Unauthorized(format!(
                    "missing verified owner identity ({} header)",
                    OWNER_ID_HEADER
                ))
            })
    }
}
