//! Header-based request identity.
//!
//! The demo deliberately does not implement password hashing or token
//! mechanics; a fronting proxy is expected to authenticate the caller and
//! forward `x-user-id` (required) and `x-user-role` (optional, `admin`
//! elevates). The extractor rejects requests without a usable identity.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use cartcore::UserId;

use crate::error::ApiError;

/// Role carried by the request identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// A regular shopper.
    Customer,
    /// May read the global order history.
    Admin,
}

/// The authenticated caller, extracted from identity headers.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// The caller's user id.
    pub id: UserId,
    /// The caller's role.
    pub role: Role,
}

impl CurrentUser {
    /// Whether the caller holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw_id = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("authentication required"))?;
        let id = UserId::try_new(raw_id.to_string())
            .map_err(|_| ApiError::unauthorized("authentication required"))?;

        let role = match parts
            .headers
            .get("x-user-role")
            .and_then(|v| v.to_str().ok())
        {
            Some("admin") => Role::Admin,
            _ => Role::Customer,
        };

        Ok(Self { id, role })
    }
}
