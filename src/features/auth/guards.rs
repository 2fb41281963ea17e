//! Role-based authorization guards.
//!
//! Citizens need no guard: any authenticated session may report and track
//! its own violations through the plain `AuthenticatedUser` extractor.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Guard for authority-side operations (dashboard, status updates).
///
/// Allows users with the "authority" or "super_admin" role.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAuthority(user): RequireAuthority) { ... }
/// ```
pub struct RequireAuthority(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAuthority
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

        if !user.has_authority_access() {
            return Err(AppError::Forbidden("Authority access required".to_string()));
        }

        Ok(RequireAuthority(user.clone()))
    }
}
