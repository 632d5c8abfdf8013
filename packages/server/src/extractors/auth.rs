use axum::extract::{FromRef, FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Authenticated user extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication, or take
/// `Option<AuthUser>` where the caller identity is only used to personalise
/// the response (leaderboards, competition details).
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
    pub role: String,
    pub permissions: Vec<String>,
}

impl AuthUser {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    /// Returns `Ok(())` if the user has the given permission, `Err(PermissionDenied)` otherwise.
    pub fn require_permission(&self, permission: &str) -> Result<(), AppError> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }

    /// Allow the owner of a resource, or anyone holding `permission`.
    pub fn require_owner_or(&self, owner_id: i32, permission: &str) -> Result<(), AppError> {
        if self.user_id == owner_id {
            return Ok(());
        }
        self.require_permission(permission)
    }
}

fn bearer_token(parts: &Parts) -> Option<Result<&str, AppError>> {
    let header = parts.headers.get("Authorization")?;
    Some(
        header
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(AppError::TokenInvalid),
    )
}

fn decode_user(token: &str, secret: &str) -> Result<AuthUser, AppError> {
    let claims = jwt::verify(token, secret).map_err(|_| AppError::TokenInvalid)?;
    Ok(AuthUser {
        user_id: claims.uid,
        username: claims.sub,
        role: claims.role,
        permissions: claims.permissions,
    })
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AppError::TokenMissing)??;
        let state = AppState::from_ref(state);
        decode_user(token, &state.config.auth.jwt_secret)
    }
}

impl<S> OptionalFromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    /// No header means an anonymous caller; a malformed or expired token is
    /// still rejected.
    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(None);
        };
        let state = AppState::from_ref(state);
        decode_user(token?, &state.config.auth.jwt_secret).map(Some)
    }
}
