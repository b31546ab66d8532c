//! Auth Middleware
//!
//! Two-state session gate: a request is either Unauthenticated or
//! Authenticated(user). Reaching Authenticated requires the access-token
//! cookie to be present, verify against the access secret, and reference a
//! user that still exists in the credential store. Any failure
//! short-circuits with 401 before the handler runs; an expired access
//! token is never silently refreshed here.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kernel::error::app_error::AppError;
use kernel::id::UserId;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::{TokenKind, TokenService};
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_role::UserRole;
use crate::error::AuthError;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

/// The authenticated user, attached to request extensions for downstream
/// handlers. Deliberately excludes the password hash.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            name: user.name,
            email: user.email.into_db(),
            role: user.role,
        }
    }
}

/// Middleware that requires a valid access token
pub async fn require_auth<R>(
    State(state): State<AuthMiddlewareState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let token = platform::cookie::extract_cookie(req.headers(), &state.config.access_cookie_name)
        .ok_or(AuthError::Unauthorized)?;

    let user_id = TokenService::new(state.config.clone()).verify(&token, TokenKind::Access)?;

    // Token may outlive its user; a deleted account must not authenticate
    let user = state
        .repo
        .find_by_id(&user_id)
        .await?
        .ok_or(AuthError::Unauthorized)?;

    req.extensions_mut().insert(CurrentUser::from(user));

    Ok(next.run(req).await)
}

/// Middleware that requires the Admin role.
///
/// Composes after [`require_auth`]: a missing `CurrentUser` means the auth
/// gate was not applied and is treated as unauthorized, while a non-admin
/// user gets a forbidden response (not 401, not 404).
pub async fn require_admin(req: Request<Body>, next: Next) -> Result<Response, Response> {
    match req.extensions().get::<CurrentUser>() {
        Some(user) if user.role.is_admin() => Ok(next.run(req).await),
        Some(user) => {
            tracing::warn!(user_id = %user.user_id, "Non-admin user hit an admin route");
            Err(AppError::forbidden("Admin access required").into_response())
        }
        None => Err(AppError::unauthorized("Unauthorized").into_response()),
    }
}
