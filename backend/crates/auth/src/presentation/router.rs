//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::infra::postgres::PgUserRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthMiddlewareState, require_auth};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgUserRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let repo = Arc::new(repo);
    let config = Arc::new(config);

    let state = AuthAppState {
        repo: repo.clone(),
        config: config.clone(),
    };
    let mw_state = AuthMiddlewareState { repo, config };

    Router::new()
        .route("/signup", post(handlers::sign_up::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/logout", post(handlers::logout::<R>))
        .route("/refresh-token", post(handlers::refresh_token::<R>))
        .route(
            "/profile",
            get(handlers::profile)
                .layer(middleware::from_fn_with_state(mw_state, require_auth::<R>)),
        )
        .with_state(state)
}

/// Create the Users router (profile read/update) with PostgreSQL repository
pub fn users_router(repo: PgUserRepository, config: AuthConfig) -> Router {
    users_router_generic(repo, config)
}

/// Create a generic Users router for any repository implementation
pub fn users_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let repo = Arc::new(repo);
    let config = Arc::new(config);

    let state = AuthAppState {
        repo: repo.clone(),
        config: config.clone(),
    };
    let mw_state = AuthMiddlewareState { repo, config };

    Router::new()
        .route("/profile", get(handlers::profile))
        .route("/profile", put(handlers::update_profile::<R>))
        .route_layer(middleware::from_fn_with_state(mw_state, require_auth::<R>))
        .with_state(state)
}
