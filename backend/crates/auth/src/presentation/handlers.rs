//! HTTP Handlers

use axum::Json;
use axum::extract::{Extension, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{AppendHeaders, IntoResponse};
use platform::cookie::CookieConfig;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::TokenPair;
use crate::application::{
    RefreshTokenUseCase, SignInInput, SignInUseCase, SignUpInput, SignUpUseCase,
    UpdateProfileInput, UpdateProfileUseCase,
};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    LoginRequest, MessageResponse, SignUpRequest, UpdateProfileRequest, UserResponse,
};
use crate::presentation::middleware::CurrentUser;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/auth/signup
pub async fn sign_up<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.repo.clone(), state.config.clone());

    let input = SignUpInput {
        name: req.name,
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        set_token_cookies(&state.config, &output.tokens),
        Json(UserResponse::from(&output.user)),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.repo.clone(), state.config.clone());

    let input = SignInInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok((
        StatusCode::OK,
        set_token_cookies(&state.config, &output.tokens),
        Json(UserResponse::from(&output.user)),
    ))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/auth/logout
///
/// A missing refresh cookie is a client error; any present refresh token,
/// valid or not, still gets both cookies cleared. There is no server-side
/// token state to invalidate.
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    platform::cookie::extract_cookie(&headers, &state.config.refresh_cookie_name)
        .ok_or(AuthError::MissingRefreshToken)?;

    Ok((
        StatusCode::OK,
        clear_token_cookies(&state.config),
        Json(MessageResponse::new("Logged out successfully")),
    ))
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /api/auth/refresh-token
pub async fn refresh_token<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let refresh = platform::cookie::extract_cookie(&headers, &state.config.refresh_cookie_name)
        .ok_or(AuthError::Unauthorized)?;

    let access_token = RefreshTokenUseCase::new(state.config.clone()).execute(&refresh)?;

    let cookie = access_cookie(&state.config).build_set_cookie(&access_token);

    Ok((
        StatusCode::OK,
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(MessageResponse::new("Access token refreshed successfully")),
    ))
}

// ============================================================================
// Profile
// ============================================================================

/// GET /api/auth/profile (also GET /api/users/profile)
pub async fn profile(Extension(user): Extension<CurrentUser>) -> Json<ProfileResponse> {
    Json(ProfileResponse::from(&user))
}

/// PUT /api/users/profile
pub async fn update_profile<R>(
    State(state): State<AuthAppState<R>>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = UpdateProfileUseCase::new(state.repo.clone());

    let input = UpdateProfileInput {
        name: req.name,
        email: req.email,
    };

    let updated = use_case.execute(&user.user_id, input).await?;

    Ok(Json(UserResponse::from(&updated)))
}

/// Profile body built from the middleware's `CurrentUser`
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<&CurrentUser> for ProfileResponse {
    fn from(user: &CurrentUser) -> Self {
        Self {
            id: user.user_id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.code().to_string(),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn access_cookie(config: &AuthConfig) -> CookieConfig {
    CookieConfig {
        name: config.access_cookie_name.clone(),
        secure: config.cookie_secure,
        same_site: config.cookie_same_site,
        max_age_secs: Some(config.access_ttl_secs()),
        ..Default::default()
    }
}

fn refresh_cookie(config: &AuthConfig) -> CookieConfig {
    CookieConfig {
        name: config.refresh_cookie_name.clone(),
        secure: config.cookie_secure,
        same_site: config.cookie_same_site,
        max_age_secs: Some(config.refresh_ttl_secs()),
        ..Default::default()
    }
}

/// Both token cookies, Max-Age matching each token's expiry
fn set_token_cookies(
    config: &AuthConfig,
    tokens: &TokenPair,
) -> AppendHeaders<[(header::HeaderName, String); 2]> {
    AppendHeaders([
        (
            header::SET_COOKIE,
            access_cookie(config).build_set_cookie(&tokens.access_token),
        ),
        (
            header::SET_COOKIE,
            refresh_cookie(config).build_set_cookie(&tokens.refresh_token),
        ),
    ])
}

fn clear_token_cookies(config: &AuthConfig) -> AppendHeaders<[(header::HeaderName, String); 2]> {
    AppendHeaders([
        (
            header::SET_COOKIE,
            access_cookie(config).build_delete_cookie(),
        ),
        (
            header::SET_COOKIE,
            refresh_cookie(config).build_delete_cookie(),
        ),
    ])
}
