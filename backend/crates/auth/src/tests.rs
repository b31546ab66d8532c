//! Use-case and middleware tests against an in-memory user store
//!
//! The fake honors the repository contract (unique email enforced at
//! insert, like the database index) so signup and login are exercised
//! with the same semantics Postgres provides.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::{Router, middleware, routing::get};
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use kernel::id::UserId;
use platform::password::ClearTextPassword;
use serde::Serialize;
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::application::config::AuthConfig;
use crate::application::token::{TokenKind, TokenService};
use crate::application::{SignInInput, SignInUseCase, SignUpInput, SignUpUseCase};
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_role::UserRole};
use crate::error::{AuthError, AuthResult};
use crate::presentation::middleware::{AuthMiddlewareState, require_admin, require_auth};

// ============================================================================
// In-memory fake
// ============================================================================

#[derive(Clone, Default)]
struct MemUsers {
    users: Arc<Mutex<Vec<User>>>,
    /// When set, `exists_by_email` lies and reports the email as free,
    /// reproducing two signups racing past the pre-insert check. The
    /// unique-email enforcement in `create` still holds.
    racy_exists_check: Arc<AtomicBool>,
}

impl UserRepository for MemUsers {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.lock().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(AuthError::EmailTaken);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|u| u.user_id == *user_id)
            .cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|u| u.email == *email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        if self.racy_exists_check.load(Ordering::SeqCst) {
            return Ok(false);
        }
        Ok(self.users.lock().await.iter().any(|u| u.email == *email))
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.lock().await;
        if let Some(existing) = users.iter_mut().find(|u| u.user_id == user.user_id) {
            *existing = user.clone();
        }
        Ok(())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

fn config() -> Arc<AuthConfig> {
    Arc::new(AuthConfig::with_random_secrets())
}

fn sign_up_use_case(repo: &Arc<MemUsers>, config: &Arc<AuthConfig>) -> SignUpUseCase<MemUsers> {
    SignUpUseCase::new(repo.clone(), config.clone())
}

fn sign_in_use_case(repo: &Arc<MemUsers>, config: &Arc<AuthConfig>) -> SignInUseCase<MemUsers> {
    SignInUseCase::new(repo.clone(), config.clone())
}

fn sign_up_input(name: &str, email: &str, password: &str) -> SignUpInput {
    SignUpInput {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    }
}

async fn seed_user(repo: &Arc<MemUsers>, email: &str, role: UserRole) -> UserId {
    let hash = ClearTextPassword::new("seeded password".to_string())
        .unwrap()
        .hash()
        .unwrap();
    let mut user = User::new("Seed".to_string(), Email::new(email).unwrap(), hash);
    user.set_role(role);
    let user_id = user.user_id;
    repo.users.lock().await.push(user);
    user_id
}

// ============================================================================
// Sign up
// ============================================================================

#[tokio::test]
async fn test_signup_with_fresh_email_creates_exactly_one_user() {
    let repo = Arc::new(MemUsers::default());
    let config = config();

    let output = sign_up_use_case(&repo, &config)
        .execute(sign_up_input("Alice", "alice@example.com", "correct horse"))
        .await
        .unwrap();

    let users = repo.users.lock().await;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email.as_str(), "alice@example.com");
    assert_eq!(users[0].role, UserRole::Customer);

    // The issued pair belongs to the created user
    let service = TokenService::new(config);
    assert_eq!(
        service
            .verify(&output.tokens.access_token, TokenKind::Access)
            .unwrap(),
        users[0].user_id
    );
}

#[tokio::test]
async fn test_signup_with_taken_email_conflicts() {
    let repo = Arc::new(MemUsers::default());
    let config = config();

    sign_up_use_case(&repo, &config)
        .execute(sign_up_input("Alice", "alice@example.com", "correct horse"))
        .await
        .unwrap();

    let err = sign_up_use_case(&repo, &config)
        .execute(sign_up_input("Mallory", "alice@example.com", "other secret"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::EmailTaken));
    assert_eq!(repo.users.lock().await.len(), 1);
}

#[tokio::test]
async fn test_signup_losing_the_duplicate_race_still_conflicts() {
    let repo = Arc::new(MemUsers::default());
    let config = config();

    sign_up_use_case(&repo, &config)
        .execute(sign_up_input("Alice", "alice@example.com", "correct horse"))
        .await
        .unwrap();

    // The pre-insert existence check misses the concurrent signup; the
    // unique index catches it, and it must surface as the same conflict
    repo.racy_exists_check.store(true, Ordering::SeqCst);

    let err = sign_up_use_case(&repo, &config)
        .execute(sign_up_input("Mallory", "alice@example.com", "other secret"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::EmailTaken));
    assert_eq!(err.status_code(), StatusCode::CONFLICT);
    assert_eq!(repo.users.lock().await.len(), 1);
}

// ============================================================================
// Sign in
// ============================================================================

#[tokio::test]
async fn test_wrong_password_and_unknown_email_share_one_rejection() {
    let repo = Arc::new(MemUsers::default());
    let config = config();

    sign_up_use_case(&repo, &config)
        .execute(sign_up_input("Alice", "alice@example.com", "correct horse"))
        .await
        .unwrap();

    let wrong_password = sign_in_use_case(&repo, &config)
        .execute(SignInInput {
            email: "alice@example.com".to_string(),
            password: "incorrect horse".to_string(),
        })
        .await
        .unwrap_err();

    let unknown_email = sign_in_use_case(&repo, &config)
        .execute(SignInInput {
            email: "nobody@example.com".to_string(),
            password: "correct horse".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, AuthError::InvalidCredentials));
    assert!(matches!(unknown_email, AuthError::InvalidCredentials));

    // Byte-identical messages: responses must not reveal which part failed
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    assert_eq!(wrong_password.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status_code(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Middleware
// ============================================================================

#[derive(Serialize)]
struct ForgedClaims {
    sub: String,
    iat: i64,
    exp: i64,
}

fn guarded_router(state: AuthMiddlewareState<MemUsers>) -> Router {
    Router::new()
        .route("/guard", get(|| async { StatusCode::OK }))
        .route_layer(middleware::from_fn_with_state(
            state,
            require_auth::<MemUsers>,
        ))
}

fn admin_router(state: AuthMiddlewareState<MemUsers>) -> Router {
    Router::new()
        .route("/guard", get(|| async { StatusCode::OK }))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(
            state,
            require_auth::<MemUsers>,
        ))
}

fn request_with_access_cookie(config: &AuthConfig, token: &str) -> Request<Body> {
    Request::builder()
        .uri("/guard")
        .header(
            header::COOKIE,
            format!("{}={}", config.access_cookie_name, token),
        )
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_expired_access_token_gets_401_and_no_fresh_cookie() {
    let repo = Arc::new(MemUsers::default());
    let config = config();
    let user_id = seed_user(&repo, "alice@example.com", UserRole::Customer).await;

    // Right secret, already past expiry
    let now = Utc::now().timestamp();
    let claims = ForgedClaims {
        sub: user_id.to_string(),
        iat: now - 120,
        exp: now - 60,
    };
    let expired = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(&config.access_token_secret),
    )
    .unwrap();

    let state = AuthMiddlewareState {
        repo: repo.clone(),
        config: config.clone(),
    };
    let response = guarded_router(state)
        .oneshot(request_with_access_cookie(&config, &expired))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    // The gate rejects; it never issues a replacement token itself
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_missing_access_cookie_gets_401() {
    let repo = Arc::new(MemUsers::default());
    let state = AuthMiddlewareState {
        repo,
        config: config(),
    };

    let response = guarded_router(state)
        .oneshot(
            Request::builder()
                .uri("/guard")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_customer_on_admin_route_gets_403() {
    let repo = Arc::new(MemUsers::default());
    let config = config();
    let user_id = seed_user(&repo, "alice@example.com", UserRole::Customer).await;

    let token = TokenService::new(config.clone())
        .issue(&user_id, TokenKind::Access)
        .unwrap();

    let state = AuthMiddlewareState {
        repo: repo.clone(),
        config: config.clone(),
    };
    let response = admin_router(state)
        .oneshot(request_with_access_cookie(&config, &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_passes_the_admin_gate() {
    let repo = Arc::new(MemUsers::default());
    let config = config();
    let user_id = seed_user(&repo, "root@example.com", UserRole::Admin).await;

    let token = TokenService::new(config.clone())
        .issue(&user_id, TokenKind::Access)
        .unwrap();

    let state = AuthMiddlewareState {
        repo: repo.clone(),
        config: config.clone(),
    };
    let response = admin_router(state)
        .oneshot(request_with_access_cookie(&config, &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
