//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use auth::application::config::AuthConfig;
use auth::presentation::middleware::AuthMiddlewareState;
use auth::{PgUserRepository, auth_router, users_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use platform::cache::MemoryCache;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use store::application::config::StoreConfig;
use store::infra::postgres::{
    PgCartRepository, PgCheckoutSessionRepository, PgCouponRepository, PgOrderRepository,
    PgProductRepository,
};
use store::infra::stripe::{StripeConfig, StripeGateway};
use store::presentation::router::{
    carts_router, coupons_router, orders_router, payments_router, products_router,
};
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,store=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Token/cookie configuration
    let auth_config = if cfg!(debug_assertions) {
        AuthConfig::development()
    } else {
        // In production, load distinct signing secrets from environment
        let access = env::var("ACCESS_TOKEN_SECRET")
            .expect("ACCESS_TOKEN_SECRET must be set in production");
        let refresh = env::var("REFRESH_TOKEN_SECRET")
            .expect("REFRESH_TOKEN_SECRET must be set in production");
        AuthConfig::new(access.into_bytes(), refresh.into_bytes())
    };

    let store_config = Arc::new(StoreConfig::default());

    // Payment gateway configuration
    let stripe_secret =
        env::var("STRIPE_SECRET_KEY").expect("STRIPE_SECRET_KEY must be set in environment");
    let client_url =
        env::var("CLIENT_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());
    let gateway = Arc::new(StripeGateway::new(StripeConfig::new(
        stripe_secret,
        format!("{client_url}/purchase-success"),
        format!("{client_url}/purchase-cancel"),
    )));

    // Repositories
    let users = PgUserRepository::new(pool.clone());
    let products = Arc::new(PgProductRepository::new(pool.clone()));
    let carts = Arc::new(PgCartRepository::new(pool.clone()));
    let coupons = Arc::new(PgCouponRepository::new(pool.clone()));
    let orders = Arc::new(PgOrderRepository::new(pool.clone()));
    let sessions = Arc::new(PgCheckoutSessionRepository::new(pool.clone()));
    let cache = Arc::new(MemoryCache::new());

    let auth_state = AuthMiddlewareState {
        repo: Arc::new(users.clone()),
        config: Arc::new(auth_config.clone()),
    };

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| format!("{client_url},http://127.0.0.1:5173"));

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest(
            "/api/auth",
            auth_router(users.clone(), auth_config.clone()),
        )
        .nest(
            "/api/users",
            users_router(users.clone(), auth_config.clone())
                .merge(orders_router(orders.clone(), auth_state.clone())),
        )
        .nest(
            "/api/products",
            products_router(
                products.clone(),
                cache.clone(),
                store_config.clone(),
                auth_state.clone(),
            ),
        )
        .nest(
            "/api/carts",
            carts_router(products.clone(), carts.clone(), auth_state.clone()),
        )
        .nest(
            "/api/coupons",
            coupons_router(coupons.clone(), auth_state.clone()),
        )
        .nest(
            "/api/payments",
            payments_router(carts, coupons, orders, sessions, gateway, auth_state),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
