//! Store Routers
//!
//! Routers are generic over the repository, cache, and gateway ports so
//! the binary wires Postgres implementations and tests wire fakes. Role
//! enforcement is layered here: admin-only product routes run behind
//! `require_auth` then `require_admin`; cart, coupon, order, and payment
//! routes run behind `require_auth` alone.

use axum::{
    Router, middleware,
    routing::{delete, get, patch, post, put},
};
use std::sync::Arc;

use auth::domain::repository::UserRepository;
use auth::presentation::middleware::{AuthMiddlewareState, require_admin, require_auth};
use platform::cache::Cache;

use crate::application::config::StoreConfig;
use crate::domain::gateway::PaymentGateway;
use crate::domain::repository::{
    CartRepository, CheckoutSessionRepository, CouponRepository, OrderRepository,
    ProductRepository,
};
use crate::presentation::handlers::{
    self, CartState, CatalogState, CheckoutState, CouponState, OrdersState,
};

/// Product catalog routes (`/api/products`)
pub fn products_router<R, P, C>(
    products: Arc<P>,
    cache: Arc<C>,
    config: Arc<StoreConfig>,
    auth_state: AuthMiddlewareState<R>,
) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
    C: Cache + Send + Sync + 'static,
{
    let state = CatalogState {
        products,
        cache,
        config,
    };

    let public = Router::new()
        .route("/featured", get(handlers::featured_products::<P, C>))
        .route(
            "/recommendation",
            get(handlers::recommended_products::<P, C>),
        )
        .route(
            "/category/{category}",
            get(handlers::products_by_category::<P, C>),
        )
        .route("/{id}", get(handlers::get_product::<P, C>))
        .with_state(state.clone());

    let admin = Router::new()
        .route(
            "/",
            get(handlers::list_products::<P, C>).post(handlers::create_product::<P, C>),
        )
        .route(
            "/{id}",
            patch(handlers::toggle_product_featured::<P, C>)
                .delete(handlers::delete_product::<P, C>),
        )
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(
            auth_state,
            require_auth::<R>,
        ))
        .with_state(state);

    public.merge(admin)
}

/// Cart routes (`/api/carts`), all authenticated
pub fn carts_router<R, P, Ca>(
    products: Arc<P>,
    carts: Arc<Ca>,
    auth_state: AuthMiddlewareState<R>,
) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
    Ca: CartRepository + Send + Sync + 'static,
{
    let state = CartState { products, carts };

    Router::new()
        .route(
            "/",
            get(handlers::get_cart::<P, Ca>)
                .post(handlers::add_to_cart::<P, Ca>)
                .delete(handlers::remove_from_cart::<P, Ca>),
        )
        .route("/clear", delete(handlers::clear_cart::<P, Ca>))
        .route("/{id}", put(handlers::update_cart_quantity::<P, Ca>))
        .route_layer(middleware::from_fn_with_state(
            auth_state,
            require_auth::<R>,
        ))
        .with_state(state)
}

/// Coupon routes (`/api/coupons`), all authenticated
pub fn coupons_router<R, Co>(coupons: Arc<Co>, auth_state: AuthMiddlewareState<R>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
    Co: CouponRepository + Send + Sync + 'static,
{
    let state = CouponState { coupons };

    Router::new()
        .route("/", get(handlers::get_coupon::<Co>))
        .route("/validate", post(handlers::validate_coupon::<Co>))
        .route_layer(middleware::from_fn_with_state(
            auth_state,
            require_auth::<R>,
        ))
        .with_state(state)
}

/// Order-history routes, merged under `/api/users`
pub fn orders_router<R, O>(orders: Arc<O>, auth_state: AuthMiddlewareState<R>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
    O: OrderRepository + Send + Sync + 'static,
{
    let state = OrdersState { orders };

    Router::new()
        .route("/orders", get(handlers::list_orders::<O>))
        .route("/orders/{id}", get(handlers::get_order::<O>))
        .route_layer(middleware::from_fn_with_state(
            auth_state,
            require_auth::<R>,
        ))
        .with_state(state)
}

/// Checkout routes (`/api/payments`), all authenticated
pub fn payments_router<R, Ca, Co, Or, Se, G>(
    carts: Arc<Ca>,
    coupons: Arc<Co>,
    orders: Arc<Or>,
    sessions: Arc<Se>,
    gateway: Arc<G>,
    auth_state: AuthMiddlewareState<R>,
) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
    Ca: CartRepository + Send + Sync + 'static,
    Co: CouponRepository + Send + Sync + 'static,
    Or: OrderRepository + Send + Sync + 'static,
    Se: CheckoutSessionRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    let state = CheckoutState {
        carts,
        coupons,
        orders,
        sessions,
        gateway,
    };

    Router::new()
        .route(
            "/create-checkout-session",
            post(handlers::create_checkout_session::<Ca, Co, Or, Se, G>),
        )
        .route(
            "/checkout-success",
            post(handlers::checkout_success::<Ca, Co, Or, Se, G>),
        )
        .route_layer(middleware::from_fn_with_state(
            auth_state,
            require_auth::<R>,
        ))
        .with_state(state)
}
