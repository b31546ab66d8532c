//! HTTP Handlers
//!
//! Thin layer: parse ids, run the use case, shape the response. Auth and
//! role checks happen in middleware before any handler here runs; handlers
//! read the resulting `CurrentUser` extension.

use auth::presentation::middleware::CurrentUser;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use platform::cache::Cache;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::application::catalog::CreateProductInput;
use crate::application::config::StoreConfig;
use crate::application::{
    CartUseCase, CatalogUseCase, CheckoutUseCase, CouponUseCase, OrdersUseCase,
};
use crate::domain::gateway::PaymentGateway;
use crate::domain::repository::{
    CartRepository, CheckoutSessionRepository, CouponRepository, OrderRepository,
    ProductRepository,
};
use crate::error::{StoreError, StoreResult};
use crate::presentation::dto::{
    AddToCartRequest, CartItemResponse, CheckoutSessionResponse, CheckoutSuccessRequest,
    CouponResponse, CreateCheckoutSessionRequest, CreateProductRequest, MessageResponse,
    OrderResponse, ProductResponse, RemoveFromCartRequest, UpdateQuantityRequest,
    ValidateCouponRequest, cart_response,
};
use kernel::id::{OrderId, ProductId};

fn parse_product_id(raw: &str) -> StoreResult<ProductId> {
    raw.parse()
        .map_err(|_| StoreError::Validation("Invalid product id".into()))
}

fn parse_order_id(raw: &str) -> StoreResult<OrderId> {
    raw.parse()
        .map_err(|_| StoreError::Validation("Invalid order id".into()))
}

/// Parse a JSON body that clients are allowed to omit entirely
fn parse_optional_body<T>(body: &Bytes) -> StoreResult<T>
where
    T: DeserializeOwned + Default,
{
    if body.is_empty() {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|_| StoreError::Validation("Invalid request body".into()))
}

// ============================================================================
// Catalog
// ============================================================================

/// Shared state for catalog handlers
pub struct CatalogState<P, C> {
    pub products: Arc<P>,
    pub cache: Arc<C>,
    pub config: Arc<StoreConfig>,
}

// Manual impl: `Arc` clones regardless of the inner type
impl<P, C> Clone for CatalogState<P, C> {
    fn clone(&self) -> Self {
        Self {
            products: self.products.clone(),
            cache: self.cache.clone(),
            config: self.config.clone(),
        }
    }
}

impl<P, C> CatalogState<P, C>
where
    P: ProductRepository + Send + Sync + 'static,
    C: Cache + Send + Sync + 'static,
{
    fn use_case(&self) -> CatalogUseCase<P, C> {
        CatalogUseCase::new(
            self.products.clone(),
            self.cache.clone(),
            self.config.clone(),
        )
    }
}

/// GET /api/products (admin)
pub async fn list_products<P, C>(
    State(state): State<CatalogState<P, C>>,
) -> StoreResult<Json<Vec<ProductResponse>>>
where
    P: ProductRepository + Send + Sync + 'static,
    C: Cache + Send + Sync + 'static,
{
    let products = state.use_case().list_all().await?;
    Ok(Json(products.iter().map(ProductResponse::from).collect()))
}

/// GET /api/products/featured
pub async fn featured_products<P, C>(
    State(state): State<CatalogState<P, C>>,
) -> StoreResult<Json<Vec<ProductResponse>>>
where
    P: ProductRepository + Send + Sync + 'static,
    C: Cache + Send + Sync + 'static,
{
    let products = state.use_case().featured().await?;
    Ok(Json(products.iter().map(ProductResponse::from).collect()))
}

/// GET /api/products/recommendation
pub async fn recommended_products<P, C>(
    State(state): State<CatalogState<P, C>>,
) -> StoreResult<Json<Vec<ProductResponse>>>
where
    P: ProductRepository + Send + Sync + 'static,
    C: Cache + Send + Sync + 'static,
{
    let products = state.use_case().recommended().await?;
    Ok(Json(products.iter().map(ProductResponse::from).collect()))
}

/// GET /api/products/category/{category}
pub async fn products_by_category<P, C>(
    State(state): State<CatalogState<P, C>>,
    Path(category): Path<String>,
) -> StoreResult<Json<Vec<ProductResponse>>>
where
    P: ProductRepository + Send + Sync + 'static,
    C: Cache + Send + Sync + 'static,
{
    let products = state.use_case().by_category(&category).await?;
    Ok(Json(products.iter().map(ProductResponse::from).collect()))
}

/// GET /api/products/{id}
pub async fn get_product<P, C>(
    State(state): State<CatalogState<P, C>>,
    Path(id): Path<String>,
) -> StoreResult<Json<ProductResponse>>
where
    P: ProductRepository + Send + Sync + 'static,
    C: Cache + Send + Sync + 'static,
{
    let product = state.use_case().get(&parse_product_id(&id)?).await?;
    Ok(Json(ProductResponse::from(&product)))
}

/// POST /api/products (admin)
pub async fn create_product<P, C>(
    State(state): State<CatalogState<P, C>>,
    Json(req): Json<CreateProductRequest>,
) -> StoreResult<impl IntoResponse>
where
    P: ProductRepository + Send + Sync + 'static,
    C: Cache + Send + Sync + 'static,
{
    let product = state
        .use_case()
        .create(CreateProductInput {
            name: req.name,
            description: req.description,
            price: req.price,
            category: req.category,
            image_url: req.image,
            stock: req.stock,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ProductResponse::from(&product))))
}

/// PATCH /api/products/{id} (admin) - flip the featured flag
pub async fn toggle_product_featured<P, C>(
    State(state): State<CatalogState<P, C>>,
    Path(id): Path<String>,
) -> StoreResult<Json<ProductResponse>>
where
    P: ProductRepository + Send + Sync + 'static,
    C: Cache + Send + Sync + 'static,
{
    let product = state
        .use_case()
        .toggle_featured(&parse_product_id(&id)?)
        .await?;
    Ok(Json(ProductResponse::from(&product)))
}

/// DELETE /api/products/{id} (admin)
pub async fn delete_product<P, C>(
    State(state): State<CatalogState<P, C>>,
    Path(id): Path<String>,
) -> StoreResult<Json<MessageResponse>>
where
    P: ProductRepository + Send + Sync + 'static,
    C: Cache + Send + Sync + 'static,
{
    state.use_case().delete(&parse_product_id(&id)?).await?;
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}

// ============================================================================
// Cart
// ============================================================================

/// Shared state for cart handlers
pub struct CartState<P, Ca> {
    pub products: Arc<P>,
    pub carts: Arc<Ca>,
}

impl<P, Ca> Clone for CartState<P, Ca> {
    fn clone(&self) -> Self {
        Self {
            products: self.products.clone(),
            carts: self.carts.clone(),
        }
    }
}

impl<P, Ca> CartState<P, Ca>
where
    P: ProductRepository + Send + Sync + 'static,
    Ca: CartRepository + Send + Sync + 'static,
{
    fn use_case(&self) -> CartUseCase<P, Ca> {
        CartUseCase::new(self.products.clone(), self.carts.clone())
    }
}

/// GET /api/carts
pub async fn get_cart<P, Ca>(
    State(state): State<CartState<P, Ca>>,
    Extension(user): Extension<CurrentUser>,
) -> StoreResult<Json<Vec<CartItemResponse>>>
where
    P: ProductRepository + Send + Sync + 'static,
    Ca: CartRepository + Send + Sync + 'static,
{
    let items = state.use_case().view(&user.user_id).await?;
    Ok(Json(cart_response(&items)))
}

/// POST /api/carts - add one unit of a product
pub async fn add_to_cart<P, Ca>(
    State(state): State<CartState<P, Ca>>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<AddToCartRequest>,
) -> StoreResult<Json<Vec<CartItemResponse>>>
where
    P: ProductRepository + Send + Sync + 'static,
    Ca: CartRepository + Send + Sync + 'static,
{
    let product_id = parse_product_id(&req.product_id)?;
    let items = state.use_case().add(&user.user_id, &product_id).await?;
    Ok(Json(cart_response(&items)))
}

/// DELETE /api/carts - remove one line, or everything when no id is sent
pub async fn remove_from_cart<P, Ca>(
    State(state): State<CartState<P, Ca>>,
    Extension(user): Extension<CurrentUser>,
    body: Bytes,
) -> StoreResult<Json<Vec<CartItemResponse>>>
where
    P: ProductRepository + Send + Sync + 'static,
    Ca: CartRepository + Send + Sync + 'static,
{
    let req: RemoveFromCartRequest = parse_optional_body(&body)?;
    let product_id = req
        .product_id
        .map(|raw| parse_product_id(&raw))
        .transpose()?;

    let items = state
        .use_case()
        .remove(&user.user_id, product_id.as_ref())
        .await?;
    Ok(Json(cart_response(&items)))
}

/// DELETE /api/carts/clear
pub async fn clear_cart<P, Ca>(
    State(state): State<CartState<P, Ca>>,
    Extension(user): Extension<CurrentUser>,
) -> StoreResult<Json<MessageResponse>>
where
    P: ProductRepository + Send + Sync + 'static,
    Ca: CartRepository + Send + Sync + 'static,
{
    state.use_case().clear(&user.user_id).await?;
    Ok(Json(MessageResponse::new("Cart cleared successfully")))
}

/// PUT /api/carts/{id} - set a line's quantity (0 removes it)
pub async fn update_cart_quantity<P, Ca>(
    State(state): State<CartState<P, Ca>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<UpdateQuantityRequest>,
) -> StoreResult<Json<Vec<CartItemResponse>>>
where
    P: ProductRepository + Send + Sync + 'static,
    Ca: CartRepository + Send + Sync + 'static,
{
    let product_id = parse_product_id(&id)?;
    let items = state
        .use_case()
        .update_quantity(&user.user_id, &product_id, req.quantity)
        .await?;
    Ok(Json(cart_response(&items)))
}

// ============================================================================
// Coupons
// ============================================================================

/// Shared state for coupon handlers
pub struct CouponState<Co> {
    pub coupons: Arc<Co>,
}

impl<Co> Clone for CouponState<Co> {
    fn clone(&self) -> Self {
        Self {
            coupons: self.coupons.clone(),
        }
    }
}

/// GET /api/coupons - the user's active coupon (or null)
pub async fn get_coupon<Co>(
    State(state): State<CouponState<Co>>,
    Extension(user): Extension<CurrentUser>,
) -> StoreResult<Json<Option<CouponResponse>>>
where
    Co: CouponRepository + Send + Sync + 'static,
{
    let coupon = CouponUseCase::new(state.coupons.clone())
        .active_for_user(&user.user_id)
        .await?;
    Ok(Json(coupon.as_ref().map(CouponResponse::from)))
}

/// POST /api/coupons/validate
pub async fn validate_coupon<Co>(
    State(state): State<CouponState<Co>>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<ValidateCouponRequest>,
) -> StoreResult<Json<CouponResponse>>
where
    Co: CouponRepository + Send + Sync + 'static,
{
    let coupon = CouponUseCase::new(state.coupons.clone())
        .validate(&user.user_id, &req.code)
        .await?;
    Ok(Json(CouponResponse::from(&coupon)))
}

// ============================================================================
// Orders
// ============================================================================

/// Shared state for order handlers
pub struct OrdersState<O> {
    pub orders: Arc<O>,
}

impl<O> Clone for OrdersState<O> {
    fn clone(&self) -> Self {
        Self {
            orders: self.orders.clone(),
        }
    }
}

/// GET /api/users/orders
pub async fn list_orders<O>(
    State(state): State<OrdersState<O>>,
    Extension(user): Extension<CurrentUser>,
) -> StoreResult<Json<Vec<OrderResponse>>>
where
    O: OrderRepository + Send + Sync + 'static,
{
    let orders = OrdersUseCase::new(state.orders.clone())
        .list_for_user(&user.user_id)
        .await?;
    Ok(Json(orders.iter().map(OrderResponse::from).collect()))
}

/// GET /api/users/orders/{id}
pub async fn get_order<O>(
    State(state): State<OrdersState<O>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> StoreResult<Json<OrderResponse>>
where
    O: OrderRepository + Send + Sync + 'static,
{
    let order = OrdersUseCase::new(state.orders.clone())
        .get(&user.user_id, &parse_order_id(&id)?)
        .await?;
    Ok(Json(OrderResponse::from(&order)))
}

// ============================================================================
// Checkout
// ============================================================================

/// Shared state for checkout handlers
pub struct CheckoutState<Ca, Co, Or, Se, G> {
    pub carts: Arc<Ca>,
    pub coupons: Arc<Co>,
    pub orders: Arc<Or>,
    pub sessions: Arc<Se>,
    pub gateway: Arc<G>,
}

impl<Ca, Co, Or, Se, G> Clone for CheckoutState<Ca, Co, Or, Se, G> {
    fn clone(&self) -> Self {
        Self {
            carts: self.carts.clone(),
            coupons: self.coupons.clone(),
            orders: self.orders.clone(),
            sessions: self.sessions.clone(),
            gateway: self.gateway.clone(),
        }
    }
}

impl<Ca, Co, Or, Se, G> CheckoutState<Ca, Co, Or, Se, G>
where
    Ca: CartRepository + Send + Sync + 'static,
    Co: CouponRepository + Send + Sync + 'static,
    Or: OrderRepository + Send + Sync + 'static,
    Se: CheckoutSessionRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    fn use_case(&self) -> CheckoutUseCase<Ca, Co, Or, Se, G> {
        CheckoutUseCase::new(
            self.carts.clone(),
            self.coupons.clone(),
            self.orders.clone(),
            self.sessions.clone(),
            self.gateway.clone(),
        )
    }
}

/// POST /api/payments/create-checkout-session
pub async fn create_checkout_session<Ca, Co, Or, Se, G>(
    State(state): State<CheckoutState<Ca, Co, Or, Se, G>>,
    Extension(user): Extension<CurrentUser>,
    body: Bytes,
) -> StoreResult<Json<CheckoutSessionResponse>>
where
    Ca: CartRepository + Send + Sync + 'static,
    Co: CouponRepository + Send + Sync + 'static,
    Or: OrderRepository + Send + Sync + 'static,
    Se: CheckoutSessionRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    let req: CreateCheckoutSessionRequest = parse_optional_body(&body)?;
    let coupon_code = req.coupon_code;
    let handle = state
        .use_case()
        .create_session(&user.user_id, coupon_code)
        .await?;
    Ok(Json(CheckoutSessionResponse::from(&handle)))
}

/// POST /api/payments/checkout-success - idempotent completion
pub async fn checkout_success<Ca, Co, Or, Se, G>(
    State(state): State<CheckoutState<Ca, Co, Or, Se, G>>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CheckoutSuccessRequest>,
) -> StoreResult<Json<OrderResponse>>
where
    Ca: CartRepository + Send + Sync + 'static,
    Co: CouponRepository + Send + Sync + 'static,
    Or: OrderRepository + Send + Sync + 'static,
    Se: CheckoutSessionRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    let order = state
        .use_case()
        .confirm(&user.user_id, &req.session_id)
        .await?;
    Ok(Json(OrderResponse::from(&order)))
}
