//! PostgreSQL Repository Implementations
//!
//! Every mutation is one statement or one transaction. Cart lines in
//! particular are written with `INSERT .. ON CONFLICT DO UPDATE` so two
//! concurrent adds both count; the checkout-session completion is a
//! status-guarded UPDATE so only one caller ever wins the transition.

use chrono::{DateTime, Utc};
use kernel::id::{CouponId, Id, OrderId, ProductId, UserId};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::entity::cart::CartItem;
use crate::domain::entity::checkout_session::{CheckoutSession, CheckoutStatus};
use crate::domain::entity::coupon::Coupon;
use crate::domain::entity::order::{Order, OrderLine};
use crate::domain::entity::product::Product;
use crate::domain::repository::{
    CartRepository, CheckoutSessionRepository, CouponRepository, OrderRepository,
    ProductRepository,
};
use crate::error::{StoreError, StoreResult};

// ============================================================================
// Products
// ============================================================================

#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const PRODUCT_COLUMNS: &str = "product_id, name, description, price, category, \
     image_url, is_featured, stock, created_at, updated_at";

impl ProductRepository for PgProductRepository {
    async fn create(&self, product: &Product) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (
                product_id, name, description, price, category,
                image_url, is_featured, stock, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(product.product_id.as_uuid())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.category)
        .bind(&product.image_url)
        .bind(product.is_featured)
        .bind(product.stock)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_all(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProductRow::into_product).collect())
    }

    async fn find_by_id(&self, product_id: &ProductId) -> StoreResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = $1"
        ))
        .bind(product_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProductRow::into_product))
    }

    async fn find_by_category(&self, category: &str) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE category = $1 ORDER BY created_at DESC"
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProductRow::into_product).collect())
    }

    async fn find_featured(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_featured = TRUE \
             ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProductRow::into_product).collect())
    }

    async fn find_recommended(&self, limit: i64) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at ASC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProductRow::into_product).collect())
    }

    async fn toggle_featured(&self, product_id: &ProductId) -> StoreResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products \
             SET is_featured = NOT is_featured, updated_at = NOW() \
             WHERE product_id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(product_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProductRow::into_product))
    }

    async fn delete(&self, product_id: &ProductId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(product_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Cart lines
// ============================================================================

#[derive(Clone)]
pub struct PgCartRepository {
    pool: PgPool,
}

impl PgCartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CartRepository for PgCartRepository {
    async fn add_line(&self, user_id: &UserId, product_id: &ProductId) -> StoreResult<()> {
        // One statement, so concurrent adds of the same product both land
        sqlx::query(
            r#"
            INSERT INTO cart_items (user_id, product_id, quantity)
            VALUES ($1, $2, 1)
            ON CONFLICT (user_id, product_id)
            DO UPDATE SET quantity = cart_items.quantity + 1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(product_id.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_quantity(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        quantity: i32,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE cart_items SET quantity = $3 WHERE user_id = $1 AND product_id = $2",
        )
        .bind(user_id.as_uuid())
        .bind(product_id.as_uuid())
        .bind(quantity)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_line(&self, user_id: &UserId, product_id: &ProductId) -> StoreResult<bool> {
        let result =
            sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
                .bind(user_id.as_uuid())
                .bind(product_id.as_uuid())
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self, user_id: &UserId) -> StoreResult<()> {
        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list(&self, user_id: &UserId) -> StoreResult<Vec<CartItem>> {
        // INNER JOIN drops lines whose product has been deleted
        let rows = sqlx::query_as::<_, CartItemRow>(
            "SELECT p.product_id, p.name, p.description, p.price, p.category, \
                    p.image_url, p.is_featured, p.stock, p.created_at, p.updated_at, \
                    ci.quantity \
             FROM cart_items ci \
             JOIN products p ON p.product_id = ci.product_id \
             WHERE ci.user_id = $1 \
             ORDER BY ci.added_at ASC",
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CartItemRow::into_cart_item).collect())
    }
}

// ============================================================================
// Coupons
// ============================================================================

#[derive(Clone)]
pub struct PgCouponRepository {
    pool: PgPool,
}

impl PgCouponRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CouponRepository for PgCouponRepository {
    async fn find_active_for_user(&self, user_id: &UserId) -> StoreResult<Option<Coupon>> {
        let row = sqlx::query_as::<_, CouponRow>(
            r#"
            SELECT coupon_id, user_id, code, discount_percentage, expires_at, is_active
            FROM coupons
            WHERE user_id = $1 AND is_active = TRUE
            LIMIT 1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CouponRow::into_coupon))
    }

    async fn find_by_code(&self, user_id: &UserId, code: &str) -> StoreResult<Option<Coupon>> {
        let row = sqlx::query_as::<_, CouponRow>(
            r#"
            SELECT coupon_id, user_id, code, discount_percentage, expires_at, is_active
            FROM coupons
            WHERE user_id = $1 AND code = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CouponRow::into_coupon))
    }

    async fn deactivate(&self, coupon_id: &CouponId) -> StoreResult<()> {
        sqlx::query("UPDATE coupons SET is_active = FALSE WHERE coupon_id = $1")
            .bind(coupon_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Orders
// ============================================================================

#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_lines(&self, order_ids: &[Uuid]) -> StoreResult<HashMap<Uuid, Vec<OrderLine>>> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT order_id, product_id, quantity, price
            FROM order_items
            WHERE order_id = ANY($1)
            ORDER BY position ASC
            "#,
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_order: HashMap<Uuid, Vec<OrderLine>> = HashMap::new();
        for row in rows {
            by_order.entry(row.order_id).or_default().push(OrderLine {
                product_id: Id::from_uuid(row.product_id),
                quantity: row.quantity,
                price: row.price,
            });
        }
        Ok(by_order)
    }
}

impl OrderRepository for PgOrderRepository {
    async fn create(&self, order: &Order) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (order_id, user_id, total, checkout_session_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(order.order_id.as_uuid())
        .bind(order.user_id.as_uuid())
        .bind(order.total)
        .bind(&order.checkout_session_id)
        .bind(order.created_at)
        .execute(&mut *tx)
        .await?;

        for (position, line) in order.lines.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, position, product_id, quantity, price)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(order.order_id.as_uuid())
            .bind(position as i32)
            .bind(line.product_id.as_uuid())
            .bind(line.quantity)
            .bind(line.price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn list_for_user(&self, user_id: &UserId) -> StoreResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT order_id, user_id, total, checkout_session_id, created_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        let order_ids: Vec<Uuid> = rows.iter().map(|r| r.order_id).collect();
        let mut lines = self.load_lines(&order_ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let order_lines = lines.remove(&row.order_id).unwrap_or_default();
                row.into_order(order_lines)
            })
            .collect())
    }

    async fn find_for_user(
        &self,
        user_id: &UserId,
        order_id: &OrderId,
    ) -> StoreResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT order_id, user_id, total, checkout_session_id, created_at
            FROM orders
            WHERE order_id = $1 AND user_id = $2
            "#,
        )
        .bind(order_id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut lines = self.load_lines(&[row.order_id]).await?;
        let order_lines = lines.remove(&row.order_id).unwrap_or_default();
        Ok(Some(row.into_order(order_lines)))
    }

    async fn find_by_session(&self, session_id: &str) -> StoreResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT order_id, user_id, total, checkout_session_id, created_at
            FROM orders
            WHERE checkout_session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut lines = self.load_lines(&[row.order_id]).await?;
        let order_lines = lines.remove(&row.order_id).unwrap_or_default();
        Ok(Some(row.into_order(order_lines)))
    }
}

// ============================================================================
// Checkout sessions
// ============================================================================

#[derive(Clone)]
pub struct PgCheckoutSessionRepository {
    pool: PgPool,
}

impl PgCheckoutSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CheckoutSessionRepository for PgCheckoutSessionRepository {
    async fn create(&self, session: &CheckoutSession) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO checkout_sessions (
                session_id, user_id, coupon_code, lines, total, status, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&session.session_id)
        .bind(session.user_id.as_uuid())
        .bind(&session.coupon_code)
        .bind(serde_json::to_value(&session.lines)?)
        .bind(session.total)
        .bind(session.status.as_str())
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, session_id: &str) -> StoreResult<Option<CheckoutSession>> {
        let row = sqlx::query_as::<_, CheckoutSessionRow>(
            r#"
            SELECT session_id, user_id, coupon_code, lines, total, status, created_at
            FROM checkout_sessions
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CheckoutSessionRow::into_session).transpose()
    }

    async fn complete(&self, session_id: &str) -> StoreResult<bool> {
        // Status-guarded so only one confirmation wins
        let result = sqlx::query(
            "UPDATE checkout_sessions SET status = 'completed' \
             WHERE session_id = $1 AND status = 'pending'",
        )
        .bind(session_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn reopen(&self, session_id: &str) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE checkout_sessions SET status = 'pending' \
             WHERE session_id = $1 AND status = 'completed'",
        )
        .bind(session_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct ProductRow {
    product_id: Uuid,
    name: String,
    description: String,
    price: Decimal,
    category: String,
    image_url: String,
    is_featured: bool,
    stock: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> Product {
        Product {
            product_id: Id::from_uuid(self.product_id),
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            image_url: self.image_url,
            is_featured: self.is_featured,
            stock: self.stock,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CartItemRow {
    product_id: Uuid,
    name: String,
    description: String,
    price: Decimal,
    category: String,
    image_url: String,
    is_featured: bool,
    stock: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    quantity: i32,
}

impl CartItemRow {
    fn into_cart_item(self) -> CartItem {
        CartItem {
            product: Product {
                product_id: Id::from_uuid(self.product_id),
                name: self.name,
                description: self.description,
                price: self.price,
                category: self.category,
                image_url: self.image_url,
                is_featured: self.is_featured,
                stock: self.stock,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            quantity: self.quantity,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CouponRow {
    coupon_id: Uuid,
    user_id: Uuid,
    code: String,
    discount_percentage: Decimal,
    expires_at: DateTime<Utc>,
    is_active: bool,
}

impl CouponRow {
    fn into_coupon(self) -> Coupon {
        Coupon {
            coupon_id: Id::from_uuid(self.coupon_id),
            user_id: Id::from_uuid(self.user_id),
            code: self.code,
            discount_percentage: self.discount_percentage,
            expires_at: self.expires_at,
            is_active: self.is_active,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    order_id: Uuid,
    user_id: Uuid,
    total: Decimal,
    checkout_session_id: String,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, lines: Vec<OrderLine>) -> Order {
        Order {
            order_id: Id::from_uuid(self.order_id),
            user_id: Id::from_uuid(self.user_id),
            lines,
            total: self.total,
            checkout_session_id: self.checkout_session_id,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    order_id: Uuid,
    product_id: Uuid,
    quantity: i32,
    price: Decimal,
}

#[derive(sqlx::FromRow)]
struct CheckoutSessionRow {
    session_id: String,
    user_id: Uuid,
    coupon_code: Option<String>,
    lines: serde_json::Value,
    total: Decimal,
    status: String,
    created_at: DateTime<Utc>,
}

impl CheckoutSessionRow {
    fn into_session(self) -> StoreResult<CheckoutSession> {
        let status = CheckoutStatus::from_str_db(&self.status).ok_or_else(|| {
            StoreError::Internal(format!("Unknown checkout session status: {}", self.status))
        })?;

        Ok(CheckoutSession {
            session_id: self.session_id,
            user_id: Id::from_uuid(self.user_id),
            coupon_code: self.coupon_code,
            lines: serde_json::from_value(self.lines)?,
            total: self.total,
            status,
            created_at: self.created_at,
        })
    }
}
