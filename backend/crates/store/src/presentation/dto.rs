//! API DTOs (Data Transfer Objects)
//!
//! Money is serialized as a decimal string, never a float; clients that
//! need cents do their own conversion.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::checkout::CheckoutHandle;
use crate::domain::entity::cart::CartItem;
use crate::domain::entity::coupon::Coupon;
use crate::domain::entity::order::{Order, OrderLine};
use crate::domain::entity::product::Product;

// ============================================================================
// Products
// ============================================================================

/// Product as returned to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub image: String,
    pub is_featured: bool,
    pub stock: i32,
    pub created_at: i64,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            id: product.product_id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            category: product.category.clone(),
            image: product.image_url.clone(),
            is_featured: product.is_featured,
            stock: product.stock,
            created_at: product.created_at.timestamp_millis(),
        }
    }
}

/// Admin product creation request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub stock: i32,
}

// ============================================================================
// Cart
// ============================================================================

/// One cart line joined with its product
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    #[serde(flatten)]
    pub product: ProductResponse,
    pub quantity: i32,
    pub line_total: Decimal,
}

impl From<&CartItem> for CartItemResponse {
    fn from(item: &CartItem) -> Self {
        Self {
            product: ProductResponse::from(&item.product),
            quantity: item.quantity,
            line_total: item.line_total(),
        }
    }
}

pub fn cart_response(items: &[CartItem]) -> Vec<CartItemResponse> {
    items.iter().map(CartItemResponse::from).collect()
}

/// Add-to-cart request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: String,
}

/// Remove-from-cart request; no product id clears everything
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartRequest {
    pub product_id: Option<String>,
}

/// Quantity update request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}

// ============================================================================
// Coupons
// ============================================================================

/// Coupon validation request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCouponRequest {
    pub code: String,
}

/// Coupon as returned to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponResponse {
    pub code: String,
    pub discount_percentage: Decimal,
    pub expires_at: i64,
}

impl From<&Coupon> for CouponResponse {
    fn from(coupon: &Coupon) -> Self {
        Self {
            code: coupon.code.clone(),
            discount_percentage: coupon.discount_percentage,
            expires_at: coupon.expires_at.timestamp_millis(),
        }
    }
}

// ============================================================================
// Orders
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineResponse {
    pub product_id: String,
    pub quantity: i32,
    pub price: Decimal,
}

impl From<&OrderLine> for OrderLineResponse {
    fn from(line: &OrderLine) -> Self {
        Self {
            product_id: line.product_id.to_string(),
            quantity: line.quantity,
            price: line.price,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: String,
    pub items: Vec<OrderLineResponse>,
    pub total: Decimal,
    pub created_at: i64,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.order_id.to_string(),
            items: order.lines.iter().map(OrderLineResponse::from).collect(),
            total: order.total,
            created_at: order.created_at.timestamp_millis(),
        }
    }
}

// ============================================================================
// Checkout
// ============================================================================

/// Checkout start request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutSessionRequest {
    pub coupon_code: Option<String>,
}

/// Handle for continuing checkout on the hosted page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionResponse {
    pub id: String,
    pub url: String,
    pub total_amount: Decimal,
}

impl From<&CheckoutHandle> for CheckoutSessionResponse {
    fn from(handle: &CheckoutHandle) -> Self {
        Self {
            id: handle.session_id.clone(),
            url: handle.redirect_url.clone(),
            total_amount: handle.total,
        }
    }
}

/// Success callback request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSuccessRequest {
    pub session_id: String,
}

/// Plain message response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_serializes_as_decimal_string() {
        let product = Product::new(
            "Boots".to_string(),
            "Leather boots".to_string(),
            dec!(89.99),
            "shoes".to_string(),
            String::new(),
            3,
        )
        .unwrap();

        let json = serde_json::to_value(ProductResponse::from(&product)).unwrap();
        assert_eq!(json["price"], "89.99");
        assert_eq!(json["isFeatured"], false);
    }

    #[test]
    fn test_cart_item_response_flattens_product() {
        let product = Product::new(
            "Hat".to_string(),
            String::new(),
            dec!(10),
            "hats".to_string(),
            String::new(),
            5,
        )
        .unwrap();
        let item = CartItem {
            product,
            quantity: 2,
        };

        let json = serde_json::to_value(CartItemResponse::from(&item)).unwrap();
        assert_eq!(json["quantity"], 2);
        assert_eq!(json["name"], "Hat");
        assert_eq!(json["lineTotal"], "20");
    }
}
