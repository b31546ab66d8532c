//! Product Entity

use chrono::{DateTime, Utc};
use kernel::id::{Id, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Catalog product
///
/// `price` is kept as an exact decimal end to end; it is converted to
/// integer cents only at the payment-gateway boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub product_id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub image_url: String,
    pub is_featured: bool,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Create a new product (never featured at birth)
    pub fn new(
        name: String,
        description: String,
        price: Decimal,
        category: String,
        image_url: String,
        stock: i32,
    ) -> StoreResult<Self> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(StoreError::Validation("Product name is required".into()));
        }
        if price < Decimal::ZERO {
            return Err(StoreError::Validation(
                "Price must be zero or positive".into(),
            ));
        }
        if stock < 0 {
            return Err(StoreError::Validation(
                "Stock must be zero or positive".into(),
            ));
        }

        let now = Utc::now();
        Ok(Self {
            product_id: Id::new(),
            name,
            description,
            price,
            category,
            image_url,
            is_featured: false,
            stock,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(price: Decimal) -> StoreResult<Product> {
        Product::new(
            "Jacket".to_string(),
            "A jacket".to_string(),
            price,
            "jackets".to_string(),
            "https://example.com/jacket.png".to_string(),
            10,
        )
    }

    #[test]
    fn test_new_product_is_not_featured() {
        let p = product(dec!(19.99)).unwrap();
        assert!(!p.is_featured);
        assert_eq!(p.price, dec!(19.99));
    }

    #[test]
    fn test_negative_price_rejected() {
        assert!(matches!(
            product(dec!(-1)),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn test_blank_name_rejected() {
        let err = Product::new(
            "   ".to_string(),
            String::new(),
            dec!(1),
            "misc".to_string(),
            String::new(),
            0,
        );
        assert!(matches!(err, Err(StoreError::Validation(_))));
    }
}
