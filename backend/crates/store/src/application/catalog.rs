//! Product Catalog Use Cases

use std::sync::Arc;

use platform::cache::Cache;
use rust_decimal::Decimal;

use crate::application::config::StoreConfig;
use crate::domain::entity::product::Product;
use crate::domain::repository::ProductRepository;
use crate::error::{StoreError, StoreResult};
use kernel::id::ProductId;

/// Input for creating a product
#[derive(Debug, Clone)]
pub struct CreateProductInput {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub image_url: String,
    pub stock: i32,
}

/// Catalog reads and admin writes
///
/// The featured list is the only cached read: it is served through the
/// injected cache port with a TTL, and every catalog write drops the
/// cache entry so the next read rebuilds it.
pub struct CatalogUseCase<P, C>
where
    P: ProductRepository,
    C: Cache + Sync,
{
    products: Arc<P>,
    cache: Arc<C>,
    config: Arc<StoreConfig>,
}

impl<P, C> CatalogUseCase<P, C>
where
    P: ProductRepository + Sync,
    C: Cache + Sync,
{
    pub fn new(products: Arc<P>, cache: Arc<C>, config: Arc<StoreConfig>) -> Self {
        Self {
            products,
            cache,
            config,
        }
    }

    /// All products, admin only (enforced at the router)
    pub async fn list_all(&self) -> StoreResult<Vec<Product>> {
        self.products.find_all().await
    }

    pub async fn get(&self, product_id: &ProductId) -> StoreResult<Product> {
        self.products
            .find_by_id(product_id)
            .await?
            .ok_or(StoreError::ProductNotFound)
    }

    pub async fn by_category(&self, category: &str) -> StoreResult<Vec<Product>> {
        self.products.find_by_category(category).await
    }

    /// Featured products, served through the cache
    ///
    /// A corrupt cache entry is treated as a miss, not an error.
    pub async fn featured(&self) -> StoreResult<Vec<Product>> {
        let key = &self.config.featured_cache_key;

        if let Some(cached) = self.cache.get(key).await {
            match serde_json::from_str::<Vec<Product>>(&cached) {
                Ok(products) => return Ok(products),
                Err(e) => {
                    tracing::warn!(error = %e, "Dropping unreadable featured-products cache entry");
                    self.cache.delete(key).await;
                }
            }
        }

        let products = self.products.find_featured().await?;
        self.cache
            .set(
                key,
                serde_json::to_string(&products)?,
                self.config.featured_cache_ttl,
            )
            .await;
        Ok(products)
    }

    pub async fn recommended(&self) -> StoreResult<Vec<Product>> {
        self.products
            .find_recommended(self.config.recommended_limit)
            .await
    }

    pub async fn create(&self, input: CreateProductInput) -> StoreResult<Product> {
        let product = Product::new(
            input.name,
            input.description,
            input.price,
            input.category,
            input.image_url,
            input.stock,
        )?;
        self.products.create(&product).await?;
        self.invalidate_featured().await;

        tracing::info!(product_id = %product.product_id, "Product created");
        Ok(product)
    }

    pub async fn toggle_featured(&self, product_id: &ProductId) -> StoreResult<Product> {
        let product = self
            .products
            .toggle_featured(product_id)
            .await?
            .ok_or(StoreError::ProductNotFound)?;
        self.invalidate_featured().await;
        Ok(product)
    }

    pub async fn delete(&self, product_id: &ProductId) -> StoreResult<()> {
        if !self.products.delete(product_id).await? {
            return Err(StoreError::ProductNotFound);
        }
        self.invalidate_featured().await;

        tracing::info!(product_id = %product_id, "Product deleted");
        Ok(())
    }

    async fn invalidate_featured(&self) {
        self.cache.delete(&self.config.featured_cache_key).await;
    }
}
