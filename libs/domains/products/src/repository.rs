use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::ProductResult;
use crate::filter::ProductFilter;
use crate::models::{NewProduct, Product};

/// Document-store port for products.
///
/// Implementations decide how identifiers are generated but must guarantee
/// that the identifier returned from [`insert`](Self::insert) is the one
/// persisted on the stored product, and that identifiers are unique.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Persist a new product and return its generated identifier
    async fn insert(&self, product: NewProduct) -> ProductResult<String>;

    /// First product matching the filter, if any
    async fn find_one(&self, filter: ProductFilter) -> ProductResult<Option<Product>>;

    /// Up to `limit` products matching the filter
    async fn find_many(&self, filter: ProductFilter, limit: i64) -> ProductResult<Vec<Product>>;

    /// Replace the product matching the filter; `false` when nothing matched
    async fn replace(&self, filter: ProductFilter, product: &Product) -> ProductResult<bool>;
}

/// In-memory store keeping insertion order. Used by tests and local runs
/// without a database.
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<Vec<Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn insert(&self, product: NewProduct) -> ProductResult<String> {
        let identifier = ObjectId::new().to_hex();
        let mut products = self.products.write().await;
        products.push(Product::from_new(identifier.clone(), product));

        tracing::debug!(product_id = %identifier, "Stored product in memory");
        Ok(identifier)
    }

    async fn find_one(&self, filter: ProductFilter) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| filter.matches(p)).cloned())
    }

    async fn find_many(&self, filter: ProductFilter, limit: i64) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(products
            .iter()
            .filter(|p| filter.matches(p))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn replace(&self, filter: ProductFilter, product: &Product) -> ProductResult<bool> {
        let mut products = self.products.write().await;
        match products.iter_mut().find(|p| filter.matches(p)) {
            Some(stored) => {
                let identifier = std::mem::take(&mut stored.identifier);
                *stored = product.clone();
                stored.identifier = identifier;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
