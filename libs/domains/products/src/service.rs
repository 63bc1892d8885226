//! Product Service - Business logic layer

use chrono::Utc;
use std::sync::Arc;
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::filter::{LIST_LIMIT, PriceRange, ProductFilter};
use crate::models::{NewProduct, Product, ProductInput};
use crate::repository::ProductRepository;

/// Product operations on top of a [`ProductRepository`].
///
/// The service owns timestamping: `updatedAt` always comes from the server
/// clock, never from the client.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Stamp, insert and return the product with its new identifier.
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: ProductInput) -> ProductResult<Product> {
        let new = NewProduct::stamped(input, Utc::now());
        let identifier = self.repository.insert(new.clone()).await?;

        if identifier.is_empty() {
            return Err(ProductError::Unexpected(
                "store returned an empty identifier".to_string(),
            ));
        }

        tracing::info!(product_id = %identifier, "Product created");
        Ok(Product::from_new(identifier, new))
    }

    /// Fully replace the client fields of an existing product and restamp it.
    #[instrument(skip(self, input))]
    pub async fn update_product(
        &self,
        identifier: &str,
        input: ProductInput,
    ) -> ProductResult<Product> {
        let filter = ProductFilter::identifier(identifier);

        let mut product = self
            .repository
            .find_one(filter.clone())
            .await?
            .ok_or_else(|| ProductError::NotFound(identifier.to_string()))?;

        product.replace_with(input, Utc::now());

        // The product can vanish between the read and the write.
        if !self.repository.replace(filter, &product).await? {
            return Err(ProductError::NotFound(identifier.to_string()));
        }

        tracing::info!(product_id = %identifier, "Product updated");
        Ok(product)
    }

    /// Products priced strictly inside `range`, at most [`LIST_LIMIT`].
    #[instrument(skip(self))]
    pub async fn list_products(&self, range: PriceRange) -> ProductResult<Vec<Product>> {
        self.repository
            .find_many(ProductFilter::PriceRange(range), LIST_LIMIT)
            .await
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
