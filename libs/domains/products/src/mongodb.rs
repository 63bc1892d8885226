//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{doc, oid::ObjectId},
    options::{FindOptions, IndexOptions},
};
use tracing::instrument;

use crate::error::ProductResult;
use crate::filter::ProductFilter;
use crate::models::{NewProduct, Product, ProductDocument};
use crate::repository::ProductRepository;

pub const DEFAULT_COLLECTION: &str = "products";

pub struct MongoProductRepository {
    collection: Collection<ProductDocument>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, DEFAULT_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<ProductDocument>(collection_name);
        Self { collection }
    }

    /// Create the identifier and price indexes. Safe to call on every start.
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "identifier": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_identifier_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "price": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_price".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, product), fields(product_name = %product.name))]
    async fn insert(&self, product: NewProduct) -> ProductResult<String> {
        // Generating the key client-side lets `identifier` ship in the same write.
        let document = ProductDocument::new(ObjectId::new(), product);
        self.collection.insert_one(&document).await?;

        tracing::info!(product_id = %document.identifier, "Product inserted");
        Ok(document.identifier)
    }

    #[instrument(skip(self))]
    async fn find_one(&self, filter: ProductFilter) -> ProductResult<Option<Product>> {
        let document = self.collection.find_one(filter.to_document()).await?;
        Ok(document.map(Product::from))
    }

    #[instrument(skip(self))]
    async fn find_many(&self, filter: ProductFilter, limit: i64) -> ProductResult<Vec<Product>> {
        let options = FindOptions::builder().limit(limit).build();

        let cursor = self
            .collection
            .find(filter.to_document())
            .with_options(options)
            .await?;
        let documents: Vec<ProductDocument> = cursor.try_collect().await?;

        Ok(documents.into_iter().map(Product::from).collect())
    }

    #[instrument(skip(self, product))]
    async fn replace(&self, filter: ProductFilter, product: &Product) -> ProductResult<bool> {
        // Replacement carries no `_id`, so the server keeps the existing one.
        let result = self
            .collection
            .clone_with_type::<Product>()
            .replace_one(filter.to_document(), product)
            .await?;

        tracing::info!(
            product_id = %product.identifier,
            matched = result.matched_count,
            "Product replaced"
        );
        Ok(result.matched_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::PriceRange;
    use chrono::Utc;
    use mongodb::bson;

    #[test]
    fn test_document_stores_identifier_beside_object_id() {
        let oid = ObjectId::new();
        let new = NewProduct {
            name: "Widget".to_string(),
            price: 50.0,
            description: "A widget".to_string(),
            updated_at: Utc::now(),
        };
        let stored = bson::to_document(&ProductDocument::new(oid, new)).unwrap();

        assert_eq!(stored.get_object_id("_id").unwrap(), oid);
        assert_eq!(stored.get_str("identifier").unwrap(), oid.to_hex());
        assert_eq!(stored.get_f64("price").unwrap(), 50.0);
        assert!(stored.contains_key("updatedAt"));
    }

    #[test]
    fn test_replacement_has_no_object_id() {
        let product = Product {
            identifier: ObjectId::new().to_hex(),
            name: "Widget".to_string(),
            price: 50.0,
            description: "A widget".to_string(),
            updated_at: Utc::now(),
        };
        let replacement = bson::to_document(&product).unwrap();
        assert!(!replacement.contains_key("_id"));
    }

    #[test]
    fn test_list_query_targets_price() {
        let query = ProductFilter::from(PriceRange::default()).to_document();
        assert_eq!(query.keys().collect::<Vec<_>>(), ["price"]);
    }
}
