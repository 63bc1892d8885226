use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Client-supplied product fields, used for both create and full replace.
///
/// Unknown fields (including `identifier` and `updatedAt`) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[schema(example = "Widget")]
    pub name: String,
    #[schema(example = 50.0)]
    pub price: f64,
    #[schema(example = "A widget")]
    pub description: String,
}

/// A product that has been stamped but not yet assigned an identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub description: String,
    pub updated_at: DateTime<Utc>,
}

impl NewProduct {
    pub fn stamped(input: ProductInput, at: DateTime<Utc>) -> Self {
        Self {
            name: input.name,
            price: input.price,
            description: input.description,
            updated_at: at,
        }
    }
}

/// Product as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Server-assigned, immutable once created
    #[schema(example = "65f1c0ffee0000000000beef")]
    pub identifier: String,
    pub name: String,
    pub price: f64,
    pub description: String,
    /// Server-assigned on create and every update
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn from_new(identifier: String, new: NewProduct) -> Self {
        Self {
            identifier,
            name: new.name,
            price: new.price,
            description: new.description,
            updated_at: new.updated_at,
        }
    }

    /// Replace every client-controlled field and restamp. The identifier is kept.
    pub fn replace_with(&mut self, input: ProductInput, at: DateTime<Utc>) {
        self.name = input.name;
        self.price = input.price;
        self.description = input.description;
        self.updated_at = at;
    }
}

/// Stored shape: the product plus the store's own primary key.
///
/// `identifier` is always the hex form of `_id`, written in the same insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDocument {
    #[serde(rename = "_id")]
    pub object_id: ObjectId,
    pub identifier: String,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub updated_at: DateTime<Utc>,
}

impl ProductDocument {
    pub fn new(object_id: ObjectId, new: NewProduct) -> Self {
        Self {
            object_id,
            identifier: object_id.to_hex(),
            name: new.name,
            price: new.price,
            description: new.description,
            updated_at: new.updated_at,
        }
    }
}

impl From<ProductDocument> for Product {
    fn from(doc: ProductDocument) -> Self {
        Self {
            identifier: doc.identifier,
            name: doc.name,
            price: doc.price,
            description: doc.description,
            updated_at: doc.updated_at,
        }
    }
}

/// Body of create and update responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    #[schema(example = "Product created successfully")]
    pub message: String,
    pub product: Product,
}

/// Body of the list response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(name: &str, price: f64) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            price,
            description: format!("{} description", name),
        }
    }

    #[test]
    fn test_input_ignores_server_fields() {
        let parsed: ProductInput = serde_json::from_value(json!({
            "name": "Widget",
            "price": 50,
            "description": "A widget",
            "identifier": "client-chosen",
            "updatedAt": "2001-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(
            parsed,
            ProductInput {
                name: "Widget".to_string(),
                price: 50.0,
                description: "A widget".to_string(),
            }
        );
    }

    #[test]
    fn test_input_requires_all_fields() {
        let missing_price = serde_json::from_value::<ProductInput>(json!({
            "name": "Widget",
            "description": "A widget"
        }));
        assert!(missing_price.is_err());
    }

    #[test]
    fn test_document_identifier_is_object_id_hex() {
        let oid = ObjectId::new();
        let doc = ProductDocument::new(oid, NewProduct::stamped(input("Gear", 3.5), Utc::now()));

        assert_eq!(doc.identifier, oid.to_hex());
        assert_eq!(Product::from(doc).identifier, oid.to_hex());
    }

    #[test]
    fn test_replace_with_keeps_identifier() {
        let first = Utc::now();
        let mut product = Product::from_new(
            "abc".to_string(),
            NewProduct::stamped(input("Gear", 3.5), first),
        );
        let later = first + chrono::Duration::seconds(5);
        product.replace_with(input("Cog", 4.0), later);

        assert_eq!(product.identifier, "abc");
        assert_eq!(product.name, "Cog");
        assert_eq!(product.price, 4.0);
        assert_eq!(product.updated_at, later);
    }

    #[test]
    fn test_product_serializes_camel_case() {
        let product = Product::from_new(
            "abc".to_string(),
            NewProduct::stamped(input("Gear", 3.5), Utc::now()),
        );
        let value = serde_json::to_value(&product).unwrap();

        assert!(value.get("updatedAt").is_some());
        assert!(value.get("updated_at").is_none());
        assert_eq!(value["identifier"], "abc");
    }
}
