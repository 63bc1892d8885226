//! Store-agnostic selection criteria.
//!
//! A [`ProductFilter`] renders to a BSON query for MongoDB and can also be
//! evaluated directly against a [`Product`] by in-memory stores.

use mongodb::bson::{Document, doc};
use serde::{Deserialize, Deserializer, de};
use utoipa::IntoParams;

use crate::models::Product;

pub const DEFAULT_PRICE_MIN: f64 = 0.0;
pub const DEFAULT_PRICE_MAX: f64 = 10_000.0;

/// Upper bound on the number of products a single list call returns.
pub const LIST_LIMIT: i64 = 100;

fn default_price_min() -> f64 {
    DEFAULT_PRICE_MIN
}

fn default_price_max() -> f64 {
    DEFAULT_PRICE_MAX
}

/// `f64` accepts `NaN` and `inf`; neither makes a usable bound.
fn finite_bound<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(de::Error::custom(format!(
            "price bound must be a finite number, got {}",
            value
        )))
    }
}

/// Open price interval `(price_min, price_max)`; both bounds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PriceRange {
    /// Exclusive lower bound (default 0)
    #[serde(default = "default_price_min", deserialize_with = "finite_bound")]
    #[param(example = 0)]
    pub price_min: f64,
    /// Exclusive upper bound (default 10000)
    #[serde(default = "default_price_max", deserialize_with = "finite_bound")]
    #[param(example = 10000)]
    pub price_max: f64,
}

impl PriceRange {
    pub fn new(price_min: f64, price_max: f64) -> Self {
        Self {
            price_min,
            price_max,
        }
    }

    pub fn contains(&self, price: f64) -> bool {
        price > self.price_min && price < self.price_max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::new(DEFAULT_PRICE_MIN, DEFAULT_PRICE_MAX)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProductFilter {
    /// Exact match on the public identifier
    Identifier(String),
    /// Price strictly inside the range
    PriceRange(PriceRange),
}

impl ProductFilter {
    pub fn identifier(identifier: impl Into<String>) -> Self {
        Self::Identifier(identifier.into())
    }

    pub fn to_document(&self) -> Document {
        match self {
            Self::Identifier(identifier) => doc! { "identifier": identifier },
            Self::PriceRange(range) => doc! {
                "price": { "$gt": range.price_min, "$lt": range.price_max }
            },
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::Identifier(identifier) => product.identifier == *identifier,
            Self::PriceRange(range) => range.contains(product.price),
        }
    }
}

impl From<PriceRange> for ProductFilter {
    fn from(range: PriceRange) -> Self {
        Self::PriceRange(range)
    }
}
