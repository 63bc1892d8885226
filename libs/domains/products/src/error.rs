use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use mongodb::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    /// No stored product carries the requested identifier
    #[error("Product not found: {0}")]
    NotFound(String),

    /// Connection, timeout or query failure reported by the document store
    #[error("Store error: {0}")]
    Store(String),

    /// Anything else: bad arguments, (de)serialization failures, broken invariants
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            ProductError::Store(msg) => AppError::Database(msg),
            ProductError::Unexpected(msg) => AppError::BadRequest(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        match *err.kind {
            ErrorKind::InvalidArgument { .. }
            | ErrorKind::BsonSerialization(_)
            | ErrorKind::BsonDeserialization(_) => ProductError::Unexpected(err.to_string()),
            _ => ProductError::Store(err.to_string()),
        }
    }
}
