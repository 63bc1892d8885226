//! Custom extractors for Axum handlers.
//!
//! Both wrap the stock axum extractor and turn its rejection into an
//! [`AppError`](crate::errors::AppError), so malformed input gets the same
//! JSON error body as every other failure.

pub mod json;
pub mod query;

pub use json::AppJson;
pub use query::AppQuery;
