//! HTTP handlers for the products catalog

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch},
};
use axum_helpers::{
    AppJson, AppQuery,
    errors::responses::{BadRequestResponse, InternalServerErrorResponse, NotFoundResponse},
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::filter::PriceRange;
use crate::models::{Product, ProductInput, ProductListResponse, ProductResponse};
use crate::repository::ProductRepository;
use crate::service::ProductService;

pub const CREATED_MESSAGE: &str = "Product created successfully";
pub const UPDATED_MESSAGE: &str = "Product updated successfully";

#[derive(OpenApi)]
#[openapi(
    paths(list_products, create_product, update_product),
    components(
        schemas(Product, ProductInput, ProductResponse, ProductListResponse),
        responses(NotFoundResponse, BadRequestResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

/// Products router. Paths are absolute; merge it at the root.
///
/// The collection path answers with and without a trailing slash.
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/produtos", get(list_products).post(create_product))
        .route("/produtos/", get(list_products).post(create_product))
        .route("/produtos/{id}", patch(update_product))
        .with_state(shared_service)
}

/// List products priced strictly between `priceMin` and `priceMax`
#[utoipa::path(
    get,
    path = "/produtos",
    tag = "Products",
    params(PriceRange),
    responses(
        (status = 200, description = "Up to 100 matching products", body = ProductListResponse),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    AppQuery(range): AppQuery<PriceRange>,
) -> ProductResult<Json<ProductListResponse>> {
    let products = service.list_products(range).await?;
    Ok(Json(ProductListResponse { products }))
}

/// Create a product
#[utoipa::path(
    post,
    path = "/produtos",
    tag = "Products",
    request_body = ProductInput,
    responses(
        (status = 200, description = "Product created", body = ProductResponse),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    AppJson(input): AppJson<ProductInput>,
) -> ProductResult<Json<ProductResponse>> {
    let product = service.create_product(input).await?;
    Ok(Json(ProductResponse {
        message: CREATED_MESSAGE.to_string(),
        product,
    }))
}

/// Replace a product's name, price and description
#[utoipa::path(
    patch,
    path = "/produtos/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product identifier")
    ),
    request_body = ProductInput,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<String>,
    AppJson(input): AppJson<ProductInput>,
) -> ProductResult<Json<ProductResponse>> {
    let product = service.update_product(&id, input).await?;
    Ok(Json(ProductResponse {
        message: UPDATED_MESSAGE.to_string(),
        product,
    }))
}
