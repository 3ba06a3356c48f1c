use async_trait::async_trait;
use log::debug;

use crate::error::AppResult;
use crate::forms::ProductPayload;
use crate::models::{Product, ProductId, find_by_id};

/// Access to the product collection on the backend.
///
/// Every call is a single round trip; there is no caching, retry or
/// get-by-id endpoint behind it.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// The full collection, in backend order.
    async fn list(&self) -> AppResult<Vec<Product>>;

    /// Submit a new product. The payload's `product_id` entry is sent empty.
    async fn create(&self, payload: ProductPayload) -> AppResult<()>;

    /// Replace every field of product `id`.
    async fn update(&self, id: ProductId, payload: ProductPayload) -> AppResult<()>;

    async fn delete(&self, id: ProductId) -> AppResult<()>;
}

/// Fetch the whole collection and pick one record out of it.
pub async fn fetch_product(
    repository: &dyn ProductRepository,
    id: ProductId,
) -> AppResult<Option<Product>> {
    let products = repository.list().await?;
    let total = products.len();
    let product = find_by_id(products, id);
    debug!(
        "Looked up product {} in a collection of {}: {}",
        id,
        total,
        if product.is_some() { "found" } else { "missing" }
    );
    Ok(product)
}
