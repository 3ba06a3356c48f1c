use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, Response};
use serde_json::json;
use tracing::instrument;
use url::Url;

use super::client_factory::create_http_client;
use super::error_handling::map_backend_error;
use crate::config::ApiConfig;
use crate::constants::{
    CREATE_PRODUCT_PATH, DELETE_PRODUCT_PATH, READ_PRODUCTS_PATH, UPDATE_PRODUCT_PATH,
};
use crate::error::{AppError, AppResult};
use crate::forms::ProductPayload;
use crate::models::{Product, ProductId, decode_product_list};
use crate::repository::ProductRepository;

/// REST client for the product backend.
pub struct ProductApiClient {
    http: Client,
    base_url: Url,
}

impl ProductApiClient {
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let http = create_http_client(config)?;
        Self::with_client(http, &config.base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> AppResult<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint path beneath the base URL, the way the console's
    /// HTTP layer joins `baseURL` and request paths.
    pub fn endpoint(&self, path: &str) -> AppResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    async fn check_status(response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(map_backend_error(status.as_u16(), &body))
    }

    async fn post_multipart(&self, path: &str, payload: ProductPayload) -> AppResult<()> {
        let url = self.endpoint(path)?;
        debug!(
            "POST {} with {} part(s)",
            url,
            payload.parts().len()
        );

        let response = self
            .http
            .post(url)
            .multipart(payload.into_multipart())
            .send()
            .await
            .map_err(|e| AppError::NetworkError(format!("Request failed: {}", e)))?;

        Self::check_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for ProductApiClient {
    #[instrument(skip(self))]
    async fn list(&self) -> AppResult<Vec<Product>> {
        let url = self.endpoint(READ_PRODUCTS_PATH)?;
        debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::NetworkError(format!("Request failed: {}", e)))?;

        let body = Self::check_status(response)
            .await?
            .text()
            .await
            .map_err(|e| AppError::NetworkError(format!("Failed to read response: {}", e)))?;

        let products = decode_product_list(&body)
            .map_err(|e| AppError::InvalidResponse(format!("Failed to parse product list: {}", e)))?;

        info!("Fetched {} product(s)", products.len());
        Ok(products)
    }

    #[instrument(skip(self, payload))]
    async fn create(&self, payload: ProductPayload) -> AppResult<()> {
        self.post_multipart(CREATE_PRODUCT_PATH, payload.with_product_id(None))
            .await?;
        info!("Created product");
        Ok(())
    }

    #[instrument(skip(self, payload), fields(product_id = %id))]
    async fn update(&self, id: ProductId, payload: ProductPayload) -> AppResult<()> {
        self.post_multipart(UPDATE_PRODUCT_PATH, payload.with_product_id(Some(id)))
            .await?;
        info!("Updated product {}", id);
        Ok(())
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn delete(&self, id: ProductId) -> AppResult<()> {
        let url = self.endpoint(DELETE_PRODUCT_PATH)?;
        debug!("POST {} for product {}", url, id);

        let response = self
            .http
            .post(url)
            .json(&json!({ "product_id": id }))
            .send()
            .await
            .map_err(|e| AppError::NetworkError(format!("Request failed: {}", e)))?;

        Self::check_status(response).await?;
        info!("Deleted product {}", id);
        Ok(())
    }
}
