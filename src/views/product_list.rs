use std::sync::RwLock;

use log::{debug, error, warn};

use super::{LoadSequence, ViewContext, ViewState, format_price, read_lock, write_lock};
use crate::models::{Product, ProductId, Visibility};
use crate::shell::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Thumbnail {
    Image(String),
    Placeholder,
}

impl Thumbnail {
    pub const PLACEHOLDER_LABEL: &'static str = "No Image";
}

/// One table row, keyed by the product id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRow {
    pub key: ProductId,
    pub thumbnail: Thumbnail,
    pub name: String,
    pub pieces: String,
    pub visibility: Visibility,
    pub price: String,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            key: product.product_id,
            thumbnail: product
                .first_image()
                .map(|url| Thumbnail::Image(url.to_string()))
                .unwrap_or(Thumbnail::Placeholder),
            name: product.product_name.clone(),
            pieces: product.number_of_pieces.to_string(),
            visibility: product.visibility(),
            price: format_price(&product.product_price),
        }
    }
}

/// Product table with edit, details and delete row actions.
pub struct ProductListView {
    ctx: ViewContext,
    state: RwLock<ViewState<Vec<Product>>>,
    loads: LoadSequence,
}

impl ProductListView {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            state: RwLock::new(ViewState::Idle),
            loads: LoadSequence::default(),
        }
    }

    /// Fetch the collection. On failure the table is emptied and a
    /// notification is shown.
    pub async fn load(&self) {
        let ticket = self.loads.begin();
        *write_lock(&self.state) = ViewState::Loading;

        let result = self.ctx.repository.list().await;
        if !self.loads.is_current(ticket) {
            debug!("Discarding superseded product list load {}", ticket);
            return;
        }

        match result {
            Ok(products) => *write_lock(&self.state) = ViewState::Ready(products),
            Err(e) => {
                error!("Failed to load products: {}", e);
                *write_lock(&self.state) = ViewState::Failed;
                self.ctx.error("Failed to load products");
            }
        }
    }

    pub fn state(&self) -> ViewState<Vec<Product>> {
        read_lock(&self.state).clone()
    }

    pub fn is_loading(&self) -> bool {
        read_lock(&self.state).is_loading()
    }

    /// Rows to display; empty unless the last load succeeded.
    pub fn rows(&self) -> Vec<ProductRow> {
        read_lock(&self.state)
            .ready()
            .map(|products| products.iter().map(ProductRow::from).collect())
            .unwrap_or_default()
    }

    pub fn add_product(&self) {
        self.ctx.navigator.navigate(&Route::AddProduct.path());
    }

    pub fn edit(&self, id: ProductId) {
        self.ctx.navigator.navigate(&Route::edit(id).path());
    }

    pub fn show_details(&self, id: ProductId) {
        self.ctx.navigator.navigate(&Route::details(id).path());
    }

    /// Delete without confirmation, then re-fetch. Returns whether the
    /// backend accepted the delete; on failure the current rows stay.
    pub async fn delete(&self, id: ProductId) -> bool {
        match self.ctx.repository.delete(id).await {
            Ok(()) => {
                self.ctx.success("Product deleted successfully");
                self.load().await;
                true
            }
            Err(e) => {
                warn!("Failed to delete product {}: {}", id, e);
                self.ctx.error("Failed to delete product");
                false
            }
        }
    }
}
