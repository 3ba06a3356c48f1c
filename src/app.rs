use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{Product, ProductId, ProductImage};
use crate::render;
use crate::repository::ProductRepository;
use crate::shell::{HistoryNavigator, Notifier, Route};
use crate::views::{
    FormMode, Prefill, ProductDetailsView, ProductFormView, ProductListView, SubmitOutcome,
    ViewContext, ViewState,
};

/// Changes to apply to a form before submitting it.
#[derive(Debug, Clone, Default)]
pub struct FormEdits {
    pub fields: Vec<(String, String)>,
    pub image_urls: Vec<String>,
    pub image_files: Vec<PathBuf>,
    /// Positions to drop from the pre-filled image list.
    pub remove_images: Vec<usize>,
}

/// Drives the views for one terminal session and renders their screens.
pub struct ConsoleApp {
    ctx: ViewContext,
    navigator: Arc<HistoryNavigator>,
}

impl ConsoleApp {
    pub fn new(repository: Arc<dyn ProductRepository>, notifier: Arc<dyn Notifier>) -> Self {
        let navigator = Arc::new(HistoryNavigator::new());
        Self {
            ctx: ViewContext::new(repository, navigator.clone(), notifier),
            navigator,
        }
    }

    pub fn context(&self) -> &ViewContext {
        &self.ctx
    }

    /// Open a route and render what it shows once loading settles.
    pub async fn render(&self, route: &Route) -> String {
        debug!("Rendering {}", route);
        match route {
            Route::ProductList => {
                let view = ProductListView::new(self.ctx.clone());
                view.load().await;
                render::product_table(&view.rows())
            }
            Route::ProductDetails(raw_id) => {
                let view = ProductDetailsView::new(self.ctx.clone());
                view.load(raw_id).await;
                render::product_details(&view.screen())
            }
            Route::AddProduct | Route::EditProduct(_) => {
                let view = ProductFormView::new(self.ctx.clone(), form_mode(route));
                view.open().await;
                let state = view.state().ready().cloned().unwrap_or_default();
                render::product_form(view.title(), view.submit_label(), &state)
            }
            Route::NotFound(path) => render::not_found(path),
        }
    }

    pub async fn open(&self, path: &str) -> String {
        self.render(&Route::parse(path)).await
    }

    /// Raw records for machine-readable output. `None` when the fetch failed.
    pub async fn products(&self) -> Option<Vec<Product>> {
        let view = ProductListView::new(self.ctx.clone());
        view.load().await;
        match view.state() {
            ViewState::Ready(products) => Some(products),
            _ => None,
        }
    }

    pub async fn product(&self, raw_id: &str) -> Option<Product> {
        let view = ProductDetailsView::new(self.ctx.clone());
        view.load(raw_id).await;
        view.state().ready().cloned().flatten()
    }

    /// Fill and submit the create or edit form. Returns the outcome and, when
    /// the form was rejected, the form screen with its errors.
    ///
    /// An edit only goes out when the stored record was loaded first, so a
    /// failed or empty pre-fill never overwrites the product with defaults.
    pub async fn save(
        &self,
        mode: FormMode,
        edits: &FormEdits,
    ) -> AppResult<(SubmitOutcome, Option<String>)> {
        let view = ProductFormView::new(self.ctx.clone(), mode);
        view.open().await;

        if let FormMode::Edit(raw_id) = view.mode() {
            match view.prefill() {
                Prefill::Found | Prefill::NotNeeded => {}
                Prefill::Missing => {
                    warn!("Refusing to edit '{}': no stored product to start from", raw_id);
                    return Err(AppError::InvalidArgument(format!(
                        "No stored product with id '{}' to edit",
                        raw_id
                    )));
                }
                Prefill::Failed(e) => {
                    warn!("Refusing to edit '{}': stored values could not be loaded", raw_id);
                    return Err(e);
                }
            }
        }

        let mut removals = edits.remove_images.clone();
        removals.sort_unstable_by(|a, b| b.cmp(a));
        removals.dedup();
        for index in removals {
            view.remove_image(index)?;
        }
        for (field, value) in &edits.fields {
            view.set_field(field, value.as_str())?;
        }
        for url in &edits.image_urls {
            view.add_image(ProductImage::remote(url.as_str()))?;
        }
        for path in &edits.image_files {
            view.add_image_file(path).await?;
        }

        let outcome = view.submit().await;
        let screen = match &outcome {
            SubmitOutcome::Invalid(_) => {
                let state = view.state().ready().cloned().unwrap_or_default();
                Some(render::product_form(view.title(), view.submit_label(), &state))
            }
            _ => None,
        };
        Ok((outcome, screen))
    }

    /// Delete a product and render the list the view re-fetched afterwards.
    /// `None` when the backend refused the delete.
    pub async fn delete(&self, id: ProductId) -> Option<String> {
        let view = ProductListView::new(self.ctx.clone());
        if view.delete(id).await {
            Some(render::product_table(&view.rows()))
        } else {
            None
        }
    }

    /// Render every route the views asked to navigate to, oldest first.
    pub async fn follow_navigation(&self) -> Vec<String> {
        let mut screens = Vec::new();
        while let Some(path) = self.navigator.take_pending() {
            info!("Following navigation to {}", path);
            screens.push(self.open(&path).await);
        }
        screens
    }
}

fn form_mode(route: &Route) -> FormMode {
    match route {
        Route::EditProduct(raw_id) => FormMode::Edit(raw_id.clone()),
        _ => FormMode::Create,
    }
}
