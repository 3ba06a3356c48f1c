use std::path::Path;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, error, info, warn};

use super::{LoadSequence, ViewContext, ViewState, read_lock, write_lock};
use crate::error::{AppError, AppResult};
use crate::forms::ProductForm;
use crate::models::{ProductId, ProductImage};
use crate::repository::fetch_product;
use crate::shell::Route;
use crate::validation::FieldError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    /// Raw id segment from the route.
    Edit(String),
}

/// Form inputs plus the errors from the last rejected submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub form: ProductForm,
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Saved,
    /// Validation failed; no request was sent.
    Invalid(Vec<FieldError>),
    Failed(AppError),
    /// A save is already in flight, or the form is still loading.
    Busy,
}

/// What the edit pre-fill found when the form was opened.
#[derive(Debug, Clone, PartialEq)]
pub enum Prefill {
    /// Create mode, or the form has not been opened.
    NotNeeded,
    Found,
    /// The id is not numeric or no stored record has it.
    Missing,
    Failed(AppError),
}

/// Clears the submitting flag however `submit` returns.
struct SubmitGuard<'a>(&'a AtomicBool);

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Create/edit form for one product.
pub struct ProductFormView {
    ctx: ViewContext,
    mode: FormMode,
    state: RwLock<ViewState<FormState>>,
    loads: LoadSequence,
    submitting: AtomicBool,
    prefill: RwLock<Prefill>,
}

impl ProductFormView {
    pub fn new(ctx: ViewContext, mode: FormMode) -> Self {
        Self {
            ctx,
            mode,
            state: RwLock::new(ViewState::Idle),
            loads: LoadSequence::default(),
            submitting: AtomicBool::new(false),
            prefill: RwLock::new(Prefill::NotNeeded),
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add Product",
            FormMode::Edit(_) => "Edit Product",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add Product",
            FormMode::Edit(_) => "Update Product",
        }
    }

    /// Prepare the form. In edit mode the stored record is fetched and
    /// mapped in; the view stays `Loading` until that finishes.
    pub async fn open(&self) {
        let ticket = self.loads.begin();
        let raw_id = match &self.mode {
            FormMode::Create => {
                *write_lock(&self.state) = ViewState::Ready(FormState::default());
                *write_lock(&self.prefill) = Prefill::NotNeeded;
                return;
            }
            FormMode::Edit(raw_id) => raw_id,
        };

        *write_lock(&self.state) = ViewState::Loading;

        let Some(id) = ProductId::coerce(raw_id) else {
            debug!("Edit route id '{}' is not numeric; keeping defaults", raw_id);
            *write_lock(&self.state) = ViewState::Ready(FormState::default());
            *write_lock(&self.prefill) = Prefill::Missing;
            return;
        };

        let result = fetch_product(self.ctx.repository.as_ref(), id).await;
        if !self.loads.is_current(ticket) {
            debug!("Discarding superseded pre-fill for product {}", id);
            return;
        }

        match result {
            Ok(product) => {
                let form = product
                    .as_ref()
                    .map(ProductForm::from_product)
                    .unwrap_or_default();
                let prefill = if product.is_some() {
                    Prefill::Found
                } else {
                    debug!("Product {} not in collection; keeping defaults", id);
                    Prefill::Missing
                };
                *write_lock(&self.prefill) = prefill;
                *write_lock(&self.state) = ViewState::Ready(FormState {
                    form,
                    errors: Vec::new(),
                });
            }
            Err(e) => {
                error!("Failed to fetch product {} for editing: {}", id, e);
                *write_lock(&self.state) = ViewState::Failed;
                *write_lock(&self.prefill) = Prefill::Failed(e);
                self.ctx.error("Failed to fetch product data");
            }
        }
    }

    pub fn state(&self) -> ViewState<FormState> {
        read_lock(&self.state).clone()
    }

    pub fn prefill(&self) -> Prefill {
        read_lock(&self.prefill).clone()
    }

    pub fn is_loading(&self) -> bool {
        read_lock(&self.state).is_loading()
    }

    /// Current inputs; defaults until the form is ready.
    pub fn form(&self) -> ProductForm {
        read_lock(&self.state)
            .ready()
            .map(|state| state.form.clone())
            .unwrap_or_default()
    }

    pub fn errors(&self) -> Vec<FieldError> {
        read_lock(&self.state)
            .ready()
            .map(|state| state.errors.clone())
            .unwrap_or_default()
    }

    pub fn set_field(&self, field: &str, value: impl Into<String>) -> AppResult<()> {
        self.with_state(|state| state.form.set_field(field, value))
    }

    pub fn add_image(&self, image: ProductImage) -> AppResult<()> {
        self.with_state(|state| {
            state.form.add_image(image);
            Ok(())
        })
    }

    /// Read an image from disk and append it to the form.
    pub async fn add_image_file(&self, path: &Path) -> AppResult<()> {
        let image = ProductImage::from_file(path).await?;
        self.add_image(image)
    }

    pub fn remove_image(&self, index: usize) -> AppResult<ProductImage> {
        self.with_state(|state| state.form.remove_image(index))
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    /// Validate, then create or update. Success notifies and navigates to the
    /// list; failure notifies and leaves the form as it was.
    pub async fn submit(&self) -> SubmitOutcome {
        if self
            .submitting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Submit ignored; a save is already in flight");
            return SubmitOutcome::Busy;
        }
        let _guard = SubmitGuard(&self.submitting);

        let form = {
            let mut state = write_lock(&self.state);
            let Some(current) = ready_or_defaults(&mut state) else {
                return SubmitOutcome::Busy;
            };
            current.errors = current.form.validate();
            if !current.errors.is_empty() {
                debug!("Submit blocked by {} validation error(s)", current.errors.len());
                return SubmitOutcome::Invalid(current.errors.clone());
            }
            current.form.clone()
        };

        match self.save(&form).await {
            Ok(message) => {
                info!("{}", message);
                self.ctx.success(message);
                self.ctx.navigator.navigate(&Route::ProductList.path());
                SubmitOutcome::Saved
            }
            Err(e) => {
                if e.is_remote() {
                    warn!("Backend did not accept the product: {}", e);
                } else {
                    error!("Could not save product: {}", e);
                }
                self.ctx.error("Failed to save product");
                SubmitOutcome::Failed(e)
            }
        }
    }

    async fn save(&self, form: &ProductForm) -> AppResult<&'static str> {
        match &self.mode {
            FormMode::Create => {
                self.ctx.repository.create(form.to_payload(None)?).await?;
                Ok("Product created successfully")
            }
            FormMode::Edit(raw_id) => {
                let id = ProductId::coerce(raw_id).ok_or_else(|| {
                    AppError::InvalidArgument(format!("'{}' is not a product id", raw_id))
                })?;
                self.ctx.repository.update(id, form.to_payload(Some(id))?).await?;
                Ok("Product updated successfully")
            }
        }
    }

    pub fn back(&self) {
        self.ctx.navigator.navigate(&Route::ProductList.path());
    }

    fn with_state<R>(&self, edit: impl FnOnce(&mut FormState) -> AppResult<R>) -> AppResult<R> {
        let mut state = write_lock(&self.state);
        let current = ready_or_defaults(&mut state).ok_or_else(|| {
            AppError::InvalidArgument("The form is still loading".to_string())
        })?;
        edit(current)
    }
}

/// The editable state, starting from defaults when nothing was loaded.
fn ready_or_defaults(state: &mut ViewState<FormState>) -> Option<&mut FormState> {
    if state.is_loading() {
        return None;
    }
    if state.ready().is_none() {
        *state = ViewState::Ready(FormState::default());
    }
    match state {
        ViewState::Ready(current) => Some(current),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::NotificationKind;
    use crate::test_support::{Harness, product};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn fill(view: &ProductFormView) {
        view.set_field("product_name", "قميص").unwrap();
        view.set_field("product_name_en", "Shirt").unwrap();
        view.set_field("product_price", "120").unwrap();
        view.set_field("price_after_discount", "99.5").unwrap();
    }

    #[test]
    fn test_titles_follow_mode() {
        let harness = Harness::new(vec![]);
        let create = ProductFormView::new(harness.context(), FormMode::Create);
        let edit = ProductFormView::new(harness.context(), FormMode::Edit("3".into()));
        assert_eq!((create.title(), create.submit_label()), ("Add Product", "Add Product"));
        assert_eq!((edit.title(), edit.submit_label()), ("Edit Product", "Update Product"));
    }

    #[tokio::test]
    async fn test_create_sends_hidden_zero_and_blank_id() {
        let harness = Harness::new(vec![]);
        let view = ProductFormView::new(harness.context(), FormMode::Create);
        view.open().await;
        fill(&view);

        assert_eq!(view.submit().await, SubmitOutcome::Saved);

        let created = harness.repository.created.lock().unwrap().clone();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].product_id(), Some(""));
        assert_eq!(created[0].get("product_hidden"), Some("0"));
        assert_eq!(harness.navigator.pending(), vec!["/"]);
        assert_eq!(
            harness.notifier.messages(),
            vec![(NotificationKind::Success, "Product created successfully".to_string())]
        );
        assert!(!view.is_submitting());
    }

    #[tokio::test]
    async fn test_edit_prefills_and_sends_original_id() {
        let mut stored = product(42, "Shoe");
        stored.product_hidden = true;
        stored.product_image = vec!["https://cdn.example.com/s.jpg".into()];
        let harness = Harness::new(vec![product(1, "Hat"), stored]);
        let view = ProductFormView::new(harness.context(), FormMode::Edit("42".into()));

        view.open().await;
        assert_eq!(view.prefill(), Prefill::Found);
        assert_eq!(view.form().product_name_en, "Shoe");
        assert_eq!(view.form().product_hidden, "yes");

        view.set_field("product_price", "80").unwrap();
        view.add_image(ProductImage::pending("image/png", vec![1, 2, 3]))
            .unwrap();
        assert_eq!(view.submit().await, SubmitOutcome::Saved);

        let updated = harness.repository.updated.lock().unwrap().clone();
        assert_eq!(updated.len(), 1);
        let (id, payload) = &updated[0];
        assert_eq!(*id, ProductId(42));
        assert_eq!(payload.product_id(), Some("42"));
        assert_eq!(payload.get("product_price"), Some("80"));
        assert_eq!(payload.get("product_hidden"), Some("1"));
        assert_eq!(
            payload.images(),
            &[
                "https://cdn.example.com/s.jpg".to_string(),
                "data:image/png;base64,AQID".to_string()
            ]
        );
        assert_eq!(
            harness.notifier.messages(),
            vec![(NotificationKind::Success, "Product updated successfully".to_string())]
        );
    }

    #[tokio::test]
    async fn test_edit_without_match_keeps_defaults() {
        let harness = Harness::new(vec![product(1, "Hat")]);
        let view = ProductFormView::new(harness.context(), FormMode::Edit("9".into()));

        view.open().await;

        assert_eq!(view.state(), ViewState::Ready(FormState::default()));
        assert_eq!(view.prefill(), Prefill::Missing);
        assert!(harness.notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_failed_prefill_notifies_and_keeps_defaults() {
        let harness = Harness::new(vec![product(1, "Hat")]);
        harness.repository.fail_list(true);
        let view = ProductFormView::new(harness.context(), FormMode::Edit("1".into()));

        view.open().await;

        assert_eq!(view.state(), ViewState::Failed);
        assert!(matches!(view.prefill(), Prefill::Failed(AppError::NetworkError(_))));
        assert_eq!(view.form(), ProductForm::default());
        assert_eq!(
            harness.notifier.messages(),
            vec![(NotificationKind::Error, "Failed to fetch product data".to_string())]
        );
        // Inputs can still be edited from the defaults.
        view.set_field("discount", "5").unwrap();
        assert_eq!(view.form().discount, "5");
    }

    #[tokio::test]
    async fn test_form_is_locked_while_prefill_runs() {
        let harness = Harness::new(vec![product(1, "Hat")]);
        let gate = Arc::new(Notify::new());
        harness.repository.queue_gate(Some(gate.clone()));
        let view = ProductFormView::new(harness.context(), FormMode::Edit("1".into()));

        let while_loading = async {
            tokio::task::yield_now().await;
            assert!(view.is_loading());
            assert!(view.set_field("discount", "1").is_err());
            assert_eq!(view.submit().await, SubmitOutcome::Busy);
            gate.notify_one();
        };
        tokio::join!(view.open(), while_loading);

        assert_eq!(view.form().product_name_en, "Hat");
    }

    #[tokio::test]
    async fn test_invalid_form_sends_nothing() {
        let harness = Harness::new(vec![]);
        let view = ProductFormView::new(harness.context(), FormMode::Create);
        view.open().await;
        view.set_field("product_name", "قميص").unwrap();
        view.set_field("product_price", "abc").unwrap();

        let outcome = view.submit().await;

        let fields: Vec<&str> = view.errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["product_name_en", "product_price"]);
        assert!(matches!(outcome, SubmitOutcome::Invalid(errors) if errors.len() == 2));
        assert!(harness.repository.created.lock().unwrap().is_empty());
        assert!(harness.navigator.pending().is_empty());
    }

    #[tokio::test]
    async fn test_failed_save_keeps_form_and_route() {
        let harness = Harness::new(vec![]);
        harness.repository.fail_writes(true);
        let view = ProductFormView::new(harness.context(), FormMode::Create);
        view.open().await;
        fill(&view);
        let before = view.form();

        let outcome = view.submit().await;

        assert!(matches!(outcome, SubmitOutcome::Failed(AppError::ExternalServiceError(_))));
        assert_eq!(view.form(), before);
        assert!(harness.navigator.pending().is_empty());
        assert_eq!(
            harness.notifier.messages(),
            vec![(NotificationKind::Error, "Failed to save product".to_string())]
        );
        assert!(!view.is_submitting());
    }

    #[tokio::test]
    async fn test_edit_with_non_numeric_id_cannot_save() {
        let harness = Harness::new(vec![]);
        let view = ProductFormView::new(harness.context(), FormMode::Edit("abc".into()));
        view.open().await;
        assert_eq!(view.prefill(), Prefill::Missing);
        fill(&view);

        let outcome = view.submit().await;

        assert!(matches!(outcome, SubmitOutcome::Failed(AppError::InvalidArgument(_))));
        assert!(harness.repository.updated.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_image_file_appends_pending_image() {
        use std::io::Write;

        let harness = Harness::new(vec![]);
        let view = ProductFormView::new(harness.context(), FormMode::Create);
        view.open().await;
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"png").unwrap();

        view.add_image(ProductImage::remote("https://cdn.example.com/a.jpg"))
            .unwrap();
        view.add_image_file(file.path()).await.unwrap();

        let images = view.form().product_image;
        assert_eq!(images.len(), 2);
        assert_eq!(images[1], ProductImage::pending("image/png", b"png".to_vec()));
        assert!(view.remove_image(5).is_err());
        assert_eq!(view.remove_image(0).unwrap(), images[0]);
    }

    #[test]
    fn test_back_navigates_to_list() {
        let harness = Harness::new(vec![]);
        let view = ProductFormView::new(harness.context(), FormMode::Create);
        view.back();
        assert_eq!(harness.navigator.pending(), vec!["/"]);
    }

    proptest! {
        #[test]
        fn prop_submitted_images_follow_form_order(
            urls in prop::collection::vec("[a-z]{1,6}", 0..8),
        ) {
            let harness = Harness::new(vec![]);
            let view = ProductFormView::new(harness.context(), FormMode::Create);

            let outcome = tokio_test::block_on(async {
                view.open().await;
                fill(&view);
                for url in &urls {
                    view.add_image(ProductImage::remote(url.as_str())).unwrap();
                }
                view.submit().await
            });

            prop_assert_eq!(outcome, SubmitOutcome::Saved);
            let created = harness.repository.created.lock().unwrap().clone();
            prop_assert_eq!(created[0].images(), urls.as_slice());
        }
    }
}
