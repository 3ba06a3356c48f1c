use std::sync::RwLock;

use log::{debug, error};

use super::{
    LoadSequence, ViewContext, ViewState, format_price, format_price_fixed, read_lock, write_lock,
};
use crate::models::{Product, ProductId, Visibility, find_by_id};
use crate::shell::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailField {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gallery {
    Slides(Vec<String>),
    Empty,
}

impl Gallery {
    pub const EMPTY_LABEL: &'static str = "No images available";
}

/// Read-only presentation of one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetails {
    pub title: String,
    pub gallery: Gallery,
    pub fields: Vec<DetailField>,
    pub visibility: Visibility,
}

impl ProductDetails {
    pub fn from_product(product: &Product) -> Self {
        let gallery = if product.product_image.is_empty() {
            Gallery::Empty
        } else {
            Gallery::Slides(product.product_image.clone())
        };

        let fields = vec![
            field("Product ID", product.product_id.to_string()),
            field("Name (EN)", product.product_name_en.clone()),
            field("Description", product.product_description.clone().unwrap_or_default()),
            field(
                "Description (EN)",
                product.product_description_en.clone().unwrap_or_default(),
            ),
            field("Number of pieces", product.number_of_pieces.to_string()),
            field("Price", format_price(&product.product_price)),
            field("Price after discount", format_price_fixed(product.price_after_discount.value())),
            field(
                "Discount",
                product.discount.as_ref().map(|d| format!("{}%", d)).unwrap_or_default(),
            ),
            field("Add date", product.add_date.clone().unwrap_or_default()),
            field("Hidden", product.visibility().label().to_string()),
        ];

        Self {
            title: product.product_name.clone(),
            gallery,
            fields,
            visibility: product.visibility(),
        }
    }

    pub fn field(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }
}

fn field(label: &'static str, value: String) -> DetailField {
    DetailField { label, value }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailScreen {
    Loading,
    Found(ProductDetails),
    NotFound,
}

impl DetailScreen {
    pub const NOT_FOUND_LABEL: &'static str = "Product not found";
}

pub struct ProductDetailsView {
    ctx: ViewContext,
    state: RwLock<ViewState<Option<Product>>>,
    loads: LoadSequence,
}

impl ProductDetailsView {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            state: RwLock::new(ViewState::Idle),
            loads: LoadSequence::default(),
        }
    }

    /// Load the product named by a raw route id. Call again whenever the id
    /// changes; a result from an older call is dropped.
    pub async fn load(&self, raw_id: &str) {
        let ticket = self.loads.begin();
        *write_lock(&self.state) = ViewState::Loading;

        let Some(id) = ProductId::coerce(raw_id) else {
            debug!("Route id '{}' is not numeric; nothing can match", raw_id);
            *write_lock(&self.state) = ViewState::Ready(None);
            return;
        };

        let result = self.ctx.repository.list().await;
        if !self.loads.is_current(ticket) {
            debug!("Discarding superseded details load for product {}", id);
            return;
        }

        match result {
            Ok(products) => {
                *write_lock(&self.state) = ViewState::Ready(find_by_id(products, id));
            }
            Err(e) => {
                error!("Failed to load product {}: {}", id, e);
                *write_lock(&self.state) = ViewState::Failed;
                self.ctx.error("Failed to load product details");
            }
        }
    }

    pub fn state(&self) -> ViewState<Option<Product>> {
        read_lock(&self.state).clone()
    }

    pub fn screen(&self) -> DetailScreen {
        match &*read_lock(&self.state) {
            ViewState::Idle | ViewState::Loading => DetailScreen::Loading,
            ViewState::Ready(Some(product)) => DetailScreen::Found(ProductDetails::from_product(product)),
            ViewState::Ready(None) | ViewState::Failed => DetailScreen::NotFound,
        }
    }

    pub fn back(&self) {
        self.ctx.navigator.navigate(&Route::ProductList.path());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Amount;
    use crate::test_support::{Harness, product};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn found(view: &ProductDetailsView) -> ProductDetails {
        match view.screen() {
            DetailScreen::Found(details) => details,
            other => panic!("expected details, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_selects_record_by_numeric_id() {
        let harness = Harness::new(vec![product(1, "Shirt"), product(2, "Shoe")]);
        let view = ProductDetailsView::new(harness.context());

        view.load("2").await;

        let details = found(&view);
        assert_eq!(details.field("Product ID"), Some("2"));
        assert_eq!(details.field("Name (EN)"), Some("Shoe"));
        assert_eq!(details.field("Discount"), Some("10%"));
        assert_eq!(details.gallery, Gallery::Empty);
    }

    #[tokio::test]
    async fn test_price_after_discount_has_two_decimals() {
        let mut item = product(5, "Scarf");
        item.price_after_discount = 19.5.into();
        item.product_price = Amount::parse("25.00").unwrap();
        item.product_image = vec!["https://cdn.example.com/1.jpg".into()];
        let harness = Harness::new(vec![item]);
        let view = ProductDetailsView::new(harness.context());

        view.load("5").await;

        let details = found(&view);
        assert_eq!(details.field("Price after discount"), Some("19.50 EGP"));
        assert_eq!(details.field("Price"), Some("25.00 EGP"));
        assert_eq!(
            details.gallery,
            Gallery::Slides(vec!["https://cdn.example.com/1.jpg".into()])
        );
    }

    #[tokio::test]
    async fn test_missing_or_non_numeric_id_shows_empty_state() {
        let harness = Harness::new(vec![product(1, "Shirt")]);
        let view = ProductDetailsView::new(harness.context());

        view.load("99").await;
        assert_eq!(view.screen(), DetailScreen::NotFound);

        view.load("abc").await;
        assert_eq!(view.screen(), DetailScreen::NotFound);
        assert_eq!(harness.repository.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_shows_empty_state_and_notifies() {
        let harness = Harness::new(vec![product(1, "Shirt")]);
        harness.repository.fail_list(true);
        let view = ProductDetailsView::new(harness.context());

        view.load("1").await;

        assert_eq!(view.state(), ViewState::Failed);
        assert_eq!(view.screen(), DetailScreen::NotFound);
        assert_eq!(harness.notifier.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_superseded_load_does_not_overwrite_newer_id() {
        let harness = Harness::new(vec![product(1, "Shirt"), product(2, "Shoe")]);
        let gate = Arc::new(Notify::new());
        harness.repository.queue_gate(Some(gate.clone()));
        harness.repository.queue_gate(None);
        let view = ProductDetailsView::new(harness.context());

        let slow = view.load("1");
        let fast = async {
            view.load("2").await;
            gate.notify_one();
        };
        tokio::join!(slow, fast);

        assert_eq!(found(&view).field("Product ID"), Some("2"));
        assert_eq!(harness.repository.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_back_navigates_to_list() {
        let harness = Harness::new(vec![]);
        let view = ProductDetailsView::new(harness.context());
        view.back();
        assert_eq!(harness.navigator.pending(), vec!["/"]);
    }
}
