use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::error::{AppError, AppResult};
use crate::forms::ProductPayload;
use crate::models::{Product, ProductId};
use crate::repository::ProductRepository;
use crate::shell::{HistoryNavigator, NotificationKind, Notifier};
use crate::views::ViewContext;

pub(crate) fn product(id: i64, name_en: &str) -> Product {
    Product {
        product_id: ProductId(id),
        product_name: format!("منتج {}", id),
        product_name_en: name_en.to_string(),
        number_of_pieces: 1.0.into(),
        product_price: 100.0.into(),
        price_after_discount: 90.0.into(),
        discount: Some(10.0.into()),
        ..Product::default()
    }
}

/// In-memory backend double that records every call.
#[derive(Default)]
pub(crate) struct MockProductRepository {
    products: Mutex<Vec<Product>>,
    list_calls: AtomicUsize,
    fail_list: AtomicBool,
    fail_writes: AtomicBool,
    gates: Mutex<VecDeque<Option<Arc<Notify>>>>,
    pub(crate) created: Mutex<Vec<ProductPayload>>,
    pub(crate) updated: Mutex<Vec<(ProductId, ProductPayload)>>,
    pub(crate) deleted: Mutex<Vec<ProductId>>,
}

impl MockProductRepository {
    pub(crate) fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products),
            ..Self::default()
        }
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Queue a gate for the next `list` call; `None` lets that call through.
    pub(crate) fn queue_gate(&self, gate: Option<Arc<Notify>>) {
        self.gates.lock().unwrap().push_back(gate);
    }

    fn check_writes(&self) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(AppError::ExternalServiceError("Server error (500): boom".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ProductRepository for MockProductRepository {
    async fn list(&self) -> AppResult<Vec<Product>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let snapshot = self.products.lock().unwrap().clone();
        let failing = self.fail_list.load(Ordering::SeqCst);

        let gate = self.gates.lock().unwrap().pop_front().flatten();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if failing {
            Err(AppError::NetworkError("connection refused".into()))
        } else {
            Ok(snapshot)
        }
    }

    async fn create(&self, payload: ProductPayload) -> AppResult<()> {
        self.check_writes()?;
        self.created.lock().unwrap().push(payload);
        Ok(())
    }

    async fn update(&self, id: ProductId, payload: ProductPayload) -> AppResult<()> {
        self.check_writes()?;
        self.updated.lock().unwrap().push((id, payload));
        Ok(())
    }

    async fn delete(&self, id: ProductId) -> AppResult<()> {
        self.check_writes()?;
        self.deleted.lock().unwrap().push(id);
        self.products.lock().unwrap().retain(|p| p.product_id != id);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    pub(crate) messages: Mutex<Vec<(NotificationKind, String)>>,
}

impl RecordingNotifier {
    pub(crate) fn messages(&self) -> Vec<(NotificationKind, String)> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        self.messages.lock().unwrap().push((kind, message.to_string()));
    }
}

pub(crate) struct Harness {
    pub(crate) repository: Arc<MockProductRepository>,
    pub(crate) navigator: Arc<HistoryNavigator>,
    pub(crate) notifier: Arc<RecordingNotifier>,
}

impl Harness {
    pub(crate) fn new(products: Vec<Product>) -> Self {
        Self {
            repository: Arc::new(MockProductRepository::with_products(products)),
            navigator: Arc::new(HistoryNavigator::new()),
            notifier: Arc::new(RecordingNotifier::default()),
        }
    }

    pub(crate) fn context(&self) -> ViewContext {
        ViewContext::new(
            self.repository.clone(),
            self.navigator.clone(),
            self.notifier.clone(),
        )
    }
}
