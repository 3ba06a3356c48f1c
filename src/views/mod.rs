//! Per-screen controllers.
//!
//! Each view owns its own state, re-fetches the collection every time it is
//! opened, and talks to the outside only through [`ViewContext`].

pub mod not_found;
pub mod product_details;
pub mod product_form;
pub mod product_list;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::warn;

use crate::constants::CURRENCY_SUFFIX;
use crate::repository::ProductRepository;
use crate::shell::{NotificationKind, Navigator, Notifier};

pub use not_found::NotFoundView;
pub use product_details::{DetailField, DetailScreen, Gallery, ProductDetails, ProductDetailsView};
pub use product_form::{FormMode, FormState, Prefill, ProductFormView, SubmitOutcome};
pub use product_list::{ProductListView, ProductRow, Thumbnail};

/// Load state shared by the list, detail and form views.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    /// The fetch failed; the view shows its empty display.
    Failed,
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Collaborators injected into every view.
#[derive(Clone)]
pub struct ViewContext {
    pub repository: Arc<dyn ProductRepository>,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
}

impl ViewContext {
    pub fn new(
        repository: Arc<dyn ProductRepository>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            repository,
            navigator,
            notifier,
        }
    }

    pub(crate) fn success(&self, message: &str) {
        self.notifier.notify(NotificationKind::Success, message);
    }

    pub(crate) fn error(&self, message: &str) {
        self.notifier.notify(NotificationKind::Error, message);
    }
}

/// Hands out load tickets; only the newest ticket may publish its result.
#[derive(Debug, Default)]
pub(crate) struct LoadSequence(AtomicU64);

impl LoadSequence {
    pub(crate) fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn is_current(&self, ticket: u64) -> bool {
        self.0.load(Ordering::SeqCst) == ticket
    }
}

pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| {
        warn!("View state lock was poisoned; recovering");
        poisoned.into_inner()
    })
}

pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| {
        warn!("View state lock was poisoned; recovering");
        poisoned.into_inner()
    })
}

/// Price with the display currency, number as written.
pub fn format_price(value: impl fmt::Display) -> String {
    format!("{} {}", value, CURRENCY_SUFFIX)
}

/// Price with the display currency, rounded to two decimals.
pub fn format_price_fixed(value: f64) -> String {
    format!("{:.2} {}", value, CURRENCY_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_formatting() {
        assert_eq!(format_price(120.0), "120 EGP");
        assert_eq!(format_price(99.5), "99.5 EGP");
        assert_eq!(format_price(crate::models::Amount::parse("120.50").unwrap()), "120.50 EGP");
        assert_eq!(format_price_fixed(19.5), "19.50 EGP");
        assert_eq!(format_price_fixed(7.0), "7.00 EGP");
    }

    #[test]
    fn test_only_latest_ticket_is_current() {
        let loads = LoadSequence::default();
        let first = loads.begin();
        let second = loads.begin();
        assert!(!loads.is_current(first));
        assert!(loads.is_current(second));
    }
}
