//! Capabilities the views need from whatever hosts them.
//!
//! The core never renders or routes by itself: it asks a [`Navigator`] to go
//! somewhere and a [`Notifier`] to tell the user something. The terminal
//! implementations live in [`console`].

pub mod console;
pub mod route;

pub use console::{ConsoleNotifier, HistoryNavigator};
pub use route::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NotificationKind, message: &str);
}
