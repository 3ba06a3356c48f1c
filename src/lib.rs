//! Catalog Console Library
//!
//! Product administration over a remote catalog backend: the data model,
//! the HTTP repository, form validation and the list, detail and form views.
//! The `catalog-console` binary is a terminal shell around these views.

pub mod api_clients;
pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod forms;
pub mod models;
pub mod render;
pub mod repository;
pub mod shell;
pub mod validation;
pub mod views;

#[cfg(test)]
mod test_support;

// Re-export commonly used types for convenience
pub use api_clients::ProductApiClient;
pub use app::{ConsoleApp, FormEdits};
pub use config::AppSettings;
pub use error::{AppError, AppResult};
pub use models::{Product, ProductId};
pub use repository::ProductRepository;
