pub mod client_factory;
pub mod error_handling;
pub mod product_client;

pub use client_factory::create_http_client;
pub use product_client::ProductApiClient;
