pub mod payload;
pub mod product_form;

pub use payload::ProductPayload;
pub use product_form::ProductForm;
