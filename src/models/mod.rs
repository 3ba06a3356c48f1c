pub mod amount;
pub mod image;
pub mod product;
pub mod serde_helpers;

pub use amount::Amount;
pub use image::ProductImage;
pub use product::{Product, ProductId, Visibility, decode_product_list, find_by_id};
