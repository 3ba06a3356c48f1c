// Default backend root. Prefer the CATALOG_API_URL environment variable.
pub const DEFAULT_API_URL: &str = "https://camp-coding.tech/test_api/products/";
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

// Backend endpoints, resolved relative to the API root
pub const READ_PRODUCTS_PATH: &str = "/read_products.php";
pub const CREATE_PRODUCT_PATH: &str = "/products/create_product.php";
pub const UPDATE_PRODUCT_PATH: &str = "/products/update_product.php";
pub const DELETE_PRODUCT_PATH: &str = "/products/delete_product.php";

// Multipart field carrying each image entry
pub const IMAGE_FIELD: &str = "product_image[]";

// Display-only currency suffix
pub const CURRENCY_SUFFIX: &str = "EGP";
