use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::ProductId;

static DETAILS_ROUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/productDetails/([^/]+)/?$").expect("details route pattern is valid")
});

static EDIT_ROUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/edite-product/([^/]+)/?$").expect("edit route pattern is valid")
});

/// Paths the console exposes. Id segments are kept raw; views coerce them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    ProductList,
    ProductDetails(String),
    AddProduct,
    EditProduct(String),
    NotFound(String),
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };

        match path.as_str() {
            "/" => return Route::ProductList,
            "/add-product" | "/add-product/" => return Route::AddProduct,
            _ => {}
        }

        if let Some(id) = DETAILS_ROUTE.captures(&path).and_then(|c| c.get(1)) {
            return Route::ProductDetails(id.as_str().to_string());
        }
        if let Some(id) = EDIT_ROUTE.captures(&path).and_then(|c| c.get(1)) {
            return Route::EditProduct(id.as_str().to_string());
        }
        Route::NotFound(path)
    }

    pub fn details(id: ProductId) -> Self {
        Route::ProductDetails(id.to_string())
    }

    pub fn edit(id: ProductId) -> Self {
        Route::EditProduct(id.to_string())
    }

    pub fn path(&self) -> String {
        match self {
            Route::ProductList => "/".to_string(),
            Route::ProductDetails(id) => format!("/productDetails/{}", id),
            Route::AddProduct => "/add-product".to_string(),
            Route::EditProduct(id) => format!("/edite-product/{}", id),
            Route::NotFound(path) => path.clone(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_routes() {
        assert_eq!(Route::parse("/"), Route::ProductList);
        assert_eq!(Route::parse(""), Route::ProductList);
        assert_eq!(Route::parse("/add-product"), Route::AddProduct);
        assert_eq!(Route::parse("/productDetails/12"), Route::ProductDetails("12".into()));
        assert_eq!(Route::parse("edite-product/7/"), Route::EditProduct("7".into()));
        assert_eq!(Route::parse("/productDetails/3?tab=images"), Route::ProductDetails("3".into()));
    }

    #[test]
    fn test_everything_else_is_not_found() {
        assert_eq!(Route::parse("/products"), Route::NotFound("/products".into()));
        assert_eq!(
            Route::parse("/productDetails/1/extra"),
            Route::NotFound("/productDetails/1/extra".into())
        );
        assert_eq!(Route::parse("/edit-product/1"), Route::NotFound("/edit-product/1".into()));
    }

    #[test]
    fn test_paths_round_trip() {
        for route in [
            Route::ProductList,
            Route::AddProduct,
            Route::details(ProductId(4)),
            Route::edit(ProductId(9)),
        ] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }
}
