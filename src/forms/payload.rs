use reqwest::multipart::Form;

use crate::constants::IMAGE_FIELD;
use crate::models::ProductId;

const PRODUCT_ID_FIELD: &str = "product_id";

/// Outbound body of the create and update endpoints.
///
/// Scalar fields keep insertion order and are followed by one
/// `product_image[]` entry per image, in list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPayload {
    fields: Vec<(&'static str, String)>,
    images: Vec<String>,
}

impl ProductPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.fields.push((name, value.into()));
        self
    }

    pub fn image(mut self, value: impl Into<String>) -> Self {
        self.images.push(value.into());
        self
    }

    /// Set the `product_id` entry, keeping it first. `None` sends it empty.
    pub fn with_product_id(mut self, id: Option<ProductId>) -> Self {
        let value = id.map(|id| id.to_string()).unwrap_or_default();
        self.fields.retain(|(name, _)| *name != PRODUCT_ID_FIELD);
        self.fields.insert(0, (PRODUCT_ID_FIELD, value));
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn product_id(&self) -> Option<&str> {
        self.get(PRODUCT_ID_FIELD)
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// Every multipart part in wire order.
    pub fn parts(&self) -> Vec<(&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (*name, value.as_str()))
            .chain(self.images.iter().map(|value| (IMAGE_FIELD, value.as_str())))
            .collect()
    }

    pub fn into_multipart(self) -> Form {
        let form = self
            .fields
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));
        self.images
            .into_iter()
            .fold(form, |form, value| form.text(IMAGE_FIELD, value))
    }
}
