use log::debug;

use super::payload::ProductPayload;
use crate::error::{AppError, AppResult};
use crate::models::{Product, ProductId, ProductImage};
use crate::validation::{FieldError, FieldValue, FormValues, PRODUCT_SCHEMA, validate};

/// Editable state of the product form.
///
/// Scalar inputs hold the text as typed; the schema decides whether it is
/// acceptable. `product_hidden` is the `"yes"`/`"no"` choice shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductForm {
    pub product_name: String,
    pub product_name_en: String,
    pub product_description: String,
    pub product_description_en: String,
    pub number_of_pieces: String,
    pub product_price: String,
    pub price_after_discount: String,
    pub discount: String,
    pub product_hidden: String,
    pub product_image: Vec<ProductImage>,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            product_name: String::new(),
            product_name_en: String::new(),
            product_description: String::new(),
            product_description_en: String::new(),
            number_of_pieces: "0".to_string(),
            product_price: "0".to_string(),
            price_after_discount: "0".to_string(),
            discount: "0".to_string(),
            product_hidden: "no".to_string(),
            product_image: Vec::new(),
        }
    }
}

impl ProductForm {
    /// Pre-fill from a stored product for editing.
    pub fn from_product(product: &Product) -> Self {
        Self {
            product_name: product.product_name.clone(),
            product_name_en: product.product_name_en.clone(),
            product_description: product.product_description.clone().unwrap_or_default(),
            product_description_en: product.product_description_en.clone().unwrap_or_default(),
            number_of_pieces: product.number_of_pieces.to_string(),
            product_price: product.product_price.to_string(),
            price_after_discount: product.price_after_discount.to_string(),
            discount: product
                .discount
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "0".to_string()),
            product_hidden: if product.product_hidden { "yes" } else { "no" }.to_string(),
            product_image: product
                .product_image
                .iter()
                .map(|url| ProductImage::remote(url.as_str()))
                .collect(),
        }
    }

    /// Set a scalar field by its wire name.
    pub fn set_field(&mut self, field: &str, value: impl Into<String>) -> AppResult<()> {
        let slot = match field {
            "product_name" => &mut self.product_name,
            "product_name_en" => &mut self.product_name_en,
            "product_description" => &mut self.product_description,
            "product_description_en" => &mut self.product_description_en,
            "number_of_pieces" => &mut self.number_of_pieces,
            "product_price" => &mut self.product_price,
            "price_after_discount" => &mut self.price_after_discount,
            "discount" => &mut self.discount,
            "product_hidden" => &mut self.product_hidden,
            other => {
                return Err(AppError::InvalidArgument(format!(
                    "'{}' is not an editable product field",
                    other
                )));
            }
        };
        *slot = value.into();
        Ok(())
    }

    pub fn add_image(&mut self, image: ProductImage) {
        debug!("Adding image to form: {}", image.describe());
        self.product_image.push(image);
    }

    /// Remove the image at `index`, keeping the order of the others.
    pub fn remove_image(&mut self, index: usize) -> AppResult<ProductImage> {
        if index >= self.product_image.len() {
            return Err(AppError::InvalidArgument(format!(
                "Image index {} is out of range (form has {} image(s))",
                index,
                self.product_image.len()
            )));
        }
        Ok(self.product_image.remove(index))
    }

    pub fn validate(&self) -> Vec<FieldError> {
        validate(PRODUCT_SCHEMA, self)
    }

    /// Wire value of the visibility choice: `"yes"` is 1, anything else 0.
    pub fn hidden_flag(&self) -> u8 {
        u8::from(self.product_hidden == "yes")
    }

    /// Build the multipart body. Fails with a validation error when any rule fails.
    pub fn to_payload(&self, product_id: Option<ProductId>) -> AppResult<ProductPayload> {
        let errors = self.validate();
        if !errors.is_empty() {
            let summary = errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(AppError::ValidationError(summary));
        }

        let payload = ProductPayload::new()
            .with_product_id(product_id)
            .text("product_name", self.product_name.trim())
            .text("product_name_en", self.product_name_en.trim())
            .text("product_description", self.product_description.as_str())
            .text("product_description_en", self.product_description_en.as_str())
            .text("number_of_pieces", self.number_of_pieces.trim())
            .text("product_price", self.product_price.trim())
            .text("price_after_discount", self.price_after_discount.trim())
            .text("discount", self.discount.trim())
            .text("product_hidden", self.hidden_flag().to_string());

        Ok(self
            .product_image
            .iter()
            .fold(payload, |payload, image| payload.image(image.to_form_value())))
    }
}

impl FormValues for ProductForm {
    fn value(&self, field: &str) -> Option<FieldValue<'_>> {
        let text = match field {
            "product_name" => &self.product_name,
            "product_name_en" => &self.product_name_en,
            "product_description" => &self.product_description,
            "product_description_en" => &self.product_description_en,
            "number_of_pieces" => &self.number_of_pieces,
            "product_price" => &self.product_price,
            "price_after_discount" => &self.price_after_discount,
            "discount" => &self.discount,
            "product_hidden" => &self.product_hidden,
            "product_image" => return Some(FieldValue::List(self.product_image.len())),
            _ => return None,
        };
        Some(FieldValue::Text(text.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Amount;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn filled() -> ProductForm {
        ProductForm {
            product_name: "قميص".into(),
            product_name_en: "Shirt".into(),
            number_of_pieces: "3".into(),
            product_price: "120".into(),
            price_after_discount: "99.5".into(),
            discount: "17".into(),
            ..ProductForm::default()
        }
    }

    #[test]
    fn test_defaults() {
        let form = ProductForm::default();
        assert_eq!(form.product_hidden, "no");
        assert_eq!(form.number_of_pieces, "0");
        assert!(form.product_image.is_empty());
        // Names are required, so an untouched form cannot be submitted.
        let fields: Vec<_> = form.validate().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["product_name", "product_name_en"]);
    }

    #[test]
    fn test_prefill_maps_backend_fields() {
        let product = Product {
            product_id: ProductId(5),
            product_name: "حذاء".into(),
            product_name_en: "Shoe".into(),
            product_description: None,
            number_of_pieces: 2.0.into(),
            product_price: Amount::parse("300.00").unwrap(),
            price_after_discount: 250.75.into(),
            discount: None,
            product_hidden: true,
            product_image: vec!["https://cdn.example.com/s.jpg".into()],
            ..Product::default()
        };

        let form = ProductForm::from_product(&product);
        assert_eq!(form.product_description, "");
        assert_eq!(form.number_of_pieces, "2");
        assert_eq!(form.product_price, "300.00");
        assert_eq!(form.price_after_discount, "250.75");
        assert_eq!(form.discount, "0");
        assert_eq!(form.product_hidden, "yes");
        assert_eq!(
            form.product_image,
            vec![ProductImage::remote("https://cdn.example.com/s.jpg")]
        );
    }

    #[test]
    fn test_create_payload_encodes_hidden_and_blank_id() {
        let payload = filled().to_payload(None).unwrap();
        assert_eq!(payload.product_id(), Some(""));
        assert_eq!(payload.get("product_hidden"), Some("0"));
        assert_eq!(payload.get("product_price"), Some("120"));
        assert!(payload.images().is_empty());
    }

    #[test]
    fn test_edit_payload_carries_id_and_images_in_order() {
        let mut form = filled();
        form.product_hidden = "yes".into();
        form.add_image(ProductImage::remote("https://cdn.example.com/1.jpg"));
        form.add_image(ProductImage::pending("image/png", vec![0, 1, 2]));

        let payload = form.to_payload(Some(ProductId(42))).unwrap();
        assert_eq!(payload.product_id(), Some("42"));
        assert_eq!(payload.get("product_hidden"), Some("1"));
        assert_eq!(
            payload.images(),
            &[
                "https://cdn.example.com/1.jpg".to_string(),
                "data:image/png;base64,AAEC".to_string()
            ]
        );
    }

    #[test]
    fn test_invalid_form_produces_no_payload() {
        let mut form = filled();
        form.product_price = "cheap".into();
        let result = form.to_payload(None);
        assert_eq!(
            result,
            Err(AppError::ValidationError("Product price must be a number".into()))
        );
    }

    #[test]
    fn test_set_field_rejects_unknown_names() {
        let mut form = ProductForm::default();
        form.set_field("discount", "15").unwrap();
        assert_eq!(form.discount, "15");
        assert!(matches!(
            form.set_field("product_id", "3"),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_remove_image_out_of_range_leaves_list() {
        let mut form = ProductForm::default();
        form.add_image(ProductImage::remote("a"));
        assert!(form.remove_image(1).is_err());
        assert_eq!(form.product_image.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_remove_keeps_relative_order(
            urls in prop::collection::vec("[a-z]{1,8}", 1..12),
            pick in any::<prop::sample::Index>(),
        ) {
            let mut form = ProductForm::default();
            for url in &urls {
                form.add_image(ProductImage::remote(url.as_str()));
            }
            let k = pick.index(urls.len());

            let removed = form.remove_image(k).unwrap();

            let mut expected: Vec<ProductImage> =
                urls.iter().map(|u| ProductImage::remote(u.as_str())).collect();
            let expected_removed = expected.remove(k);
            prop_assert_eq!(removed, expected_removed);
            prop_assert_eq!(form.product_image, expected);
        }
    }
}
