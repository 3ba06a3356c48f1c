//! Declarative product form validation.
//!
//! Each form field maps to one [`FieldRule`]; [`validate`] evaluates every
//! rule the same way, so adding a field means adding a row to
//! [`PRODUCT_SCHEMA`] rather than touching view logic.

use std::fmt;

use log::debug;
use serde::Serialize;

/// Accepted values of the `product_hidden` form field.
pub const HIDDEN_CHOICES: &[&str] = &["yes", "no"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    OneOf(&'static [&'static str]),
    ImageList,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub kind: FieldKind,
    /// Shown when a required field is empty.
    pub required_message: &'static str,
}

pub static PRODUCT_SCHEMA: &[FieldRule] = &[
    FieldRule {
        field: "product_name",
        label: "Product name",
        required: true,
        kind: FieldKind::Text,
        required_message: "Product name is required",
    },
    FieldRule {
        field: "product_name_en",
        label: "Product name (EN)",
        required: true,
        kind: FieldKind::Text,
        required_message: "Product name (EN) is required",
    },
    FieldRule {
        field: "product_description",
        label: "Description",
        required: false,
        kind: FieldKind::Text,
        required_message: "",
    },
    FieldRule {
        field: "product_description_en",
        label: "Description (EN)",
        required: false,
        kind: FieldKind::Text,
        required_message: "",
    },
    FieldRule {
        field: "number_of_pieces",
        label: "Number of pieces",
        required: true,
        kind: FieldKind::Number,
        required_message: "Number of pieces is required",
    },
    FieldRule {
        field: "product_price",
        label: "Product price",
        required: true,
        kind: FieldKind::Number,
        required_message: "Product price is required",
    },
    FieldRule {
        field: "price_after_discount",
        label: "Price after discount",
        required: true,
        kind: FieldKind::Number,
        required_message: "Price after discount is required",
    },
    FieldRule {
        field: "discount",
        label: "Discount",
        required: false,
        kind: FieldKind::Number,
        required_message: "",
    },
    FieldRule {
        field: "product_hidden",
        label: "Visibility",
        required: true,
        kind: FieldKind::OneOf(HIDDEN_CHOICES),
        required_message: "Visibility is required",
    },
    FieldRule {
        field: "product_image",
        label: "Product images",
        required: false,
        kind: FieldKind::ImageList,
        required_message: "",
    },
];

/// Current value of one field, as seen by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    List(usize),
}

/// Anything holding form state that the schema can be run against.
pub trait FormValues {
    fn value(&self, field: &str) -> Option<FieldValue<'_>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Run every rule of `schema` against `values`, returning errors in schema order.
pub fn validate<V: FormValues + ?Sized>(schema: &[FieldRule], values: &V) -> Vec<FieldError> {
    let errors: Vec<FieldError> = schema
        .iter()
        .filter_map(|rule| check_rule(rule, values.value(rule.field)).map(|message| FieldError {
            field: rule.field,
            message,
        }))
        .collect();

    if !errors.is_empty() {
        debug!("Form validation failed on {} field(s)", errors.len());
    }
    errors
}

fn check_rule(rule: &FieldRule, value: Option<FieldValue<'_>>) -> Option<String> {
    let present = match value {
        None => false,
        Some(FieldValue::Text(text)) => !text.trim().is_empty(),
        Some(FieldValue::List(_)) => true,
    };

    if !present {
        return rule.required.then(|| rule.required_message.to_string());
    }

    match (rule.kind, value) {
        (FieldKind::Number, Some(FieldValue::Text(text))) => {
            let parsed = text.trim().parse::<f64>();
            match parsed {
                Ok(n) if n.is_finite() => None,
                _ => Some(format!("{} must be a number", rule.label)),
            }
        }
        (FieldKind::OneOf(choices), Some(FieldValue::Text(text))) => {
            if choices.contains(&text) {
                None
            } else {
                Some(format!("{} must be one of: {}", rule.label, choices.join(", ")))
            }
        }
        (FieldKind::ImageList, Some(FieldValue::Text(_))) => {
            Some(format!("{} must be a list", rule.label))
        }
        (FieldKind::Text | FieldKind::Number | FieldKind::OneOf(_), Some(FieldValue::List(_))) => {
            Some(format!("{} must be a single value", rule.label))
        }
        _ => None,
    }
}
