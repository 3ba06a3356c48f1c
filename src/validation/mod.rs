pub mod product_schema;

pub use product_schema::{
    FieldError, FieldKind, FieldRule, FieldValue, FormValues, HIDDEN_CHOICES, PRODUCT_SCHEMA,
    validate,
};
