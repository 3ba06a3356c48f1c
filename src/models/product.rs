use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use log::warn;
use serde_json::Value;

use super::amount::Amount;
use super::serde_helpers;
use crate::error::AppError;

/// Stable product identifier.
///
/// The backend sends ids as JSON numbers or as numeric strings; both decode to
/// the same value so lookups compare numerically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl ProductId {
    /// Numeric coercion of a raw id (route parameter or wire string).
    ///
    /// `"7"`, `" 7 "` and `"7.0"` all yield `ProductId(7)`. Empty or
    /// non-numeric text yields `None`, which matches no product.
    pub fn coerce(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(id) = trimmed.parse::<i64>() {
            return Some(Self(id));
        }
        trimmed.parse::<f64>().ok().and_then(Self::from_f64)
    }

    fn from_f64(value: f64) -> Option<Self> {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
            Some(Self(value as i64))
        } else {
            None
        }
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::coerce(s)
            .ok_or_else(|| AppError::InvalidArgument(format!("'{}' is not a product id", s)))
    }
}

impl From<i64> for ProductId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = ProductId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer id or a numeric string")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<ProductId, E> {
                Ok(ProductId(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<ProductId, E> {
                i64::try_from(v)
                    .map(ProductId)
                    .map_err(|_| E::custom(format!("product id {} out of range", v)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<ProductId, E> {
                ProductId::from_f64(v).ok_or_else(|| E::custom(format!("product id {} is not an integer", v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<ProductId, E> {
                ProductId::coerce(v).ok_or_else(|| E::custom(format!("product id '{}' is not numeric", v)))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// Catalog entity as returned by the list endpoint.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: ProductId,
    #[serde(default, deserialize_with = "serde_helpers::text")]
    pub product_name: String,
    #[serde(default, deserialize_with = "serde_helpers::text")]
    pub product_name_en: String,
    #[serde(default, deserialize_with = "serde_helpers::optional_text")]
    pub product_description: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::optional_text")]
    pub product_description_en: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::number")]
    pub number_of_pieces: Amount,
    #[serde(default, deserialize_with = "serde_helpers::number")]
    pub product_price: Amount,
    #[serde(default, deserialize_with = "serde_helpers::number")]
    pub price_after_discount: Amount,
    #[serde(default, deserialize_with = "serde_helpers::optional_number")]
    pub discount: Option<Amount>,
    #[serde(default, deserialize_with = "serde_helpers::flag")]
    pub product_hidden: bool,
    #[serde(default, deserialize_with = "serde_helpers::string_list")]
    pub product_image: Vec<String>,
    #[serde(default, deserialize_with = "serde_helpers::optional_text")]
    pub add_date: Option<String>,
}

impl Product {
    pub fn visibility(&self) -> Visibility {
        if self.product_hidden {
            Visibility::Hidden
        } else {
            Visibility::Visible
        }
    }

    pub fn first_image(&self) -> Option<&str> {
        self.product_image.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Visible,
}

impl Visibility {
    pub fn label(self) -> &'static str {
        match self {
            Visibility::Hidden => "Hidden",
            Visibility::Visible => "Visible",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Decode the list endpoint body: either `{ "data": [...] }` or a bare array.
///
/// Records that cannot be decoded (typically a missing or non-numeric id) are
/// skipped with a warning so the rest of the collection still shows.
pub fn decode_product_list(body: &str) -> Result<Vec<Product>, serde_json::Error> {
    let records = match serde_json::from_str::<Value>(body)? {
        Value::Array(records) => records,
        Value::Object(mut fields) => match fields.remove("data") {
            Some(Value::Array(records)) => records,
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                return Err(de::Error::custom(format!(
                    "expected `data` to be an array, found {}",
                    json_kind(&other)
                )));
            }
        },
        other => {
            return Err(de::Error::custom(format!(
                "expected a product array or an object with `data`, found {}",
                json_kind(&other)
            )));
        }
    };

    Ok(records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Product>(record) {
            Ok(product) => Some(product),
            Err(e) => {
                warn!("Skipping product record {}: {}", index, e);
                None
            }
        })
        .collect())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Client-side lookup over a fetched collection. There is no get-by-id endpoint.
pub fn find_by_id(products: Vec<Product>, id: ProductId) -> Option<Product> {
    products.into_iter().find(|p| p.product_id == id)
}
