use std::fmt;

use serde::{Serialize, Serializer};

/// A numeric product field as the backend sent it.
///
/// `value` is used for arithmetic and rounding; the wire text is kept so the
/// console shows `"120.50"` as `120.50` and sends it back unchanged on edit.
#[derive(Debug, Clone, PartialEq)]
pub struct Amount {
    value: f64,
    text: String,
}

impl Amount {
    /// Parse numeric text, keeping it (trimmed) for display. Non-numeric or
    /// non-finite text yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let text = raw.trim();
        text.parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(|value| Self {
                value,
                text: text.to_string(),
            })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Self {
            value,
            text: value.to_string(),
        }
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self {
            value: value as f64,
            text: value.to_string(),
        }
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::from(0_i64)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value)
    }
}
