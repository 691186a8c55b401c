//! # Cart Types
//!
//! Untrusted cart data as submitted by the storefront.
//! Fields that arrive with the wrong JSON type are read as absent so the
//! normalizer can apply its defaults instead of failing the whole body.

use crate::error::{CheckoutError, CheckoutResult};
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message returned when `items` is missing or not an array.
pub const INVALID_ITEMS_MESSAGE: &str = "Invalid items array in the request body.";

/// A price as it arrives on the wire: a JSON number or a numeric string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

impl PriceInput {
    /// Decimal text for this price, used for exact minor-unit conversion.
    ///
    /// `f64`'s `Display` yields the shortest round-tripping decimal and never
    /// switches to exponent notation.
    pub fn as_decimal_text(&self) -> String {
        match self {
            PriceInput::Number(n) => n.to_string(),
            PriceInput::Text(s) => s.trim().to_string(),
        }
    }
}

impl From<f64> for PriceInput {
    fn from(value: f64) -> Self {
        PriceInput::Number(value)
    }
}

impl From<&str> for PriceInput {
    fn from(value: &str) -> Self {
        PriceInput::Text(value.to_string())
    }
}

/// A single entry in the submitted cart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Display title
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,

    /// Unit price in major currency units
    #[serde(default, deserialize_with = "lenient")]
    pub price: Option<PriceInput>,

    /// Product image URL
    #[serde(default, deserialize_with = "lenient")]
    pub image: Option<String>,

    /// Requested quantity
    #[serde(default, deserialize_with = "lenient")]
    pub quantity: Option<f64>,
}

impl CartItem {
    /// Create an item with a price and nothing else
    pub fn new(price: impl Into<PriceInput>) -> Self {
        Self {
            price: Some(price.into()),
            ..Self::default()
        }
    }

    /// Builder: set title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder: set image URL
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }

    /// Builder: set quantity
    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = Some(quantity);
        self
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Top-level checkout request: an ordered list of cart entries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutRequest {
    pub items: Vec<CartItem>,
}

impl CheckoutRequest {
    pub fn new(items: Vec<CartItem>) -> Self {
        Self { items }
    }

    /// Parse a raw request body.
    pub fn from_slice(body: &[u8]) -> CheckoutResult<Self> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|_| CheckoutError::MalformedRequest(INVALID_ITEMS_MESSAGE.to_string()))?;
        Self::from_value(value)
    }

    /// Validate the body shape and read every entry.
    ///
    /// `items` must be present and be an array whose entries are objects.
    pub fn from_value(value: Value) -> CheckoutResult<Self> {
        let entries = match value {
            Value::Object(mut body) => match body.remove("items") {
                Some(Value::Array(entries)) => entries,
                _ => {
                    return Err(CheckoutError::MalformedRequest(
                        INVALID_ITEMS_MESSAGE.to_string(),
                    ))
                }
            },
            _ => {
                return Err(CheckoutError::MalformedRequest(
                    INVALID_ITEMS_MESSAGE.to_string(),
                ))
            }
        };

        let items = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                if !entry.is_object() {
                    return Err(CheckoutError::MalformedRequest(format!(
                        "Invalid cart item at position {}",
                        index
                    )));
                }
                serde_json::from_value(entry).map_err(|e| {
                    CheckoutError::MalformedRequest(format!(
                        "Invalid cart item at position {}: {}",
                        index, e
                    ))
                })
            })
            .collect::<CheckoutResult<Vec<CartItem>>>()?;

        Ok(Self { items })
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_well_formed_request() {
        let request = CheckoutRequest::from_value(json!({
            "items": [
                { "title": "Mug", "price": "12.5", "quantity": 2 },
                { "title": "Poster", "price": 8, "image": "https://cdn.example/poster.png" }
            ]
        }))
        .unwrap();

        assert_eq!(request.len(), 2);
        assert_eq!(request.items[0].title.as_deref(), Some("Mug"));
        assert_eq!(request.items[0].price, Some(PriceInput::Text("12.5".into())));
        assert_eq!(request.items[0].quantity, Some(2.0));
        assert_eq!(request.items[1].price, Some(PriceInput::Number(8.0)));
        assert_eq!(
            request.items[1].image.as_deref(),
            Some("https://cdn.example/poster.png")
        );
    }

    #[test]
    fn test_missing_items_is_malformed() {
        let err = CheckoutRequest::from_value(json!({ "cart": [] })).unwrap_err();
        assert!(matches!(err, CheckoutError::MalformedRequest(ref m) if m == INVALID_ITEMS_MESSAGE));
    }

    #[test]
    fn test_non_array_items_is_malformed() {
        let err = CheckoutRequest::from_value(json!({ "items": "not-an-array" })).unwrap_err();
        assert!(matches!(err, CheckoutError::MalformedRequest(_)));

        let err = CheckoutRequest::from_value(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, CheckoutError::MalformedRequest(_)));
    }

    #[test]
    fn test_invalid_json_body_is_malformed() {
        let err = CheckoutRequest::from_slice(b"{ items: ").unwrap_err();
        assert!(matches!(err, CheckoutError::MalformedRequest(_)));
    }

    #[test]
    fn test_non_object_entry_is_malformed() {
        let err = CheckoutRequest::from_value(json!({ "items": [{ "price": 1 }, 42] })).unwrap_err();
        assert_eq!(err.to_string(), "Invalid cart item at position 1");
    }

    #[test]
    fn test_mistyped_fields_read_as_absent() {
        let request = CheckoutRequest::from_value(json!({
            "items": [{ "title": 17, "price": true, "image": false, "quantity": "lots" }]
        }))
        .unwrap();

        assert_eq!(request.items[0], CartItem::default());
    }

    #[test]
    fn test_empty_items_parses() {
        let request = CheckoutRequest::from_value(json!({ "items": [] })).unwrap();
        assert!(request.is_empty());
    }
}
