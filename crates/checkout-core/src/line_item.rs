//! # Line Items
//!
//! Gateway-ready line items and the normalizer that builds them from
//! untrusted cart entries.

use crate::cart::{CartItem, PriceInput};
use crate::error::{CheckoutError, CheckoutResult};
use serde::Serialize;

/// Currency for every line item (ISO 4217, lowercase as the gateway expects)
pub const CURRENCY: &str = "usd";

/// Product name used when a cart entry has no title
pub const DEFAULT_PRODUCT_NAME: &str = "Untitled Product";

/// A trusted line item ready to send to the payment gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayLineItem {
    /// Always [`CURRENCY`]
    pub currency: &'static str,

    /// Unit price in cents
    pub unit_amount: i64,

    /// Product name (defaulted)
    pub product_name: String,

    /// Zero or one image URL
    pub product_images: Vec<String>,

    /// Quantity, at least 1
    pub quantity: u64,
}

impl GatewayLineItem {
    /// Total for this line item in cents
    pub fn total(&self) -> i64 {
        self.unit_amount.saturating_mul(self.quantity as i64)
    }
}

/// Normalize one cart entry.
///
/// Fails with [`CheckoutError::InvalidPrice`] when the price is absent or
/// does not parse to a finite, non-negative amount; every other field falls
/// back to a default.
pub fn normalize(item: &CartItem) -> CheckoutResult<GatewayLineItem> {
    let product_name = match item.title.as_deref() {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => DEFAULT_PRODUCT_NAME.to_string(),
    };

    let unit_amount = item
        .price
        .as_ref()
        .and_then(price_to_minor_units)
        .ok_or_else(|| CheckoutError::InvalidPrice {
            title: product_name.clone(),
        })?;

    let product_images = match item.image.as_deref() {
        Some(url) if !url.is_empty() => vec![url.to_string()],
        _ => Vec::new(),
    };

    Ok(GatewayLineItem {
        currency: CURRENCY,
        unit_amount,
        product_name,
        product_images,
        quantity: normalize_quantity(item.quantity),
    })
}

/// Normalize a whole cart, preserving order.
///
/// The first invalid entry aborts the batch.
pub fn normalize_all(items: &[CartItem]) -> CheckoutResult<Vec<GatewayLineItem>> {
    items.iter().map(normalize).collect()
}

/// Positive integers pass through; zero, negative, fractional and
/// non-finite quantities become 1.
fn normalize_quantity(quantity: Option<f64>) -> u64 {
    match quantity {
        Some(q) if q.is_finite() && q >= 1.0 && q.fract() == 0.0 && q <= u32::MAX as f64 => {
            q as u64
        }
        _ => 1,
    }
}

/// Convert a price to cents with round-half-up at the cent boundary.
fn price_to_minor_units(price: &PriceInput) -> Option<i64> {
    let text = price.as_decimal_text();

    let value: f64 = text.parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }

    // Exponent notation goes through the float path.
    if !text.bytes().all(|b| b.is_ascii_digit() || b == b'.' || b == b'+') {
        return float_minor_units(value);
    }

    decimal_minor_units(text.trim_start_matches('+')).or_else(|| float_minor_units(value))
}

/// Exact conversion from plain decimal digits (`"12"`, `"12.5"`, `".005"`).
fn decimal_minor_units(text: &str) -> Option<i64> {
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (text, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let digits: Vec<i64> = fraction.bytes().map(|b| (b - b'0') as i64).collect();
    let digit = |i: usize| digits.get(i).copied().unwrap_or(0);

    let mut cents = whole
        .checked_mul(100)?
        .checked_add(digit(0) * 10 + digit(1))?;
    if digit(2) >= 5 {
        cents = cents.checked_add(1)?;
    }
    Some(cents)
}

fn float_minor_units(value: f64) -> Option<i64> {
    let cents = (value * 100.0).round();
    if cents.is_finite() && cents <= i64::MAX as f64 {
        Some(cents as i64)
    } else {
        None
    }
}
