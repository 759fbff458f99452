//! Listing builder - turns one input row into a Gameflip listing payload.
//!
//! Rules applied to every row:
//! - Quantity defaults to 1; `appendQuantity` suffixes the title with `x{n}`
//! - Price is converted to integer cents with decimal arithmetic
//! - Currency defaults to USD, category is always "Other"
//! - Tags are split on commas and NOT trimmed
//! - Shipping is always a digital transfer

use std::str::FromStr;

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::error::ListingError;

/// Category forced on every listing.
pub const CATEGORY: &str = "Other";

/// Delivery method for digital goods.
pub const DELIVERY_METHOD: &str = "transfer";

/// Currency used when a row leaves it blank.
pub const DEFAULT_CURRENCY: &str = "USD";

/// One record of the input CSV.
///
/// Every column is optional at parse time so that a missing required
/// column surfaces as a [`ListingError::MissingField`] naming it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Row {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub quantity: Option<String>,
    pub currency: Option<String>,
    pub tags: Option<String>,
    pub image_url: Option<String>,
}

/// Listing settings that come from config rather than the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingDefaults {
    /// Append ` x{quantity}` to titles when quantity > 1.
    pub append_quantity: bool,
    /// Gameflip `expire_in` code.
    pub expiry: String,
    /// Days to deliver for the transfer shipping method.
    pub delivery_days: u32,
    /// Seller account id, sent only when configured.
    pub seller_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seller {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipping {
    pub delivery_method: String,
    pub days_to_deliver: u32,
}

/// Body of `POST /listing`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller: Option<Seller>,
    pub title: String,
    pub description: String,
    /// Price in cents.
    pub price: i64,
    pub currency: String,
    pub expire_in: String,
    pub category: String,
    pub tags: Vec<String>,
    pub shipping: Shipping,
    pub images: Vec<String>,
    pub digital: bool,
}

/// Build the listing payload for `row`.
///
/// # Errors
/// Fails if a required field (title, description, price, image_url) is
/// missing or if price/quantity cannot be coerced to numbers.
pub fn build_listing(row: &Row, defaults: &ListingDefaults) -> Result<ListingPayload, ListingError> {
    let title = required(row.title.as_deref(), "title")?;
    let description = required(row.description.as_deref(), "description")?;
    let price = required(row.price.as_deref(), "price")?;
    let image_url = required(row.image_url.as_deref(), "image_url")?;

    let quantity = parse_quantity(row.quantity.as_deref())?;

    Ok(ListingPayload {
        seller: defaults.seller_id.clone().map(|id| Seller { id }),
        title: listing_title(title, quantity, defaults.append_quantity),
        description: description.to_string(),
        price: price_to_cents(price)?,
        currency: non_empty(row.currency.as_deref())
            .unwrap_or(DEFAULT_CURRENCY)
            .to_string(),
        expire_in: defaults.expiry.clone(),
        category: CATEGORY.to_string(),
        tags: split_tags(row.tags.as_deref()),
        shipping: Shipping {
            delivery_method: DELIVERY_METHOD.to_string(),
            days_to_deliver: defaults.delivery_days,
        },
        images: vec![image_url.to_string()],
        digital: true,
    })
}

/// Title with the optional ` x{quantity}` suffix.
pub fn listing_title(title: &str, quantity: i64, append_quantity: bool) -> String {
    if append_quantity && quantity > 1 {
        format!("{title} x{quantity}")
    } else {
        title.to_string()
    }
}

/// Convert a decimal price string to cents: `round(price * 100)`.
///
/// Midpoints round away from zero. Digits past the second decimal are
/// lost, not rejected.
pub fn price_to_cents(price: &str) -> Result<i64, ListingError> {
    let trimmed = price.trim();
    let invalid = |reason: String| ListingError::InvalidPrice {
        value: price.to_string(),
        reason,
    };

    let value = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|e| invalid(e.to_string()))?;

    value
        .checked_mul(dec!(100))
        .ok_or_else(|| invalid("out of range".to_string()))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| invalid("out of range".to_string()))
}

/// Split the comma-separated tag column. Whitespace around tags is kept.
pub fn split_tags(tags: Option<&str>) -> Vec<String> {
    match non_empty(tags) {
        Some(tags) => tags.split(',').map(str::to_string).collect(),
        None => Vec::new(),
    }
}

fn parse_quantity(quantity: Option<&str>) -> Result<i64, ListingError> {
    match non_empty(quantity) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ListingError::InvalidQuantity(raw.to_string())),
        None => Ok(1),
    }
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, ListingError> {
    value.ok_or(ListingError::MissingField(field))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
