//! Canonical listing records
//!
//! A [`ListingRecord`] is assembled once per card from its raw fields and is
//! not modified afterwards.

use crate::extract::RawCardFields;
use crate::normalize::{derive_location, parse_area, parse_money, resolve_link, round2};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::Url;

/// The normalized, typed output unit of a crawl
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub title: String,
    pub price: Option<f64>,
    /// Canonical currency code ("MAD", "USD", "CFA", ...)
    pub currency: Option<String>,
    /// Surface in square meters
    pub area: Option<f64>,
    pub unit: Option<String>,
    pub location: Option<String>,
    pub image: Option<String>,
    /// Always absolute when present
    pub link: Option<String>,
    pub price_per_area: Option<f64>,
    pub retrieved_at: NaiveDate,
}

/// Where a card was found, used to resolve its links
#[derive(Debug, Clone)]
pub struct CardContext<'a> {
    /// Site origin that root-relative hrefs are joined to
    pub origin: &'a str,
    /// URL of the page the card came from
    pub page_url: &'a Url,
    pub retrieved_at: NaiveDate,
}

impl ListingRecord {
    /// Normalizes a card's raw fields into a record
    pub fn assemble(raw: RawCardFields, ctx: &CardContext<'_>) -> Self {
        let title = raw.title.unwrap_or_default();

        let money = raw.price_text.as_deref().and_then(parse_money);
        let area = raw.area_text.as_deref().and_then(parse_area);

        let location = raw
            .location_text
            .filter(|l| !l.is_empty())
            .or_else(|| derive_location(&title));

        let link = raw
            .link_url
            .and_then(|href| resolve_link(&href, ctx.origin, ctx.page_url));
        let image = raw
            .image_url
            .and_then(|src| resolve_link(&src, ctx.origin, ctx.page_url));

        let price = money.as_ref().map(|m| m.amount);
        let area_value = area.as_ref().map(|a| a.value);

        Self {
            title,
            price,
            currency: money.map(|m| m.currency.to_string()),
            area: area_value,
            unit: area.map(|a| a.unit.to_string()),
            location,
            image,
            link,
            price_per_area: price_per_area(price, area_value),
            retrieved_at: ctx.retrieved_at,
        }
    }

    /// True when two records differ only in when they were retrieved
    pub fn same_listing(&self, other: &Self) -> bool {
        Self {
            retrieved_at: other.retrieved_at,
            ..self.clone()
        } == *other
    }
}

/// Price per square meter, present only with a price and a positive area
///
/// # Examples
///
/// ```
/// use listing_sweep::listing::price_per_area;
///
/// assert_eq!(price_per_area(Some(26000.0), Some(120.0)), Some(216.67));
/// assert_eq!(price_per_area(Some(26000.0), Some(0.0)), None);
/// assert_eq!(price_per_area(None, Some(120.0)), None);
/// ```
pub fn price_per_area(price: Option<f64>, area: Option<f64>) -> Option<f64> {
    match (price, area) {
        (Some(price), Some(area)) if area > 0.0 => Some(round2(price / area)),
        _ => None,
    }
}
