//! Text normalizers
//!
//! Pure functions that turn raw text fragments from listing cards into typed
//! values: prices with canonical currency codes, surfaces in square meters,
//! a best-effort location, and absolute links.

mod area;
mod link;
mod location;
mod money;
mod numeral;

pub use area::{looks_like_area, parse_area, Area, SQUARE_METERS};
pub use link::resolve_link;
pub use location::derive_location;
pub use money::{canonical_currency, parse_money, Money};
pub use numeral::parse_numeral;

/// Collapses runs of whitespace into single spaces and trims the ends
pub fn clean_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Rounds to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
