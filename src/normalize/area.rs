use crate::normalize::numeral::parse_numeral;
use crate::normalize::round2;
use regex::Regex;
use std::sync::LazyLock;

/// Canonical unit for every surface in a record
pub const SQUARE_METERS: &str = "m²";

/// Square feet in one square meter
const SQFT_PER_SQM: f64 = 10.7639;

static AREA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?P<num>\d+(?:[\s.,]\d+)*)\s*(?P<unit>m²|m2|sqm|sq\.?\s?m\b|ft²|ft2|sqft|sq\.?\s?ft\b)",
    )
    .expect("valid regex")
});

/// A surface expressed in square meters
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    pub value: f64,
    pub unit: &'static str,
}

/// Parses a surface such as "58 m2", "120m²" or "600 sqft"
///
/// Imperial surfaces are converted to square meters and rounded to two
/// decimals; metric surfaces pass through unchanged.
///
/// # Examples
///
/// ```
/// use listing_sweep::normalize::parse_area;
///
/// assert_eq!(parse_area("58 m2").unwrap().value, 58.0);
/// assert_eq!(parse_area("600 sqft").unwrap().value, 55.74);
/// assert_eq!(parse_area("600 sqft").unwrap().unit, "m²");
/// ```
pub fn parse_area(text: &str) -> Option<Area> {
    let caps = AREA.captures(text)?;
    let raw = parse_numeral(&caps["num"])?;
    let unit = caps["unit"].to_lowercase();

    let value = if unit.contains("ft") {
        round2(raw / SQFT_PER_SQM)
    } else {
        raw
    };

    Some(Area {
        value,
        unit: SQUARE_METERS,
    })
}

/// True when the text holds a `<number><unit>` surface
pub fn looks_like_area(text: &str) -> bool {
    AREA.is_match(text)
}
