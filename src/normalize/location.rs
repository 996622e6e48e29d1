use crate::normalize::clean_spaces;
use regex::Regex;
use std::sync::LazyLock;

static IN_PHRASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bin\s+([^.\-]+)").expect("valid regex"));

/// Guesses a location from a listing title
///
/// Takes the phrase after the first standalone "in", up to the next period or
/// hyphen. Best effort only: titles without that shape yield `None`.
///
/// # Examples
///
/// ```
/// use listing_sweep::normalize::derive_location;
///
/// assert_eq!(
///     derive_location("Offices for rent in Hay El Menzah. Area 120m²"),
///     Some("Hay El Menzah".to_string())
/// );
/// ```
pub fn derive_location(title: &str) -> Option<String> {
    let caps = IN_PHRASE.captures(title)?;
    let phrase = clean_spaces(&caps[1]);

    if phrase.is_empty() {
        None
    } else {
        Some(phrase)
    }
}
