//! Listing page parser
//!
//! Locates listing cards in a page body and turns each card into a
//! [`ListingRecord`]. A page where no card selector matches has zero
//! listings; that is an outcome, not an error.

use crate::listing::{CardContext, ListingRecord};
use crate::site::SiteProfile;
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Parses one listing page into records, in document order
///
/// # Arguments
///
/// * `body` - The HTML content of the page
/// * `profile` - The site's selectors and link origin
/// * `page_url` - The page's own URL, for resolving relative links
/// * `retrieved_at` - Date stamped on every record
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use listing_sweep::config::builtin_sites;
/// use listing_sweep::crawler::parse_page;
/// use listing_sweep::site::SiteProfile;
/// use url::Url;
///
/// let profile = SiteProfile::from_config(&builtin_sites()[0]).unwrap();
/// let page_url = Url::parse("https://www.mubawab.ma/en/sc/offices-for-rent").unwrap();
/// let html = r#"<div class="listingBox"><h2 class="listTitle">Office in Agdal</h2></div>"#;
/// let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
///
/// let records = parse_page(html, &profile, &page_url, today);
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].location.as_deref(), Some("Agdal"));
/// ```
pub fn parse_page(
    body: &str,
    profile: &SiteProfile,
    page_url: &Url,
    retrieved_at: NaiveDate,
) -> Vec<ListingRecord> {
    let document = Html::parse_document(body);
    let cards = select_cards(&document, profile.card_selectors());

    let ctx = CardContext {
        origin: profile.origin(),
        page_url,
        retrieved_at,
    };

    cards
        .into_iter()
        .map(|card| {
            let raw = profile.extractor().extract(card);
            tracing::trace!("Card fields on {}: {:?}", page_url, raw);
            ListingRecord::assemble(raw, &ctx)
        })
        .collect()
}

/// Returns the cards matched by the first selector that matches anything
fn select_cards<'a>(document: &'a Html, selectors: &[Selector]) -> Vec<ElementRef<'a>> {
    for (position, selector) in selectors.iter().enumerate() {
        let cards: Vec<_> = document.select(selector).collect();
        if !cards.is_empty() {
            if position > 0 {
                tracing::debug!(
                    "Primary card selector matched nothing; fallback #{} found {} cards",
                    position,
                    cards.len()
                );
            }
            return cards;
        }
    }
    Vec::new()
}
