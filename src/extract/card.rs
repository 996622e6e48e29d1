use crate::extract::strategy::{FieldStrategy, StrategyChain};
use scraper::{ElementRef, Selector};

/// Characters an anchor's text must exceed to be used as a title
const MIN_ANCHOR_TITLE_CHARS: usize = 5;

/// Length of the card-text title fallback
const LEADING_TITLE_CHARS: usize = 140;

/// Lazy-load image attributes, preferred over `src`
const LAZY_IMAGE_ATTRS: &[&str] = &["data-src", "data-lazy", "data-original"];

/// Raw, unparsed values pulled from one listing card
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCardFields {
    pub title: Option<String>,
    pub price_text: Option<String>,
    pub area_text: Option<String>,
    pub location_text: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
}

/// Site selectors feeding a [`CardExtractor`]
#[derive(Debug, Clone, Default)]
pub struct CardSelectors {
    pub title: Vec<Selector>,
    pub price: Vec<Selector>,
    pub area: Vec<Selector>,
    pub location: Vec<Selector>,
}

/// Resolves every field of a card through its strategy chain
///
/// # Cascades
///
/// | Field | Steps |
/// |-------|-------|
/// | title | site title selectors → first anchor with > 5 chars → first 140 chars of card text |
/// | price | site price selectors → full card text |
/// | area | site area selectors → first text node holding `<number><unit>` |
/// | location | site location selectors |
/// | image | `data-src`/`data-lazy`/`data-original` → `src` → `srcset` of the first `<img>` |
/// | link | `href` of the first anchor |
#[derive(Debug, Clone)]
pub struct CardExtractor {
    title: StrategyChain,
    price: StrategyChain,
    area: StrategyChain,
    location: StrategyChain,
    image: StrategyChain,
    link: StrategyChain,
}

impl CardExtractor {
    /// Builds the strategy chains for a site's selectors
    pub fn new(selectors: CardSelectors) -> Self {
        let CardSelectors {
            title,
            price,
            area,
            location,
        } = selectors;

        let title = StrategyChain::new(
            title
                .into_iter()
                .map(FieldStrategy::SelectorText)
                .chain([
                    FieldStrategy::AnchorText {
                        min_chars: MIN_ANCHOR_TITLE_CHARS,
                    },
                    FieldStrategy::LeadingText {
                        max_chars: LEADING_TITLE_CHARS,
                    },
                ])
                .collect(),
        );

        let price = StrategyChain::new(
            price
                .into_iter()
                .map(FieldStrategy::SelectorText)
                .chain([FieldStrategy::FullText])
                .collect(),
        );

        let area = StrategyChain::new(
            area.into_iter()
                .map(FieldStrategy::SelectorText)
                .chain([FieldStrategy::AreaTextNode])
                .collect(),
        );

        let location = StrategyChain::new(
            location
                .into_iter()
                .map(FieldStrategy::SelectorText)
                .collect(),
        );

        let img = Selector::parse("img").expect("valid selector");
        let image = StrategyChain::new(vec![
            FieldStrategy::Attribute {
                selector: img.clone(),
                attrs: LAZY_IMAGE_ATTRS.to_vec(),
            },
            FieldStrategy::Attribute {
                selector: img.clone(),
                attrs: vec!["src"],
            },
            FieldStrategy::Attribute {
                selector: img,
                attrs: vec!["srcset", "data-srcset"],
            },
        ]);

        let link = StrategyChain::new(vec![FieldStrategy::Attribute {
            selector: Selector::parse("a[href]").expect("valid selector"),
            attrs: vec!["href"],
        }]);

        Self {
            title,
            price,
            area,
            location,
            image,
            link,
        }
    }

    /// Extracts the raw fields of one card
    pub fn extract(&self, card: ElementRef<'_>) -> RawCardFields {
        RawCardFields {
            title: self.title.resolve(card),
            price_text: self.price.resolve(card),
            area_text: self.area.resolve(card),
            location_text: self.location.resolve(card),
            image_url: self.image.resolve(card).and_then(|v| first_srcset_candidate(&v)),
            link_url: self.link.resolve(card),
        }
    }
}

impl Default for CardExtractor {
    fn default() -> Self {
        Self::new(CardSelectors::default())
    }
}

/// Picks the first URL-looking candidate of a `srcset` value
///
/// Values that are not a source-set pass through unchanged, including single
/// URLs with commas in their path.
///
/// # Examples
///
/// ```
/// use listing_sweep::extract::first_srcset_candidate;
///
/// assert_eq!(
///     first_srcset_candidate("https://cdn.example/a.jpg 1x, https://cdn.example/b.jpg 2x"),
///     Some("https://cdn.example/a.jpg".to_string())
/// );
/// ```
pub fn first_srcset_candidate(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if !is_source_set(value) {
        return Some(value.to_string());
    }

    let candidates: Vec<&str> = value
        .split(',')
        .filter_map(|candidate| candidate.split_whitespace().next())
        .collect();

    candidates
        .iter()
        .find(|c| looks_like_url(c))
        .or_else(|| candidates.first())
        .map(|c| c.to_string())
}

/// A source-set separates candidates with ", " or gives them descriptors
fn is_source_set(value: &str) -> bool {
    let spaced_comma = value
        .split(',')
        .skip(1)
        .any(|rest| rest.starts_with(char::is_whitespace));

    spaced_comma
        || value
            .split(',')
            .any(|candidate| candidate.split_whitespace().nth(1).is_some_and(is_descriptor))
}

/// Width (`480w`) or density (`1.5x`) descriptor
fn is_descriptor(token: &str) -> bool {
    token
        .strip_suffix('w')
        .or_else(|| token.strip_suffix('x'))
        .is_some_and(|n| !n.is_empty() && n.parse::<f64>().is_ok())
}

fn looks_like_url(candidate: &str) -> bool {
    candidate.starts_with("http://")
        || candidate.starts_with("https://")
        || candidate.starts_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn extract_first(html: &str, extractor: &CardExtractor) -> RawCardFields {
        let document = Html::parse_fragment(html);
        let selector = Selector::parse("div.card").unwrap();
        let card = document.select(&selector).next().unwrap();
        extractor.extract(card)
    }

    fn site_extractor() -> CardExtractor {
        CardExtractor::new(CardSelectors {
            title: vec![Selector::parse(".listTitle").unwrap()],
            price: vec![Selector::parse(".priceTag").unwrap()],
            area: vec![Selector::parse(".surface").unwrap()],
            location: vec![Selector::parse(".listingH3").unwrap()],
        })
    }

    #[test]
    fn test_all_fields_from_site_selectors() {
        let html = r#"
            <div class="card">
              <h2 class="listTitle"><a href="/en/a/101">Office in Agdal</a></h2>
              <span class="priceTag">14 000 DH</span>
              <span class="surface">120 m²</span>
              <h3 class="listingH3">Agdal, Rabat</h3>
              <img data-src="https://cdn.example/101.jpg" src="/blank.gif">
            </div>"#;
        let raw = extract_first(html, &site_extractor());

        assert_eq!(raw.title.as_deref(), Some("Office in Agdal"));
        assert_eq!(raw.price_text.as_deref(), Some("14 000 DH"));
        assert_eq!(raw.area_text.as_deref(), Some("120 m²"));
        assert_eq!(raw.location_text.as_deref(), Some("Agdal, Rabat"));
        assert_eq!(raw.image_url.as_deref(), Some("https://cdn.example/101.jpg"));
        assert_eq!(raw.link_url.as_deref(), Some("/en/a/101"));
    }

    #[test]
    fn test_fallbacks_without_site_selectors() {
        let html = r#"
            <div class="card">
              <a href="/en/a/7">Penthouse with sea view</a>
              <p>Price: 2,500,000 DH</p>
              <p>Surface 210 m2</p>
              <img src="https://cdn.example/7.jpg">
            </div>"#;
        let raw = extract_first(html, &CardExtractor::default());

        assert_eq!(raw.title.as_deref(), Some("Penthouse with sea view"));
        // price falls back to the whole card text
        assert!(raw.price_text.unwrap().contains("2,500,000 DH"));
        assert_eq!(raw.area_text.as_deref(), Some("Surface 210 m2"));
        assert_eq!(raw.location_text, None);
        assert_eq!(raw.image_url.as_deref(), Some("https://cdn.example/7.jpg"));
        assert_eq!(raw.link_url.as_deref(), Some("/en/a/7"));
    }

    #[test]
    fn test_title_from_leading_text() {
        let long_text = "x".repeat(200);
        let html = format!(r#"<div class="card"><a href="/a">More</a><p>{}</p></div>"#, long_text);
        let raw = extract_first(&html, &CardExtractor::default());

        let title = raw.title.unwrap();
        assert_eq!(title.chars().count(), 140);
        assert!(title.starts_with("More x"));
    }

    #[test]
    fn test_empty_card_yields_absent_fields() {
        let raw = extract_first(r#"<div class="card"></div>"#, &CardExtractor::default());
        assert_eq!(raw, RawCardFields::default());
    }

    #[test]
    fn test_srcset_image() {
        let html = r#"<div class="card"><img srcset="/img/s.jpg 480w, /img/l.jpg 1080w"></div>"#;
        let raw = extract_first(html, &CardExtractor::default());
        assert_eq!(raw.image_url.as_deref(), Some("/img/s.jpg"));
    }

    #[test]
    fn test_first_srcset_candidate() {
        assert_eq!(
            first_srcset_candidate("https://a/1.jpg"),
            Some("https://a/1.jpg".to_string())
        );
        assert_eq!(
            first_srcset_candidate("1x, https://a/2.jpg 2x"),
            Some("https://a/2.jpg".to_string())
        );
        assert_eq!(first_srcset_candidate("  "), None);
        assert_eq!(
            first_srcset_candidate("/img/a.jpg 2x"),
            Some("/img/a.jpg".to_string())
        );
    }

    #[test]
    fn test_comma_in_single_image_url() {
        let url = "https://res.cloudinary.com/demo/image/upload/w_300,h_200/sample.jpg";
        assert_eq!(first_srcset_candidate(url), Some(url.to_string()));

        let html = format!(r#"<div class="card"><img data-src="{}"></div>"#, url);
        let raw = extract_first(&html, &CardExtractor::default());
        assert_eq!(raw.image_url.as_deref(), Some(url));
    }

    #[test]
    fn test_srcset_without_spaces_after_commas() {
        assert_eq!(
            first_srcset_candidate("/img/s.jpg 480w,/img/l.jpg 1080w"),
            Some("/img/s.jpg".to_string())
        );
    }
}
