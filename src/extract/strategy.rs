//! Extraction strategies
//!
//! Each field of a card is resolved by an ordered chain of strategies. A
//! strategy that finds nothing yields `None` and the chain moves on; no step
//! ever fails the card.

use crate::normalize::{clean_spaces, looks_like_area};
use scraper::{ElementRef, Selector};

/// One way of pulling a text value out of a card
#[derive(Debug, Clone)]
pub enum FieldStrategy {
    /// Text of the first element matching a site selector
    SelectorText(Selector),

    /// Text of the first anchor whose visible text is longer than `min_chars`
    AnchorText { min_chars: usize },

    /// The first `max_chars` characters of the card's visible text
    LeadingText { max_chars: usize },

    /// The card's whole visible text
    FullText,

    /// The first text node holding a `<number><unit>` surface
    AreaTextNode,

    /// The first present attribute, in order, on the first element matching `selector`
    Attribute {
        selector: Selector,
        attrs: Vec<&'static str>,
    },
}

impl FieldStrategy {
    /// Applies this strategy to a card, returning a non-empty value if found
    pub fn apply(&self, card: ElementRef<'_>) -> Option<String> {
        let value = match self {
            Self::SelectorText(selector) => card.select(selector).next().map(element_text),

            Self::AnchorText { min_chars } => card.select(anchor_selector()).find_map(|anchor| {
                let text = element_text(anchor);
                (text.chars().count() > *min_chars).then_some(text)
            }),

            Self::LeadingText { max_chars } => {
                let text: String = element_text(card).chars().take(*max_chars).collect();
                Some(text.trim_end().to_string())
            }

            Self::FullText => Some(element_text(card)),

            Self::AreaTextNode => card
                .text()
                .find(|node| looks_like_area(node))
                .map(clean_spaces),

            Self::Attribute { selector, attrs } => {
                let element = card.select(selector).next()?;
                attrs.iter().find_map(|name| {
                    element
                        .value()
                        .attr(name)
                        .map(str::trim)
                        // inline placeholders stand in for lazily loaded images
                        .filter(|v| !v.is_empty() && !v.starts_with("data:"))
                        .map(str::to_string)
                })
            }
        };

        value.filter(|v| !v.is_empty())
    }
}

/// An ordered list of strategies; the first present value wins
#[derive(Debug, Clone, Default)]
pub struct StrategyChain {
    steps: Vec<FieldStrategy>,
}

impl StrategyChain {
    pub fn new(steps: Vec<FieldStrategy>) -> Self {
        Self { steps }
    }

    /// Runs the chain against a card
    pub fn resolve(&self, card: ElementRef<'_>) -> Option<String> {
        self.steps.iter().find_map(|step| step.apply(card))
    }
}

/// Visible text of an element with whitespace collapsed
pub fn element_text(element: ElementRef<'_>) -> String {
    clean_spaces(&element.text().collect::<Vec<_>>().join(" "))
}

fn anchor_selector() -> &'static Selector {
    static ANCHOR: std::sync::LazyLock<Selector> =
        std::sync::LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));
    &ANCHOR
}
