//! Field extraction for listing cards
//!
//! Turns one card fragment into [`RawCardFields`] by running a strategy chain
//! per field. Missing markup never fails a card; it only leaves fields absent.

mod card;
mod strategy;

pub use card::{first_srcset_candidate, CardExtractor, CardSelectors, RawCardFields};
pub use strategy::{element_text, FieldStrategy, StrategyChain};
