use crate::listing::ListingRecord;
use std::collections::BTreeMap;
use std::fmt;

/// What one page contributed once fetched and parsed
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    /// The page held at least one card
    Listings(Vec<ListingRecord>),

    /// The page parsed but no card selector matched
    Empty,

    /// Non-200 response: the site has no such page
    NotFound { status_code: u16 },

    /// Network failure or timeout
    TransportError { cause: String },
}

impl PageOutcome {
    /// Wraps parsed records, mapping an empty list to [`PageOutcome::Empty`]
    pub fn from_records(records: Vec<ListingRecord>) -> Self {
        if records.is_empty() {
            Self::Empty
        } else {
            Self::Listings(records)
        }
    }

    /// Returns true if this page ends the listing sequence
    pub fn is_stop(&self) -> bool {
        !matches!(self, Self::Listings(_))
    }

    pub fn record_count(&self) -> usize {
        match self {
            Self::Listings(records) => records.len(),
            _ => 0,
        }
    }
}

/// Why a crawl stopped where it did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// A page yielded zero listings
    EmptyPage { page: u32 },

    /// A page answered with a non-200 status
    NotFound { page: u32, status_code: u16 },

    /// A page could not be fetched
    TransportError { page: u32, cause: String },

    /// Every requested page held listings
    PageLimit { pages: u32 },
}

impl StopReason {
    fn at(page: u32, outcome: &PageOutcome) -> Option<Self> {
        match outcome {
            PageOutcome::Listings(_) => None,
            PageOutcome::Empty => Some(Self::EmptyPage { page }),
            PageOutcome::NotFound { status_code } => Some(Self::NotFound {
                page,
                status_code: *status_code,
            }),
            PageOutcome::TransportError { cause } => Some(Self::TransportError {
                page,
                cause: cause.clone(),
            }),
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPage { page } => write!(f, "no listings on page {}", page),
            Self::NotFound { page, status_code } => {
                write!(f, "page {} returned HTTP {}", page, status_code)
            }
            Self::TransportError { page, cause } => {
                write!(f, "page {} could not be fetched: {}", page, cause)
            }
            Self::PageLimit { pages } => write!(f, "reached the {} page limit", pages),
        }
    }
}

/// Listings merged from a settled buffer
#[derive(Debug, Clone, PartialEq)]
pub struct DrainedPages {
    /// Records in page-ascending, within-page document order
    pub records: Vec<ListingRecord>,
    /// Number of pages that contributed records
    pub pages_with_listings: u32,
    pub stop: StopReason,
}

/// Per-page results keyed by page index, written at most once per page
///
/// Pages may complete in any order. The stop point is positional: the lowest
/// page index whose outcome ends the sequence. Pages at or after it never
/// contribute records, whatever their own outcome.
#[derive(Debug, Clone)]
pub struct PageBuffer {
    max_pages: u32,
    outcomes: BTreeMap<u32, PageOutcome>,
}

impl PageBuffer {
    /// Creates an empty buffer for pages `1..=max_pages`
    pub fn new(max_pages: u32) -> Self {
        Self {
            max_pages,
            outcomes: BTreeMap::new(),
        }
    }

    /// Stores a page's outcome
    ///
    /// # Returns
    ///
    /// * `true` - The outcome was stored
    /// * `false` - The page was out of range or already had an outcome; the
    ///   existing entry is left untouched
    pub fn record(&mut self, page: u32, outcome: PageOutcome) -> bool {
        if page == 0 || page > self.max_pages || self.outcomes.contains_key(&page) {
            return false;
        }
        self.outcomes.insert(page, outcome);
        true
    }

    /// Lowest page index observed to end the sequence
    pub fn stop_point(&self) -> Option<u32> {
        self.outcomes
            .iter()
            .find(|(_, outcome)| outcome.is_stop())
            .map(|(page, _)| *page)
    }

    /// Returns true if the page could still contribute records
    pub fn is_needed(&self, page: u32) -> bool {
        page >= 1
            && page <= self.max_pages
            && self.stop_point().map_or(true, |stop| page < stop)
    }

    /// Returns true once every page that can contribute has resolved
    pub fn is_settled(&self) -> bool {
        let last_needed = self
            .stop_point()
            .map_or(self.max_pages, |stop| stop.saturating_sub(1));
        (1..=last_needed).all(|page| self.outcomes.contains_key(&page))
    }

    /// Concatenates listings of the pages before the stop point
    ///
    /// Walks pages in ascending order and stops at the first page that ends
    /// the sequence. A page with no stored outcome also ends it; this only
    /// happens if the caller drains an unsettled buffer.
    pub fn drain(self) -> DrainedPages {
        let mut records = Vec::new();
        let mut pages_with_listings = 0;
        let mut outcomes = self.outcomes;

        for page in 1..=self.max_pages {
            match outcomes.remove(&page) {
                Some(PageOutcome::Listings(page_records)) => {
                    records.extend(page_records);
                    pages_with_listings += 1;
                }
                Some(outcome) => {
                    let stop = StopReason::at(page, &outcome).unwrap_or(StopReason::EmptyPage { page });
                    return DrainedPages {
                        records,
                        pages_with_listings,
                        stop,
                    };
                }
                None => {
                    return DrainedPages {
                        records,
                        pages_with_listings,
                        stop: StopReason::TransportError {
                            page,
                            cause: "page never resolved".to_string(),
                        },
                    };
                }
            }
        }

        DrainedPages {
            records,
            pages_with_listings,
            stop: StopReason::PageLimit {
                pages: self.max_pages,
            },
        }
    }
}
