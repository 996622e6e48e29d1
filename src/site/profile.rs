use crate::config::SiteConfig;
use crate::extract::{CardExtractor, CardSelectors};
use crate::site::matcher::matches_host;
use crate::ConfigError;
use scraper::Selector;

/// Placeholder replaced by the page number in a pagination suffix
const PAGE_PLACEHOLDER: &str = "{page}";

/// Site-specific rules parameterizing the generic crawl pipeline
///
/// Built once from a [`SiteConfig`]; all selectors are compiled up front so
/// parsing a page never deals with selector errors.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    name: String,
    hosts: Vec<String>,
    origin: String,
    pagination_suffix: String,
    card_selectors: Vec<Selector>,
    extractor: CardExtractor,
}

impl SiteProfile {
    /// Compiles a profile from its configuration
    pub fn from_config(config: &SiteConfig) -> Result<Self, ConfigError> {
        let selectors = CardSelectors {
            title: compile_selectors(&config.title_selectors)?,
            price: compile_selectors(&config.price_selectors)?,
            area: compile_selectors(&config.area_selectors)?,
            location: compile_selectors(&config.location_selectors)?,
        };

        Ok(Self {
            name: config.name.clone(),
            hosts: config.hosts.clone(),
            origin: config.origin.trim_end_matches('/').to_string(),
            pagination_suffix: config.pagination_suffix.clone(),
            card_selectors: compile_selectors(&config.card_selectors)?,
            extractor: CardExtractor::new(selectors),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scheme and host that root-relative links are joined to
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Card selectors, primary first then broader fallbacks
    pub fn card_selectors(&self) -> &[Selector] {
        &self.card_selectors
    }

    pub fn extractor(&self) -> &CardExtractor {
        &self.extractor
    }

    /// True when one of the profile's host patterns matches `host`
    pub fn serves_host(&self, host: &str) -> bool {
        self.hosts.iter().any(|pattern| matches_host(pattern, host))
    }

    /// URL of a given page of a listing
    ///
    /// Page 1 is the base URL verbatim; later pages append the pagination
    /// suffix with the page number filled in.
    ///
    /// # Examples
    ///
    /// ```
    /// use listing_sweep::config::builtin_sites;
    /// use listing_sweep::site::SiteProfile;
    ///
    /// let profile = SiteProfile::from_config(&builtin_sites()[0]).unwrap();
    /// let base = "https://www.mubawab.ma/en/sc/apartments-for-sale";
    /// assert_eq!(profile.page_url(base, 1), base);
    /// assert_eq!(
    ///     profile.page_url(base, 3),
    ///     "https://www.mubawab.ma/en/sc/apartments-for-sale:p:3"
    /// );
    /// ```
    pub fn page_url(&self, base: &str, page: u32) -> String {
        if page <= 1 {
            base.to_string()
        } else {
            let suffix = self
                .pagination_suffix
                .replace(PAGE_PLACEHOLDER, &page.to_string());
            format!("{}{}", base, suffix)
        }
    }
}

/// Compiles a list of CSS selectors
fn compile_selectors(selectors: &[String]) -> Result<Vec<Selector>, ConfigError> {
    selectors
        .iter()
        .map(|css| {
            Selector::parse(css).map_err(|e| ConfigError::InvalidSelector {
                selector: css.clone(),
                message: format!("{:?}", e),
            })
        })
        .collect()
}
