use serde::Deserialize;

/// Browser identity sent with every page request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Main configuration structure for Listing-Sweep
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(rename = "site", default)]
    pub sites: Vec<SiteConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            user_agent: UserAgentConfig::default(),
            sites: builtin_sites(),
        }
    }
}

/// Crawler limits shared by every job
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Upper clamp for the number of pages a job may request
    #[serde(rename = "max-pages-ceiling", default = "default_max_pages_ceiling")]
    pub max_pages_ceiling: u32,

    /// Maximum number of concurrent page fetches
    #[serde(rename = "concurrency-limit", default = "default_concurrency_limit")]
    pub concurrency_limit: u32,

    /// Whole-request timeout for one page fetch (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages_ceiling: default_max_pages_ceiling(),
            concurrency_limit: default_concurrency_limit(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

fn default_max_pages_ceiling() -> u32 {
    200
}

fn default_concurrency_limit() -> u32 {
    5
}

fn default_request_timeout() -> u64 {
    15
}

fn default_connect_timeout() -> u64 {
    10
}

/// Identity header configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Full User-Agent header value
    #[serde(default = "default_user_agent")]
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Selector and pagination rules for one classifieds site
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Identifier callers use to pick this profile
    pub name: String,

    /// Host patterns (e.g., "mubawab.ma" or "*.mubawab.ma")
    #[serde(default)]
    pub hosts: Vec<String>,

    /// Scheme and host that root-relative links are joined to
    pub origin: String,

    /// Appended to the base URL for pages after the first; `{page}` is replaced
    #[serde(rename = "pagination-suffix")]
    pub pagination_suffix: String,

    /// Card container selectors, primary first
    #[serde(rename = "card-selectors")]
    pub card_selectors: Vec<String>,

    #[serde(rename = "title-selectors", default)]
    pub title_selectors: Vec<String>,

    #[serde(rename = "price-selectors", default)]
    pub price_selectors: Vec<String>,

    #[serde(rename = "area-selectors", default)]
    pub area_selectors: Vec<String>,

    #[serde(rename = "location-selectors", default)]
    pub location_selectors: Vec<String>,
}

/// Profiles available without a configuration file
pub fn builtin_sites() -> Vec<SiteConfig> {
    vec![SiteConfig {
        name: "mubawab".to_string(),
        hosts: vec!["*.mubawab.ma".to_string()],
        origin: "https://www.mubawab.ma".to_string(),
        pagination_suffix: ":p:{page}".to_string(),
        card_selectors: vec![
            "div.listingBox".to_string(),
            "div.adlist, div.contentBox, div.box".to_string(),
        ],
        title_selectors: vec![".listTitle, .titleRow, p.listingP, .disFlex.titleRow".to_string()],
        // Price and area are scanned from the card text on this site
        price_selectors: vec![],
        area_selectors: vec![],
        location_selectors: vec![],
    }]
}
