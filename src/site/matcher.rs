/// Checks if a host matches a site host pattern
///
/// This function supports two types of patterns:
/// 1. Exact match: "mubawab.ma" matches only "mubawab.ma"
/// 2. Wildcard match: "*.mubawab.ma" matches:
///    - "mubawab.ma" (the bare domain)
///    - "www.mubawab.ma" (single subdomain)
///    - "m.fr.mubawab.ma" (nested subdomains)
///
/// Both sides are compared case-insensitively.
///
/// # Examples
///
/// ```
/// use listing_sweep::site::matches_host;
///
/// assert!(matches_host("mubawab.ma", "mubawab.ma"));
/// assert!(!matches_host("mubawab.ma", "www.mubawab.ma"));
///
/// assert!(matches_host("*.mubawab.ma", "mubawab.ma"));
/// assert!(matches_host("*.mubawab.ma", "WWW.Mubawab.ma"));
/// assert!(!matches_host("*.mubawab.ma", "mubawab.com"));
/// ```
pub fn matches_host(pattern: &str, host: &str) -> bool {
    let pattern = pattern.to_ascii_lowercase();
    let host = host.to_ascii_lowercase();

    if let Some(base) = pattern.strip_prefix("*.") {
        host == base || host.ends_with(&format!(".{}", base))
    } else {
        host == pattern
    }
}
