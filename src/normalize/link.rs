use url::Url;

/// Schemes that never point at a listing page
const IGNORED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Resolves a card href to an absolute URL
///
/// # Rules
///
/// - An href that already carries a scheme is returned unchanged
/// - A root-relative href ("/fr/a/123") is appended to `origin`
/// - Anything else (including protocol-relative "//cdn/...") is resolved
///   against the page URL `base`
///
/// Returns `None` for empty and fragment-only hrefs and for `javascript:`,
/// `mailto:`, `tel:` and `data:` links.
///
/// # Examples
///
/// ```
/// use listing_sweep::normalize::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("https://www.mubawab.ma/en/sc/apartments-for-sale").unwrap();
/// assert_eq!(
///     resolve_link("/en/a/123", "https://www.mubawab.ma", &base),
///     Some("https://www.mubawab.ma/en/a/123".to_string())
/// );
/// ```
pub fn resolve_link(href: &str, origin: &str, base: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if IGNORED_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
        return None;
    }

    if Url::parse(href).is_ok() {
        return Some(href.to_string());
    }

    if href.starts_with('/') && !href.starts_with("//") {
        return Some(format!("{}{}", origin.trim_end_matches('/'), href));
    }

    base.join(href).ok().map(|url| url.to_string())
}
