/// Converts a raw numeral such as "26,000", "1 200,50" or "1.200.000" into a float
///
/// # Separator Rules
///
/// 1. Whitespace (including no-break and narrow no-break spaces) is removed
/// 2. Comma and period both present: commas are thousands separators
/// 3. Comma only: thousands separators when every group after the first has
///    exactly three digits, otherwise a single comma is the decimal mark
/// 4. Several periods and no comma: periods are thousands separators
/// 5. If the result does not parse, everything except digits and periods is
///    stripped and parsing is tried again
///
/// # Examples
///
/// ```
/// use listing_sweep::normalize::parse_numeral;
///
/// assert_eq!(parse_numeral("26,000"), Some(26000.0));
/// assert_eq!(parse_numeral("850,50"), Some(850.5));
/// assert_eq!(parse_numeral("1,250.75"), Some(1250.75));
/// assert_eq!(parse_numeral("1\u{202f}200\u{202f}000"), Some(1_200_000.0));
/// ```
pub fn parse_numeral(raw: &str) -> Option<f64> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{00a0}' && *c != '\u{202f}')
        .collect();
    let compact = compact.trim_end_matches(|c| c == '.' || c == ',');

    if compact.is_empty() {
        return None;
    }

    let has_comma = compact.contains(',');
    let has_dot = compact.contains('.');

    let normalized = match (has_comma, has_dot) {
        (true, true) => compact.replace(',', ""),
        (true, false) if is_thousands_grouping(compact, ',') => compact.replace(',', ""),
        (true, false) => compact.replace(',', "."),
        (false, true) if compact.matches('.').count() > 1 => compact.replace('.', ""),
        _ => compact.to_string(),
    };

    normalized
        .parse::<f64>()
        .ok()
        .or_else(|| {
            let stripped: String = normalized
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            stripped.parse::<f64>().ok()
        })
        .filter(|value| value.is_finite())
}

/// True when `sep` splits the numeral into 1-3 leading digits followed by
/// groups of exactly three digits
fn is_thousands_grouping(numeral: &str, sep: char) -> bool {
    let mut groups = numeral.split(sep);

    let head_ok = groups
        .next()
        .map(|head| !head.is_empty() && head.len() <= 3 && head.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false);

    head_ok && groups.all(|group| group.len() == 3 && group.chars().all(|c| c.is_ascii_digit()))
}
