use crate::normalize::numeral::parse_numeral;
use regex::Regex;
use std::sync::LazyLock;

/// A run of digits, optionally split by spaces, periods or commas
const NUMERAL: &str = r"\d+(?:[\s.,]\d+)*";

/// Currency symbols; longer spellings first so "US$" wins over "$"
const SYMBOLS: &str = r"GH₵|US\$|\$|€|£|₦|₵";

/// Letter codes, longer spellings first so "DHS" wins over "DH"
const CODES: &str = "FCFA|CFA|DHS|DH|MAD|USD|EUR|GBP|GHS|NGN|KES|KSH|XOF|XAF|ZAR|TND|EGP";

static PRICE_ON_REQUEST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)price\s*on\s*request|prix\s*sur\s*demande").expect("valid regex")
});

static AMOUNT_THEN_CURRENCY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)(?P<num>{NUMERAL})\s*(?P<cur>{SYMBOLS}|(?:{CODES})\b)"
    ))
    .expect("valid regex")
});

static CURRENCY_THEN_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)(?P<cur>{SYMBOLS}|\b(?:{CODES}))\s*(?P<num>{NUMERAL})"
    ))
    .expect("valid regex")
});

/// A price with its canonical currency code
#[derive(Debug, Clone, PartialEq)]
pub struct Money {
    pub amount: f64,
    pub currency: &'static str,
}

/// Parses a price such as "26,000 DH", "$1,200" or "GH₵ 4 500"
///
/// `<number><currency>` is tried before `<currency><number>`; the first match
/// wins. Text carrying a "price on request" marker never yields a price.
///
/// # Examples
///
/// ```
/// use listing_sweep::normalize::parse_money;
///
/// let money = parse_money("26,000 DH").unwrap();
/// assert_eq!(money.amount, 26000.0);
/// assert_eq!(money.currency, "MAD");
///
/// assert!(parse_money("Price on request").is_none());
/// ```
pub fn parse_money(text: &str) -> Option<Money> {
    if text.trim().is_empty() || PRICE_ON_REQUEST.is_match(text) {
        return None;
    }

    let caps = AMOUNT_THEN_CURRENCY
        .captures(text)
        .or_else(|| CURRENCY_THEN_AMOUNT.captures(text))?;

    let currency = canonical_currency(&caps["cur"])?;
    let amount = parse_numeral(&caps["num"])?;

    Some(Money { amount, currency })
}

/// Maps a recognized currency token to its canonical code
pub fn canonical_currency(token: &str) -> Option<&'static str> {
    let code = match token.trim().to_uppercase().as_str() {
        "$" | "US$" | "USD" => "USD",
        "DH" | "DHS" | "MAD" => "MAD",
        "€" | "EUR" => "EUR",
        "£" | "GBP" => "GBP",
        "GH₵" | "₵" | "GHS" => "GHS",
        "₦" | "NGN" => "NGN",
        "KES" | "KSH" => "KES",
        "CFA" | "FCFA" => "CFA",
        "XOF" => "XOF",
        "XAF" => "XAF",
        "ZAR" => "ZAR",
        "TND" => "TND",
        "EGP" => "EGP",
        _ => return None,
    };
    Some(code)
}
