//! Product identifier extraction from QVC product page URLs.

use std::sync::LazyLock;

use regex::Regex;

/// `product.748849.html` anywhere in the URL.
static PRODUCT_PAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"product\.(\d+)\.html").expect("valid product page regex"));

/// A 5–7 digit path segment followed by `?`, `/`, or the end of the URL.
static NUMERIC_SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(\d{5,7})(?:\?|$|/)").expect("valid numeric segment regex"));

/// Extracts the QVC product identifier from a product URL.
///
/// Tries the `product.<digits>.html` form first and falls back to a bare
/// 5–7 digit path segment. Returns `None` when neither matches; that is an
/// expected outcome for products linked to non-QVC pages.
///
/// ```
/// use onair_qvc::extract_product_id;
///
/// assert_eq!(
///     extract_product_id("https://qvc.jp/product.748849.html").as_deref(),
///     Some("748849")
/// );
/// assert_eq!(extract_product_id("https://qvc.jp/nope"), None);
/// ```
#[must_use]
pub fn extract_product_id(url: &str) -> Option<String> {
    PRODUCT_PAGE_RE
        .captures(url)
        .or_else(|| NUMERIC_SEGMENT_RE.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
}
