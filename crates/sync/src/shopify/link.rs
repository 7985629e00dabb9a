//! `Link` header cursor parsing.
//!
//! Shopify's REST list endpoints paginate with a header of the form:
//!
//! ```text
//! Link: <https://shop.myshopify.com/admin/api/2025-01/products.json?limit=250&page_info=abc>; rel="previous",
//!       <https://shop.myshopify.com/admin/api/2025-01/products.json?limit=250&page_info=def>; rel="next"
//! ```
//!
//! Only the `rel="next"` entry matters. Anything that fails to parse is
//! treated as "no next page" so a malformed header can never loop forever.

use url::Url;

/// Extract the `page_info` cursor of the `rel="next"` link, if any.
#[must_use]
pub fn next_page_info(header: &str) -> Option<String> {
    header.split(',').find_map(|entry| {
        let (target, params) = entry.split_once(';')?;
        let is_next = params
            .split(';')
            .map(str::trim)
            .any(|param| param == r#"rel="next""# || param == "rel=next");
        if !is_next {
            return None;
        }

        let raw = target.trim().strip_prefix('<')?.strip_suffix('>')?;
        let url = Url::parse(raw).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == "page_info")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    })
}
