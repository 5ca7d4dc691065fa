//! URL classification
//!
//! Clipboard text only enters the cleaning pipeline when it is a single,
//! absolute URL with both a scheme and a host (e.g. `https://example.com/a`).

use url::Url;

/// Returns true if `text` is an absolute URL with a non-empty scheme and host
///
/// Parse failures are not errors, they simply classify the text as "not a URL".
pub fn is_valid_url(text: &str) -> bool {
    if text.is_empty() || text.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }

    // WHATWG parsing invents a host for `http:example.com` and
    // `http:///example.com`; only an explicit, non-empty authority counts.
    let authority = match text.split_once(':') {
        Some((_, rest)) => match rest.strip_prefix("//") {
            Some(after) => after.split(['/', '?', '#']).next().unwrap_or_default(),
            None => return false,
        },
        None => return false,
    };
    if authority.is_empty() {
        return false;
    }

    match Url::parse(text) {
        Ok(url) => !url.scheme().is_empty() && url.host_str().is_some_and(|h| !h.is_empty()),
        Err(_) => false,
    }
}
