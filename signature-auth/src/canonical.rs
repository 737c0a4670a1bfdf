//! Deterministic serialisation of request parameters for signing.
//!
//! Keys are ordered lexicographically (byte order) by the `BTreeMap`.
//! Each key and value is encoded like `urllib.parse.quote_plus`:
//! `A-Z a-z 0-9 _ . - ~` pass through, space becomes `+`, every other byte of
//! the UTF-8 form becomes `%XX` (uppercase hex).

use std::collections::BTreeMap;

/// Renders `k1=v1&k2=v2...` in key order.
///
/// ```
/// use std::collections::BTreeMap;
/// use signature_auth::canonical_encode;
///
/// let p = BTreeMap::from([
///     ("query".to_string(), "a b".to_string()),
///     ("client_id".to_string(), "c1".to_string()),
/// ]);
/// assert_eq!(canonical_encode(&p), "client_id=c1&query=a+b");
/// ```
pub fn canonical_encode(params: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    for (i, (k, v)) in params.iter().enumerate() {
        if i > 0 {
            out.push('&');
        }
        out.push_str(&form_encode(k));
        out.push('=');
        out.push_str(&form_encode(v));
    }
    out
}

/// `urlencoding` leaves exactly the unreserved set alone and emits `%20` for
/// space; the only difference to `quote_plus` is the `+`.
fn form_encode(s: &str) -> String {
    urlencoding::encode(s).replace("%20", "+")
}
