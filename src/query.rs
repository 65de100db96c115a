//! Raw query-string extraction.
//!
//! SAML redirect bindings sign the exact percent-encoded query string, so a
//! parameter's decoded value is not always enough: signature validation needs
//! the value exactly as it appeared on the wire. When a host can hand over its
//! unparsed query string, this module recovers the original encoded form of a
//! single parameter from it.

use percent_encoding::percent_decode_str;

/// Returns the raw (still percent-encoded) value of `name` within `query`,
/// or `None` when the parameter does not appear there.
///
/// Keys are matched on their decoded form (`%xx` escapes and `+`-as-space
/// both honored), so a caller can look up the same name it would pass to a
/// decoded-parameter accessor. The returned value is the exact substring from
/// the query string; a key present without `=` yields an empty value.
pub(crate) fn raw_value(query: &str, name: &str) -> Option<String> {
    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (raw_key, raw_val) = match pair.split_once('=') {
            Some((k, v)) => (k, v),
            None => (pair, ""),
        };
        if decoded_key_matches(raw_key, name) {
            return Some(raw_val.to_string());
        }
    }
    None
}

fn decoded_key_matches(raw_key: &str, name: &str) -> bool {
    // Form encoding writes spaces as '+'; normalize before percent-decoding.
    let plus_normalized = raw_key.replace('+', " ");
    match percent_decode_str(&plus_normalized).decode_utf8() {
        Ok(decoded) => decoded == name,
        Err(_) => false,
    }
}
