//! Character-class and structural checks for protocol strings.
//!
//! All checks are pure predicates. Length limits are applied by the
//! parameter validators before these run.

use std::net::{Ipv4Addr, Ipv6Addr};

use url::Url;

/// `VSCHAR = %x20-7E`
#[must_use]
pub fn is_vschar(value: &str) -> bool {
    value.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

/// Unreserved URI characters: `ALPHA / DIGIT / "-" / "." / "_" / "~"`.
///
/// Used for `code_verifier` and `code_challenge`.
#[must_use]
pub fn is_unreserved(value: &str) -> bool {
    value
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~'))
}

/// `scope-token = 1*( %x21 / %x23-5B / %x5D-7E )`
#[must_use]
pub fn is_scope_token(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| b == 0x21 || (0x23..=0x5B).contains(&b) || (0x5D..=0x7E).contains(&b))
}

/// Parses a redirect URI: it must be an absolute URI without a fragment.
///
/// Whitespace and non-VSCHAR characters are rejected before parsing so that
/// the parser's lenient normalization never hides a malformed value.
#[must_use]
pub fn parse_redirect_uri(value: &str) -> Option<Url> {
    if value.is_empty() || !is_vschar(value) || value.contains(' ') || value.contains('#') {
        return None;
    }
    let url = Url::parse(value).ok()?;
    if url.cannot_be_a_base() || url.fragment().is_some() {
        return None;
    }
    Some(url)
}

/// Returns `true` for `127.0.0.1`, `[::1]` and `localhost` hosts.
#[must_use]
pub fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Ipv4(ip)) => ip == Ipv4Addr::LOCALHOST,
        Some(url::Host::Ipv6(ip)) => ip == Ipv6Addr::LOCALHOST,
        Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vschar() {
        assert!(is_vschar("abc DEF ~!"));
        assert!(is_vschar(""));
        assert!(!is_vschar("tab\there"));
        assert!(!is_vschar("caf\u{e9}"));
        assert!(!is_vschar("del\u{7f}"));
    }

    #[test]
    fn test_unreserved() {
        assert!(is_unreserved("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk"));
        assert!(is_unreserved("a.b_c~d-e"));
        assert!(!is_unreserved("a+b"));
        assert!(!is_unreserved("a/b"));
        assert!(!is_unreserved("a=b"));
    }

    #[test]
    fn test_scope_token() {
        assert!(is_scope_token("openid"));
        assert!(is_scope_token("patient/*.read"));
        assert!(!is_scope_token(""));
        assert!(!is_scope_token("has space"));
        assert!(!is_scope_token("quote\"d"));
        assert!(!is_scope_token("back\\slash"));
    }

    #[test]
    fn test_redirect_uri_parsing() {
        assert!(parse_redirect_uri("https://client.example.com/cb").is_some());
        assert!(parse_redirect_uri("https://client.example.com/cb?x=1").is_some());
        assert!(parse_redirect_uri("com.example.app:/oauth2redirect").is_some());

        assert!(parse_redirect_uri("").is_none());
        assert!(parse_redirect_uri("/relative/cb").is_none());
        assert!(parse_redirect_uri("https://client.example.com/cb#frag").is_none());
        assert!(parse_redirect_uri("https://client.example.com/c b").is_none());
        assert!(parse_redirect_uri("mailto:someone@example.com").is_none());
    }

    #[test]
    fn test_loopback_detection() {
        let check = |s: &str| is_loopback(&Url::parse(s).unwrap());
        assert!(check("http://127.0.0.1:4000/cb"));
        assert!(check("http://[::1]:4000/cb"));
        assert!(check("http://localhost/cb"));
        assert!(!check("http://127.0.0.2/cb"));
        assert!(!check("http://127.0.0.1.example.com/cb"));
        assert!(!check("https://client.example.com/cb"));
    }
}
