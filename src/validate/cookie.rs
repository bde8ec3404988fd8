//! `Cookie` request header validator.

use percent_encoding::percent_decode_str;

use super::rejects_control_bytes;
use crate::method::is_tchar;

#[derive(Debug, Clone, Copy, Default)]
pub struct CookieOptions {
    pub decode_percent_values: bool,
    pub reject_duplicate_names: bool,
    /// `None` disables the cap; [`CookieOptions::with_default_cap`] sets
    /// it to 100.
    pub max_cookies: Option<usize>,
}

impl CookieOptions {
    pub fn with_default_cap() -> Self {
        Self { max_cookies: Some(100), ..Default::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieValidation {
    Valid { cookies: Vec<(String, String)> },
    Invalid { reason: String },
}

fn invalid(reason: impl Into<String>) -> CookieValidation {
    CookieValidation::Invalid { reason: reason.into() }
}

fn is_cookie_octet(b: u8) -> bool {
    matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
}

/// `; `-separated `name=value` pairs (RFC 6265 `cookie-string`).
pub fn validate_cookie(raw: &str, options: &CookieOptions) -> CookieValidation {
    if let Some(reason) = rejects_control_bytes(raw) {
        return invalid(reason);
    }

    let mut cookies = Vec::new();
    for pair in raw.split(';') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        let Some((name, value)) = pair.split_once('=') else {
            return invalid(format!("malformed cookie pair '{pair}'"));
        };
        let name = name.trim();
        if name.is_empty() || !name.bytes().all(is_tchar) {
            return invalid(format!("'{name}' is not a valid cookie name"));
        }

        let raw_value = strip_dquote(value.trim());
        if !raw_value.bytes().all(is_cookie_octet) {
            return invalid(format!("'{name}' has an invalid cookie value"));
        }
        let value = if options.decode_percent_values {
            percent_decode_str(raw_value).decode_utf8_lossy().into_owned()
        } else {
            raw_value.to_string()
        };

        if options.reject_duplicate_names && cookies.iter().any(|(n, _): &(String, String)| n == name) {
            return invalid(format!("duplicate cookie name '{name}'"));
        }

        cookies.push((name.to_string(), value));
        if let Some(max) = options.max_cookies {
            if cookies.len() > max {
                return invalid(format!("more than {max} cookies"));
            }
        }
    }

    CookieValidation::Valid { cookies }
}

fn strip_dquote(s: &str) -> &str {
    s.strip_prefix('"').and_then(|s| s.strip_suffix('"')).unwrap_or(s)
}
