//! `Cache-Control` header validator.

use super::rejects_control_bytes;
use crate::method::is_tchar;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveValue {
    Flag,
    Integer(i64),
    Quoted(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheControlValidation {
    Valid { directives: Vec<(String, DirectiveValue)> },
    Invalid { reason: String },
}

fn invalid(reason: impl Into<String>) -> CacheControlValidation {
    CacheControlValidation::Invalid { reason: reason.into() }
}

pub fn validate_cache_control(raw: &str) -> CacheControlValidation {
    if let Some(reason) = rejects_control_bytes(raw) {
        return invalid(reason);
    }

    let mut directives: Vec<(String, DirectiveValue)> = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            return invalid("empty directive");
        }

        let (name, value) = match part.split_once('=') {
            None => (part, DirectiveValue::Flag),
            Some((name, raw_value)) => {
                let raw_value = raw_value.trim();
                if let Some(inner) = raw_value.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
                    (name, DirectiveValue::Quoted(inner.to_string()))
                } else {
                    match raw_value.parse::<i64>() {
                        Ok(n) if is_safe_integer(n) => (name, DirectiveValue::Integer(n)),
                        _ => return invalid(format!("'{name}' has a non-integer value")),
                    }
                }
            }
        };

        let name = name.trim();
        if name.is_empty() || !name.bytes().all(is_tchar) {
            return invalid("directive name must be a valid token");
        }
        let lower = name.to_ascii_lowercase();
        if directives.iter().any(|(n, _)| *n == lower) {
            return invalid(format!("duplicate directive '{lower}'"));
        }
        directives.push((lower, value));
    }

    if directives.is_empty() {
        return invalid("at least one directive is required");
    }

    CacheControlValidation::Valid { directives }
}

/// `i64` range conservatively clamped to JavaScript's `Number.isSafeInteger`
/// bound.
fn is_safe_integer(n: i64) -> bool {
    const MAX_SAFE: i64 = 9_007_199_254_740_991;
    n.abs() <= MAX_SAFE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bare_token_directive() {
        assert_eq!(
            validate_cache_control("no-cache"),
            CacheControlValidation::Valid { directives: vec![("no-cache".to_string(), DirectiveValue::Flag)] }
        );
    }

    #[test]
    fn accepts_integer_valued_directive() {
        assert_eq!(
            validate_cache_control("max-age=3600"),
            CacheControlValidation::Valid {
                directives: vec![("max-age".to_string(), DirectiveValue::Integer(3600))]
            }
        );
    }

    #[test]
    fn accepts_quoted_string_directive() {
        assert_eq!(
            validate_cache_control(r#"community="UCI""#),
            CacheControlValidation::Valid {
                directives: vec![("community".to_string(), DirectiveValue::Quoted("UCI".to_string()))]
            }
        );
    }

    #[test]
    fn directive_names_are_case_folded() {
        match validate_cache_control("NO-CACHE") {
            CacheControlValidation::Valid { directives } => assert_eq!(directives[0].0, "no-cache"),
            other => panic!("expected valid, got {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_directives() {
        assert!(matches!(
            validate_cache_control("no-cache, no-cache"),
            CacheControlValidation::Invalid { .. }
        ));
    }

    #[test]
    fn rejects_non_integer_value() {
        assert!(matches!(validate_cache_control("max-age=soon"), CacheControlValidation::Invalid { .. }));
    }

    #[test]
    fn parses_multiple_directives_in_order() {
        match validate_cache_control("no-store, max-age=0") {
            CacheControlValidation::Valid { directives } => {
                assert_eq!(directives.len(), 2);
                assert_eq!(directives[0].0, "no-store");
                assert_eq!(directives[1], ("max-age".to_string(), DirectiveValue::Integer(0)));
            }
            other => panic!("expected valid, got {other:?}"),
        }
    }

    #[test]
    fn rejects_control_bytes() {
        assert!(matches!(validate_cache_control("no-cache\r\nX: 1"), CacheControlValidation::Invalid { .. }));
    }
}
