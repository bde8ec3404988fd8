//! `Range` request header validator.

use super::rejects_control_bytes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeValidation {
    /// Resolved to a concrete, satisfiable `[first, last]` pair.
    Satisfiable { first: u64, last: u64 },
    /// Well-formed syntax but unsatisfiable against `content_length`
    /// (maps to HTTP 416).
    Unsatisfiable,
    /// Malformed syntax (maps to HTTP 400).
    Invalid { reason: &'static str },
}

/// `bytes=<range-spec>` where `<range-spec>` is `start-end`, `start-`, or
/// `-suffix`, resolved against a known `content_length`.
pub fn validate_range(raw: &str, content_length: u64) -> RangeValidation {
    if rejects_control_bytes(raw).is_some() {
        return RangeValidation::Invalid { reason: "contains a control byte" };
    }

    let trimmed = raw.trim();
    let Some(rest) = case_insensitive_strip_prefix(trimmed, "bytes=") else {
        return RangeValidation::Invalid { reason: "must start with 'bytes='" };
    };
    let rest = rest.trim();

    let Some((start_str, end_str)) = rest.split_once('-') else {
        return RangeValidation::Invalid { reason: "range-spec must contain '-'" };
    };

    if start_str.is_empty() {
        // -suffix
        if end_str.is_empty() {
            return RangeValidation::Invalid { reason: "empty range-spec" };
        }
        let Ok(suffix) = end_str.parse::<u64>() else {
            return RangeValidation::Invalid { reason: "suffix must be a non-negative integer" };
        };
        if suffix == 0 || suffix > content_length {
            return RangeValidation::Unsatisfiable;
        }
        return RangeValidation::Satisfiable { first: content_length - suffix, last: content_length - 1 };
    }

    let Ok(start) = start_str.parse::<u64>() else {
        return RangeValidation::Invalid { reason: "start must be a non-negative integer" };
    };
    if start >= content_length {
        return RangeValidation::Unsatisfiable;
    }

    if end_str.is_empty() {
        // start-
        return RangeValidation::Satisfiable { first: start, last: content_length - 1 };
    }

    let Ok(end) = end_str.parse::<u64>() else {
        return RangeValidation::Invalid { reason: "end must be a non-negative integer" };
    };
    if end < start {
        return RangeValidation::Invalid { reason: "end must be >= start" };
    }
    let last = end.min(content_length - 1);
    RangeValidation::Satisfiable { first: start, last }
}

fn case_insensitive_strip_prefix<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if s.len() < prefix.len() {
        return None;
    }
    let (head, tail) = s.split_at(prefix.len());
    head.eq_ignore_ascii_case(prefix).then_some(tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_explicit_range() {
        assert_eq!(validate_range("bytes=0-499", 1000), RangeValidation::Satisfiable { first: 0, last: 499 });
    }

    #[test]
    fn resolves_open_ended_range() {
        assert_eq!(validate_range("bytes=500-", 1000), RangeValidation::Satisfiable { first: 500, last: 999 });
    }

    #[test]
    fn resolves_suffix_range() {
        assert_eq!(validate_range("bytes=-200", 1000), RangeValidation::Satisfiable { first: 800, last: 999 });
    }

    #[test]
    fn clamps_end_past_content_length() {
        assert_eq!(validate_range("bytes=0-99999", 1000), RangeValidation::Satisfiable { first: 0, last: 999 });
    }

    #[test]
    fn is_case_insensitive_on_bytes_keyword_and_tolerates_whitespace() {
        assert_eq!(
            validate_range("  BYTES=0-499 ", 1000),
            RangeValidation::Satisfiable { first: 0, last: 499 }
        );
    }

    #[test]
    fn start_at_or_past_size_is_unsatisfiable() {
        assert_eq!(validate_range("bytes=1000-", 1000), RangeValidation::Unsatisfiable);
    }

    #[test]
    fn zero_suffix_is_unsatisfiable() {
        assert_eq!(validate_range("bytes=-0", 1000), RangeValidation::Unsatisfiable);
    }

    #[test]
    fn suffix_larger_than_size_is_unsatisfiable() {
        assert_eq!(validate_range("bytes=-5000", 1000), RangeValidation::Unsatisfiable);
    }

    #[test]
    fn malformed_syntax_is_invalid() {
        assert!(matches!(validate_range("bytes=abc-def", 1000), RangeValidation::Invalid { .. }));
        assert!(matches!(validate_range("not-a-range", 1000), RangeValidation::Invalid { .. }));
    }

    #[test]
    fn end_before_start_is_invalid() {
        assert!(matches!(validate_range("bytes=500-100", 1000), RangeValidation::Invalid { .. }));
    }
}
