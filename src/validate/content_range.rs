//! `Content-Range` response header validator.

use super::rejects_control_bytes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentRangeValue {
    Range { start: u64, end: u64, size: u64 },
    UnsatisfiedSize { size: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentRangeValidation {
    Valid(ContentRangeValue),
    Invalid { reason: String },
}

fn invalid(reason: impl Into<String>) -> ContentRangeValidation {
    ContentRangeValidation::Invalid { reason: reason.into() }
}

/// `bytes <start>-<end>/<size>` or `bytes */<size>`.
pub fn validate_content_range(raw: &str) -> ContentRangeValidation {
    if let Some(reason) = rejects_control_bytes(raw) {
        return invalid(reason);
    }

    let Some(rest) = raw.strip_prefix("bytes ") else {
        return invalid("must start with 'bytes '");
    };

    let Some((range_spec, size_spec)) = rest.split_once('/') else {
        return invalid("missing '/size'");
    };

    if range_spec == "*" {
        return match size_spec.parse::<u64>() {
            Ok(size) => ContentRangeValidation::Valid(ContentRangeValue::UnsatisfiedSize { size }),
            Err(_) => invalid("size must be a non-negative integer"),
        };
    }

    let Some((start_str, end_str)) = range_spec.split_once('-') else {
        return invalid("range must be 'start-end' or '*'");
    };
    let (Ok(start), Ok(end), Ok(size)) =
        (start_str.parse::<u64>(), end_str.parse::<u64>(), size_spec.parse::<u64>())
    else {
        return invalid("start, end, and size must be non-negative integers");
    };

    if !(start <= end && end < size) {
        return invalid("must satisfy 0 <= start <= end < size");
    }

    ContentRangeValidation::Valid(ContentRangeValue::Range { start, end, size })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_satisfied_range() {
        assert_eq!(
            validate_content_range("bytes 0-499/1234"),
            ContentRangeValidation::Valid(ContentRangeValue::Range { start: 0, end: 499, size: 1234 })
        );
    }

    #[test]
    fn accepts_unsatisfied_range() {
        assert_eq!(
            validate_content_range("bytes */1234"),
            ContentRangeValidation::Valid(ContentRangeValue::UnsatisfiedSize { size: 1234 })
        );
    }

    #[test]
    fn rejects_missing_unit() {
        assert!(matches!(validate_content_range("0-499/1234"), ContentRangeValidation::Invalid { .. }));
    }

    #[test]
    fn rejects_end_at_or_past_size() {
        assert!(matches!(validate_content_range("bytes 0-1234/1234"), ContentRangeValidation::Invalid { .. }));
    }

    #[test]
    fn rejects_start_greater_than_end() {
        assert!(matches!(validate_content_range("bytes 500-100/1234"), ContentRangeValidation::Invalid { .. }));
    }

    #[test]
    fn rejects_control_bytes() {
        assert!(matches!(validate_content_range("bytes 0-1/2\r\nX: 1"), ContentRangeValidation::Invalid { .. }));
    }
}
