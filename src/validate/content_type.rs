//! `Content-Type` header validator.

use super::rejects_control_bytes;
use crate::method::is_tchar;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTypeValue {
    pub type_: String,
    pub subtype: String,
    /// Parameters in original order; duplicate names are rejected before
    /// this is built.
    pub parameters: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentTypeValidation {
    Valid(ContentTypeValue),
    Invalid { reason: String },
}

fn invalid(reason: impl Into<String>) -> ContentTypeValidation {
    ContentTypeValidation::Invalid { reason: reason.into() }
}

const MAX_TOKEN_LEN: usize = 127;
const MAX_PARAMETERS: usize = 10;
const MAX_VALUE_BYTES: usize = 1024;

pub fn validate_content_type(raw: &str) -> ContentTypeValidation {
    if let Some(reason) = rejects_control_bytes(raw) {
        return invalid(reason);
    }
    if raw.len() > MAX_VALUE_BYTES {
        return invalid(format!("value exceeds {MAX_VALUE_BYTES} bytes"));
    }

    let mut parts = raw.split(';');
    let Some(media) = parts.next() else { return invalid("missing media type") };
    let media = media.trim();
    let Some((type_, subtype)) = media.split_once('/') else {
        return invalid("media type must be type/subtype");
    };
    if !is_valid_token(type_) || !is_valid_token(subtype) {
        return invalid("type and subtype must be valid tokens");
    }

    let mut parameters = Vec::new();
    for raw_param in parts {
        let raw_param = raw_param.trim();
        if raw_param.is_empty() {
            continue;
        }
        let Some((name, value)) = raw_param.split_once('=') else {
            return invalid("malformed parameter: missing '='");
        };
        let name = name.trim();
        if !is_valid_token(name) {
            return invalid("parameter name must be a valid token");
        }
        if parameters.iter().any(|(n, _): &(String, String)| n.eq_ignore_ascii_case(name)) {
            return invalid(format!("duplicate parameter '{name}'"));
        }
        let value = match parse_param_value(value.trim()) {
            Ok(v) => v,
            Err(reason) => return invalid(reason),
        };
        parameters.push((name.to_ascii_lowercase(), value));
        if parameters.len() > MAX_PARAMETERS {
            return invalid(format!("more than {MAX_PARAMETERS} parameters"));
        }
    }

    ContentTypeValidation::Valid(ContentTypeValue {
        type_: type_.to_ascii_lowercase(),
        subtype: subtype.to_ascii_lowercase(),
        parameters,
    })
}

fn parse_param_value(value: &str) -> Result<String, String> {
    if let Some(inner) = value.strip_prefix('"') {
        let Some(inner) = inner.strip_suffix('"') else {
            return Err("unterminated quoted string".to_string());
        };
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                match chars.next() {
                    Some(escaped) => out.push(escaped),
                    None => return Err("dangling escape in quoted string".to_string()),
                }
            } else {
                out.push(c);
            }
        }
        Ok(out)
    } else if is_valid_token(value) {
        Ok(value.to_string())
    } else {
        Err("parameter value must be a token or quoted string".to_string())
    }
}

fn is_valid_token(s: &str) -> bool {
    !s.is_empty() && s.len() <= MAX_TOKEN_LEN && s.bytes().all(is_tchar)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_simple_media_type() {
        let v = validate_content_type("text/plain");
        assert_eq!(
            v,
            ContentTypeValidation::Valid(ContentTypeValue {
                type_: "text".to_string(),
                subtype: "plain".to_string(),
                parameters: vec![],
            })
        );
    }

    #[test]
    fn accepts_parameter_with_quoted_value() {
        let v = validate_content_type(r#"text/plain; charset="utf-8""#);
        match v {
            ContentTypeValidation::Valid(value) => {
                assert_eq!(value.parameters, vec![("charset".to_string(), "utf-8".to_string())]);
            }
            other => panic!("expected valid, got {other:?}"),
        }
    }

    #[test]
    fn handles_escaped_quote_in_quoted_string() {
        let v = validate_content_type(r#"text/plain; note="a\"b""#);
        match v {
            ContentTypeValidation::Valid(value) => {
                assert_eq!(value.parameters[0].1, "a\"b");
            }
            other => panic!("expected valid, got {other:?}"),
        }
    }

    #[test]
    fn rejects_missing_subtype() {
        assert!(matches!(validate_content_type("text"), ContentTypeValidation::Invalid { .. }));
    }

    #[test]
    fn rejects_duplicate_parameter_names() {
        let v = validate_content_type("text/plain; a=1; a=2");
        assert!(matches!(v, ContentTypeValidation::Invalid { .. }));
    }

    #[test]
    fn rejects_too_many_parameters() {
        let params: String = (0..11).map(|i| format!("; p{i}=v")).collect();
        let v = validate_content_type(&format!("text/plain{params}"));
        assert!(matches!(v, ContentTypeValidation::Invalid { .. }));
    }

    #[test]
    fn rejects_control_bytes() {
        assert!(matches!(
            validate_content_type("text/plain\r\nX-Evil: 1"),
            ContentTypeValidation::Invalid { .. }
        ));
    }
}
