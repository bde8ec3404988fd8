//! `Host` header validator.

use super::rejects_control_bytes;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostKind {
    Ipv4([u8; 4]),
    /// The bracketed IPv6 literal text, brackets excluded.
    Ipv6(String),
    RegName(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostValidation {
    Valid { host: HostKind, port: Option<u16> },
    Invalid { reason: String },
}

fn invalid(reason: impl Into<String>) -> HostValidation {
    HostValidation::Invalid { reason: reason.into() }
}

/// Validate a `Host` header value: `host[:port]`.
pub fn validate_host(raw: &str) -> HostValidation {
    if let Some(reason) = rejects_control_bytes(raw) {
        return invalid(reason);
    }

    let (host_part, port_part) = if let Some(rest) = raw.strip_prefix('[') {
        let Some(close) = rest.find(']') else {
            return invalid("unterminated IPv6 literal");
        };
        let literal = &rest[..close];
        let after = &rest[close + 1..];
        let port = if after.is_empty() {
            None
        } else if let Some(p) = after.strip_prefix(':') {
            Some(p)
        } else {
            return invalid("unexpected characters after IPv6 literal");
        };
        (format!("[{literal}]"), port)
    } else if let Some((h, p)) = raw.rsplit_once(':') {
        (h.to_string(), Some(p))
    } else {
        (raw.to_string(), None)
    };

    let host = match parse_host_part(&host_part) {
        Ok(h) => h,
        Err(reason) => return invalid(reason),
    };

    let port = match port_part {
        None => None,
        Some(p) => match parse_port(p) {
            Ok(port) => Some(port),
            Err(reason) => return invalid(reason),
        },
    };

    HostValidation::Valid { host, port }
}

fn parse_host_part(host_part: &str) -> Result<HostKind, String> {
    if let Some(inner) = host_part.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        if inner.len() > 45 {
            return Err("IPv6 literal too long".to_string());
        }
        if inner.is_empty() {
            return Err("empty IPv6 literal".to_string());
        }
        return Ok(HostKind::Ipv6(inner.to_string()));
    }

    if let Some(octets) = parse_ipv4(host_part) {
        return Ok(HostKind::Ipv4(octets));
    }

    validate_reg_name(host_part).map(|_| HostKind::RegName(host_part.to_string()))
}

fn parse_ipv4(s: &str) -> Option<[u8; 4]> {
    let parts: Vec<&str> = s.split('.').collect();
    if parts.len() != 4 {
        return None;
    }
    let mut out = [0u8; 4];
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if part.len() > 1 && part.starts_with('0') {
            return None;
        }
        out[i] = part.parse::<u16>().ok().filter(|v| *v <= 255)? as u8;
    }
    Some(out)
}

fn validate_reg_name(s: &str) -> Result<(), String> {
    if s.is_empty() {
        return Err("empty host".to_string());
    }
    if s.len() > 255 {
        return Err("reg-name exceeds 255 characters".to_string());
    }
    let labels: Vec<&str> = s.split('.').collect();
    let mut all_numeric = true;
    for label in &labels {
        if label.is_empty() || label.len() > 63 {
            return Err("reg-name label must be 1-63 characters".to_string());
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err("reg-name label cannot start or end with a hyphen".to_string());
        }
        if !label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-') {
            return Err("reg-name label contains an invalid character".to_string());
        }
        if !label.bytes().all(|b| b.is_ascii_digit()) {
            all_numeric = false;
        }
    }
    if all_numeric {
        return Err("reg-name cannot be purely numeric".to_string());
    }
    Ok(())
}

fn parse_port(s: &str) -> Result<u16, String> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err("port must be digits only".to_string());
    }
    if s.len() > 1 && s.starts_with('0') {
        return Err("port has a disallowed leading zero".to_string());
    }
    let value: u32 = s.parse().map_err(|_| "port is not a valid integer".to_string())?;
    if !(1..=65535).contains(&value) {
        return Err("port must be in [1, 65535]".to_string());
    }
    Ok(value as u16)
}
