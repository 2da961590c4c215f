//! Hostname grammar check run before any DNS traffic.
//!
//! Accepts dot-separated labels of ASCII letters, digits and hyphens. A label
//! may start with a digit but never starts or ends with a hyphen. Ports,
//! trailing dots and empty labels are rejected.

const MAX_LABEL_LEN: usize = 63;
const MAX_HOSTNAME_LEN: usize = 253;

/// Returns true if `host` is a well-formed DNS hostname.
pub fn is_valid_hostname(host: &str) -> bool {
    if host.is_empty() || host.len() > MAX_HOSTNAME_LEN {
        return false;
    }
    host.split('.').all(is_valid_label)
}

fn is_valid_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(first), Some(last)) => {
            bytes.len() <= MAX_LABEL_LEN
                && first.is_ascii_alphanumeric()
                && last.is_ascii_alphanumeric()
                && bytes.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'-')
        }
        _ => false,
    }
}
