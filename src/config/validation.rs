/// Port used when none is configured
pub const DEFAULT_PORT: u16 = 8080;

/// Parse a listening port
///
/// Only ASCII digits are accepted (no sign, no whitespace inside) and the
/// value must be a non-zero `u16`.
pub fn parse_port(raw: &str) -> Result<u16, Box<dyn std::error::Error>> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("invalid port: {raw:?} must contain digits only").into());
    }

    let port = raw
        .parse::<u16>()
        .map_err(|e| format!("invalid port: {raw}: {e}"))?;
    validate_port(port)
}

/// Reject port 0, which would bind an ephemeral port
pub fn validate_port(port: u16) -> Result<u16, Box<dyn std::error::Error>> {
    if port == 0 {
        return Err("invalid port: 0".into());
    }
    Ok(port)
}
