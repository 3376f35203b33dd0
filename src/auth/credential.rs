use axum::http::HeaderMap;

/// Value shipped in sample `.env` files; never a real key
pub const API_KEY_PLACEHOLDER: &str = "your_api_key_here";

/// Headers checked for a caller-supplied key, in priority order
const API_KEY_HEADERS: [&str; 2] = ["x-gemini-api-key", "x-api-key"];

/// Resolve the Gemini API key for a request.
///
/// Priority:
/// 1. `X-Gemini-Api-Key` header
/// 2. `X-API-Key` header
/// 3. `Authorization: Bearer <token>` header (scheme matched case-insensitively)
/// 4. `fallback`, the key configured for the server
///
/// Header values are trimmed and empty ones are skipped. The fallback is
/// ignored when empty or still set to [`API_KEY_PLACEHOLDER`].
pub fn resolve_api_key(headers: &HeaderMap, fallback: Option<&str>) -> Option<String> {
    extract_header_key(headers).or_else(|| fallback.and_then(usable_api_key).map(str::to_string))
}

/// A configured key, unless it is blank or the placeholder
pub fn usable_api_key(key: &str) -> Option<&str> {
    let key = key.trim();
    if key.is_empty() || key == API_KEY_PLACEHOLDER {
        None
    } else {
        Some(key)
    }
}

fn extract_header_key(headers: &HeaderMap) -> Option<String> {
    for name in API_KEY_HEADERS {
        if let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }

    let authorization = headers.get("authorization")?.to_str().ok()?.trim();
    let (scheme, token) = authorization.split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token.to_string())
    } else {
        None
    }
}
