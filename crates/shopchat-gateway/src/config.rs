use std::env;

/// Environment variable overriding the backend address
pub const API_BASE_ENV: &str = "SHOPCHAT_API_BASE";

/// Hosted backend used when nothing else is configured
pub const DEFAULT_API_BASE: &str = "https://macro-crane-474800-p9.uw.r.appspot.com";

/// Strip surrounding whitespace and trailing slashes so paths can be appended
pub fn normalize_api_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Pick the backend address: explicit value, then `SHOPCHAT_API_BASE`, then
/// the hosted default. Blank values are ignored.
pub fn resolve_api_base(explicit: Option<&str>) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| env::var(API_BASE_ENV).ok())
        .filter(|url| !url.trim().is_empty())
        .map(|url| normalize_api_base(&url))
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
}
