use reqwest::Url;

/// Interpret an env-style boolean ("1"/"true"/"yes"/"on" and their
/// negations, any case).
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Whether the endpoint URL points at this machine. Local endpoints skip
/// API-key validation and get a smaller default token budget.
pub fn is_local_endpoint_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };

    let host = host.trim().to_ascii_lowercase();
    host == "localhost"
        || host == "::1"
        || host == "[::1]"
        || host == "0.0.0.0"
        || host.starts_with("127.")
}
