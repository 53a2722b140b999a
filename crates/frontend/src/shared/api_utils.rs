//! API utilities for frontend-backend communication

/// Base URL of the backend: same host as the page, port 3000.
///
/// Empty when there is no window (native test runs).
pub fn api_base() -> String {
    let Some(window) = web_sys::window() else {
        return String::new();
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Full URL for an API path. Absolute URLs are returned unchanged.
pub fn api_url(path: &str) -> String {
    if is_absolute(path) {
        return path.to_string();
    }
    format!("{}{}", api_base(), path)
}

fn is_absolute(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_url_passes_through() {
        assert_eq!(
            api_url("https://files.example.com/a.xlsx"),
            "https://files.example.com/a.xlsx"
        );
        assert!(is_absolute("http://x"));
        assert!(!is_absolute("/api/partners/grid"));
    }
}
