use regex::Regex;

/// Extract a query parameter from a URL string.
///
/// Scans with the pattern `[?&]<name>=([^&#]*)`, the same match the browser
/// version used against the popup's location: case-sensitive, stops at `&` or
/// `#`, and the captured value is returned raw, without URL-decoding.
///
/// Returns `None` when the parameter is absent. A present-but-empty parameter
/// yields `Some("")`; callers that need a usable value treat that as absent.
pub fn extract_param(name: &str, url: &str) -> Option<String> {
    let pattern = format!("[?&]{}=([^&#]*)", regex::escape(name));
    let regex = Regex::new(&pattern).ok()?;

    regex
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|value| value.as_str().to_string())
}
