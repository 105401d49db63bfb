use url::Url;

/// Prefix user input with `http://` unless it already names an http(s) scheme.
///
/// The prefix check is case-sensitive and the input is otherwise untouched, so
/// already-prefixed URLs come back unchanged.
pub fn validate_url(input: &str) -> String {
    if input.starts_with("http://") || input.starts_with("https://") {
        input.to_string()
    } else {
        format!("http://{}", input)
    }
}

/// Turn raw address-bar or dialog text into a URL, or `None` when blank.
pub fn normalize_input(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(validate_url(trimmed))
}

/// Short label for a tab that has no page title yet: the host when the URL
/// parses, otherwise the URL itself.
pub fn tab_label(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => host.trim_start_matches("www.").to_string(),
            None => url.to_string(),
        },
        Err(_) => url.to_string(),
    }
}
