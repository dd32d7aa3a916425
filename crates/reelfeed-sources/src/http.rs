use reqwest::Client;

/// Letterboxd rejects some non-browser agents, so every request carries a
/// desktop browser user agent.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub fn create_http_client() -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Endpoint label used in errors and logs: scheme, host and path only.
pub fn endpoint_label(url: &str) -> String {
    url.split('?').next().unwrap_or(url).to_string()
}

/// First 200 characters of an error body
pub fn body_excerpt(body: &str) -> String {
    const MAX_CHARS: usize = 200;
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_CHARS) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_label_drops_query() {
        assert_eq!(
            endpoint_label("https://api.themoviedb.org/3/search/movie?api_key=secret&query=x"),
            "https://api.themoviedb.org/3/search/movie"
        );
        assert_eq!(endpoint_label("https://letterboxd.com/a/rss/"), "https://letterboxd.com/a/rss/");
    }

    #[test]
    fn test_body_excerpt_truncates() {
        let long = "x".repeat(500);
        let excerpt = body_excerpt(&long);
        assert_eq!(excerpt.len(), 203);
        assert!(excerpt.ends_with("..."));
        assert_eq!(body_excerpt("  short  "), "short");
    }
}
