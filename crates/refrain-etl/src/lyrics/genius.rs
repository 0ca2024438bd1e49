//! Genius lyrics source.
//!
//! Resolves a song page through the public multi-search endpoint, then
//! scrapes the lyrics from that page. Searches use `per_page=1` and only
//! the first hit of the first section is considered; there is no fuzzy
//! matching of titles or artists.

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::Config;
use crate::error::{EnrichError, EnrichResult};
use crate::lyrics::extract::extract_lyrics;
use crate::lyrics::fetcher::LyricsSource;
use crate::lyrics::resilience::RateLimiter;

const SOURCE_NAME: &str = "Genius";

// ---------------------------------------------------------------------------
// Search response types (private -- only the first hit's path matters)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    response: SearchResponse,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    sections: Vec<SearchSection>,
}

#[derive(Debug, Deserialize)]
struct SearchSection {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    result: HitResult,
}

#[derive(Debug, Deserialize)]
struct HitResult {
    path: String,
}

/// Pull `response.sections[0].hits[0].result.path` out of a search body.
pub fn parse_search_path(body: &str) -> EnrichResult<String> {
    let envelope: SearchEnvelope = serde_json::from_str(body).map_err(|e| EnrichError::Parse {
        source_name: SOURCE_NAME.to_string(),
        message: e.to_string(),
    })?;

    envelope
        .response
        .sections
        .into_iter()
        .next()
        .and_then(|section| section.hits.into_iter().next())
        .map(|hit| hit.result.path)
        .ok_or_else(|| EnrichError::NotFound {
            entity: "search hit".to_string(),
            source_name: SOURCE_NAME.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Blocking Genius client.
///
/// When a token is configured it is sent as `Authorization: Bearer` on
/// search requests; otherwise searches go out unauthenticated. Requests use
/// the transport's default timeout unless `request_timeout_secs` is set.
#[derive(Debug, Clone)]
pub struct GeniusClient {
    http: Client,
    base_url: String,
    token: Option<String>,
    rate_limiter: Option<RateLimiter>,
}

impl GeniusClient {
    /// Create a client against `base_url` (e.g. `https://genius.com`).
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> EnrichResult<Self> {
        Self::build(base_url.into(), token, Client::builder())
    }

    /// Create a client from configuration (base URL, token, timeout and
    /// request pacing).
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(config: &Config) -> EnrichResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        let mut client = Self::build(
            config.genius_base_url.clone(),
            config.genius_api_token.clone(),
            builder,
        )?;
        client.rate_limiter = config.requests_per_second.map(RateLimiter::new);
        Ok(client)
    }

    fn build(
        base_url: String,
        token: Option<String>,
        builder: reqwest::blocking::ClientBuilder,
    ) -> EnrichResult<Self> {
        let http = builder
            .user_agent(concat!("refrain/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            rate_limiter: None,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn pace(&self) {
        if let Some(limiter) = &self.rate_limiter {
            limiter.acquire();
        }
    }

    fn http_error(e: &reqwest::Error) -> EnrichError {
        EnrichError::Http {
            source_name: SOURCE_NAME.to_string(),
            message: e.to_string(),
        }
    }

    /// Search for `"{title} {artist}"` and return the first hit's page path.
    pub fn search_path(&self, title: &str, artist: &str) -> EnrichResult<String> {
        self.pace();

        let query = format!("{title} {artist}");
        let mut request = self
            .http
            .get(format!("{}/api/search/multi", self.base_url))
            .query(&[("per_page", "1"), ("q", query.as_str())]);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let body = request
            .send()?
            .error_for_status()
            .map_err(|e| Self::http_error(&e))?
            .text()?;

        parse_search_path(&body)
    }

    /// Fetch the HTML of a song page given its path (e.g. `/Adele-hello-lyrics`).
    pub fn fetch_page(&self, path: &str) -> EnrichResult<String> {
        self.pace();

        let html = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()?
            .error_for_status()
            .map_err(|e| Self::http_error(&e))?
            .text()?;

        Ok(html)
    }
}

impl LyricsSource for GeniusClient {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn lookup(&self, title: &str, artist: &str) -> EnrichResult<Option<String>> {
        let path = self.search_path(title, artist)?;
        log::debug!("Genius page for {} - {}: {}", artist, title, path);
        let html = self.fetch_page(&path)?;
        Ok(extract_lyrics(&html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::fetcher::LyricsFetcher;
    use refrain_core::model::LyricsResult;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::{Arc, Mutex};
    use std::thread;

    /// Path prefix, status and body served by [`LocalServer`].
    type Route = (&'static str, u16, String);

    /// One-response-per-connection HTTP server on 127.0.0.1 that records
    /// every request head it receives.
    struct LocalServer {
        base_url: String,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl LocalServer {
        fn start(routes: Vec<Route>) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let base_url = format!("http://{}", listener.local_addr().unwrap());
            let requests = Arc::new(Mutex::new(Vec::new()));
            let seen = Arc::clone(&requests);

            thread::spawn(move || {
                for stream in listener.incoming() {
                    let Ok(mut stream) = stream else { break };
                    let head = read_head(&mut stream);
                    let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
                    seen.lock().unwrap().push(head);

                    let (status, body) = routes
                        .iter()
                        .find(|(prefix, _, _)| path.starts_with(prefix))
                        .map(|(_, status, body)| (*status, body.clone()))
                        .unwrap_or((404, String::new()));
                    let response = format!(
                        "HTTP/1.1 {status} Status\r\nContent-Type: text/html\r\n\
                         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    stream.write_all(response.as_bytes()).ok();
                }
            });

            Self { base_url, requests }
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    fn read_head(stream: &mut TcpStream) -> String {
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|window| window == b"\r\n\r\n") {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => head.extend_from_slice(&buf[..n]),
            }
        }
        String::from_utf8_lossy(&head).into_owned()
    }

    const TWO_CONTAINER_PAGE: &str = r#"<html><body>
        <div class="Lyrics__Container-sc-1ynbvzw-1 kUgSbL">Line1</div>
        <div class="SongHeader">Rock and Roll</div>
        <div class="Lyrics__Container-sc-1ynbvzw-1 kUgSbL">Line2</div>
    </body></html>"#;

    fn song_routes() -> Vec<Route> {
        vec![
            (
                "/api/search/multi",
                200,
                r#"{"response": {"sections": [{"hits": [{"result": {"path": "/A-b-lyrics"}}]}]}}"#
                    .to_string(),
            ),
            ("/A-b-lyrics", 200, TWO_CONTAINER_PAGE.to_string()),
        ]
    }

    const SEARCH_BODY: &str = r#"{
        "meta": {"status": 200},
        "response": {
            "sections": [
                {
                    "type": "top_hit",
                    "hits": [
                        {"type": "song", "result": {"path": "/Adele-hello-lyrics", "title": "Hello"}}
                    ]
                }
            ]
        }
    }"#;

    #[test]
    fn test_client_creation() {
        let client = GeniusClient::new("https://genius.com/", None).unwrap();
        assert!(!client.is_authenticated());
        assert_eq!(client.base_url, "https://genius.com");
        let debug = format!("{:?}", client);
        assert!(debug.contains("GeniusClient"));
    }

    #[test]
    fn test_client_from_config_with_pacing() {
        let config = Config {
            genius_api_token: Some("secret".to_string()),
            requests_per_second: Some(2),
            request_timeout_secs: Some(5),
            ..Config::default()
        };
        let client = GeniusClient::from_config(&config).unwrap();
        assert!(client.is_authenticated());
        assert!(client.rate_limiter.is_some());
    }

    #[test]
    fn test_parse_search_path() {
        assert_eq!(parse_search_path(SEARCH_BODY).unwrap(), "/Adele-hello-lyrics");
    }

    #[test]
    fn test_parse_search_missing_sections() {
        let err = parse_search_path(r#"{"response": {}}"#).unwrap_err();
        assert!(matches!(err, EnrichError::Parse { .. }));
    }

    #[test]
    fn test_parse_search_no_sections() {
        let err = parse_search_path(r#"{"response": {"sections": []}}"#).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_parse_search_empty_hits() {
        let err = parse_search_path(r#"{"response": {"sections": [{"hits": []}]}}"#).unwrap_err();
        assert!(err.is_not_found());
        let err =
            parse_search_path(r#"{"response": {"sections": [{"type": "song"}]}}"#).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_parse_search_not_json() {
        let err = parse_search_path("<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, EnrichError::Parse { .. }));
    }

    #[test]
    fn test_fetch_searches_then_scrapes_page() {
        let server = LocalServer::start(song_routes());
        let client = GeniusClient::new(server.base_url.clone(), Some("tok".to_string())).unwrap();
        let fetcher = LyricsFetcher::new(client);

        assert_eq!(
            fetcher.fetch("Rock & Roll", "Led Zeppelin"),
            LyricsResult::Found("Line1\nLine2".to_string())
        );

        let requests = server.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0]
            .starts_with("GET /api/search/multi?per_page=1&q=Rock+%26+Roll+Led+Zeppelin "));
        assert!(requests[0]
            .to_ascii_lowercase()
            .contains("authorization: bearer tok"));
        assert!(requests[1].starts_with("GET /A-b-lyrics "));
    }

    #[test]
    fn test_search_without_token_sends_no_authorization() {
        let server = LocalServer::start(song_routes());
        let fetcher = LyricsFetcher::new(GeniusClient::new(server.base_url.clone(), None).unwrap());

        assert!(fetcher.fetch("Rock & Roll", "Led Zeppelin").is_found());
        assert!(!server.requests()[0]
            .to_ascii_lowercase()
            .contains("authorization:"));
    }

    #[test]
    fn test_missing_sections_is_not_found() {
        let server = LocalServer::start(vec![(
            "/api/search/multi",
            200,
            r#"{"response": {}}"#.to_string(),
        )]);
        let fetcher = LyricsFetcher::new(GeniusClient::new(server.base_url.clone(), None).unwrap());

        assert_eq!(fetcher.fetch("Song", "Artist"), LyricsResult::NotFound);
        assert_eq!(server.requests().len(), 1);
    }

    #[test]
    fn test_server_error_is_not_found() {
        let server = LocalServer::start(vec![(
            "/api/search/multi",
            500,
            "upstream exploded".to_string(),
        )]);
        let client = GeniusClient::new(server.base_url.clone(), None).unwrap();

        let err = client.search_path("Song", "Artist").unwrap_err();
        assert!(err.is_transient());
        assert_eq!(
            LyricsFetcher::new(client).fetch("Song", "Artist"),
            LyricsResult::NotFound
        );
    }

    #[test]
    fn test_refused_connection_is_not_found() {
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client = GeniusClient::new(format!("http://127.0.0.1:{port}"), None).unwrap();

        assert_eq!(
            LyricsFetcher::new(client).fetch("Song", "Artist"),
            LyricsResult::NotFound
        );
    }
}
