//! HTTP loading of the page under test.
//! Gated behind the "fetch" feature flag.

use crate::page::Page;
use reqwest::blocking::Client;
use std::sync::Arc;
use url::Url;

/// Configuration for page fetching.
pub struct FetchConfig {
    /// User-Agent header.
    pub user_agent: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36"
                .to_string(),
            timeout_secs: 30,
        }
    }
}

/// Fetch a URL and parse the response into a Page.
pub fn fetch_page(url: &str, config: &FetchConfig) -> Result<Page, FetchError> {
    let mut session = Session::with_config(FetchConfig {
        user_agent: config.user_agent.clone(),
        timeout_secs: config.timeout_secs,
    })?;
    session.goto(url)
}

/// A browsing session with cookie persistence. One session loads one
/// page at a time; the probe itself never navigates.
pub struct Session {
    client: Client,
    current_url: Option<Url>,
}

impl Session {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(FetchConfig::default())
    }

    pub fn with_config(config: FetchConfig) -> Result<Self, FetchError> {
        let cookie_store = Arc::new(reqwest::cookie::Jar::default());
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .cookie_provider(cookie_store)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self {
            client,
            current_url: None,
        })
    }

    /// Navigate to a URL and return the parsed Page.
    pub fn goto(&mut self, url: &str) -> Result<Page, FetchError> {
        let parsed_url = Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        let response = self
            .client
            .get(parsed_url.as_str())
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpError(status.as_u16()));
        }

        let html = response
            .text()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        self.current_url = Some(parsed_url);
        Ok(Page::from_html(&html))
    }

    /// Load HTML content directly (without fetching).
    pub fn load_html(&mut self, html: &str) -> Page {
        Page::from_html(html)
    }

    pub fn url(&self) -> Option<&str> {
        self.current_url.as_ref().map(|u| u.as_str())
    }
}

#[derive(Debug)]
pub enum FetchError {
    InvalidUrl(String),
    Network(String),
    HttpError(u16),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::InvalidUrl(e) => write!(f, "Invalid URL: {}", e),
            FetchError::Network(e) => write!(f, "Network error: {}", e),
            FetchError::HttpError(code) => write!(f, "HTTP error: {}", code),
        }
    }
}

impl std::error::Error for FetchError {}
