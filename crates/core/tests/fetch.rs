//! Tests for the fetch session that do not require a live network.

#![cfg(feature = "fetch")]

use formprobe_core::fetch::{FetchError, Session};

#[test]
fn test_session_load_html() {
    let mut session = Session::new().unwrap();

    let page = session.load_html(
        r#"
        <html><body>
            <h1>Hello World</h1>
            <button id="go">Click Me</button>
        </body></html>
        "#,
    );

    assert!(page.element_by_id("go").is_some());
    assert!(session.url().is_none());
}

#[test]
fn test_goto_invalid_url() {
    let mut session = Session::new().unwrap();
    let err = session.goto("not a url").unwrap_err();
    assert!(matches!(err, FetchError::InvalidUrl(_)));
}

#[test]
fn test_error_display() {
    assert_eq!(FetchError::HttpError(503).to_string(), "HTTP error: 503");
    assert_eq!(
        FetchError::InvalidUrl("bad".to_string()).to_string(),
        "Invalid URL: bad"
    );
    assert_eq!(
        FetchError::Network("timed out".to_string()).to_string(),
        "Network error: timed out"
    );
}
