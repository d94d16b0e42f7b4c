//! Rate-limited fetcher behavior against a mock server

mod common;

use cnvd_harvester::{CrawlError, Fetcher, SessionCredentials};
use common::{VALID_COOKIES, test_config};
use mockito::{Matcher, Server};

fn fetcher_for(server_url: &str, rotate_user_agent: bool) -> Fetcher {
    let config = test_config(server_url);
    let credentials = SessionCredentials::new(VALID_COOKIES);
    Fetcher::new(&config, &credentials, rotate_user_agent).expect("fetcher builds")
}

#[tokio::test]
async fn request_outside_allowlist_is_rejected_before_send() {
    let server = Server::new_async().await;
    let fetcher = fetcher_for(&server.url(), false);

    let err = fetcher
        .get("https://evil.example.com/flaw/show/CNVD-2024-1")
        .await
        .unwrap_err();

    assert!(matches!(err, CrawlError::DomainNotAllowed(_)));
}

#[tokio::test]
async fn get_injects_cookie_and_browser_headers() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/flaw/show/CNVD-2024-1")
        .match_header("cookie", VALID_COOKIES)
        .match_header("connection", "keep-alive")
        .match_header("user-agent", Matcher::Regex("Mozilla/5.0".to_string()))
        .with_status(200)
        .with_body("<html>ok</html>")
        .create_async()
        .await;

    let fetcher = fetcher_for(&server.url(), false);
    let body = fetcher
        .get(&format!("{}/flaw/show/CNVD-2024-1", server.url()))
        .await
        .expect("get succeeds");

    assert_eq!(body, "<html>ok</html>");
    mock.assert_async().await;
}

#[tokio::test]
async fn detail_fetcher_sends_a_pool_user_agent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/flaw/show/CNVD-2024-2")
        .match_header("user-agent", Matcher::Regex("Chrome/13".to_string()))
        .with_status(200)
        .with_body("ok")
        .create_async()
        .await;

    let fetcher = fetcher_for(&server.url(), true);
    fetcher
        .get(&format!("{}/flaw/show/CNVD-2024-2", server.url()))
        .await
        .expect("get succeeds");

    mock.assert_async().await;
}

#[tokio::test]
async fn post_sends_form_encoded_paging_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/flaw/list.htm")
        .match_query(Matcher::UrlEncoded("flag".into(), "true".into()))
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("max".into(), "100".into()),
            Matcher::UrlEncoded("offset".into(), "0".into()),
        ]))
        .with_status(200)
        .with_body("page")
        .create_async()
        .await;

    let fetcher = fetcher_for(&server.url(), false);
    let body = fetcher
        .post_form(
            &format!("{}/flaw/list.htm?flag=true", server.url()),
            &[("max", "100".to_string()), ("offset", "0".to_string())],
        )
        .await
        .expect("post succeeds");

    assert_eq!(body, "page");
    mock.assert_async().await;
}

#[tokio::test]
async fn non_success_status_is_a_fetch_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/flaw/show/CNVD-2024-3")
        .with_status(503)
        .create_async()
        .await;

    let fetcher = fetcher_for(&server.url(), false);
    let err = fetcher
        .get(&format!("{}/flaw/show/CNVD-2024-3", server.url()))
        .await
        .unwrap_err();

    assert!(matches!(err, CrawlError::Http(_)));
}
