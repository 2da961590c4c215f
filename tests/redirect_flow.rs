//! End-to-end redirect behavior over real sockets.

mod common;

use common::{client, TestServer};
use reqwest::header::{CONTENT_TYPE, HOST, LOCATION, SERVER};
use reqwest::StatusCode;
use txt_redirector::dns::StaticTxtSource;

fn zone() -> StaticTxtSource {
    StaticTxtSource::new()
        .with_records(
            "_tgt._redir.a.example",
            [
                r"2 ^/a$ https://example.org/a",
                r"1 ^https?://[^/]+/a/(.*)$ ${SCHEME}://b.example/%[1]s",
                "https://fallback.example${PATH}",
            ],
        )
        .with_records("_tgt._redir.www.c.example", ["1 ^/only$ https://only.example"])
        .with_records("_tgt._redir.junk.example", ["5", "7 ^/x$"])
        .with_failure("_tgt._redir.broken.example", "SERVFAIL")
}

#[tokio::test]
async fn test_rule_redirects() {
    let server = TestServer::start(zone()).await;
    let client = client();

    let response = client
        .get(server.url("/a/docs/page?x=1"))
        .header(HOST, "a.example")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[LOCATION], "http://b.example/docs/page?x=1");
    assert_eq!(response.headers()[SERVER], "TxtRedirector/1.0");
    assert_eq!(
        response.headers()[CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
    assert!(response.headers().contains_key("x-request-id"));

    let response = client
        .get(server.url("/a"))
        .header(HOST, "a.example")
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers()[LOCATION], "https://example.org/a");

    let response = client
        .get(server.url("/elsewhere"))
        .header(HOST, "a.example")
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers()[LOCATION], "https://fallback.example/elsewhere");
}

#[tokio::test]
async fn test_www_fallback() {
    let server = TestServer::start(zone()).await;
    let client = client();

    let response = client
        .get(server.url("/p?q=1"))
        .header(HOST, "unpublished.example")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[LOCATION], "http://www.unpublished.example/p?q=1");

    let response = client
        .get(server.url("/p"))
        .header(HOST, "www.unpublished.example")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(LOCATION).is_none());

    let response = client
        .get(server.url("/other"))
        .header(HOST, "www.c.example")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(LOCATION).is_none());
}

#[tokio::test]
async fn test_informational_pages() {
    let server = TestServer::start(zone()).await;
    let client = client();

    for host in ["junk.example", "broken.example", "bad_host.example"] {
        let response = client
            .get(server.url("/"))
            .header(HOST, host)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{host}");
        assert!(response.headers().get(LOCATION).is_none(), "{host}");
        assert_eq!(response.headers()[SERVER], "TxtRedirector/1.0", "{host}");
        assert!(!response.text().await.unwrap().is_empty(), "{host}");
    }
}

#[tokio::test]
async fn test_favicon_is_ignored() {
    let server = TestServer::start(zone()).await;

    let response = client()
        .get(server.url("/favicon.ico"))
        .header(HOST, "a.example")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(LOCATION).is_none());
    assert!(response.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_any_method_redirects() {
    let server = TestServer::start(zone()).await;

    let response = client()
        .post(server.url("/a/x"))
        .header(HOST, "a.example")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[LOCATION], "http://b.example/x");
}

#[tokio::test]
async fn test_concurrent_requests() {
    let server = TestServer::start(zone()).await;
    let client = client();

    let mut handles = Vec::new();
    for i in 0..32 {
        let client = client.clone();
        let url = server.url(&format!("/a/{i}"));
        handles.push(tokio::spawn(async move {
            let response = client
                .get(url)
                .header(HOST, "a.example")
                .send()
                .await
                .unwrap();
            (i, response.headers()[LOCATION].to_str().unwrap().to_string())
        }));
    }

    for handle in handles {
        let (i, location) = handle.await.unwrap();
        assert_eq!(location, format!("http://b.example/{i}"));
    }
}
