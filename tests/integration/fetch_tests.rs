//! Fetcher behavior against a mock server

use crate::{create_test_fetcher, fast_retry};
use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;
use sitemap_scout::fetch::{FetchSource, RetryPolicy};
use sitemap_scout::ScoutError;
use std::io::Write;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

#[tokio::test]
async fn test_fetch_plain_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /\n"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/robots.txt", mock_server.uri());
    let result = create_test_fetcher().fetch(&url).await.unwrap();

    assert_eq!(result.status_code, 200);
    assert_eq!(result.final_url, url);
    assert_eq!(result.text, "User-agent: *\nAllow: /\n");
    assert_eq!(result.source, FetchSource::Primary);
    assert!(result.is_textual());
}

#[tokio::test]
async fn test_fetch_decodes_gzip_content_encoding() {
    let mock_server = MockServer::start().await;
    let body = "<urlset><url><loc>https://x.com/a</loc></url></urlset>";

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-encoding", "gzip")
                .set_body_bytes(gzip(body.as_bytes())),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/sitemap.xml", mock_server.uri());
    let result = create_test_fetcher().fetch(&url).await.unwrap();

    assert_eq!(result.text, body);
    assert_eq!(result.content_encoding.as_deref(), Some("gzip"));
}

#[tokio::test]
async fn test_fetch_detects_gzip_magic_without_header() {
    let mock_server = MockServer::start().await;
    let body = "<urlset><url><loc>https://x.com/gz</loc></url></urlset>";

    Mock::given(method("GET"))
        .and(path("/sitemap.xml.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(gzip(body.as_bytes())))
        .mount(&mock_server)
        .await;

    let url = format!("{}/sitemap.xml.gz", mock_server.uri());
    let result = create_test_fetcher().fetch(&url).await.unwrap();

    assert_eq!(result.text, body);
    assert_eq!(result.content_encoding, None);
}

#[tokio::test]
async fn test_fetch_decodes_deflate() {
    let mock_server = MockServer::start().await;
    let body = "<urlset><url><loc>https://x.com/z</loc></url></urlset>";

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(body.as_bytes()).unwrap();
    let compressed = encoder.finish().unwrap();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-encoding", "deflate")
                .set_body_bytes(compressed),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/sitemap.xml", mock_server.uri());
    let result = create_test_fetcher().fetch(&url).await.unwrap();

    assert_eq!(result.text, body);
}

#[tokio::test]
async fn test_fetch_keeps_raw_bytes_when_gzip_is_corrupt() {
    let mock_server = MockServer::start().await;
    let corrupt = b"\x1f\x8b\x08\x00not really gzip".to_vec();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-encoding", "gzip")
                .set_body_bytes(corrupt.clone()),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/sitemap.xml", mock_server.uri());
    let result = create_test_fetcher().fetch(&url).await.unwrap();

    assert_eq!(result.raw_bytes, corrupt);
}

#[tokio::test]
async fn test_fetch_follows_redirect_chain() {
    let mock_server = MockServer::start().await;

    for hop in 1..=5 {
        let next = if hop == 5 {
            "/final.xml".to_string()
        } else {
            format!("/r{}", hop + 1)
        };
        Mock::given(method("GET"))
            .and(path(format!("/r{}", hop)))
            .respond_with(ResponseTemplate::new(302).insert_header("location", next.as_str()))
            .mount(&mock_server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/final.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<urlset></urlset>"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/r1", mock_server.uri());
    let result = create_test_fetcher().fetch(&url).await.unwrap();

    assert_eq!(result.final_url, format!("{}/final.xml", mock_server.uri()));
    assert_eq!(result.text, "<urlset></urlset>");
}

#[tokio::test]
async fn test_fetch_redirect_loop_is_bounded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/loop"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/loop", mock_server.uri());
    let result = create_test_fetcher().fetch(&url).await;

    match result {
        Err(ScoutError::TooManyRedirects { hops, .. }) => assert_eq!(hops, 10),
        other => panic!("Expected TooManyRedirects, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_reports_http_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let url = format!("{}/missing.xml", mock_server.uri());
    let error = create_test_fetcher().fetch(&url).await.unwrap_err();

    assert_eq!(error.status_code(), Some(404));
    assert!(!error.is_network());
}

#[tokio::test]
async fn test_fetch_connection_refused_is_network_error() {
    // Nothing listens on port 9 in the test environment
    let error = create_test_fetcher()
        .fetch("http://127.0.0.1:9/robots.txt")
        .await
        .unwrap_err();

    assert!(error.is_network());
}

#[tokio::test]
async fn test_retry_recovers_from_transient_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky.xml"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<urlset></urlset>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/flaky.xml", mock_server.uri());
    let result = create_test_fetcher()
        .fetch_with_retry(&url, &fast_retry())
        .await
        .unwrap();

    assert_eq!(result.text, "<urlset></urlset>");
}

#[tokio::test]
async fn test_retry_gives_up_after_max_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down.xml"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let url = format!("{}/down.xml", mock_server.uri());
    let policy = RetryPolicy::new(2, std::time::Duration::from_millis(1));
    let error = create_test_fetcher()
        .fetch_with_retry(&url, &policy)
        .await
        .unwrap_err();

    assert_eq!(error.status_code(), Some(503));
}
