//! External client fallback for payloads that stay binary

use crate::{create_test_config, fast_retry};
use sitemap_scout::fetch::{ContentFetcher, FetchSource};
use sitemap_scout::sitemap::SitemapExpander;
use std::path::PathBuf;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path to an executable fixture standing in for the external client
fn fixture_client(name: &str) -> String {
    let script: PathBuf = [env!("CARGO_MANIFEST_DIR"), "tests", "fixtures", name]
        .iter()
        .collect();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to mark fixture executable");
    }

    script.display().to_string()
}

fn fetcher_with_client(name: &str) -> ContentFetcher {
    let mut config = create_test_config();
    config.fetcher.external_client = Some(fixture_client(name));
    ContentFetcher::new(&config.fetcher).expect("Failed to build fetcher")
}

/// Non-textual body that carries no gzip magic
fn binary_body() -> Vec<u8> {
    let mut body = vec![0x00, 0x01, 0x02, 0x03];
    body.extend((0u8..60).map(|i| i | 0x80));
    body
}

async fn serve_binary(mock_server: &MockServer, route: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(binary_body()))
        .mount(mock_server)
        .await;
}

#[cfg(unix)]
#[tokio::test]
async fn test_textual_client_output_is_preferred() {
    let mock_server = MockServer::start().await;
    serve_binary(&mock_server, "/sitemap.xml").await;

    let url = format!("{}/sitemap.xml", mock_server.uri());
    let result = fetcher_with_client("external_urlset.sh")
        .fetch(&url)
        .await
        .unwrap();

    assert_eq!(result.source, FetchSource::External);
    assert!(result.is_textual());
    assert!(result.text.starts_with("<urlset>"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_expander_uses_client_output() {
    let mock_server = MockServer::start().await;
    serve_binary(&mock_server, "/sitemap.xml").await;

    let expander = SitemapExpander::new(fetcher_with_client("external_urlset.sh"), fast_retry(), 8);
    let node = expander
        .expand(&format!("{}/sitemap.xml", mock_server.uri()))
        .await;

    assert!(!node.is_ambiguous());
    assert_eq!(node.flatten(), vec!["https://x.com/from-client"]);
}

#[cfg(unix)]
#[tokio::test]
async fn test_binary_client_output_keeps_primary_result() {
    let mock_server = MockServer::start().await;
    serve_binary(&mock_server, "/sitemap.xml").await;

    let url = format!("{}/sitemap.xml", mock_server.uri());
    let result = fetcher_with_client("external_binary.sh")
        .fetch(&url)
        .await
        .unwrap();

    assert_eq!(result.source, FetchSource::Primary);
    assert_eq!(result.raw_bytes, binary_body());
    assert!(!result.is_textual());
}

#[tokio::test]
async fn test_missing_client_keeps_primary_result() {
    let mock_server = MockServer::start().await;
    serve_binary(&mock_server, "/sitemap.xml").await;

    let mut config = create_test_config();
    config.fetcher.external_client = Some("sitemap-scout-missing-client".to_string());
    let fetcher = ContentFetcher::new(&config.fetcher).unwrap();

    let url = format!("{}/sitemap.xml", mock_server.uri());
    let result = fetcher.fetch(&url).await.unwrap();

    assert_eq!(result.source, FetchSource::Primary);
}
