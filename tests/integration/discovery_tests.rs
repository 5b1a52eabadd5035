//! End-to-end discovery against a mock site

use crate::{create_test_config, create_test_fetcher, fast_retry, sitemap_index, urlset};
use sitemap_scout::output::{write_url_list, DiscoveryStatistics};
use sitemap_scout::sitemap::{Ambiguity, SitemapExpander, SitemapNode};
use sitemap_scout::{Discoverer, SiteOrigin};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_body(mock_server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_index_with_failing_child_keeps_siblings() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_body(
        &mock_server,
        "/sitemap.xml",
        sitemap_index(&[
            format!("{}/p1.xml", base),
            format!("{}/p2.xml", base),
            format!("{}/p3.xml", base),
        ]),
    )
    .await;
    mount_body(
        &mock_server,
        "/p1.xml",
        urlset(&[format!("{}/a", base), format!("{}/b", base)]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/p2.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_body(&mock_server, "/p3.xml", urlset(&[format!("{}/c", base)])).await;

    let expander = SitemapExpander::new(create_test_fetcher(), fast_retry(), 8);
    let node = expander.expand(&format!("{}/sitemap.xml", base)).await;

    assert!(node.is_index());
    let children = node.children();
    assert_eq!(children.len(), 3);
    assert_eq!(children[0].page_urls().len(), 2);
    assert!(children[1].is_ambiguous());
    assert!(matches!(
        children[1].ambiguity(),
        Some(Ambiguity::FetchFailed(_))
    ));
    assert_eq!(
        node.flatten(),
        vec![
            format!("{}/a", base),
            format!("{}/b", base),
            format!("{}/c", base)
        ]
    );
}

#[tokio::test]
async fn test_corrupt_gzip_sitemap_is_ambiguous() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-encoding", "gzip")
                .set_body_bytes(b"\x1f\x8b\x08\x00\xff\xfe\x00\x01\x02broken".to_vec()),
        )
        .mount(&mock_server)
        .await;

    let expander = SitemapExpander::new(create_test_fetcher(), fast_retry(), 8);
    let node = expander
        .expand(&format!("{}/sitemap.xml", mock_server.uri()))
        .await;

    assert!(node.is_ambiguous());
    assert!(node.flatten().is_empty());
}

#[tokio::test]
async fn test_double_gzipped_sitemap_is_expanded() {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    let body = urlset(&[format!("{}/a", base), format!("{}/b", base)]);

    Mock::given(method("GET"))
        .and(path("/sitemap.xml.gz"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-encoding", "gzip")
                .set_body_bytes(gzip(&gzip(body.as_bytes()))),
        )
        .mount(&mock_server)
        .await;

    let expander = SitemapExpander::new(create_test_fetcher(), fast_retry(), 8);
    let node = expander.expand(&format!("{}/sitemap.xml.gz", base)).await;

    assert!(!node.is_ambiguous());
    assert_eq!(node.flatten(), vec![format!("{}/a", base), format!("{}/b", base)]);
}

#[tokio::test]
async fn test_index_entry_without_loc_becomes_ambiguous_child() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_body(
        &mock_server,
        "/sitemap.xml",
        format!(
            "<sitemapindex><sitemap><loc>{base}/p1.xml</loc></sitemap><sitemap><lastmod>2024-01-01</lastmod></sitemap></sitemapindex>"
        ),
    )
    .await;
    mount_body(&mock_server, "/p1.xml", urlset(&[format!("{}/a", base)])).await;

    let expander = SitemapExpander::new(create_test_fetcher(), fast_retry(), 8);
    let node = expander.expand(&format!("{}/sitemap.xml", base)).await;

    let children = node.children();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].page_urls(), &[format!("{}/a", base)]);
    assert_eq!(
        children[1].ambiguity(),
        Some(&Ambiguity::MissingLoc { entry: 2 })
    );
    assert_eq!(children[1].url(), format!("{}/sitemap.xml", base));
}

#[tokio::test]
async fn test_unrecognized_root_is_ambiguous() {
    let mock_server = MockServer::start().await;

    mount_body(
        &mock_server,
        "/sitemap.xml",
        "<html><body>Not a sitemap</body></html>".to_string(),
    )
    .await;

    let expander = SitemapExpander::new(create_test_fetcher(), fast_retry(), 8);
    let node = expander
        .expand(&format!("{}/sitemap.xml", mock_server.uri()))
        .await;

    assert_eq!(
        node.ambiguity(),
        Some(&Ambiguity::Unrecognized {
            root: Some("html".to_string())
        })
    );
}

#[tokio::test]
async fn test_self_referencing_index_stops_at_depth_bound() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_body(
        &mock_server,
        "/sitemap.xml",
        sitemap_index(&[format!("{}/sitemap.xml", base)]),
    )
    .await;

    let expander = SitemapExpander::new(create_test_fetcher(), fast_retry(), 2);
    let node = expander.expand(&format!("{}/sitemap.xml", base)).await;

    let mut current = &node;
    for _ in 0..2 {
        assert!(current.is_index());
        current = &current.children()[0];
    }
    assert_eq!(
        current.ambiguity(),
        Some(&Ambiguity::DepthExceeded { depth: 2 })
    );
}

#[tokio::test]
async fn test_full_discovery() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_body(
        &mock_server,
        "/robots.txt",
        format!(
            "User-agent: *\nDisallow: /private\n\nSitemap: {base}/sitemap_index.xml\nSitemap: {base}/news.xml\n"
        ),
    )
    .await;
    mount_body(
        &mock_server,
        "/sitemap_index.xml",
        sitemap_index(&[format!("{}/pages.xml", base)]),
    )
    .await;
    mount_body(
        &mock_server,
        "/pages.xml",
        urlset(&[
            format!("{}/", base),
            format!("{}/private/report", base),
            format!("{}/about", base),
        ]),
    )
    .await;
    mount_body(
        &mock_server,
        "/news.xml",
        urlset(&[format!("{}/about", base), "https://elsewhere.org/x".to_string()]),
    )
    .await;

    let origin = SiteOrigin::parse(&base).unwrap();
    let discoverer = Discoverer::new(create_test_config()).unwrap();
    let result = discoverer.run(&origin).await;

    assert_eq!(result.references.len(), 2);
    assert_eq!(result.roots.len(), 2);
    assert!(matches!(result.roots[0], SitemapNode::Index { .. }));
    assert_eq!(
        result.urls,
        vec![
            format!("{}/", base),
            format!("{}/private/report", base),
            format!("{}/about", base),
            format!("{}/about", base),
            "https://elsewhere.org/x".to_string(),
        ]
    );
    assert_eq!(result.blocked_urls, vec![format!("{}/private/report", base)]);
    assert!(result.ambiguous().is_empty());

    let stats = DiscoveryStatistics::from_result(&result);
    assert_eq!(stats.total_sitemaps, 3);
    assert_eq!(stats.unique_urls, 4);
    assert_eq!(stats.offsite_urls, 1);

    let dir = tempfile::TempDir::new().unwrap();
    let list_path = dir.path().join("urls.txt");
    write_url_list(&result.urls, &list_path).unwrap();
    let written = std::fs::read_to_string(&list_path).unwrap();
    assert_eq!(written.lines().count(), 5);
}

#[tokio::test]
async fn test_short_bom_robots_keeps_rule_audit() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    let mut robots = b"\xef\xbb\xbf".to_vec();
    robots.extend_from_slice(b"Disallow: /x\n");
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(robots))
        .mount(&mock_server)
        .await;

    let origin = SiteOrigin::parse(&base).unwrap();
    let outcome = Discoverer::new(create_test_config())
        .unwrap()
        .locate(&origin)
        .await;

    assert!(outcome.robots.is_some());
    assert_eq!(outcome.urls(), vec![format!("{}/sitemap.xml", base)]);
}

#[tokio::test]
async fn test_discovery_without_any_sitemap() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let origin = SiteOrigin::parse(&mock_server.uri()).unwrap();
    let result = Discoverer::new(create_test_config())
        .unwrap()
        .run(&origin)
        .await;

    assert_eq!(result.roots.len(), 2);
    assert_eq!(result.ambiguous().len(), 2);
    assert!(result.is_empty());
    assert!(result.blocked_urls.is_empty());
}
