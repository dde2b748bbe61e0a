//! Integration tests for sitemap resolution
//!
//! These tests use wiremock to serve sitemap documents and exercise the
//! resolver over real HTTP.

mod common;

use common::{sitemap_index, urlset};
use sitemap_sweep::sitemap::{build_http_client, SitemapDocument, SitemapResolver};
use sitemap_sweep::SitemapError;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_resolver() -> SitemapResolver {
    let client = build_http_client("TestBot/1.0", Duration::from_secs(5)).unwrap();
    SitemapResolver::new(client)
}

async fn serve(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "application/xml"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_urlset_resolves_in_document_order() {
    let server = MockServer::start().await;
    let base = server.uri();
    let pages = vec![
        format!("{}/zeta", base),
        format!("{}/alpha", base),
        format!("{}/zeta", base),
    ];
    serve(&server, "/sitemap.xml", urlset(&pages)).await;

    let urls = test_resolver()
        .resolve(&format!("{}/sitemap.xml", base))
        .await
        .unwrap();

    assert_eq!(urls, pages);
}

#[tokio::test]
async fn test_index_uses_only_first_sitemap() {
    let server = MockServer::start().await;
    let base = server.uri();

    serve(
        &server,
        "/sitemap.xml",
        sitemap_index(&[
            format!("{}/sitemap-1.xml", base),
            format!("{}/sitemap-2.xml", base),
        ]),
    )
    .await;
    serve(
        &server,
        "/sitemap-1.xml",
        urlset(&[format!("{}/a", base), format!("{}/b", base)]),
    )
    .await;

    // The second sub-sitemap must never be requested
    Mock::given(method("GET"))
        .and(path("/sitemap-2.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(urlset(&[format!("{}/c", base)])))
        .expect(0)
        .mount(&server)
        .await;

    let urls = test_resolver()
        .resolve(&format!("{}/sitemap.xml", base))
        .await
        .unwrap();

    assert_eq!(urls, vec![format!("{}/a", base), format!("{}/b", base)]);
    server.verify().await;
}

#[tokio::test]
async fn test_not_found_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = test_resolver()
        .resolve(&format!("{}/sitemap.xml", server.uri()))
        .await;

    assert!(matches!(
        result,
        Err(SitemapError::Status { status: 404, .. })
    ));
}

#[tokio::test]
async fn test_failing_sub_sitemap_is_fatal() {
    let server = MockServer::start().await;
    let base = server.uri();
    serve(
        &server,
        "/sitemap.xml",
        sitemap_index(&[format!("{}/missing.xml", base)]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = test_resolver()
        .resolve(&format!("{}/sitemap.xml", base))
        .await;

    assert!(matches!(
        result,
        Err(SitemapError::Status { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_malformed_xml_is_parse_error() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/sitemap.xml",
        "<urlset><url><loc>https://a.test/</loc></url>".to_string(),
    )
    .await;

    let result = test_resolver()
        .resolve(&format!("{}/sitemap.xml", server.uri()))
        .await;

    assert!(matches!(result, Err(SitemapError::Parse { .. })));
}

#[tokio::test]
async fn test_nested_index_resolves_to_empty() {
    let server = MockServer::start().await;
    let base = server.uri();
    serve(
        &server,
        "/sitemap.xml",
        sitemap_index(&[format!("{}/inner-index.xml", base)]),
    )
    .await;
    serve(
        &server,
        "/inner-index.xml",
        sitemap_index(&[format!("{}/sitemap-1.xml", base)]),
    )
    .await;

    let urls = test_resolver()
        .resolve(&format!("{}/sitemap.xml", base))
        .await
        .unwrap();

    assert!(urls.is_empty());
}

#[tokio::test]
async fn test_unrecognized_document_resolves_to_empty() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/feed.xml",
        r#"<?xml version="1.0"?><rss><channel><item><link>https://a.test/</link></item></channel></rss>"#
            .to_string(),
    )
    .await;

    let urls = test_resolver()
        .resolve(&format!("{}/feed.xml", server.uri()))
        .await
        .unwrap();

    assert!(urls.is_empty());
}

#[tokio::test]
async fn test_empty_index_resolves_to_empty() {
    let server = MockServer::start().await;
    serve(&server, "/sitemap.xml", sitemap_index(&[])).await;

    let urls = test_resolver()
        .resolve(&format!("{}/sitemap.xml", server.uri()))
        .await
        .unwrap();

    assert!(urls.is_empty());
}

#[tokio::test]
async fn test_user_agent_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .and(header("user-agent", "TestBot/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(urlset(&[])))
        .expect(1)
        .mount(&server)
        .await;

    let document = test_resolver()
        .fetch_document(&format!("{}/sitemap.xml", server.uri()))
        .await
        .unwrap();

    assert_eq!(document, SitemapDocument::UrlSet(vec![]));
    server.verify().await;
}

#[tokio::test]
async fn test_index_first_entry_without_loc_never_reaches_second() {
    let server = MockServer::start().await;
    let base = server.uri();
    serve(
        &server,
        "/sitemap.xml",
        format!(
            "<sitemapindex>\
             <sitemap><loc>  </loc></sitemap>\
             <sitemap><loc>{}/second.xml</loc></sitemap>\
             </sitemapindex>",
            base
        ),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/second.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(urlset(&[format!("{}/from-second", base)])))
        .expect(0)
        .mount(&server)
        .await;

    let result = test_resolver()
        .resolve(&format!("{}/sitemap.xml", base))
        .await;

    assert!(matches!(result, Err(SitemapError::Parse { .. })));
    server.verify().await;
}

#[tokio::test]
async fn test_index_first_entry_missing_loc_is_parse_error() {
    let server = MockServer::start().await;
    let base = server.uri();
    serve(
        &server,
        "/sitemap.xml",
        format!(
            "<sitemapindex>\
             <sitemap><lastmod>2024-01-01</lastmod></sitemap>\
             <sitemap><loc>{}/second.xml</loc></sitemap>\
             </sitemapindex>",
            base
        ),
    )
    .await;

    let result = test_resolver()
        .resolve(&format!("{}/sitemap.xml", base))
        .await;

    assert!(matches!(result, Err(SitemapError::Parse { .. })));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}
