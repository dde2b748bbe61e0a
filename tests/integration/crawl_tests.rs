//! Integration tests for the crawler
//!
//! These tests serve sitemaps with wiremock and drive the coordinator with a
//! scripted probe, so the full crawl cycle runs end-to-end without a browser.

mod common;

use common::{sitemap_index, urlset, ScriptedProbe};
use sitemap_sweep::browser::{ProbeOutcome, ViewportKind};
use sitemap_sweep::config::Config;
use sitemap_sweep::crawler::{run_crawl, Coordinator, RateLimiter};
use sitemap_sweep::output::{load_results, JsonFileSink, ResultSink};
use sitemap_sweep::sitemap::{build_http_client, SitemapResolver};
use sitemap_sweep::state::RunPhase;
use sitemap_sweep::SweepError;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_resolver() -> SitemapResolver {
    let client = build_http_client("TestBot/1.0", Duration::from_secs(5)).unwrap();
    SitemapResolver::new(client)
}

fn json_sinks(results: &Path) -> Vec<Box<dyn ResultSink>> {
    vec![Box::new(JsonFileSink::new(results))]
}

async fn serve(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Creates a test configuration pointing at the mock server
fn create_test_config(sitemap_url: String, results: &Path) -> Config {
    let mut config = Config::default();
    config.sitemap.url = sitemap_url;
    config.sitemap.request_timeout_secs = 5;
    config.pacing.settle_delay_ms = 0;
    config.pacing.between_urls_delay_ms = 0;
    config.output.results_path = results.display().to_string();
    config
}

#[tokio::test]
async fn test_two_pages_both_viewports_succeed() {
    let server = MockServer::start().await;
    let base = server.uri();
    let pages = vec![format!("{}/", base), format!("{}/about", base)];
    serve(&server, "/sitemap.xml", urlset(&pages)).await;

    let dir = TempDir::new().unwrap();
    let results = dir.path().join("crawl-results.json");
    let probe = ScriptedProbe::new();
    let mut coordinator = Coordinator::new(RateLimiter::disabled());

    let run = coordinator
        .run(
            &test_resolver(),
            &format!("{}/sitemap.xml", base),
            &probe,
            &mut json_sinks(&results),
        )
        .await
        .unwrap();

    assert_eq!(coordinator.phase(), RunPhase::Done);
    assert_eq!(run.len(), 2);
    assert_eq!(run.succeeded(), 2);

    let records = load_results(&results).unwrap();
    assert_eq!(records.len(), 2);
    for (record, url) in records.iter().zip(&pages) {
        assert_eq!(&record.url, url);
        assert!(record.success);
        assert_eq!(record.desktop_status, Some(200));
        assert_eq!(record.mobile_status, Some(200));
        assert!(record.error_message.is_none());
        assert!(record.duration_seconds >= 0.0);
    }

    assert_eq!(
        probe.calls(),
        vec![
            (pages[0].clone(), ViewportKind::Desktop),
            (pages[0].clone(), ViewportKind::Mobile),
            (pages[1].clone(), ViewportKind::Desktop),
            (pages[1].clone(), ViewportKind::Mobile),
        ]
    );
}

#[tokio::test]
async fn test_desktop_timeout_skips_mobile_and_continues() {
    let server = MockServer::start().await;
    let base = server.uri();
    let slow = format!("{}/slow", base);
    let fine = format!("{}/fine", base);
    serve(&server, "/sitemap.xml", urlset(&[slow.clone(), fine.clone()])).await;

    let dir = TempDir::new().unwrap();
    let results = dir.path().join("crawl-results.json");
    let probe = ScriptedProbe::new().with_outcome(
        &slow,
        ViewportKind::Desktop,
        ProbeOutcome::failure("Navigation timeout of 30000 ms exceeded"),
    );
    let mut coordinator = Coordinator::new(RateLimiter::disabled());

    coordinator
        .run(
            &test_resolver(),
            &format!("{}/sitemap.xml", base),
            &probe,
            &mut json_sinks(&results),
        )
        .await
        .unwrap();

    let records = load_results(&results).unwrap();
    assert_eq!(records.len(), 2);

    assert!(!records[0].success);
    assert_eq!(records[0].desktop_status, None);
    assert_eq!(records[0].mobile_status, None);
    assert_eq!(records[0].failed_viewport, Some(ViewportKind::Desktop));
    assert!(records[0]
        .error_message
        .as_deref()
        .unwrap()
        .contains("timeout"));

    assert!(records[1].success);

    let calls = probe.calls();
    assert!(!calls.contains(&(slow.clone(), ViewportKind::Mobile)));
    assert_eq!(calls.len(), 3);
}

#[tokio::test]
async fn test_mobile_failure_keeps_desktop_status() {
    let server = MockServer::start().await;
    let base = server.uri();
    let page = format!("{}/spa", base);
    serve(&server, "/sitemap.xml", urlset(&[page.clone()])).await;

    let dir = TempDir::new().unwrap();
    let results = dir.path().join("crawl-results.json");
    let probe = ScriptedProbe::new().with_outcome(
        &page,
        ViewportKind::Mobile,
        ProbeOutcome::failure("Target crashed"),
    );
    let mut coordinator = Coordinator::new(RateLimiter::disabled());

    coordinator
        .run(
            &test_resolver(),
            &format!("{}/sitemap.xml", base),
            &probe,
            &mut json_sinks(&results),
        )
        .await
        .unwrap();

    let records = load_results(&results).unwrap();
    assert!(!records[0].success);
    assert_eq!(records[0].desktop_status, Some(200));
    assert_eq!(records[0].mobile_status, None);
    assert_eq!(records[0].failed_viewport, Some(ViewportKind::Mobile));
    assert_eq!(records[0].error_message.as_deref(), Some("Target crashed"));
}

#[tokio::test]
async fn test_http_error_statuses_are_successful_probes() {
    let server = MockServer::start().await;
    let base = server.uri();
    let gone = format!("{}/gone", base);
    serve(&server, "/sitemap.xml", urlset(&[gone.clone()])).await;

    let dir = TempDir::new().unwrap();
    let results = dir.path().join("crawl-results.json");
    let probe = ScriptedProbe::new()
        .with_outcome(&gone, ViewportKind::Desktop, ProbeOutcome::Success { status: 404 })
        .with_outcome(&gone, ViewportKind::Mobile, ProbeOutcome::Success { status: 500 });
    let mut coordinator = Coordinator::new(RateLimiter::disabled());

    coordinator
        .run(
            &test_resolver(),
            &format!("{}/sitemap.xml", base),
            &probe,
            &mut json_sinks(&results),
        )
        .await
        .unwrap();

    let records = load_results(&results).unwrap();
    assert!(records[0].success);
    assert_eq!(records[0].desktop_status, Some(404));
    assert_eq!(records[0].mobile_status, Some(500));
}

#[tokio::test]
async fn test_index_crawls_only_first_sub_sitemap() {
    let server = MockServer::start().await;
    let base = server.uri();
    serve(
        &server,
        "/sitemap.xml",
        sitemap_index(&[
            format!("{}/posts.xml", base),
            format!("{}/pages.xml", base),
        ]),
    )
    .await;
    serve(
        &server,
        "/posts.xml",
        urlset(&[format!("{}/post-1", base), format!("{}/post-2", base)]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/pages.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(urlset(&[format!("{}/page", base)])))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let results = dir.path().join("crawl-results.json");
    let probe = ScriptedProbe::new();
    let mut coordinator = Coordinator::new(RateLimiter::disabled());

    coordinator
        .run(
            &test_resolver(),
            &format!("{}/sitemap.xml", base),
            &probe,
            &mut json_sinks(&results),
        )
        .await
        .unwrap();

    let urls: Vec<String> = load_results(&results)
        .unwrap()
        .into_iter()
        .map(|r| r.url)
        .collect();
    assert_eq!(urls, vec![format!("{}/post-1", base), format!("{}/post-2", base)]);
    server.verify().await;
}

#[tokio::test]
async fn test_sitemap_not_found_aborts_without_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let results = dir.path().join("crawl-results.json");
    let probe = ScriptedProbe::new();
    let mut coordinator = Coordinator::new(RateLimiter::disabled());

    let result = coordinator
        .run(
            &test_resolver(),
            &format!("{}/sitemap.xml", server.uri()),
            &probe,
            &mut json_sinks(&results),
        )
        .await;

    assert!(matches!(result, Err(SweepError::Sitemap(_))));
    assert_eq!(coordinator.phase(), RunPhase::Aborted);
    assert!(probe.calls().is_empty());
    assert!(!results.exists());
}

#[tokio::test]
async fn test_record_count_matches_resolved_urls() {
    let server = MockServer::start().await;
    let base = server.uri();
    let pages: Vec<String> = (0..7)
        .map(|i| format!("{}/p{}", base, i % 3))
        .collect();
    serve(&server, "/sitemap.xml", urlset(&pages)).await;

    let dir = TempDir::new().unwrap();
    let results = dir.path().join("crawl-results.json");
    let probe = ScriptedProbe::new()
        .with_outcome(&pages[1], ViewportKind::Desktop, ProbeOutcome::failure("net::ERR_NAME_NOT_RESOLVED"))
        .with_outcome(&pages[2], ViewportKind::Mobile, ProbeOutcome::failure("Target crashed"));
    let mut coordinator = Coordinator::new(RateLimiter::disabled());

    let run = coordinator
        .run(
            &test_resolver(),
            &format!("{}/sitemap.xml", base),
            &probe,
            &mut json_sinks(&results),
        )
        .await
        .unwrap();

    let records = load_results(&results).unwrap();
    assert_eq!(records.len(), pages.len());
    assert_eq!(run.len(), pages.len());
    let urls: Vec<&String> = records.iter().map(|r| &r.url).collect();
    assert_eq!(urls, pages.iter().collect::<Vec<_>>());
}

#[tokio::test]
async fn test_duration_includes_settle_delays() {
    let server = MockServer::start().await;
    let base = server.uri();
    let page = format!("{}/", base);
    serve(&server, "/sitemap.xml", urlset(&[page.clone()])).await;

    let dir = TempDir::new().unwrap();
    let results = dir.path().join("crawl-results.json");
    let pacing = RateLimiter::new(Duration::from_millis(60), Duration::ZERO);
    let probe = ScriptedProbe::new()
        .with_load_time(Duration::from_millis(20))
        .with_pacing(pacing);
    let mut coordinator = Coordinator::new(pacing);

    coordinator
        .run(
            &test_resolver(),
            &format!("{}/sitemap.xml", base),
            &probe,
            &mut json_sinks(&results),
        )
        .await
        .unwrap();

    let records = load_results(&results).unwrap();
    // Two loads plus two settle delays
    assert!(records[0].duration_seconds >= 0.16);
}

#[tokio::test]
async fn test_run_crawl_empty_sitemap_writes_empty_array() {
    let server = MockServer::start().await;
    serve(&server, "/sitemap.xml", urlset(&[])).await;

    let dir = TempDir::new().unwrap();
    let results = dir.path().join("crawl-results.json");
    let config = create_test_config(format!("{}/sitemap.xml", server.uri()), &results);

    // No URLs means no browser is launched
    let run = run_crawl(&config, None).await.unwrap();

    assert!(run.is_empty());
    let content = std::fs::read_to_string(&results).unwrap();
    assert_eq!(content.trim(), "[]");
}

#[tokio::test]
async fn test_run_crawl_sitemap_failure_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let results = dir.path().join("crawl-results.json");
    let mut config = create_test_config(format!("{}/sitemap.xml", server.uri()), &results);
    config.output.database_path = Some(dir.path().join("crawl.db").display().to_string());
    config.output.summary_path = Some(dir.path().join("crawl.md").display().to_string());

    let result = run_crawl(&config, None).await;

    assert!(matches!(result, Err(SweepError::Sitemap(_))));
    assert!(!results.exists());
    assert!(!dir.path().join("crawl.db").exists());
    assert!(!dir.path().join("crawl.md").exists());
}

#[tokio::test]
async fn test_run_crawl_empty_sitemap_writes_optional_outputs() {
    let server = MockServer::start().await;
    serve(&server, "/sitemap.xml", urlset(&[])).await;

    let dir = TempDir::new().unwrap();
    let results = dir.path().join("crawl-results.json");
    let mut config = create_test_config(format!("{}/sitemap.xml", server.uri()), &results);
    config.output.database_path = Some(dir.path().join("crawl.db").display().to_string());
    config.output.summary_path = Some(dir.path().join("crawl.md").display().to_string());

    run_crawl(&config, Some("cafebabe")).await.unwrap();

    assert!(results.exists());
    assert!(dir.path().join("crawl.db").exists());
    let summary = std::fs::read_to_string(dir.path().join("crawl.md")).unwrap();
    assert!(summary.contains("_The sitemap resolved to no URLs._"));
}
