//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run full
//! targets end-to-end through the HTTP engine into a temporary directory.

use docs_gleaner::config::{Config, CrawlTarget, CrawlerSettings};
use docs_gleaner::crawler::{crawl, AuthProfile, AuthProfiles};
use docs_gleaner::{CrawlMode, GleanerError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn body_text(len: usize) -> String {
    "lorem ipsum ".chars().cycle().take(len).collect::<String>().trim().to_string()
}

fn html_page(title: &str, main: &str) -> String {
    format!(
        "<html><head><title>{}</title></head><body><nav>Menu</nav><main>{}</main></body></html>",
        title, main
    )
}

fn html_response(html: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(html, "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, route: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_response(html))
        .mount(server)
        .await;
}

/// Creates a test configuration writing into `output_dir`
fn create_test_config(output_dir: &Path, targets: Vec<CrawlTarget>) -> Config {
    Config {
        crawler: CrawlerSettings {
            output_dir: output_dir.to_path_buf(),
            navigation_timeout_ms: 5_000,
            max_concurrent_pages: 2,
            follow_links: true,
        },
        targets,
        ..Config::default()
    }
}

fn artifacts(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<_> = std::fs::read_dir(dir)
        .expect("output dir exists")
        .map(|entry| entry.expect("dir entry").path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    files.sort();
    files
}

#[tokio::test]
async fn test_single_page_written_with_header() {
    let server = MockServer::start().await;
    let body = body_text(150);
    let html = format!(
        r#"<html><head><title>Page A</title>
           <meta name="author" content="Docs Team"></head>
           <body><main>{}</main></body></html>"#,
        body
    );
    mount_page(&server, "/a", html).await;

    let dir = TempDir::new().unwrap();
    let target = CrawlTarget {
        include: vec!["**/a".to_string()],
        ..CrawlTarget::new("Docs", vec![format!("{}/a", server.uri())], 1)
    };
    let config = create_test_config(dir.path(), vec![target]);

    let summary = crawl(&config, CrawlMode::Plain, Arc::new(AuthProfiles::new()), true)
        .await
        .expect("crawl succeeds");

    assert_eq!(summary.total_written(), 1);
    let files = artifacts(dir.path());
    assert_eq!(files.len(), 1);

    let name = files[0].file_name().unwrap().to_str().unwrap();
    let stamp = name
        .strip_prefix("Docs_a_")
        .and_then(|rest| rest.strip_suffix(".txt"))
        .expect("name follows the artifact scheme");
    assert!(stamp.chars().all(|c| c.is_ascii_digit()));

    let content = std::fs::read_to_string(&files[0]).unwrap();
    let expected_head = format!(
        "Title: Page A\nURL: {}/a\nSource: Docs\nCrawled: ",
        server.uri()
    );
    assert!(content.starts_with(&expected_head), "got: {}", content);
    assert!(content.contains("\nAuthor: Docs Team\n\n"));
    assert!(content.ends_with(&body));
}

#[tokio::test]
async fn test_password_page_produces_no_files() {
    let server = MockServer::start().await;
    let html = format!(
        r#"<html><body><main>{}</main><form><input type="password"></form></body></html>"#,
        body_text(400)
    );
    mount_page(&server, "/a", html).await;

    let dir = TempDir::new().unwrap();
    let target = CrawlTarget::new("Docs", vec![format!("{}/a", server.uri())], 1);
    let config = create_test_config(dir.path(), vec![target]);

    let summary = crawl(&config, CrawlMode::Plain, Arc::new(AuthProfiles::new()), true)
        .await
        .expect("crawl succeeds");

    assert_eq!(summary.total_written(), 0);
    assert_eq!(summary.targets[0].skipped["authentication_expired"], 1);
    assert!(artifacts(dir.path()).is_empty());
}

#[tokio::test]
async fn test_max_pages_limits_artifacts() {
    let server = MockServer::start().await;
    let mut start_urls = Vec::new();
    for i in 1..=5 {
        let route = format!("/docs/p{}", i);
        mount_page(&server, &route, html_page("Page", &body_text(200))).await;
        start_urls.push(format!("{}{}", server.uri(), route));
    }

    let dir = TempDir::new().unwrap();
    let target = CrawlTarget {
        max_requests: Some(5),
        ..CrawlTarget::new("Budget", start_urls, 2)
    };
    let config = create_test_config(dir.path(), vec![target]);

    let summary = crawl(&config, CrawlMode::Plain, Arc::new(AuthProfiles::new()), true)
        .await
        .expect("crawl succeeds");

    assert_eq!(summary.total_written(), 2);
    assert_eq!(artifacts(dir.path()).len(), 2);
}

#[tokio::test]
async fn test_authenticated_crawl_sends_credentials() {
    let server = MockServer::start().await;
    let html = format!(
        r#"<html><body><div id="main-content">Edit this page
           {}</div></body></html>"#,
        body_text(200)
    );
    Mock::given(method("GET"))
        .and(path("/wiki/page"))
        .and(header("authorization", "Bearer secret"))
        .and(header("cookie", "JSESSIONID=abc123; token=xyz=789"))
        .respond_with(html_response(html))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let target = CrawlTarget {
        requires_auth: true,
        ..CrawlTarget::new("Wiki", vec![format!("{}/wiki/page", server.uri())], 1)
    };
    let config = create_test_config(dir.path(), vec![target]);

    let mut profiles = AuthProfiles::new();
    profiles.push(
        "127.0.0.1",
        AuthProfile {
            cookies: Some("JSESSIONID=abc123; token=xyz=789".to_string()),
            headers: BTreeMap::from([("Authorization".to_string(), "Bearer secret".to_string())]),
        },
    );

    let summary = crawl(&config, CrawlMode::Authenticated, Arc::new(profiles), false)
        .await
        .expect("crawl succeeds");

    assert_eq!(summary.total_written(), 1);
    let content = std::fs::read_to_string(&artifacts(dir.path())[0]).unwrap();
    assert!(!content.contains("Edit this page"));
}

#[tokio::test]
async fn test_auth_mode_without_profiles_fails_before_crawling() {
    let server = MockServer::start().await;
    mount_page(&server, "/wiki/page", html_page("Wiki", &body_text(200))).await;

    let dir = TempDir::new().unwrap();
    let output_dir = dir.path().join("out");
    let target = CrawlTarget {
        requires_auth: true,
        ..CrawlTarget::new("Wiki", vec![format!("{}/wiki/page", server.uri())], 1)
    };
    let config = create_test_config(&output_dir, vec![target]);

    let result = crawl(&config, CrawlMode::Authenticated, Arc::new(AuthProfiles::new()), false).await;

    assert!(matches!(
        result,
        Err(GleanerError::StartupMisconfiguration(_))
    ));
    assert!(!output_dir.exists());
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_failed_pages_do_not_abort_target() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&server)
        .await;
    mount_page(&server, "/short", html_page("Short", "tiny")).await;
    mount_page(&server, "/ok", html_page("Ok", &body_text(150))).await;

    let dir = TempDir::new().unwrap();
    let base = server.uri();
    let target = CrawlTarget::new(
        "Mixed",
        vec![
            format!("{}/missing", base),
            format!("{}/data.json", base),
            format!("{}/short", base),
            format!("{}/ok", base),
        ],
        4,
    );
    let config = create_test_config(dir.path(), vec![target]);

    let summary = crawl(&config, CrawlMode::Plain, Arc::new(AuthProfiles::new()), true)
        .await
        .expect("crawl succeeds");

    let target = &summary.targets[0];
    assert_eq!(target.written, 1);
    assert_eq!(target.skipped["navigation_failure"], 2);
    assert_eq!(target.skipped["insufficient_content"], 1);
    assert_eq!(artifacts(dir.path()).len(), 1);
}

#[tokio::test]
async fn test_follows_links_within_patterns() {
    let server = MockServer::start().await;
    let base = server.uri();
    let index = format!(
        r#"<html><body><main>
           <a href="/docs/intro">Intro</a>
           <a href="{}/docs/guide#setup">Guide</a>
           <a href="/blog/launch">Blog</a>
           <a href="mailto:docs@example.com">Mail</a>
           </main></body></html>"#,
        base
    );
    mount_page(&server, "/docs/index", index).await;
    mount_page(&server, "/docs/intro", html_page("Intro", &body_text(150))).await;
    mount_page(&server, "/docs/guide", html_page("Guide", &body_text(150))).await;
    mount_page(&server, "/blog/launch", html_page("Blog", &body_text(150))).await;

    let dir = TempDir::new().unwrap();
    let target = CrawlTarget {
        include: vec!["**/docs/**".to_string()],
        max_requests: Some(10),
        ..CrawlTarget::new("Docs", vec![format!("{}/docs/index", base)], 10)
    };
    let config = create_test_config(dir.path(), vec![target]);

    let summary = crawl(&config, CrawlMode::Plain, Arc::new(AuthProfiles::new()), true)
        .await
        .expect("crawl succeeds");

    assert_eq!(summary.total_written(), 2);
    let names: Vec<_> = artifacts(dir.path())
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert!(names.iter().any(|n| n.starts_with("Docs_docs_intro_")));
    assert!(names.iter().any(|n| n.starts_with("Docs_docs_guide_")));

    let requested: Vec<_> = server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert!(!requested.contains(&"/blog/launch".to_string()));
}

#[tokio::test]
async fn test_plain_mode_skips_authenticated_targets() {
    let server = MockServer::start().await;
    mount_page(&server, "/public", html_page("Public", &body_text(150))).await;
    mount_page(&server, "/private", html_page("Private", &body_text(150))).await;

    let dir = TempDir::new().unwrap();
    let base = server.uri();
    let config = create_test_config(
        dir.path(),
        vec![
            CrawlTarget::new("Public", vec![format!("{}/public", base)], 1),
            CrawlTarget {
                requires_auth: true,
                ..CrawlTarget::new("Private", vec![format!("{}/private", base)], 1)
            },
        ],
    );

    let summary = crawl(&config, CrawlMode::Plain, Arc::new(AuthProfiles::new()), true)
        .await
        .expect("crawl succeeds");

    assert_eq!(summary.targets.len(), 1);
    let files = artifacts(dir.path());
    assert_eq!(files.len(), 1);
    assert!(files[0]
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("Public_public_"));
}
