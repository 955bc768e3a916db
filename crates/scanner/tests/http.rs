use netweather_scanner::{
    Fingerprinter, HttpClient, HttpFetch, ReachabilityChecker, ScanError, ScriptExtractor,
};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> Arc<dyn HttpFetch> {
    Arc::new(HttpClient::new("netweather-test", Duration::from_secs(5), 10).unwrap())
}

#[tokio::test]
async fn test_schemeless_host_reachable_over_http_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let host = server.uri().trim_start_matches("http://").to_string();
    let checker = ReachabilityChecker::with_timeout(client(), Duration::from_secs(3));
    let record = checker.check(&host).await.unwrap();

    assert!(record.http_available);
    assert_eq!(record.http_status, Some(200));
    assert!(!record.https_available);
    assert_eq!(record.final_url, Some(format!("http://{}", host)));
}

#[tokio::test]
async fn test_redirect_target_is_recorded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/new", server.uri())),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let checker = ReachabilityChecker::with_timeout(client(), Duration::from_secs(3));
    let record = checker.check(&format!("{}/old", server.uri())).await.unwrap();

    let target = format!("{}/new", server.uri());
    assert_eq!(record.http_status, Some(200));
    assert_eq!(record.http_redirect_url.as_deref(), Some(target.as_str()));
    assert_eq!(record.final_url.as_deref(), Some(target.as_str()));
}

#[tokio::test]
async fn test_extractor_reads_html_pages_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/index.html"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><script src="/js/jquery.js"></script><script src="https://cdn.test/x.js"></script></html>"#,
            "text/html",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"html": "<script src='/a.js'></script>"}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let extractor = ScriptExtractor::new(client());

    let scripts = extractor.extract(&format!("{}/index.html", server.uri())).await;
    assert_eq!(
        scripts,
        vec![format!("{}/js/jquery.js", server.uri()), "https://cdn.test/x.js".to_string()]
    );

    assert!(extractor.extract(&format!("{}/api", server.uri())).await.is_empty());
    assert!(extractor.extract(&format!("{}/missing", server.uri())).await.is_empty());
}

#[tokio::test]
async fn test_fingerprint_hashes_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/abc.js"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("abc", "application/javascript"))
        .mount(&server)
        .await;

    let fingerprinter = Fingerprinter::new(client());
    let url = format!("{}/abc.js", server.uri());
    let fingerprint = fingerprinter.fingerprint(&url).await.unwrap();

    assert_eq!(fingerprint.url, url);
    assert_eq!(
        fingerprint.checksum,
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert_eq!(fingerprint.content, "abc");
}

#[tokio::test]
async fn test_fingerprint_rejects_error_status() {
    let server = MockServer::start().await;

    let fingerprinter = Fingerprinter::new(client());
    let err = fingerprinter
        .fingerprint(&format!("{}/gone.js", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, ScanError::HttpStatus { status: 404, .. }));
}
