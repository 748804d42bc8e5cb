//! Feed endpoint tests: RSS shape, caching headers, escaping, and the
//! degrade-to-empty behavior on upstream failure.

use std::collections::HashMap;
use std::net::SocketAddr;

use voidwire::ServeConfig;
use voidwire::server::{AppState, router};

fn spawn_mock_upstream(responses: HashMap<String, String>) -> String {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            let path = request.url().split('?').next().unwrap_or("").to_string();
            let response = match responses.get(&path) {
                Some(body) => tiny_http::Response::from_string(body.clone()).with_header(
                    tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                        .unwrap(),
                ),
                None => tiny_http::Response::from_string("{}").with_status_code(500),
            };
            let _ = request.respond(response);
        }
    });
    format!("http://{addr}")
}

async fn spawn_app(upstream_url: String) -> SocketAddr {
    let config = ServeConfig {
        upstream_url,
        ..ServeConfig::default()
    };
    let state = AppState::from_config(config).unwrap();
    let app = router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn feed_with_items_and_headers() {
    let mut responses = HashMap::new();
    responses.insert(
        "/v1/archive".to_string(),
        serde_json::json!([
            { "date_context": "2026-02-19", "title": "Mars & Venus <tight>", "body": "it's exact" },
            { "date_context": "2026-02-18", "title": "Quiet skies" }
        ])
        .to_string(),
    );
    let upstream = spawn_mock_upstream(responses);
    let addr = spawn_app(upstream).await;

    let resp = reqwest::get(format!("http://{addr}/feed.xml")).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/rss+xml"
    );
    let cache = resp.headers().get("cache-control").unwrap().to_str().unwrap();
    assert!(cache.contains("max-age=3600"));

    let body = resp.text().await.unwrap();
    assert_eq!(body.matches("<item>").count(), 2);
    assert!(body.contains("Mars &amp; Venus &lt;tight&gt;"));
    assert!(body.contains("it&apos;s exact"));
    assert!(body.contains("2026-02-19"));
}

#[tokio::test]
async fn upstream_failure_yields_valid_empty_feed() {
    // Mock answers everything with a 500; the fetch degrades to no entries.
    let upstream = spawn_mock_upstream(HashMap::new());
    let addr = spawn_app(upstream).await;

    let resp = reqwest::get(format!("http://{addr}/feed.xml")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body = resp.text().await.unwrap();
    assert!(body.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(body.contains("<channel>"));
    assert!(body.ends_with("</channel></rss>"));
    assert_eq!(body.matches("<item>").count(), 0);
}

#[tokio::test]
async fn escaped_titles_round_trip_through_xml_unescape() {
    let original = r#"a & b < c > d "e" 'f'"#;
    let mut responses = HashMap::new();
    responses.insert(
        "/v1/archive".to_string(),
        serde_json::json!([{ "date_context": "2026-02-19", "title": original }]).to_string(),
    );
    let upstream = spawn_mock_upstream(responses);
    let addr = spawn_app(upstream).await;

    let body = reqwest::get(format!("http://{addr}/feed.xml"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    // pull the item title back out of the document and unescape it
    let item_start = body.find("<item>").unwrap();
    let title_start = body[item_start..].find("<title>").unwrap() + item_start + "<title>".len();
    let title_end = body[title_start..].find("</title>").unwrap() + title_start;
    let escaped = &body[title_start..title_end];
    assert!(!escaped.contains('<'));
    assert!(!escaped.contains('>'));

    let unescaped = escaped
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&");
    assert_eq!(unescaped, original);
}
