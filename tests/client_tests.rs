//! Integration tests for the feed and download client HTTP exchanges.
//!
//! Each test serves canned HTTP responses from a local listener, one
//! connection per response, and inspects the requests the client sent.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tvsort::models::config::{ClientConfig, ClientKind};
use tvsort::services::client::{JobSink, QueueSource};
use tvsort::services::feed::fetch_feed;
use tvsort::services::sabnzbd::SabnzbdClient;
use tvsort::services::transmission::TransmissionClient;

// ========== TEST FIXTURES ==========

fn response(status: &str, headers: &[(&str, &str)], body: &str) -> String {
    let mut out = format!("HTTP/1.1 {}\r\n", status);
    for (name, value) in headers {
        out.push_str(&format!("{}: {}\r\n", name, value));
    }
    out.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    ));
    out
}

fn header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

/// Read one request, headers and body, lower-cased for easy matching.
async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = header_end(&buf) {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_lowercase()
}

/// Serve `responses` in order and return the base URL plus the captured requests.
async fn serve(responses: Vec<String>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for response in responses {
            let (mut stream, _) = listener.accept().await.unwrap();
            requests.push(read_request(&mut stream).await);
            stream.write_all(response.as_bytes()).await.unwrap();
            let _ = stream.shutdown().await;
        }
        requests
    });

    (url, handle)
}

fn client_config(kind: ClientKind, url: &str) -> ClientConfig {
    ClientConfig {
        kind,
        url: url.to_string(),
        api_key: Some("secret".to_string()),
        timeout: 5,
        ..Default::default()
    }
}

const RELEASE: &str = "Greys.Anatomy.S19E15.1080p.WEB.h264-CAKES";

// ========== TRANSMISSION TESTS ==========

#[tokio::test]
async fn test_transmission_renews_session_and_retries() {
    let (url, server) = serve(vec![
        response(
            "409 Conflict",
            &[("X-Transmission-Session-Id", "abc123")],
            "",
        ),
        response(
            "200 OK",
            &[("Content-Type", "application/json")],
            r#"{"result": "success", "arguments": {"torrent-added": {"name": "x"}}}"#,
        ),
    ])
    .await;
    let client = TransmissionClient::from_config(&client_config(ClientKind::Transmission, &url)).unwrap();

    client
        .submit(RELEASE, "magnet:?xt=urn:btih:abc", "tv")
        .await
        .unwrap();

    let requests = server.await.unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].starts_with("post /transmission/rpc"));
    assert!(!requests[0].contains("x-transmission-session-id"));
    assert!(requests[1].contains("x-transmission-session-id: abc123"));
    assert!(requests[1].contains(r#""method":"torrent-add""#));
    assert!(requests[1].contains(r#""labels":["tv"]"#));
}

#[tokio::test]
async fn test_transmission_retries_only_once() {
    let conflict = response(
        "409 Conflict",
        &[("X-Transmission-Session-Id", "abc123")],
        "",
    );
    let (url, server) = serve(vec![conflict.clone(), conflict]).await;
    let client = TransmissionClient::from_config(&client_config(ClientKind::Transmission, &url)).unwrap();

    let result = client.submit(RELEASE, "magnet:?xt=urn:btih:abc", "tv").await;

    assert!(matches!(result, Err(tvsort::Error::Http(_))));
    assert_eq!(server.await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_transmission_rejection_is_a_submission_error() {
    let (url, server) = serve(vec![response(
        "200 OK",
        &[("Content-Type", "application/json")],
        r#"{"result": "invalid or corrupt torrent file"}"#,
    )])
    .await;
    let client = TransmissionClient::from_config(&client_config(ClientKind::Transmission, &url)).unwrap();

    let result = client.submit(RELEASE, "https://example.org/1.torrent", "").await;

    match result {
        Err(tvsort::Error::Submission { name, reason }) => {
            assert_eq!(name, RELEASE);
            assert!(reason.contains("invalid or corrupt torrent file"));
        }
        other => panic!("unexpected result {:?}", other),
    }
    let requests = server.await.unwrap();
    assert!(!requests[0].contains("labels"));
}

#[tokio::test]
async fn test_transmission_lists_torrent_names() {
    let (url, server) = serve(vec![response(
        "200 OK",
        &[("Content-Type", "application/json")],
        r#"{"result": "success", "arguments": {"torrents": [{"name": "Yellowjackets.S02E03.1080p.WEB.H264-CAKES"}]}}"#,
    )])
    .await;
    let client = TransmissionClient::from_config(&client_config(ClientKind::Transmission, &url)).unwrap();

    let active = client.list_active().await.unwrap();

    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "Yellowjackets.S02E03.1080p.WEB.H264-CAKES");
    assert!(server.await.unwrap()[0].contains(r#""method":"torrent-get""#));
}

// ========== SABNZBD TESTS ==========

#[tokio::test]
async fn test_sabnzbd_submits_by_url() {
    let (url, server) = serve(vec![response(
        "200 OK",
        &[("Content-Type", "application/json")],
        r#"{"status": true, "nzo_ids": ["SABnzbd_nzo_1"]}"#,
    )])
    .await;
    let client = SabnzbdClient::from_config(&client_config(ClientKind::Sabnzbd, &url)).unwrap();

    client
        .submit(RELEASE, "https://example.org/get/1.nzb", "tv")
        .await
        .unwrap();

    let request = &server.await.unwrap()[0];
    assert!(request.starts_with("get /api?"));
    assert!(request.contains("mode=addurl"));
    assert!(request.contains("cat=tv"));
    assert!(request.contains("apikey=secret"));
    assert!(request.contains("output=json"));
}

#[tokio::test]
async fn test_sabnzbd_status_false_is_a_submission_error() {
    let (url, _server) = serve(vec![response(
        "200 OK",
        &[("Content-Type", "application/json")],
        r#"{"status": false, "error": "API Key Incorrect"}"#,
    )])
    .await;
    let client = SabnzbdClient::from_config(&client_config(ClientKind::Sabnzbd, &url)).unwrap();

    let result = client
        .submit(RELEASE, "https://example.org/get/1.nzb", "tv")
        .await;

    match result {
        Err(tvsort::Error::Submission { name, reason }) => {
            assert_eq!(name, RELEASE);
            assert_eq!(reason, "API Key Incorrect");
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[tokio::test]
async fn test_sabnzbd_lists_queue_and_history() {
    let (url, server) = serve(vec![
        response(
            "200 OK",
            &[("Content-Type", "application/json")],
            r#"{"queue": {"slots": [{"filename": "Yellowjackets.S02E03.1080p.WEB.H264-CAKES"}]}}"#,
        ),
        response(
            "200 OK",
            &[("Content-Type", "application/json")],
            r#"{"history": {"slots": [{"name": "Greys.Anatomy.S19E14.1080p.WEB.h264-CAKES"}]}}"#,
        ),
    ])
    .await;
    let client = SabnzbdClient::from_config(&client_config(ClientKind::Sabnzbd, &url)).unwrap();

    let active = client.list_active().await.unwrap();
    let history = client.list_history().await.unwrap();

    assert_eq!(active[0].name, "Yellowjackets.S02E03.1080p.WEB.H264-CAKES");
    assert_eq!(history[0].name, "Greys.Anatomy.S19E14.1080p.WEB.h264-CAKES");
    let requests = server.await.unwrap();
    assert!(requests[0].contains("mode=queue"));
    assert!(requests[1].contains("mode=history"));
}

// ========== FEED TESTS ==========

#[tokio::test]
async fn test_feed_is_fetched_and_parsed() {
    let (url, _server) = serve(vec![response(
        "200 OK",
        &[("Content-Type", "application/rss+xml")],
        r#"<rss><channel><item><title>Greys.Anatomy.S19E15.1080p.WEB.h264-CAKES</title><link>https://example.org/1</link></item></channel></rss>"#,
    )])
    .await;
    let http = reqwest::Client::builder().no_proxy().build().unwrap();

    let items = fetch_feed(&http, &format!("{}/rss", url)).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, RELEASE);
}

#[tokio::test]
async fn test_feed_server_error_is_fatal() {
    let (url, _server) = serve(vec![response(
        "500 Internal Server Error",
        &[("Content-Type", "text/plain")],
        "boom",
    )])
    .await;
    let http = reqwest::Client::builder().no_proxy().build().unwrap();

    let result = fetch_feed(&http, &format!("{}/rss", url)).await;

    assert!(matches!(result, Err(tvsort::Error::Http(_))));
}
