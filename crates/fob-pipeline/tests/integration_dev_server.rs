//! Integration tests for the development server, spoken to over raw TCP.

use fob_pipeline::config::ServerConfig;
use fob_pipeline::dev::server::{local_addr, RELOAD_SCRIPT_PATH, SSE_PATH};
use fob_pipeline::dev::{DevServer, ReloadEvent, ReloadHub, SharedHub};
use std::fs;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

struct Running {
    addr: SocketAddr,
    hub: SharedHub,
    _root: TempDir,
}

async fn start() -> Running {
    let root = TempDir::new().unwrap();
    fs::write(
        root.path().join("index.html"),
        "<html><body><h1>Hello</h1></body></html>",
    )
    .unwrap();
    fs::create_dir_all(root.path().join("styles")).unwrap();
    fs::write(root.path().join("styles/index.css"), "body{color:red}").unwrap();

    let hub: SharedHub = Arc::new(ReloadHub::new());
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        port_attempts: 1,
    };
    let server = DevServer::new(root.path().to_path_buf(), config, hub.clone());
    let listener = server.bind().await.unwrap();
    let addr = local_addr(&listener).unwrap();

    tokio::spawn(server.serve(listener, std::future::pending()));

    Running {
        addr,
        hub,
        _root: root,
    }
}

async fn get(addr: SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        path, addr
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    timeout(Duration::from_secs(5), stream.read_to_end(&mut response))
        .await
        .unwrap()
        .unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

#[tokio::test]
async fn test_index_html_gets_reload_client() {
    let server = start().await;

    let response = get(server.addr, "/").await;
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("<h1>Hello</h1>"));
    assert!(response.contains(RELOAD_SCRIPT_PATH));
}

#[tokio::test]
async fn test_css_is_served_untouched() {
    let server = start().await;

    let response = get(server.addr, "/styles/index.css").await;
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("text/css"));
    assert!(response.ends_with("body{color:red}"));
}

#[tokio::test]
async fn test_reload_client_is_embedded() {
    let server = start().await;

    let response = get(server.addr, RELOAD_SCRIPT_PATH).await;
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("application/javascript"));
    assert!(response.contains("EventSource"));
}

#[tokio::test]
async fn test_missing_file_is_404() {
    let server = start().await;

    let response = get(server.addr, "/nope.html").await;
    assert!(response.starts_with("HTTP/1.1 404"));
}

#[tokio::test]
async fn test_missing_favicon_is_204() {
    let server = start().await;

    let response = get(server.addr, "/favicon.ico").await;
    assert!(response.starts_with("HTTP/1.1 204"));
}

#[tokio::test]
async fn test_sse_delivers_connected_and_broadcasts() {
    let server = start().await;

    let mut stream = TcpStream::connect(server.addr).await.unwrap();
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: {}\r\nAccept: text/event-stream\r\n\r\n",
        SSE_PATH, server.addr
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let received = read_until(&mut stream, "Connected").await;
    assert!(received.contains("text/event-stream"));
    assert_eq!(server.hub.client_count(), 1);

    server.hub.broadcast(&ReloadEvent::Reload);
    let received = read_until(&mut stream, r#"{"type":"Reload"}"#).await;
    assert!(received.contains("data:"));
}

async fn read_until(stream: &mut TcpStream, needle: &str) -> String {
    let mut seen = String::new();
    let mut buf = [0u8; 1024];

    timeout(Duration::from_secs(5), async {
        while !seen.contains(needle) {
            let n = stream.read(&mut buf).await.unwrap();
            assert!(n > 0, "connection closed before {:?}", needle);
            seen.push_str(&String::from_utf8_lossy(&buf[..n]));
        }
    })
    .await
    .unwrap();

    seen
}
