//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use any_proxy::config::ProxyConfig;
use any_proxy::http::HttpServer;
use any_proxy::lifecycle::Shutdown;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// Build a raw HTTP/1.1 response. `content_type` of `None` omits the header.
pub fn http_response(content_type: Option<&str>, body: &[u8]) -> Vec<u8> {
    let mut head = String::from("HTTP/1.1 200 OK\r\n");
    if let Some(ct) = content_type {
        head.push_str(&format!("Content-Type: {}\r\n", ct));
    }
    head.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    ));
    let mut raw = head.into_bytes();
    raw.extend_from_slice(body);
    raw
}

/// Read until the end of the request head and return it as text.
async fn read_request_head(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Start a mock upstream that answers every connection with `response`.
///
/// Each request head is forwarded on the returned channel.
pub async fn start_mock_upstream(response: Vec<u8>) -> (SocketAddr, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let response = response.clone();
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let head = read_request_head(&mut socket).await;
                        let _ = tx.send(head);
                        let _ = socket.write_all(&response).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, rx)
}

/// Start a mock upstream that reads the request and never answers.
///
/// A message is sent on the returned channel when the proxy closes the
/// connection.
pub async fn start_silent_upstream() -> (SocketAddr, mpsc::UnboundedReceiver<()>) {
    start_stalling_upstream(b"").await
}

/// Start a mock upstream that writes `preamble` and then stalls.
///
/// A message is sent on the returned channel when the proxy closes the
/// connection.
pub async fn start_stalling_upstream(
    preamble: &'static [u8],
) -> (SocketAddr, mpsc::UnboundedReceiver<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        read_request_head(&mut socket).await;
                        if !preamble.is_empty() {
                            let _ = socket.write_all(preamble).await;
                            let _ = socket.flush().await;
                        }
                        let mut chunk = [0u8; 256];
                        loop {
                            match socket.read(&mut chunk).await {
                                Ok(0) | Err(_) => break,
                                Ok(_) => continue,
                            }
                        }
                        let _ = tx.send(());
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, rx)
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Test configuration with a short upstream deadline.
pub fn test_config(timeout_ms: u64) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1".into();
    config.upstream.timeout_ms = timeout_ms;
    config
}

/// Start the proxy on an ephemeral port.
pub async fn start_proxy(config: ProxyConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(&config).unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}

/// `http://{proxy}{path}?url={encoded target}`
pub fn proxy_url(proxy: SocketAddr, path: &str, target: &str) -> String {
    let mut url = reqwest::Url::parse(&format!("http://{}{}", proxy, path)).unwrap();
    url.query_pairs_mut().append_pair("url", target);
    url.to_string()
}
