//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use parking_portal::accounts::AccountStore;
use parking_portal::config::{PortalConfig, ProxyRuleConfig};
use parking_portal::http::{AppState, HttpServer};
use parking_portal::Shutdown;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Build a server whose account store hashes with the minimum bcrypt cost.
pub fn test_server(config: PortalConfig) -> HttpServer {
    let mut state = AppState::new(&config).unwrap();
    state.accounts = Arc::new(AccountStore::with_cost(4));
    HttpServer::with_state(config, state)
}

/// Start the portal on an ephemeral port.
pub async fn spawn_portal(config: PortalConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = test_server(config);
    let stop = shutdown.clone();
    tokio::spawn(async move {
        server.run(listener, None, stop).await.unwrap();
    });
    (addr, shutdown)
}

/// Config whose only proxy rule points at `upstream`.
pub fn config_with_upstream(prefix: &str, upstream: SocketAddr) -> PortalConfig {
    let mut config = PortalConfig::default();
    config.proxy = vec![ProxyRuleConfig::new(prefix, format!("http://{}", upstream))];
    config
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// Start a mock upstream that answers every request with its request line
/// and Host header, one per line.
pub async fn start_echo_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let head = read_head(&mut socket).await;
                        let mut lines = head.lines();
                        let request_line = lines.next().unwrap_or_default().to_string();
                        let host = lines
                            .find_map(|l| {
                                let (name, value) = l.split_once(':')?;
                                name.eq_ignore_ascii_case("host").then(|| value.trim().to_string())
                            })
                            .unwrap_or_default();

                        let body = format!("{}\nhost: {}\n", request_line, host);
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a mock upstream that accepts connections and never answers.
pub async fn start_silent_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// An address nothing is listening on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

async fn read_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return String::from_utf8_lossy(&buf).into_owned(),
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let content_length = head
        .lines()
        .find_map(|l| {
            let (name, value) = l.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);

    // Drain the body so closing the socket does not reset the connection.
    let mut remaining = content_length.saturating_sub(buf.len() - head_end);
    while remaining > 0 {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => remaining = remaining.saturating_sub(n),
        }
    }
    head
}
