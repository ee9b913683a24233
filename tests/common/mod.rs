//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::Request;
use axum::http::{HeaderMap, Response};
use axum::Router;
use frontend_bridge::config::BridgeConfig;
use frontend_bridge::{HttpServer, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A request as seen by a mock upstream.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct RecordedRequest {
    pub method: String,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

pub type Recorder = Arc<Mutex<Vec<RecordedRequest>>>;

/// Bridge config pointing both upstreams at loopback ports.
#[allow(dead_code)]
pub fn bridge_config(proxy_port: u16, dev_server_port: u16) -> BridgeConfig {
    let mut config = BridgeConfig::default();
    config.listener.bind_address = format!("127.0.0.1:{}", proxy_port);
    config.frontend.backend_host = "127.0.0.1".into();
    config.frontend.dev_server_host = "127.0.0.1".into();
    config.frontend.dev_server_port = dev_server_port;
    config.app.static_dir = None;
    config
}

/// Serve `server` on its configured address until the returned handle triggers.
#[allow(dead_code)]
pub async fn start_server(server: HttpServer) -> Shutdown {
    let shutdown = Shutdown::new();
    let listener = TcpListener::bind(&server.config().listener.bind_address)
        .await
        .unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    shutdown
}

/// Start an upstream that records every request and answers
/// `200 hello` with `X-Test: 1` and two `Set-Cookie` values.
#[allow(dead_code)]
pub async fn start_recording_upstream(addr: SocketAddr) -> Recorder {
    let recorded: Recorder = Arc::default();
    let sink = recorded.clone();

    let app = Router::new().fallback(move |request: Request| {
        let sink = sink.clone();
        async move {
            let (parts, body) = request.into_parts();
            let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
            sink.lock().unwrap().push(RecordedRequest {
                method: parts.method.to_string(),
                uri: parts.uri.to_string(),
                headers: parts.headers,
                body: body.to_vec(),
            });

            Response::builder()
                .status(200)
                .header("X-Test", "1")
                .header("Set-Cookie", "session=abc")
                .header("Set-Cookie", "theme=dark")
                .body(Body::from("hello"))
                .unwrap()
        }
    });

    let listener = TcpListener::bind(addr).await.unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    recorded
}

/// Start a raw TCP upstream that writes `response` verbatim and closes.
#[allow(dead_code)]
pub async fn start_raw_upstream(addr: SocketAddr, response: &'static str) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Start a listener that only counts accepted connections.
#[allow(dead_code)]
pub async fn start_counting_listener(addr: SocketAddr) -> Arc<AtomicUsize> {
    let listener = TcpListener::bind(addr).await.unwrap();
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            drop(socket);
        }
    });
    count
}

/// Connection events seen by a stalled upstream.
#[derive(Debug, Default)]
#[allow(dead_code)]
pub struct StallEvents {
    pub requests: AtomicUsize,
    pub closed: AtomicUsize,
}

/// Start an upstream that reads each request but never answers, and counts
/// connections the peer closes.
#[allow(dead_code)]
pub async fn start_stalled_upstream(addr: SocketAddr) -> Arc<StallEvents> {
    let listener = TcpListener::bind(addr).await.unwrap();
    let events = Arc::new(StallEvents::default());
    let seen = events.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let seen = seen.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let mut counted = false;
                loop {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(_) if !counted => {
                            counted = true;
                            seen.requests.fetch_add(1, Ordering::SeqCst);
                        }
                        Ok(_) => {}
                    }
                }
                seen.closed.fetch_add(1, Ordering::SeqCst);
            });
        }
    });
    events
}

/// Poll `condition` every 50ms for up to five seconds.
#[allow(dead_code)]
pub async fn eventually(condition: impl Fn() -> bool) -> bool {
    for _ in 0..100 {
        if condition() {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
    false
}
