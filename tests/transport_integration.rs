//! Transport integration tests
//!
//! Runs the real router on a loopback port and talks to it over WebSocket.

use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::time::Duration;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

use remote_pointer_server::config::Config;
use remote_pointer_server::server::{AppState, HealthResponse, PointerServer};

fn limited_config(max_connections: usize) -> Config {
    let mut config = Config::default();
    config.server.listen_addr = "127.0.0.1:0".to_string();
    config.server.verbose = false;
    config.server.max_connections = max_connections;
    config.stabilization.enabled = false;
    config
}

async fn spawn_server(config: Config) -> (SocketAddr, AppState) {
    let server = PointerServer::new(config).unwrap();
    let state = server.state().clone();

    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let http = axum::Server::try_bind(&addr)
        .unwrap()
        .serve(server.router().into_make_service_with_connect_info::<SocketAddr>());
    let addr = http.local_addr();
    tokio::spawn(http);

    (addr, state)
}

async fn health(addr: SocketAddr) -> HealthResponse {
    let uri: hyper::Uri = format!("http://{}/health", addr).parse().unwrap();
    let response = hyper::Client::new().get(uri).await.unwrap();
    assert_eq!(response.status(), 200);

    let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn wait_for_active(addr: SocketAddr, expected: usize) -> HealthResponse {
    for _ in 0..100 {
        let report = health(addr).await;
        if report.active_connections == expected {
            return report;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("active connections never reached {}", expected);
}

#[tokio::test]
async fn test_upgrade_beyond_limit_is_rejected() {
    let (addr, state) = spawn_server(limited_config(1)).await;
    let url = format!("ws://{}/ws", addr);

    let (mut first, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();
    assert_eq!(wait_for_active(addr, 1).await.status, "ok");

    match tokio_tungstenite::connect_async(url.as_str()).await {
        Err(WsError::Http(response)) => assert_eq!(response.status().as_u16(), 503),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("second upgrade should be rejected"),
    }
    assert_eq!(state.context.tracker.active(), 1);

    first.close(None).await.unwrap();
    wait_for_active(addr, 0).await;

    // The freed slot is usable again
    let (mut again, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();
    wait_for_active(addr, 1).await;
    again.close(None).await.unwrap();
}

#[tokio::test]
async fn test_close_frame_ends_session_after_commands() {
    let (addr, state) = spawn_server(limited_config(1)).await;
    let url = format!("ws://{}/ws", addr);

    // Virtual backend starts in the middle of 1920x1080
    assert_eq!(state.context.cursor.position().unwrap(), (960, 540));

    let (mut ws, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();
    ws.send(Message::Text("5,0".to_string())).await.unwrap();
    ws.send(Message::Binary(b"0,-10".to_vec())).await.unwrap();
    ws.close(None).await.unwrap();
    while ws.next().await.is_some() {}

    let report = wait_for_active(addr, 0).await;
    assert_eq!(report.status, "ok");
    assert_eq!(state.context.cursor.position().unwrap(), (965, 530));
    assert_eq!(state.context.tracker.total(), 1);
}
