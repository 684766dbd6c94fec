//! Integration tests for the WebSocket echo backend.

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use ws_edge_redirect::config::BackendConfig;
use ws_edge_redirect::http::EchoServer;
use ws_edge_redirect::lifecycle::Shutdown;

async fn start_echo(addr: SocketAddr) -> Shutdown {
    let config = BackendConfig {
        bind_address: addr.to_string(),
        ..BackendConfig::default()
    };

    let shutdown = Shutdown::new();
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = EchoServer::new(&config).run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(200)).await;
    shutdown
}

#[tokio::test]
async fn test_echoes_text_and_binary() {
    let addr: SocketAddr = "127.0.0.1:28401".parse().unwrap();
    let shutdown = start_echo(addr).await;

    let (mut ws, _) = connect_async(format!("ws://{}/api/v1/ws", addr))
        .await
        .expect("Echo backend unreachable");

    ws.send(Message::text("hello edge")).await.unwrap();
    let reply = ws.next().await.unwrap().unwrap();
    assert_eq!(reply.to_text().unwrap(), "hello edge");

    ws.send(Message::binary(vec![1u8, 2, 3])).await.unwrap();
    let reply = ws.next().await.unwrap().unwrap();
    assert_eq!(reply.into_data().as_ref(), &[1u8, 2, 3]);

    ws.close(None).await.unwrap();
    shutdown.trigger();
}

#[tokio::test]
async fn test_other_paths_are_not_upgraded() {
    let addr: SocketAddr = "127.0.0.1:28411".parse().unwrap();
    let shutdown = start_echo(addr).await;

    assert!(connect_async(format!("ws://{}/api/v1/ws/", addr)).await.is_err());

    shutdown.trigger();
}
