//! WebSocket echo backend.
//!
//! # Responsibilities
//! - Serve the endpoint that `/api/v1/ws` redirects point at
//! - Complete the upgrade handshake
//! - Echo every text and binary frame back to the sender
//!
//! # Data Flow
//! ```text
//! Client ──── WebSocket frames ────→ Echo backend
//! Client ←─── same frames ───────── Echo backend
//! ```
//!
//! # Design Decisions
//! - Origins are not checked; the backend sits behind the edge redirect
//! - Ping/pong handled by axum
//! - A read or write error ends only that connection

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    response::Response,
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::BackendConfig;
use crate::lifecycle::ShutdownSignal;

/// Standalone WebSocket echo server.
pub struct EchoServer {
    router: Router,
    path: String,
}

impl EchoServer {
    pub fn new(config: &BackendConfig) -> Self {
        let router = Router::new()
            .route(&config.path, get(upgrade_handler))
            .layer(TraceLayer::new_for_http());

        Self {
            router,
            path: config.path.clone(),
        }
    }

    /// Run until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, path = %self.path, "Echo backend starting (ws)");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("Echo backend stopped");
        Ok(())
    }
}

async fn upgrade_handler(ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(echo)
}

async fn echo(socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();

    while let Some(frame) = receiver.next().await {
        match frame {
            Ok(Message::Close(_)) => break,
            Ok(message @ (Message::Text(_) | Message::Binary(_))) => {
                tracing::debug!(len = message_len(&message), "Received frame");
                if let Err(e) = sender.send(message).await {
                    tracing::warn!(error = %e, "Write error");
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Read error");
                break;
            }
        }
    }
}

fn message_len(message: &Message) -> usize {
    match message {
        Message::Text(text) => text.len(),
        Message::Binary(bytes) => bytes.len(),
        _ => 0,
    }
}
