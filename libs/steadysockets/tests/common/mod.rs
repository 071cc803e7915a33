//! Common test utilities for SteadySockets integration tests
//!
//! Provides a scripted in-process WebSocket server that records every
//! text frame it receives.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;

/// Per-connection script for the mock server
#[derive(Clone, Default)]
pub struct MockBehavior {
    /// Frames sent to the client immediately after the handshake
    pub greeting: Vec<String>,
    /// Drop the connection right after sending the greeting
    pub close_after_greeting: bool,
}

/// A scripted mock WebSocket server
pub struct MockWsServer {
    pub addr: SocketAddr,
    shutdown: Arc<Notify>,
    received: Arc<Mutex<Vec<String>>>,
    connections: Arc<AtomicUsize>,
}

impl MockWsServer {
    /// Create and start a new mock server
    pub async fn start(behavior: MockBehavior) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let received = Arc::new(Mutex::new(Vec::new()));
        let connections = Arc::new(AtomicUsize::new(0));

        let shutdown_task = Arc::clone(&shutdown);
        let received_task = Arc::clone(&received);
        let connections_task = Arc::clone(&connections);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    result = listener.accept() => {
                        match result {
                            Ok((stream, _)) => {
                                connections_task.fetch_add(1, Ordering::SeqCst);
                                let behavior = behavior.clone();
                                let received = Arc::clone(&received_task);
                                tokio::spawn(async move {
                                    Self::handle_connection(stream, behavior, received).await;
                                });
                            }
                            Err(e) => {
                                eprintln!("Accept error: {}", e);
                                break;
                            }
                        }
                    }
                    _ = shutdown_task.notified() => {
                        break;
                    }
                }
            }
        });

        Self {
            addr,
            shutdown,
            received,
            connections,
        }
    }

    async fn handle_connection(
        stream: TcpStream,
        behavior: MockBehavior,
        received: Arc<Mutex<Vec<String>>>,
    ) {
        use futures_util::{SinkExt, StreamExt};
        use tokio_tungstenite::accept_async;
        use tokio_tungstenite::tungstenite::Message;

        let ws_stream = match accept_async(stream).await {
            Ok(ws) => ws,
            Err(e) => {
                eprintln!("WebSocket handshake failed: {}", e);
                return;
            }
        };

        let (mut write, mut read) = ws_stream.split();

        for frame in &behavior.greeting {
            if write.send(Message::Text(frame.clone())).await.is_err() {
                return;
            }
        }

        if behavior.close_after_greeting {
            // Dropping both halves tears the TCP connection down.
            return;
        }

        while let Some(msg) = read.next().await {
            match msg {
                Ok(Message::Text(text)) => received.lock().unwrap().push(text),
                Ok(Message::Close(_)) | Err(_) => break,
                Ok(_) => {}
            }
        }
    }

    /// Get the WebSocket URL for this server
    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Every text frame received so far, across all connections
    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }

    /// Number of connections accepted so far
    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    /// Shutdown the server
    pub fn shutdown(&self) {
        self.shutdown.notify_waiters();
    }
}

impl Drop for MockWsServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
