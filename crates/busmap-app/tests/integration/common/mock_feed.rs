//! Mock WebSocket feed server for integration tests.
//!
//! Provides a simple WebSocket server that can:
//! - Accept connections and count them
//! - Broadcast binary feed frames to every connected client
//! - Drop all clients to force reconnects

use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio_tungstenite::{accept_async, tungstenite::Message};

/// Commands fanned out to every live client connection.
#[derive(Debug, Clone)]
enum ServerCommand {
    Frame(Vec<u8>),
    DropClients,
}

/// A mock feed server for testing.
pub struct MockFeedServer {
    addr: SocketAddr,
    shutdown_tx: mpsc::Sender<()>,
    command_tx: broadcast::Sender<ServerCommand>,
    connections: Arc<Mutex<u32>>,
}

impl MockFeedServer {
    /// Start a new mock feed server on an available port.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let connections: Arc<Mutex<u32>> = Arc::new(Mutex::new(0));
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let (command_tx, _) = broadcast::channel::<ServerCommand>(32);

        let connections_clone = connections.clone();
        let command_tx_clone = command_tx.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    Ok((stream, _)) = listener.accept() => {
                        let connections = connections_clone.clone();
                        let commands = command_tx_clone.subscribe();
                        tokio::spawn(handle_connection(stream, commands, connections));
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }
        });

        Self {
            addr,
            shutdown_tx,
            command_tx,
            connections,
        }
    }

    /// Get the server's WebSocket URL.
    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Get the number of connections received.
    pub async fn connection_count(&self) -> u32 {
        *self.connections.lock().await
    }

    /// Broadcast one binary frame to every connected client.
    pub fn send_frame(&self, frame: Vec<u8>) {
        let _ = self.command_tx.send(ServerCommand::Frame(frame));
    }

    /// Drop every connected client, forcing reconnects.
    pub fn drop_clients(&self) {
        let _ = self.command_tx.send(ServerCommand::DropClients);
    }

    /// Shutdown the server.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

async fn handle_connection(
    stream: TcpStream,
    mut commands: broadcast::Receiver<ServerCommand>,
    connections: Arc<Mutex<u32>>,
) {
    // Increment connection count
    {
        let mut count = connections.lock().await;
        *count += 1;
    }

    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            eprintln!("WebSocket handshake failed: {e}");
            return;
        }
    };

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            command = commands.recv() => {
                match command {
                    Ok(ServerCommand::Frame(frame)) => {
                        if write.send(Message::Binary(frame)).await.is_err() {
                            break;
                        }
                    }
                    Ok(ServerCommand::DropClients) | Err(_) => break,
                }
            }
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        let _ = write.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
        }
    }
}
