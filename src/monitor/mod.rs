//! Monitor client session
//!
//! One session owns one WebSocket connection. After the handshake the
//! stream is split: a spawned listener task drains the read half while the
//! main flow keeps the write half and idles until Ctrl-C or connection
//! loss. The two sides share only the running flag, which is only ever
//! cleared, so an atomic is all the coordination needed.

pub mod render;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use crate::protocol::ClientMessage;
use self::render::handle_frame;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

/// Errors raised while driving a session
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("send failed: {0}")]
    Send(String),

    #[error("not connected")]
    NotConnected,
}

/// One monitoring session against the clipboard sync server
pub struct MonitorClient {
    /// Full target address, device id already appended
    url: String,
    sender: Option<WsSink>,
    receiver: Option<WsSource>,
    running: Arc<AtomicBool>,
}

impl MonitorClient {
    /// Build a client targeting `<url>?deviceId=<device_id>`
    pub fn new(url: &str, device_id: &str) -> Self {
        Self {
            url: format!("{url}?deviceId={device_id}"),
            sender: None,
            receiver: None,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether the listen loop should keep going
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Open the WebSocket connection and mark the session running
    pub async fn connect(&mut self) -> Result<(), MonitorError> {
        println!("connecting to {}", self.url);

        let (stream, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| MonitorError::Connect(e.to_string()))?;

        let (tx, rx) = stream.split();
        self.sender = Some(tx);
        self.receiver = Some(rx);
        self.running.store(true, Ordering::SeqCst);

        println!("connected, watching for clipboard changes");
        println!("{}", "=".repeat(60));
        Ok(())
    }

    /// Close the connection. Safe to call when already disconnected.
    pub async fn disconnect(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.receiver = None;

        if let Some(mut tx) = self.sender.take() {
            if let Err(e) = tx.close().await {
                debug!("close handshake failed: {e}");
            }
            println!("disconnected");
        }
    }

    /// Serialize `message` and send it as one text frame.
    ///
    /// `serde_json` leaves non-ASCII characters unescaped, so the bytes on
    /// the wire match the payload text.
    pub async fn send_message(&mut self, message: &ClientMessage) -> Result<(), MonitorError> {
        let Some(tx) = self.sender.as_mut() else {
            return Err(MonitorError::NotConnected);
        };

        let text = serde_json::to_string(message).map_err(|e| MonitorError::Send(e.to_string()))?;
        tx.send(Message::Text(text.clone()))
            .await
            .map_err(|e| MonitorError::Send(e.to_string()))?;

        println!("sent: {text}");
        Ok(())
    }

    /// Ask the server for its most recent clipboard items. A send failure
    /// is reported but never ends the session.
    pub async fn request_current_content(&mut self) {
        let request = ClientMessage::get_all_content(10);
        if let Err(e) = self.send_message(&request).await {
            println!("error: {e}");
        }
    }

    /// Consume inbound frames until the server closes, the stream ends, or
    /// a transport error occurs. Clears the running flag on exit.
    pub async fn listen_messages(&mut self) {
        let Some(rx) = self.receiver.take() else {
            return;
        };
        Self::listen(rx, Arc::clone(&self.running)).await;
    }

    fn spawn_listener(&mut self) -> Option<JoinHandle<()>> {
        let rx = self.receiver.take()?;
        let running = Arc::clone(&self.running);
        Some(tokio::spawn(Self::listen(rx, running)))
    }

    async fn listen(mut rx: WsSource, running: Arc<AtomicBool>) {
        while let Some(frame) = rx.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    for line in handle_frame(&text) {
                        println!("{line}");
                    }
                }
                Ok(Message::Close(_)) => {
                    println!("connection closed by server");
                    break;
                }
                // Ping / pong / binary frames carry nothing to render
                Ok(_) => {}
                Err(e) => {
                    warn!("websocket error: {e}");
                    println!("listen error: {e}");
                    break;
                }
            }
        }
        running.store(false, Ordering::SeqCst);
    }

    /// Run one session: request current content, listen for pushes, idle
    /// until Ctrl-C or the connection drops, then tear down.
    pub async fn start_monitoring(&mut self) {
        println!("realtime clipboard monitor started");
        println!("new clipboard content is pushed by the server as it appears");
        self.request_current_content().await;
        println!("{}", "=".repeat(60));

        let listener = self.spawn_listener();

        let mut interrupt = Box::pin(tokio::signal::ctrl_c());
        while self.is_running() {
            tokio::select! {
                _ = &mut interrupt => {
                    println!();
                    println!("interrupted");
                    break;
                }
                _ = tokio::time::sleep(Duration::from_millis(100)) => {}
            }
        }

        if let Some(task) = listener {
            task.abort();
        }
        self.disconnect().await;
    }
}
