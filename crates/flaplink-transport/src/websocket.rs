//! WebSocket connector implementation using `tokio-tungstenite`.

use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::{Connection, Connector, TransportError};

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

fn io_err(e: tokio_tungstenite::tungstenite::Error) -> std::io::Error {
    std::io::Error::other(e)
}

/// A [`Connector`] that dials a WebSocket URL (the authority's `/ws`
/// endpoint, e.g. `ws://localhost:1337/ws`).
pub struct WebSocketConnector {
    url: String,
}

impl WebSocketConnector {
    /// Creates a connector for the given `ws://` or `wss://` URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// The URL this connector dials.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Connector for WebSocketConnector {
    type Connection = WebSocketConnection;

    async fn connect(&mut self) -> Result<Self::Connection, TransportError> {
        let (ws, _response) = connect_async(&self.url)
            .await
            .map_err(|e| TransportError::ConnectFailed(io_err(e)))?;
        tracing::debug!(url = %self.url, "WebSocket connection opened");
        Ok(WebSocketConnection { ws })
    }
}

/// A single client-side WebSocket connection.
///
/// Owned exclusively by the [`ConnectionManager`](crate::ConnectionManager)
/// actor — no other component reads, writes, or closes it.
pub struct WebSocketConnection {
    ws: WsStream,
}

impl Connection for WebSocketConnection {
    async fn send(&mut self, frame: &str) -> Result<(), TransportError> {
        use futures_util::SinkExt;
        self.ws
            .send(Message::Text(frame.into()))
            .await
            .map_err(|e| TransportError::SendFailed(io_err(e)))
    }

    async fn recv(&mut self) -> Result<Option<String>, TransportError> {
        use futures_util::StreamExt;
        loop {
            match self.ws.next().await {
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.to_string()));
                }
                // The protocol is text frames; tolerate a binary frame
                // that holds valid UTF-8, drop one that doesn't.
                Some(Ok(Message::Binary(data))) => {
                    match String::from_utf8(data.into()) {
                        Ok(text) => return Ok(Some(text)),
                        Err(_) => {
                            tracing::debug!("dropping non-UTF-8 binary frame");
                            continue;
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue, // ping/pong/raw frame
                Some(Err(e)) => {
                    return Err(TransportError::ReceiveFailed(io_err(e)));
                }
            }
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.ws
            .close(None)
            .await
            .map_err(|e| TransportError::SendFailed(io_err(e)))
    }
}
