//! Client transport layer for Flaplink.
//!
//! Provides the [`Connector`] and [`Connection`] traits that abstract
//! over how a session is reached (WebSocket in production, in-memory
//! fakes in tests), and the [`ConnectionManager`] actor that owns the
//! connection lifecycle: establish, detect loss, reconnect at a fixed
//! cadence, and expose send/receive to the rest of the client.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — WebSocket connector via `tokio-tungstenite`

mod error;
mod manager;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
pub use manager::{ConnectionManager, ManagerHandle, TransportEvent};
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketConnector};

use std::future::Future;
use std::time::Duration;

/// Configuration for the connection manager.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Fixed delay between reconnect attempts.
    ///
    /// Default: 3000 ms. Retries repeat at this spacing indefinitely —
    /// no backoff growth and no retry cap. That keeps a casual session
    /// available through flaky networks at the cost of unbounded
    /// retry traffic; tune the delay rather than expecting a cap.
    pub reconnect_delay: Duration,

    /// Capacity of the bounded event channel handed to the consumer.
    ///
    /// Default: 256. The manager awaits channel space, so a stalled
    /// consumer applies backpressure instead of losing frames.
    pub event_channel_capacity: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            reconnect_delay: Duration::from_millis(3000),
            event_channel_capacity: 256,
        }
    }
}

/// Establishes connections to the session authority.
///
/// The manager calls [`Connector::connect`] once per attempt; the
/// connector owns addressing (URL, port) but no retry logic — retries
/// and their cadence belong to the [`ConnectionManager`].
///
/// The methods here (and on [`Connection`]) return explicitly
/// `Send`-bounded futures rather than plain `async fn` so the manager
/// actor can be driven by `tokio::spawn`; `async fn` in impls still
/// satisfies them.
pub trait Connector: Send + 'static {
    /// The connection type produced by this connector.
    type Connection: Connection;

    /// Attempts to open one connection.
    fn connect(
        &mut self,
    ) -> impl Future<Output = Result<Self::Connection, TransportError>> + Send;
}

/// A single open connection carrying text frames.
pub trait Connection: Send + 'static {
    /// Sends one text frame to the authority.
    fn send(
        &mut self,
        frame: &str,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Receives the next text frame.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    fn recv(
        &mut self,
    ) -> impl Future<Output = Result<Option<String>, TransportError>> + Send;

    /// Closes the connection.
    fn close(
        &mut self,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}
