//! # Flaplink
//!
//! Realtime session client for multiplayer obstacle runs.
//!
//! Flaplink keeps a browser-style game client in sync with its session
//! authority: it owns the persistent connection (with fixed-cadence
//! reconnects), speaks the JSON message protocol, tracks the session
//! phase and roster, and runs the local physics loop that decides when
//! this client's actor dies.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use flaplink::prelude::*;
//!
//! # async fn demo() {
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.on_connected(|id| println!("you are {id}"));
//! dispatcher.on_countdown(|n| println!("starting in {n}"));
//!
//! let handle = Client::spawn(
//!     WebSocketConnector::new("ws://127.0.0.1:1337/ws"),
//!     ClientConfig::default(),
//!     dispatcher,
//! );
//! handle.jump();
//! # }
//! ```

mod client;
mod dispatch;
mod error;

pub use client::{Client, ClientConfig, ClientHandle};
pub use dispatch::{Dispatcher, FrameSnapshot, Handler};
pub use error::FlaplinkError;

/// Everything most users need, in one import.
pub mod prelude {
    pub use flaplink_protocol::{Message, PlayerId};
    pub use flaplink_session::{SessionError, SessionPhase};
    pub use flaplink_sim::{DeathCause, LevelConfig, SimConfig};
    pub use flaplink_transport::{
        TransportConfig, TransportError, WebSocketConnector,
    };

    pub use crate::{
        Client, ClientConfig, ClientHandle, Dispatcher, FlaplinkError,
        FrameSnapshot,
    };
}
