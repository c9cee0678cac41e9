//! Connection manager actor: owns the persistent connection's lifecycle.
//!
//! The manager runs in its own Tokio task, communicating with the rest
//! of the client through channels — commands in, [`TransportEvent`]s
//! out. Because the connection handle and the reconnect timer both
//! live inside the single actor loop, a `restart()` deterministically
//! supersedes any pending reconnect: there is never a window where two
//! connections (or two timers) exist at once.
//!
//! Lifecycle:
//!
//! ```text
//! establish ──ok──→ pump frames ──loss──→ wait(reconnect_delay) ──┐
//!     ↑  └──fail──→ wait(reconnect_delay) ──→ establish           │
//!     └───────────────────────────────────────────────────────────┘
//! ```
//!
//! Retries repeat forever at a fixed cadence; only `shutdown()` (or
//! dropping every handle and event receiver) stops the loop.

use tokio::sync::mpsc;

use crate::{Connection, Connector, TransportConfig};

/// Events the manager emits to its consumer, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A connection was successfully opened. No handshake payload is
    /// sent proactively — the authority pushes `connect` on its own.
    Opened,
    /// A text frame arrived.
    Frame(String),
    /// The connection was lost or deliberately closed. A reconnect is
    /// already scheduled unless the manager is shutting down.
    Closed,
}

enum Command {
    Send(String),
    Restart,
    Shutdown,
}

/// How a pump loop over one live connection ended.
enum PumpEnd {
    /// The connection dropped or errored; reconnect after the delay.
    Lost,
    /// `restart()` was requested; close and reconnect immediately.
    Restart,
    /// `shutdown()` was requested or the consumer went away.
    Shutdown,
}

/// Handle to a running [`ConnectionManager`]. Cheap to clone.
///
/// All methods are fire-and-forget: the manager may be between
/// connections, in which case outbound frames are dropped with a
/// warning (the protocol has no delivery guarantee to preserve).
#[derive(Clone)]
pub struct ManagerHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl ManagerHandle {
    /// Queues one text frame for sending.
    ///
    /// If no connection is open when the manager processes this, the
    /// frame is dropped with a logged warning — callers must not
    /// assume delivery.
    pub fn send_frame(&self, frame: String) {
        if self.commands.send(Command::Send(frame)).is_err() {
            tracing::warn!("connection manager gone — frame dropped");
        }
    }

    /// Forcibly closes the current connection (if any) and immediately
    /// re-initiates one, superseding any pending reconnect timer.
    ///
    /// Used to rejoin as a fresh participant; the caller is
    /// responsible for clearing session-level state (identity, roster).
    pub fn restart(&self) {
        let _ = self.commands.send(Command::Restart);
    }

    /// Stops the manager. The event channel closes once the actor has
    /// wound down.
    pub fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown);
    }
}

/// The connection manager actor. Constructed via [`ConnectionManager::spawn`].
pub struct ConnectionManager<C: Connector> {
    connector: C,
    config: TransportConfig,
    commands: mpsc::UnboundedReceiver<Command>,
    events: mpsc::Sender<TransportEvent>,
}

impl<C: Connector> ConnectionManager<C> {
    /// Spawns the manager task and begins connecting immediately.
    ///
    /// Returns a handle for commands and the ordered event stream.
    /// Spawning twice would create two independent connections — the
    /// caller owns exactly one manager per session.
    pub fn spawn(
        connector: C,
        config: TransportConfig,
    ) -> (ManagerHandle, mpsc::Receiver<TransportEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (evt_tx, evt_rx) =
            mpsc::channel(config.event_channel_capacity.max(1));

        let actor = Self {
            connector,
            config,
            commands: cmd_rx,
            events: evt_tx,
        };
        tokio::spawn(actor.run());

        (ManagerHandle { commands: cmd_tx }, evt_rx)
    }

    async fn run(mut self) {
        tracing::debug!("connection manager started");

        while let Some(mut conn) = self.establish().await {
            if self.events.send(TransportEvent::Opened).await.is_err() {
                break;
            }

            match self.pump(&mut conn).await {
                PumpEnd::Lost => {
                    if self.events.send(TransportEvent::Closed).await.is_err()
                    {
                        break;
                    }
                    if !self.wait_out_delay().await {
                        break;
                    }
                }
                PumpEnd::Restart => {
                    tracing::info!("restart requested — closing connection");
                    let _ = conn.close().await;
                    if self.events.send(TransportEvent::Closed).await.is_err()
                    {
                        break;
                    }
                    // No delay: restart reconnects immediately.
                }
                PumpEnd::Shutdown => {
                    let _ = conn.close().await;
                    break;
                }
            }
        }

        tracing::debug!("connection manager stopped");
    }

    /// Attempts to connect, retrying at the fixed cadence until a
    /// connection opens. Returns `None` on shutdown.
    async fn establish(&mut self) -> Option<C::Connection> {
        loop {
            match self.connector.connect().await {
                Ok(conn) => return Some(conn),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        retry_ms = self.config.reconnect_delay.as_millis() as u64,
                        "connect failed — will retry"
                    );
                    if !self.wait_out_delay().await {
                        return None;
                    }
                }
            }
        }
    }

    /// Waits out the reconnect delay while staying responsive to
    /// commands: sends are dropped with a warning, a restart ends the
    /// wait immediately, shutdown returns `false`.
    async fn wait_out_delay(&mut self) -> bool {
        let deadline = tokio::time::sleep(self.config.reconnect_delay);
        tokio::pin!(deadline);
        loop {
            tokio::select! {
                _ = &mut deadline => return true,
                cmd = self.commands.recv() => match cmd {
                    Some(Command::Send(_)) => {
                        tracing::warn!(
                            "no open connection — dropping outbound frame"
                        );
                    }
                    Some(Command::Restart) => return true,
                    Some(Command::Shutdown) | None => return false,
                },
            }
        }
    }

    /// Shuttles frames both ways over one live connection until it
    /// ends, one way or another.
    async fn pump(&mut self, conn: &mut C::Connection) -> PumpEnd {
        loop {
            tokio::select! {
                cmd = self.commands.recv() => match cmd {
                    Some(Command::Send(frame)) => {
                        if let Err(e) = conn.send(&frame).await {
                            tracing::warn!(
                                error = %e,
                                "send failed — connection presumed lost"
                            );
                            return PumpEnd::Lost;
                        }
                    }
                    Some(Command::Restart) => return PumpEnd::Restart,
                    Some(Command::Shutdown) | None => return PumpEnd::Shutdown,
                },
                frame = conn.recv() => match frame {
                    Ok(Some(frame)) => {
                        if self
                            .events
                            .send(TransportEvent::Frame(frame))
                            .await
                            .is_err()
                        {
                            return PumpEnd::Shutdown;
                        }
                    }
                    Ok(None) => {
                        tracing::info!("connection closed by authority");
                        return PumpEnd::Lost;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "receive failed");
                        return PumpEnd::Lost;
                    }
                },
            }
        }
    }
}
