//! The client: one task tying transport, protocol, session, and the
//! local simulation together.
//!
//! The client is an actor, like the connection manager underneath it:
//! it owns the session machine, identity, dispatcher, frame clock, and
//! simulation exclusively, and multiplexes three inputs in one
//! `select!` loop — transport events, simulation frames, and commands
//! from [`ClientHandle`]s. Nothing here is shared or locked; every
//! state change happens on this task in a deterministic order.

use flaplink_protocol::{FrameCodec, JsonCodec, Message};
use flaplink_session::{LocalIdentity, SessionMachine, SessionPhase};
use flaplink_sim::{FrameClock, FrameInfo, SimConfig, Simulation, StepOutcome};
use flaplink_transport::{
    ConnectionManager, Connector, ManagerHandle, TransportConfig,
    TransportEvent,
};
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::dispatch::{Dispatcher, FrameSnapshot};

/// Configuration for a [`Client`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Connection lifecycle settings (reconnect cadence and channel
    /// sizing).
    pub transport: TransportConfig,
    /// Local simulation settings (frame rate, geometry, level).
    pub sim: SimConfig,
}

enum Command {
    Jump,
    Restart,
    Shutdown,
}

/// Handle to a running [`Client`]. Cheap to clone.
///
/// All methods are fire-and-forget; the client task applies them in
/// arrival order.
#[derive(Clone)]
pub struct ClientHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl ClientHandle {
    /// Requests a jump for the local actor.
    ///
    /// Applied only while a round is playing, the actor is not already
    /// rising, and an identity is assigned; otherwise the request is
    /// dropped with a log line. A successful jump moves the local actor
    /// and reports the action to the authority.
    pub fn jump(&self) {
        if self.commands.send(Command::Jump).is_err() {
            warn!("client gone — jump dropped");
        }
    }

    /// Leaves the current session and rejoins as a fresh participant:
    /// the connection is torn down and reopened immediately, and all
    /// session state (identity, roster, phase) is reset.
    pub fn restart(&self) {
        let _ = self.commands.send(Command::Restart);
    }

    /// Stops the client and closes its connection.
    pub fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown);
    }
}

/// The client actor. Constructed via [`Client::spawn`].
pub struct Client {
    manager: ManagerHandle,
    events: mpsc::Receiver<TransportEvent>,
    commands: mpsc::UnboundedReceiver<Command>,
    codec: JsonCodec,
    dispatcher: Dispatcher,
    machine: SessionMachine,
    identity: LocalIdentity,
    clock: FrameClock,
    sim: Simulation,
}

impl Client {
    /// Spawns the client task and begins connecting immediately.
    ///
    /// The dispatcher is moved in; register handlers before spawning.
    pub fn spawn(
        connector: impl Connector,
        config: ClientConfig,
        dispatcher: Dispatcher,
    ) -> ClientHandle {
        let (manager, events) =
            ConnectionManager::spawn(connector, config.transport.clone());
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let actor = Self {
            manager,
            events,
            commands: cmd_rx,
            codec: JsonCodec,
            dispatcher,
            machine: SessionMachine::new(),
            identity: LocalIdentity::new(),
            clock: FrameClock::new(config.sim.frame_rate_hz),
            sim: Simulation::new(config.sim),
        };
        tokio::spawn(actor.run());

        ClientHandle { commands: cmd_tx }
    }

    async fn run(mut self) {
        debug!("client started");

        loop {
            tokio::select! {
                event = self.events.recv() => match event {
                    Some(TransportEvent::Opened) => {
                        // Nothing proactive: the authority pushes
                        // `connect` on its own after an open.
                        info!("connection open — waiting for identity");
                    }
                    Some(TransportEvent::Frame(frame)) => {
                        self.on_frame(&frame);
                    }
                    Some(TransportEvent::Closed) => self.on_closed(),
                    None => {
                        debug!("transport gone — client stopping");
                        break;
                    }
                },
                frame = self.clock.tick() => self.on_tick(frame),
                cmd = self.commands.recv() => match cmd {
                    Some(Command::Jump) => self.on_jump(),
                    Some(Command::Restart) => self.on_restart(),
                    Some(Command::Shutdown) | None => {
                        self.manager.shutdown();
                        break;
                    }
                },
            }
        }

        debug!("client stopped");
    }

    /// Decodes and routes one inbound frame. Malformed or unknown
    /// frames are logged and dropped, never fatal.
    fn on_frame(&mut self, frame: &str) {
        let msg = match self.codec.decode(frame) {
            Ok(msg) => msg,
            Err(e) => {
                debug!(error = %e, "undecodable frame dropped");
                return;
            }
        };
        trace!(kind = msg.kind(), "message received");

        match msg {
            Message::Connect {
                player_id,
                all_player_ids,
            } => {
                // The first `connect` after an open carries our own
                // identity; later ones announce joining peers.
                let ours = self.identity.adopt_if_unset(&player_id);
                if ours {
                    // A fresh identity means a fresh session: whatever
                    // phase or roster survived the previous connection
                    // (a finished round, a round interrupted mid-play)
                    // is stale, including the actor marked as ours.
                    self.machine.reset();
                }
                self.machine.on_connect(
                    player_id.clone(),
                    all_player_ids,
                    self.identity.get(),
                );
                if ours {
                    self.dispatcher.emit_connected(player_id);
                } else {
                    self.dispatcher.emit_player_joined(player_id);
                }
            }
            Message::Players { players } => {
                self.machine
                    .on_players(players.clone(), self.identity.get());
                self.dispatcher.emit_roster(players);
            }
            Message::Countdown { countdown } => {
                self.machine.on_countdown(countdown);
                self.dispatcher.emit_countdown(countdown);
            }
            Message::Playing => {
                let was_playing =
                    self.machine.phase() == SessionPhase::Playing;
                self.machine.on_playing();
                // Fresh round only on an actual transition; a repeated
                // broadcast must not restart a round in progress.
                if !was_playing
                    && self.machine.phase() == SessionPhase::Playing
                {
                    self.sim.restart();
                    self.clock.resume();
                }
                self.dispatcher.emit_playing();
            }
            Message::Jump { player_id } => {
                if self.identity.get() == Some(&player_id) {
                    // Our own action echoed back; already applied.
                    trace!("own jump echo dropped");
                } else {
                    self.dispatcher.emit_player_jumped(player_id);
                }
            }
            Message::Die { player_id } | Message::PlayerDie { player_id } => {
                self.machine.on_player_die(&player_id);
                self.dispatcher.emit_player_died(player_id);
            }
            Message::GameOver => {
                self.machine.on_game_over();
                self.clock.pause();
                self.dispatcher.emit_game_over();
            }
        }
    }

    /// The connection dropped (a reconnect is already scheduled).
    /// Identity is connection-scoped: the next open brings a fresh
    /// assignment, so the held one must not leak across.
    fn on_closed(&mut self) {
        info!("connection lost");
        self.identity.clear();
        self.clock.pause();
    }

    fn on_tick(&mut self, info: FrameInfo) {
        let outcome = self.sim.step(info.dt.as_secs_f32());

        if let Ok(id) = self.identity.tag() {
            self.machine.roster_mut().set_position(&id, self.sim.actor_y());
        }
        self.dispatcher.emit_frame(FrameSnapshot {
            frame: info.frame,
            actor_y: self.sim.actor_y(),
            scroll: self.sim.scroll(),
        });

        if let StepOutcome::Dead(cause) = outcome {
            self.clock.pause();
            if self.machine.local_game_over() {
                self.dispatcher.emit_local_death(cause);
                self.report_death();
            }
        }
    }

    /// Reports the local death to the authority, tagged with our
    /// identity. Suppressed while unassigned — an unattributable death
    /// is useless to the session.
    fn report_death(&mut self) {
        match self.identity.tag() {
            Ok(player_id) => self.send(Message::Die { player_id }),
            Err(e) => warn!(error = %e, "death not reported"),
        }
    }

    fn on_jump(&mut self) {
        if self.machine.phase() != SessionPhase::Playing {
            debug!(phase = %self.machine.phase(), "jump outside playing ignored");
            return;
        }
        if !self.machine.actions_allowed() {
            debug!("jump suppressed — game-over pending confirmation");
            return;
        }
        let player_id = match self.identity.tag() {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "jump suppressed");
                return;
            }
        };
        // The re-trigger guard applies locally and on the wire alike:
        // a jump that did not move the actor is not announced.
        if self.sim.jump() {
            self.send(Message::Jump { player_id });
        }
    }

    fn on_restart(&mut self) {
        info!("restarting session");
        self.manager.restart();
        self.identity.clear();
        self.machine.reset();
        self.clock.pause();
        self.sim.restart();
    }

    fn send(&self, msg: Message) {
        match self.codec.encode(&msg) {
            Ok(frame) => self.manager.send_frame(frame),
            Err(e) => warn!(error = %e, kind = msg.kind(), "encode failed"),
        }
    }
}
