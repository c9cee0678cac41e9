//! Single-owner event dispatch.
//!
//! The client loop translates decoded messages (and a few local
//! happenings) into typed callbacks. Each event has exactly one handler
//! slot: registering a second handler for the same event replaces the
//! first, so ownership of an event is always unambiguous. Events with
//! no registered handler are dropped.
//!
//! Handlers run synchronously on the client task and must not block;
//! hand heavy work off through a channel.

use flaplink_protocol::PlayerId;
use flaplink_sim::DeathCause;
use tracing::{debug, trace};

/// A registered event handler.
pub type Handler<T> = Box<dyn FnMut(T) + Send>;

/// A rendering snapshot emitted once per simulation frame while a
/// round is playing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSnapshot {
    /// Frame number within the current clock run.
    pub frame: u64,
    /// The local actor's vertical position (top edge, world units).
    pub actor_y: f32,
    /// How far the level has scrolled toward the actor.
    pub scroll: f32,
}

/// The event registry. One slot per event kind.
#[derive(Default)]
pub struct Dispatcher {
    connected: Option<Handler<PlayerId>>,
    player_joined: Option<Handler<PlayerId>>,
    roster: Option<Handler<Vec<PlayerId>>>,
    countdown: Option<Handler<u32>>,
    playing: Option<Handler<()>>,
    player_jumped: Option<Handler<PlayerId>>,
    player_died: Option<Handler<PlayerId>>,
    game_over: Option<Handler<()>>,
    local_death: Option<Handler<DeathCause>>,
    frame: Option<Handler<FrameSnapshot>>,
}

/// Stores `handler` in `slot`, logging if it displaces a previous one.
fn install<T>(slot: &mut Option<Handler<T>>, event: &str, handler: Handler<T>) {
    if slot.replace(handler).is_some() {
        debug!(event, "handler replaced");
    }
}

/// Runs the handler in `slot`, or drops the event if none is set.
fn emit<T>(slot: &mut Option<Handler<T>>, event: &str, payload: T) {
    match slot {
        Some(handler) => handler(payload),
        None => trace!(event, "no handler — event dropped"),
    }
}

impl Dispatcher {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The authority assigned this client its own identity.
    pub fn on_connected(&mut self, f: impl FnMut(PlayerId) + Send + 'static) {
        install(&mut self.connected, "connected", Box::new(f));
    }

    /// A peer joined the session.
    pub fn on_player_joined(
        &mut self,
        f: impl FnMut(PlayerId) + Send + 'static,
    ) {
        install(&mut self.player_joined, "player_joined", Box::new(f));
    }

    /// A full roster snapshot arrived.
    pub fn on_roster(&mut self, f: impl FnMut(Vec<PlayerId>) + Send + 'static) {
        install(&mut self.roster, "roster", Box::new(f));
    }

    /// A countdown tick arrived (seconds remaining).
    pub fn on_countdown(&mut self, f: impl FnMut(u32) + Send + 'static) {
        install(&mut self.countdown, "countdown", Box::new(f));
    }

    /// The round started.
    pub fn on_playing(&mut self, f: impl FnMut(()) + Send + 'static) {
        install(&mut self.playing, "playing", Box::new(f));
    }

    /// A peer jumped.
    pub fn on_player_jumped(
        &mut self,
        f: impl FnMut(PlayerId) + Send + 'static,
    ) {
        install(&mut self.player_jumped, "player_jumped", Box::new(f));
    }

    /// The authority reported a player's death.
    pub fn on_player_died(
        &mut self,
        f: impl FnMut(PlayerId) + Send + 'static,
    ) {
        install(&mut self.player_died, "player_died", Box::new(f));
    }

    /// The authority ended the round.
    pub fn on_game_over(&mut self, f: impl FnMut(()) + Send + 'static) {
        install(&mut self.game_over, "game_over", Box::new(f));
    }

    /// The local simulation hit a terminal condition. The session is
    /// provisionally over; the authority's `gameover` confirms it.
    pub fn on_local_death(
        &mut self,
        f: impl FnMut(DeathCause) + Send + 'static,
    ) {
        install(&mut self.local_death, "local_death", Box::new(f));
    }

    /// One simulation frame advanced (for rendering).
    pub fn on_frame(
        &mut self,
        f: impl FnMut(FrameSnapshot) + Send + 'static,
    ) {
        install(&mut self.frame, "frame", Box::new(f));
    }

    pub(crate) fn emit_connected(&mut self, id: PlayerId) {
        emit(&mut self.connected, "connected", id);
    }

    pub(crate) fn emit_player_joined(&mut self, id: PlayerId) {
        emit(&mut self.player_joined, "player_joined", id);
    }

    pub(crate) fn emit_roster(&mut self, players: Vec<PlayerId>) {
        emit(&mut self.roster, "roster", players);
    }

    pub(crate) fn emit_countdown(&mut self, seconds: u32) {
        emit(&mut self.countdown, "countdown", seconds);
    }

    pub(crate) fn emit_playing(&mut self) {
        emit(&mut self.playing, "playing", ());
    }

    pub(crate) fn emit_player_jumped(&mut self, id: PlayerId) {
        emit(&mut self.player_jumped, "player_jumped", id);
    }

    pub(crate) fn emit_player_died(&mut self, id: PlayerId) {
        emit(&mut self.player_died, "player_died", id);
    }

    pub(crate) fn emit_game_over(&mut self) {
        emit(&mut self.game_over, "game_over", ());
    }

    pub(crate) fn emit_local_death(&mut self, cause: DeathCause) {
        emit(&mut self.local_death, "local_death", cause);
    }

    pub(crate) fn emit_frame(&mut self, snapshot: FrameSnapshot) {
        emit(&mut self.frame, "frame", snapshot);
    }
}
