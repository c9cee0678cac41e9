//! The session phase machine.
//!
//! Owns the [`SessionPhase`] and the [`Roster`] exclusively. All
//! transitions are driven by authority broadcasts except
//! [`SessionMachine::local_game_over`], which the physics loop raises
//! on a terminal collision; that transition is provisional until the
//! authority's own `gameover` confirms it.

use flaplink_protocol::PlayerId;

use crate::{Roster, SessionPhase};

/// Tracks the session's lifecycle phase and the roster of known players.
#[derive(Debug, Default)]
pub struct SessionMachine {
    phase: SessionPhase,
    roster: Roster,
    /// Set when the game-over was raised locally and the authority has
    /// not confirmed it yet. While set, outbound actions stop.
    provisional: bool,
}

impl SessionMachine {
    /// Creates a machine in the initial `Waiting` phase with an empty
    /// roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The roster of known players.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Mutable roster access (position updates from the physics loop).
    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    /// Whether the current game-over is a local, unconfirmed one.
    pub fn is_provisional_game_over(&self) -> bool {
        self.provisional && self.phase == SessionPhase::GameOver
    }

    /// Whether outbound action messages may still be sent for this
    /// session. Sends stop once a provisional game-over stands
    /// unconfirmed, so a partially-connected client cannot keep
    /// emitting actions into a round it already left.
    pub fn actions_allowed(&self) -> bool {
        !self.is_provisional_game_over()
    }

    /// Applies a `countdown` broadcast.
    pub fn on_countdown(&mut self, seconds: u32) {
        match self.phase {
            SessionPhase::Waiting | SessionPhase::Countdown(_) => {
                self.phase = SessionPhase::Countdown(seconds);
            }
            _ => {
                tracing::debug!(
                    phase = %self.phase,
                    seconds,
                    "ignoring countdown outside waiting/countdown"
                );
            }
        }
    }

    /// Applies a `playing` broadcast.
    pub fn on_playing(&mut self) {
        match self.phase {
            SessionPhase::Waiting | SessionPhase::Countdown(_) => {
                tracing::info!("session is now playing");
                self.phase = SessionPhase::Playing;
            }
            _ => {
                tracing::debug!(
                    phase = %self.phase,
                    "ignoring playing broadcast"
                );
            }
        }
    }

    /// Applies the authority's `gameover` broadcast. Always wins: it
    /// confirms (or supersedes) any provisional local game-over.
    pub fn on_game_over(&mut self) {
        if self.provisional {
            tracing::debug!("authority confirmed local game-over");
        }
        self.phase = SessionPhase::GameOver;
        self.provisional = false;
    }

    /// Raises a game-over from the local physics loop (terminal
    /// collision). Provisional: stands until [`Self::on_game_over`]
    /// confirms it, and suppresses further outbound actions meanwhile.
    ///
    /// Returns `false` (and does nothing) outside `Playing`.
    pub fn local_game_over(&mut self) -> bool {
        if self.phase != SessionPhase::Playing {
            return false;
        }
        tracing::info!("local game-over (awaiting authority confirmation)");
        self.phase = SessionPhase::GameOver;
        self.provisional = true;
        true
    }

    /// Applies a `connect` broadcast: the joining identity plus an
    /// optional full roster. Merging is idempotent; `local_id` marks
    /// which actor is this client's own.
    pub fn on_connect(
        &mut self,
        player_id: PlayerId,
        all_player_ids: Option<Vec<PlayerId>>,
        local_id: Option<&PlayerId>,
    ) {
        let local = local_id.is_some_and(|own| *own == player_id);
        self.roster.merge_one(player_id, local);
        if let Some(ids) = all_player_ids {
            self.roster.merge_all(ids, local_id);
        }
    }

    /// Applies a `players` roster snapshot.
    pub fn on_players(
        &mut self,
        players: Vec<PlayerId>,
        local_id: Option<&PlayerId>,
    ) {
        self.roster.merge_all(players, local_id);
    }

    /// Applies a `die`/`playerDie` broadcast: marks the named actor
    /// dead. Authoritative — overrides whatever the local sim thinks.
    pub fn on_player_die(&mut self, player_id: &PlayerId) {
        self.roster.mark_dead(player_id);
    }

    /// Full session reset: back to `Waiting` with an empty roster.
    /// Used on restart, before rejoining as a fresh participant.
    pub fn reset(&mut self) {
        tracing::info!("session reset");
        self.phase = SessionPhase::Waiting;
        self.provisional = false;
        self.roster.clear();
    }
}
