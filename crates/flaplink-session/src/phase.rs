use std::fmt;

/// The session's lifecycle phase. Exactly one is active at a time.
///
/// ```text
/// Waiting ──countdown──→ Countdown(n) ──playing──→ Playing
///    ↑                        │                       │
///    │                        └──────playing──────────┤ gameover /
///    └───────────reset────────── GameOver ←───────────┘ local death
/// ```
///
/// All transitions are authority-driven except the local provisional
/// game-over raised by the physics loop (see
/// [`SessionMachine::local_game_over`](crate::SessionMachine::local_game_over)).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Initial state; no round is scheduled yet.
    Waiting,
    /// A round starts in `n` seconds. Subsequent broadcasts carry
    /// decreasing values toward 0.
    Countdown(u32),
    /// The round is live; the physics loop runs.
    Playing,
    /// The round ended.
    GameOver,
}

impl Default for SessionPhase {
    fn default() -> Self {
        SessionPhase::Waiting
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Waiting => write!(f, "waiting"),
            SessionPhase::Countdown(n) => write!(f, "countdown({n})"),
            SessionPhase::Playing => write!(f, "playing"),
            SessionPhase::GameOver => write!(f, "game-over"),
        }
    }
}
