//! Wire protocol types for the Flaplink session protocol.
//!
//! Every message exchanged with the session authority is a single
//! newline-free JSON text frame. The `type` field is the sole
//! discriminator; each kind carries only the fields relevant to it.
//! Field names (`playerID`, `allPlayerIDs`, ...) match what the
//! authority emits exactly — do not "fix" the casing.

use serde::{Deserialize, Serialize};

use std::fmt;

/// A player's identity, assigned by the authority on connect.
///
/// The authority hands out opaque UUID strings; we never parse or
/// generate them locally, so a newtype over `String` is enough.
/// The wrapper keeps a `PlayerId` from being confused with any other
/// string in a signature, and `#[serde(transparent)]` makes it
/// serialize as the bare string the wire format expects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Creates a `PlayerId` from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A protocol message, tagged by its `type` field.
///
/// Server → client unless noted. The JSON shapes:
///
/// ```text
/// {"type":"connect","playerID":"p1","allPlayerIDs":["p1","p2"]}
/// {"type":"players","players":["p1","p2"]}
/// {"type":"countdown","countdown":3}
/// {"type":"playing"}
/// {"type":"jump","playerID":"p1"}        (bidirectional)
/// {"type":"die","playerID":"p1"}         (bidirectional)
/// {"type":"playerDie","playerID":"p1"}
/// {"type":"gameover"}
/// ```
///
/// Frames whose `type` is unrecognized fail to decode; callers drop
/// them (never fatal). Extra fields the authority tacks on are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    /// Assigns/announces an identity, optionally with the full roster.
    ///
    /// The first `connect` a client receives after opening carries its
    /// own identity; later ones announce joining peers.
    Connect {
        #[serde(rename = "playerID")]
        player_id: PlayerId,
        #[serde(
            rename = "allPlayerIDs",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        all_player_ids: Option<Vec<PlayerId>>,
    },

    /// Full roster snapshot.
    Players { players: Vec<PlayerId> },

    /// Seconds remaining before play begins. Values decrease toward 0.
    Countdown { countdown: u32 },

    /// Transition to active play.
    Playing,

    /// A player jumped.
    Jump {
        #[serde(rename = "playerID")]
        player_id: PlayerId,
    },

    /// A player died.
    Die {
        #[serde(rename = "playerID")]
        player_id: PlayerId,
    },

    /// Authoritative death notice (roster variant of `die`).
    #[serde(rename = "playerDie")]
    PlayerDie {
        #[serde(rename = "playerID")]
        player_id: PlayerId,
    },

    /// The session ended.
    GameOver,
}

impl Message {
    /// The wire name of this message's kind (the `type` tag).
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Connect { .. } => "connect",
            Message::Players { .. } => "players",
            Message::Countdown { .. } => "countdown",
            Message::Playing => "playing",
            Message::Jump { .. } => "jump",
            Message::Die { .. } => "die",
            Message::PlayerDie { .. } => "playerDie",
            Message::GameOver => "gameover",
        }
    }
}
