//! Wire protocol for Flaplink.
//!
//! This crate defines the language spoken with the session authority:
//!
//! - **Types** ([`Message`], [`PlayerId`]) — the structures that travel
//!   on the wire as JSON text frames.
//! - **Codec** ([`FrameCodec`] trait, [`JsonCodec`]) — how messages are
//!   converted to/from frames.
//! - **Errors** ([`ProtocolError`]) — what can go wrong on the way.
//!
//! The protocol layer sits between transport (raw text frames) and the
//! session layer (player identity and phase). It knows nothing about
//! connections or game state.
//!
//! ```text
//! Transport (frames) → Protocol (Message) → Session / game logic
//! ```

mod codec;
mod error;
mod types;

pub use codec::FrameCodec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{Message, PlayerId};
