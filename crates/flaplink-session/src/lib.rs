//! Session state for Flaplink.
//!
//! This crate tracks everything the client knows about the session
//! beyond the wire: which lifecycle phase it is in, who is playing,
//! and who "we" are.
//!
//! 1. **Phase machine** ([`SessionMachine`]) — authority-driven
//!    transitions through waiting → countdown → playing → game-over,
//!    with a provisional local game-over awaiting confirmation.
//! 2. **Roster** ([`Roster`]) — known player identities and their
//!    actor state, merged idempotently from roster broadcasts.
//! 3. **Identity** ([`LocalIdentity`]) — this client's own assigned
//!    identity, used to tag outbound actions.
//!
//! # How it fits in the stack
//!
//! ```text
//! Client facade (above)   ← routes decoded messages here
//!     ↕
//! Session layer (this crate)  ← phase, roster, identity
//!     ↕
//! Protocol layer (below)  ← provides PlayerId and Message types
//! ```

mod error;
mod identity;
mod machine;
mod phase;
mod roster;

pub use error::SessionError;
pub use identity::LocalIdentity;
pub use machine::SessionMachine;
pub use phase::SessionPhase;
pub use roster::{Actor, Roster};
