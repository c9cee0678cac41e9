//! This client's own identity, as assigned by the authority.

use flaplink_protocol::PlayerId;

use crate::SessionError;

/// Holds at most one [`PlayerId`] for "this client".
///
/// The authority assigns identity by pushing a `connect` message after
/// every successful open; the first one received is ours, later ones
/// announce peers. Identity is connection-scoped: it is cleared on
/// restart and on connection loss, so the next open adopts a fresh
/// assignment instead of misattributing peers.
///
/// Outbound actions must be tagged via [`LocalIdentity::tag`], which
/// refuses while unassigned — early actions are suppressed rather than
/// sent unattributable.
#[derive(Debug, Default)]
pub struct LocalIdentity {
    id: Option<PlayerId>,
}

impl LocalIdentity {
    /// Creates an unassigned identity holder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopts `id` as our own if none is held yet. Returns `true` if
    /// the assignment happened now (i.e. this `connect` was ours).
    pub fn adopt_if_unset(&mut self, id: &PlayerId) -> bool {
        if self.id.is_some() {
            return false;
        }
        tracing::info!(player_id = %id, "identity assigned");
        self.id = Some(id.clone());
        true
    }

    /// The held identity, if assigned.
    pub fn get(&self) -> Option<&PlayerId> {
        self.id.as_ref()
    }

    /// Whether an identity is held.
    pub fn is_assigned(&self) -> bool {
        self.id.is_some()
    }

    /// Returns the identity for tagging an outbound action.
    ///
    /// # Errors
    /// [`SessionError::IdentityUnassigned`] before assignment; the
    /// caller suppresses the action instead of sending it untagged.
    pub fn tag(&self) -> Result<PlayerId, SessionError> {
        self.id.clone().ok_or(SessionError::IdentityUnassigned)
    }

    /// Forgets the held identity (restart or connection loss).
    pub fn clear(&mut self) {
        if let Some(id) = self.id.take() {
            tracing::debug!(player_id = %id, "identity cleared");
        }
    }
}
