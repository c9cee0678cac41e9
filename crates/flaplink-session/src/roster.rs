//! The roster: every player identity the client knows about, with its
//! locally-held actor state.

use std::collections::HashMap;

use flaplink_protocol::PlayerId;

/// Local actor state for one player in the roster.
///
/// The physics loop owns the local actor's transient motion; the
/// roster's `alive` flag is the authoritative life/death record once
/// a `die`/`playerDie` broadcast lands.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    /// Authoritative alive status.
    pub alive: bool,
    /// Vertical position, for rendering. Top of the actor, in world
    /// units from the top of the viewport.
    pub y: f32,
    /// Whether this actor is the player on this client.
    pub local: bool,
}

impl Actor {
    fn new(local: bool) -> Self {
        Self {
            alive: true,
            y: 0.0,
            local,
        }
    }
}

/// Mapping from player identity to actor state.
///
/// Merges are idempotent and additive: every identity named in a
/// roster broadcast gets exactly one actor, identities seen before are
/// left untouched, and actors are never dropped except by
/// [`Roster::clear`] on a full session reset.
#[derive(Debug, Default)]
pub struct Roster {
    actors: HashMap<PlayerId, Actor>,
}

impl Roster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one identity. Returns `true` if it was newly seen.
    pub fn merge_one(&mut self, id: PlayerId, local: bool) -> bool {
        if self.actors.contains_key(&id) {
            return false;
        }
        tracing::debug!(player_id = %id, local, "roster: new actor");
        self.actors.insert(id, Actor::new(local));
        true
    }

    /// Merges a full snapshot, marking the actor matching `local_id`
    /// (if any) as this client's own.
    pub fn merge_all<I>(&mut self, ids: I, local_id: Option<&PlayerId>)
    where
        I: IntoIterator<Item = PlayerId>,
    {
        for id in ids {
            let local = local_id.is_some_and(|own| *own == id);
            self.merge_one(id, local);
        }
    }

    /// Marks the named actor dead. Returns `false` for unknown ids
    /// (logged and ignored — the broadcast may outrun the roster).
    pub fn mark_dead(&mut self, id: &PlayerId) -> bool {
        match self.actors.get_mut(id) {
            Some(actor) => {
                actor.alive = false;
                true
            }
            None => {
                tracing::debug!(player_id = %id, "death for unknown player");
                false
            }
        }
    }

    /// Updates an actor's vertical position. Unknown ids are ignored.
    pub fn set_position(&mut self, id: &PlayerId, y: f32) {
        if let Some(actor) = self.actors.get_mut(id) {
            actor.y = y;
        }
    }

    /// Looks up one actor.
    pub fn get(&self, id: &PlayerId) -> Option<&Actor> {
        self.actors.get(id)
    }

    /// Whether the identity is known.
    pub fn contains(&self, id: &PlayerId) -> bool {
        self.actors.contains_key(id)
    }

    /// This client's own entry, if the roster has one.
    pub fn local_player(&self) -> Option<(&PlayerId, &Actor)> {
        self.actors.iter().find(|(_, actor)| actor.local)
    }

    /// Iterates over all known players.
    pub fn iter(&self) -> impl Iterator<Item = (&PlayerId, &Actor)> {
        self.actors.iter()
    }

    /// Number of known players.
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Drops every actor. Only valid as part of a full session reset.
    pub fn clear(&mut self) {
        self.actors.clear();
    }
}
