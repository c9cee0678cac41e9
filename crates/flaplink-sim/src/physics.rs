//! The local actor's vertical kinematics and per-frame collision.

use tracing::{debug, info, warn};

use crate::{Level, LevelConfig, Rect};

/// Why the local actor died.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    /// Flew off the top of the viewport.
    OutOfBoundsTop,
    /// Fell past the bottom of the viewport.
    OutOfBoundsBottom,
    /// Clipped the obstacle at this index.
    Collision { obstacle: usize },
}

/// Result of one simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The actor is alive; keep ticking.
    Running,
    /// Terminal: the actor died this step (or a previous one — the
    /// outcome is sticky so a stray late tick cannot resurrect it).
    Dead(DeathCause),
}

/// Configuration for the local simulation.
///
/// Units are arbitrary "world units" — the browser build uses CSS
/// pixels; nothing here depends on the choice as long as it is
/// consistent.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Frame clock rate driving the loop. Default: 60.
    pub frame_rate_hz: u32,
    /// Viewport height. Default: 720.
    pub viewport_height: f32,
    /// The actor's fixed horizontal position (left edge). Default: 120.
    pub actor_x: f32,
    /// The actor's square bounding-box size. Default: 48.
    pub actor_size: f32,
    /// How far one jump displaces the actor upward. Default: 100.
    pub jump_height: f32,
    /// How long the upward displacement takes, seconds. Default: 0.2.
    /// While it lasts, further jump requests are ignored.
    pub jump_duration: f32,
    /// Downward acceleration once a jump eases off, units/s².
    /// Default: 1440 (a rest-to-bottom fall across the default
    /// viewport takes about a second).
    pub gravity: f32,
    /// Level generation parameters.
    pub level: LevelConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            frame_rate_hz: 60,
            viewport_height: 720.0,
            actor_x: 120.0,
            actor_size: 48.0,
            jump_height: 100.0,
            jump_duration: 0.2,
            gravity: 1440.0,
            level: LevelConfig::default(),
        }
    }
}

impl SimConfig {
    /// Clamps out-of-range values so the config is safe to simulate
    /// from. Called by [`Simulation::new`].
    pub fn validated(mut self) -> Self {
        if self.viewport_height <= 0.0 {
            warn!("non-positive viewport_height — using default");
            self.viewport_height = SimConfig::default().viewport_height;
        }
        if self.jump_duration <= 0.0 {
            warn!("non-positive jump_duration — using default");
            self.jump_duration = SimConfig::default().jump_duration;
        }
        if self.gravity <= 0.0 {
            warn!("non-positive gravity — using default");
            self.gravity = SimConfig::default().gravity;
        }
        self.actor_size = self.actor_size.max(1.0);
        self.level = self.level.validated();
        self
    }
}

/// The local actor's transient motion state.
///
/// Only motion lives here; authoritative alive/dead status belongs to
/// the session roster once the authority has spoken.
#[derive(Debug)]
struct LocalActor {
    /// Top edge, world units from the viewport top.
    y: f32,
    /// Vertical velocity, positive downward.
    velocity: f32,
    /// Upward displacement in progress; re-triggers are ignored while
    /// set so concurrent jumps cannot compound velocity.
    jumping: bool,
    /// Seconds of upward displacement left.
    jump_remaining: f32,
}

impl LocalActor {
    fn spawn(config: &SimConfig) -> Self {
        Self {
            // Start vertically centered, falling from rest.
            y: (config.viewport_height - config.actor_size) / 2.0,
            velocity: 0.0,
            jumping: false,
            jump_remaining: 0.0,
        }
    }

    fn jump(&mut self, config: &SimConfig) -> bool {
        if self.jumping {
            return false;
        }
        self.jumping = true;
        self.jump_remaining = config.jump_duration;
        // Constant upward speed covering jump_height over jump_duration.
        self.velocity = -(config.jump_height / config.jump_duration);
        true
    }

    fn advance(&mut self, config: &SimConfig, dt: f32) {
        if self.jumping {
            // The last rising step is clamped to the time actually
            // left, so rounding in `dt` can never stretch the rise
            // past the configured jump height.
            let step = dt.min(self.jump_remaining);
            self.y += self.velocity * step;
            self.jump_remaining -= dt;
            if self.jump_remaining <= 0.0 {
                // Displacement spent: ease back into the fall.
                self.jumping = false;
                self.velocity = 0.0;
            }
        } else {
            self.velocity += config.gravity * dt;
            self.y += self.velocity * dt;
        }
    }
}

/// The per-round local simulation: one actor against one obstacle run.
pub struct Simulation {
    config: SimConfig,
    level: Level,
    actor: LocalActor,
    /// How far the level has scrolled toward the actor.
    scroll: f32,
    death: Option<DeathCause>,
}

impl Simulation {
    /// Builds a fresh round: generates the level and spawns the actor.
    pub fn new(config: SimConfig) -> Self {
        let config = config.validated();
        let level = Level::generate(&config.level);
        let actor = LocalActor::spawn(&config);
        debug!(obstacles = level.len(), "simulation ready");
        Self {
            config,
            level,
            actor,
            scroll: 0.0,
            death: None,
        }
    }

    /// Advances one fixed step and evaluates the terminal conditions:
    /// out of bounds above, out of bounds below, or bounding-box
    /// overlap with any obstacle (linear scan in index order — the
    /// count is small and bounded).
    ///
    /// Terminal: after a `Dead` outcome further steps are no-ops that
    /// return the same cause; callers stop ticking on the first one.
    pub fn step(&mut self, dt: f32) -> StepOutcome {
        if let Some(cause) = self.death {
            return StepOutcome::Dead(cause);
        }

        self.actor.advance(&self.config, dt);
        self.scroll += self.config.level.scroll_speed * dt;

        if let Some(cause) = self.check_collisions() {
            info!(?cause, "local actor died");
            self.death = Some(cause);
            return StepOutcome::Dead(cause);
        }
        StepOutcome::Running
    }

    fn check_collisions(&self) -> Option<DeathCause> {
        let actor = self.actor_rect();

        if actor.bottom > self.config.viewport_height {
            return Some(DeathCause::OutOfBoundsBottom);
        }
        if actor.bottom < 0.0 {
            return Some(DeathCause::OutOfBoundsTop);
        }

        for obstacle in self.level.obstacles() {
            let rect =
                obstacle.rect(self.config.viewport_height, self.scroll);
            if actor.overlaps(&rect) {
                return Some(DeathCause::Collision {
                    obstacle: obstacle.index,
                });
            }
        }
        None
    }

    /// Requests a jump: a timed upward displacement that eases back
    /// into the fall. Ignored (returns `false`) while a jump is
    /// already rising or after death.
    pub fn jump(&mut self) -> bool {
        if self.death.is_some() {
            return false;
        }
        self.actor.jump(&self.config)
    }

    /// The actor's current bounding box.
    pub fn actor_rect(&self) -> Rect {
        Rect {
            left: self.config.actor_x,
            top: self.actor.y,
            right: self.config.actor_x + self.config.actor_size,
            bottom: self.actor.y + self.config.actor_size,
        }
    }

    /// The actor's vertical position (top edge).
    pub fn actor_y(&self) -> f32 {
        self.actor.y
    }

    /// The terminal cause, once dead.
    pub fn death(&self) -> Option<DeathCause> {
        self.death
    }

    /// Whether the actor is still alive.
    pub fn is_alive(&self) -> bool {
        self.death.is_none()
    }

    /// Current scroll offset.
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// The generated level for this round.
    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Starts a new round: regenerates the level wholesale and
    /// respawns the actor.
    pub fn restart(&mut self) {
        self.level = Level::generate(&self.config.level);
        self.actor = LocalActor::spawn(&self.config);
        self.scroll = 0.0;
        self.death = None;
        debug!("simulation restarted");
    }
}
