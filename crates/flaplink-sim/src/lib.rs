//! Local physics for Flaplink.
//!
//! A headless stand-in for what the browser build derives from the
//! DOM: explicit numeric positions, a fixed-cadence frame clock in
//! place of the display-refresh callback, and axis-aligned bounding
//! box collision against a deterministically generated obstacle run.
//!
//! The [`Simulation`] owns only this client's actor and its transient
//! motion; authoritative life/death lives in the session layer. Each
//! [`Simulation::step`] advances the actor, scrolls the level, and
//! reports a terminal [`DeathCause`] the moment the actor leaves the
//! viewport or clips an obstacle.

mod clock;
mod level;
mod physics;

pub use clock::{FrameClock, FrameInfo};
pub use level::{Level, LevelConfig, Obstacle, Rect, Side};
pub use physics::{DeathCause, SimConfig, Simulation, StepOutcome};
