//! Fixed-cadence frame clock.
//!
//! The browser client runs its game loop on the display's refresh
//! callback; headless, we drive it from a fixed-rate clock instead.
//! The clock is designed to sit inside the client's `tokio::select!`
//! loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(event) = events.recv() => { /* transport events */ }
//!         frame = clock.tick() => {
//!             let outcome = sim.step(frame.dt.as_secs_f32());
//!         }
//!     }
//! }
//! ```
//!
//! While paused (no round in progress, or the local actor is dead),
//! `tick()` pends forever so the select loop only sees transport
//! events.

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

/// Information about a fired frame, returned by [`FrameClock::tick`].
#[derive(Debug, Clone, Copy)]
pub struct FrameInfo {
    /// Monotonically increasing frame number (starts at 1).
    pub frame: u64,
    /// Fixed delta time (always `1 / rate`). Game logic uses this, not
    /// wall-clock elapsed time, so the simulation stays deterministic.
    pub dt: Duration,
    /// `true` if this frame fired noticeably late. Late frames are
    /// skipped, never compressed into catch-up bursts.
    pub overrun: bool,
}

/// Fixed-rate frame clock with pause/resume.
pub struct FrameClock {
    frame_duration: Duration,
    rate_hz: u32,
    frame_count: u64,
    next_frame: Instant,
    paused: bool,
}

impl FrameClock {
    /// Maximum supported frame rate.
    pub const MAX_RATE_HZ: u32 = 240;

    /// Creates a clock firing at `rate_hz` frames per second, paused.
    ///
    /// The rate is clamped to `1..=MAX_RATE_HZ`. Starting paused
    /// matches the session lifecycle: frames only matter once the
    /// round is playing.
    pub fn new(rate_hz: u32) -> Self {
        let rate_hz = if rate_hz == 0 {
            warn!("frame rate 0 is invalid — clamping to 1");
            1
        } else if rate_hz > Self::MAX_RATE_HZ {
            warn!(
                rate = rate_hz,
                max = Self::MAX_RATE_HZ,
                "frame rate exceeds maximum — clamping"
            );
            Self::MAX_RATE_HZ
        } else {
            rate_hz
        };

        let frame_duration = Duration::from_secs_f64(1.0 / rate_hz as f64);
        debug!(rate_hz, "frame clock created (paused)");

        Self {
            frame_duration,
            rate_hz,
            frame_count: 0,
            next_frame: Instant::now() + frame_duration,
            paused: true,
        }
    }

    /// Waits until the next frame is due and returns its [`FrameInfo`].
    ///
    /// While paused this future pends forever; `tokio::select!` keeps
    /// processing its other branches.
    pub async fn tick(&mut self) -> FrameInfo {
        if self.paused {
            std::future::pending::<()>().await;
            unreachable!()
        }

        time::sleep_until(self.next_frame).await;

        let now = Instant::now();
        self.frame_count += 1;

        // Late wake-up: skip the missed frames and resume from now.
        let late_by = now.saturating_duration_since(self.next_frame);
        let overrun = late_by > self.frame_duration / 10;
        if overrun {
            warn!(
                frame = self.frame_count,
                late_ms = late_by.as_secs_f64() * 1000.0,
                "frame overrun — skipping ahead"
            );
            self.next_frame = now + self.frame_duration;
        } else {
            self.next_frame += self.frame_duration;
        }

        trace!(frame = self.frame_count, overrun, "frame fired");

        FrameInfo {
            frame: self.frame_count,
            dt: self.frame_duration,
            overrun,
        }
    }

    /// Pauses the clock. Idempotent.
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            debug!(frame = self.frame_count, "frame clock paused");
        }
    }

    /// Resumes the clock after a pause, scheduling the next frame one
    /// full period from now (no catch-up burst for time spent paused).
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.next_frame = Instant::now() + self.frame_duration;
            debug!(frame = self.frame_count, "frame clock resumed");
        }
    }

    /// Whether the clock is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Frames fired so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// The fixed frame duration.
    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// The configured rate in Hz (after clamping).
    pub fn rate_hz(&self) -> u32 {
        self.rate_hz
    }
}
