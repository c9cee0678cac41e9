//! Obstacle level generation and axis-aligned collision geometry.
//!
//! A level is a fixed run of obstacles derived purely from index and
//! configuration: height grows linearly across the run, the anchored
//! side alternates top/bottom by index parity, and spacing is a fixed
//! gap. Obstacles are immutable once generated for a round and
//! regenerated wholesale on restart.

use tracing::warn;

/// An axis-aligned bounding box. `top < bottom` (y grows downward,
/// screen-style).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    /// Whether two boxes overlap (strict: edge contact is not overlap,
    /// matching the browser client's `<`/`>` tests).
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }
}

/// Which viewport edge an obstacle hangs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
}

/// One generated obstacle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    /// Position in the generation sequence.
    pub index: usize,
    /// Horizontal offset of the left edge at scroll 0, in world units.
    pub x: f32,
    /// Width in world units.
    pub width: f32,
    /// Height as a fraction of the viewport (0.0–1.0).
    pub height: f32,
    /// Which edge it hangs from.
    pub side: Side,
}

impl Obstacle {
    /// The obstacle's bounding box for a given viewport height and
    /// scroll offset (how far the level has moved left).
    pub fn rect(&self, viewport_height: f32, scroll: f32) -> Rect {
        let left = self.x - scroll;
        let extent = self.height * viewport_height;
        let (top, bottom) = match self.side {
            Side::Top => (0.0, extent),
            Side::Bottom => (viewport_height - extent, viewport_height),
        };
        Rect {
            left,
            top,
            right: left + self.width,
            bottom,
        }
    }
}

/// Configuration for level generation.
#[derive(Debug, Clone)]
pub struct LevelConfig {
    /// Number of obstacles per round. Default: 50.
    pub obstacle_count: usize,
    /// Horizontal spacing between consecutive obstacles. Default: 800.
    pub gap: f32,
    /// Obstacle width. Default: 200.
    pub obstacle_width: f32,
    /// Height of the first obstacle, as a viewport fraction.
    /// Default: 0.20.
    pub min_height: f32,
    /// Height of the last obstacle, as a viewport fraction.
    /// Default: 1.0 (full viewport).
    pub max_height: f32,
    /// How fast the level scrolls toward the actor, units/second.
    /// Default: 800.
    pub scroll_speed: f32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            obstacle_count: 50,
            gap: 800.0,
            obstacle_width: 200.0,
            min_height: 0.20,
            max_height: 1.0,
            scroll_speed: 800.0,
        }
    }
}

impl LevelConfig {
    /// Clamps out-of-range values so the config is safe to generate
    /// from: at least one obstacle, height fractions in `0.0..=1.0`
    /// with `min <= max`, positive speed.
    pub fn validated(mut self) -> Self {
        if self.obstacle_count == 0 {
            warn!("obstacle_count 0 — clamping to 1");
            self.obstacle_count = 1;
        }
        self.min_height = self.min_height.clamp(0.0, 1.0);
        self.max_height = self.max_height.clamp(0.0, 1.0);
        if self.min_height > self.max_height {
            self.min_height = self.max_height;
        }
        if self.scroll_speed <= 0.0 {
            warn!("non-positive scroll_speed — using default");
            self.scroll_speed = LevelConfig::default().scroll_speed;
        }
        self
    }
}

/// A generated obstacle run.
#[derive(Debug, Clone)]
pub struct Level {
    obstacles: Vec<Obstacle>,
}

impl Level {
    /// Generates the run for one round. Deterministic: the same config
    /// always yields the same level on every client.
    pub fn generate(config: &LevelConfig) -> Self {
        let config = config.clone().validated();
        let mut obstacles = Vec::with_capacity(config.obstacle_count);

        let mut x = 0.0;
        for index in 0..config.obstacle_count {
            x += config.gap;
            let progress = if config.obstacle_count > 1 {
                index as f32 / (config.obstacle_count - 1) as f32
            } else {
                0.0
            };
            let height = config.min_height
                + (config.max_height - config.min_height) * progress;
            let side = if index % 2 == 0 {
                Side::Top
            } else {
                Side::Bottom
            };
            obstacles.push(Obstacle {
                index,
                x,
                width: config.obstacle_width,
                height,
                side,
            });
        }

        Self { obstacles }
    }

    /// Obstacles in index order.
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Number of obstacles.
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// Whether the level is empty.
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}
