//! Glyph Grid - procedural motion for grids of characters
//!
//! Core modules:
//! - `engine`: Layout, spatial phase, transform pipeline and collision deflection
//! - `settings`: Parameter snapshot handed to every tick

pub mod engine;
pub mod settings;

pub use engine::{Engine, FrameInput, GridItem, Transform};
pub use settings::Settings;

/// Engine configuration constants
pub mod consts {
    /// Animation clock units per second (the clock ticks at 60 Hz)
    pub const CLOCK_UNITS_PER_SECOND: f32 = 60.0;
    /// Global driver rate: `t = clock * TIME_SCALE * speed`
    pub const TIME_SCALE: f32 = 0.05;

    /// Smallest scale the scale channel may emit
    pub const MIN_SCALE: f32 = 0.001;
    /// Largest scale accepted after sanitation
    pub const MAX_SCALE: f32 = 100.0;

    /// Collision radius as a fraction of font size
    pub const COLLISION_RADIUS_FACTOR: f32 = 0.45;
    /// Spatial hash cell size as a multiple of font size
    pub const HASH_CELL_FACTOR: f32 = 3.0;
    /// Extra deflection distance as a fraction of font size
    pub const DEFLECTION_PAD_FACTOR: f32 = 0.3;

    /// Perspective z is clamped to this fraction of the perspective distance
    pub const MAX_DEPTH_FRACTION: f32 = 0.9;
}

/// Divide, falling back to a denominator of 1 when it is zero or not finite
#[inline]
pub fn safe_div(num: f32, den: f32) -> f32 {
    if den == 0.0 || !den.is_finite() {
        num
    } else {
        num / den
    }
}

/// Position of `index` within `count` slots as a fraction in [0, 1]
///
/// A single slot maps to 0.
#[inline]
pub fn unit_fraction(index: u32, count: u32) -> f32 {
    safe_div(index as f32, count.saturating_sub(1) as f32)
}

/// Hermite smoothstep on [0, 1]
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
