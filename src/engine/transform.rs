//! Per-item transform pipeline
//!
//! `compute_transform` is a pure function of the item's base position and
//! spatial phase, the logical clock value and the settings snapshot. Channels
//! are evaluated independently and combined:
//! - position: base + position lobes + jitter (+ collision, merged later)
//! - scale: animated scale * depth perspective
//! - opacity: animated opacity * depth fade
//!
//! The result is always sanitized before it leaves this module.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::layout::GridItem;
use super::noise::value_noise_2d;
use super::phase::center_offset;
use crate::consts::*;
use crate::safe_div;
use crate::settings::{
    DepthSettings, JitterSettings, Origin, PositionMode, PositionSettings, Settings,
};

const JITTER_SEED_X: u32 = 0x4A17_7E01;
const JITTER_SEED_Y: u32 = 0x4A17_7E02;

/// Simulated depth of an item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Depth {
    /// Positive is farther from the viewer
    pub z: f32,
    /// Perspective scale factor
    pub scale_factor: f32,
    /// Fade factor in [0, 1]
    pub opacity_factor: f32,
}

impl Depth {
    pub const FLAT: Depth = Depth {
        z: 0.0,
        scale_factor: 1.0,
        opacity_factor: 1.0,
    };
}

/// Final per-item output handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub pos: Vec2,
    pub scale: f32,
    /// In [0, 1]
    pub opacity: f32,
    /// Radians
    pub rotation: f32,
    pub depth: Option<Depth>,
}

impl Transform {
    /// Neutral transform at a position
    pub fn at(pos: Vec2) -> Self {
        Self {
            pos,
            scale: 1.0,
            opacity: 1.0,
            rotation: 0.0,
            depth: None,
        }
    }

    pub fn z(&self) -> f32 {
        self.depth.map_or(0.0, |d| d.z)
    }

    /// Clamp every field into a drawable range
    ///
    /// Non-finite positions become 0, bad scales and opacities become 1.
    pub fn sanitized(mut self) -> Self {
        if !self.pos.x.is_finite() {
            self.pos.x = 0.0;
        }
        if !self.pos.y.is_finite() {
            self.pos.y = 0.0;
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            self.scale = 1.0;
        }
        self.scale = self.scale.clamp(MIN_SCALE, MAX_SCALE);
        if !self.opacity.is_finite() {
            self.opacity = 1.0;
        }
        self.opacity = self.opacity.clamp(0.0, 1.0);
        if !self.rotation.is_finite() {
            self.rotation = 0.0;
        }
        if let Some(depth) = &mut self.depth {
            if !depth.z.is_finite() || !depth.scale_factor.is_finite() || !depth.opacity_factor.is_finite() {
                *depth = Depth::FLAT;
            }
        }
        self
    }
}

/// Global driver value for a clock reading
#[inline]
pub fn driver_time(clock: f32, global_speed: f32) -> f32 {
    clock * TIME_SCALE * global_speed
}

/// Compute an item's transform for a clock value
pub fn compute_transform(item: &GridItem, clock: f32, settings: &Settings, canvas: Vec2) -> Transform {
    let t = driver_time(clock, settings.global_speed);
    let phase = t + item.spatial_phase;
    let noise = settings.noise_intensity;

    let mut out = Transform::at(item.base);
    let mut offset = Vec2::ZERO;

    if settings.scale.enabled {
        let s = &settings.scale;
        out.scale = (s.min + s.curve.sample(phase, noise) * (s.max - s.min)).max(MIN_SCALE);
    }

    if settings.position.enabled {
        offset += position_offset(item, phase, &settings.position, settings.grid.font_size, canvas);
    }

    if settings.rotation.enabled {
        let r = &settings.rotation;
        out.rotation = (r.curve.sample(phase, noise) * r.amplitude).to_radians();
    }

    if settings.opacity.enabled {
        let o = &settings.opacity;
        out.opacity = (o.min + o.curve.sample(phase, noise) * (o.max - o.min)).clamp(0.0, 1.0);
    }

    if settings.depth.enabled {
        let depth = depth_of(item, t, &settings.depth, noise);
        if settings.depth.affect_scale {
            out.scale *= depth.scale_factor;
        }
        if settings.depth.affect_opacity {
            out.opacity *= depth.opacity_factor;
        }
        out.depth = Some(depth);
    }

    if settings.jitter.enabled {
        offset += jitter_offset(item, clock, &settings.jitter);
    }

    out.pos = item.base + offset;
    out.sanitized()
}

/// Offset from the two position lobes
fn position_offset(item: &GridItem, phase: f32, pos: &PositionSettings, font_size: f32, canvas: Vec2) -> Vec2 {
    let lobe = |angle: f32| pos.curve.ease((angle.sin() + 1.0) * 0.5) * 2.0 - 1.0;
    let dir = Vec2::new(lobe(phase), lobe(phase * pos.frequency));

    let mut amp = match pos.mode {
        PositionMode::Oscillate => Vec2::new(pos.amplitude_x, pos.amplitude_y),
        PositionMode::Travel => Vec2::new(
            pos.amplitude_x / 100.0 * canvas.x,
            pos.amplitude_y / 100.0 * canvas.y,
        ),
    };
    amp *= origin_multiplier(item, pos);

    if pos.contain {
        let room = ((item.cell - Vec2::splat(font_size)) * 0.5).max(Vec2::ZERO);
        if amp.is_finite() && room.is_finite() {
            amp = amp.clamp(-room, room);
        }
    }

    dir * amp
}

/// Amplitude falloff in [0, 1] by grid position
fn origin_multiplier(item: &GridItem, pos: &PositionSettings) -> f32 {
    let (dx, dy, cx, cy) = center_offset(item.row, item.col, item.total_rows, item.total_cols);
    let d = match pos.origin {
        Origin::Off => return 1.0,
        Origin::Center => safe_div(dx.hypot(dy), cx.hypot(cy)),
        Origin::Edges => {
            // Cells from the nearest edge, per axis; a single-cell axis has no edge
            let ex = if cx > 0.0 { (cx - dx.abs()) / cx } else { 1.0 };
            let ey = if cy > 0.0 { (cy - dy.abs()) / cy } else { 1.0 };
            ex.min(ey)
        }
        Origin::SideToSide => safe_div(dx.abs(), cx),
    };
    pos.curve.ease(d.clamp(0.0, 1.0))
}

/// Depth from a curve keyed on distance from the grid center
fn depth_of(item: &GridItem, t: f32, depth: &DepthSettings, noise: f32) -> Depth {
    let (dx, dy, cx, cy) = center_offset(item.row, item.col, item.total_rows, item.total_cols);
    let dist = safe_div(dx.hypot(dy), cx.hypot(cy));
    let z = (depth.curve.sample(t - dist * TAU, noise) * 2.0 - 1.0) * depth.amplitude;

    let p = depth.perspective;
    if !(p > 0.0 && p.is_finite()) || !z.is_finite() {
        return Depth {
            z: if z.is_finite() { z } else { 0.0 },
            ..Depth::FLAT
        };
    }

    let limit = MAX_DEPTH_FRACTION * p;
    let zc = z.clamp(-limit, limit);
    // 0 nearest, 1 farthest
    let far = (zc / limit + 1.0) * 0.5;
    Depth {
        z,
        scale_factor: p / (p + zc),
        opacity_factor: (1.0 - far * depth.fade_strength.clamp(0.0, 1.0)).clamp(0.0, 1.0),
    }
}

/// Organic offset from a smooth noise field over grid coordinates
///
/// Ignores the spatial phase so it never lines up with the sequence pattern.
fn jitter_offset(item: &GridItem, clock: f32, jitter: &JitterSettings) -> Vec2 {
    let jt = clock * TIME_SCALE * jitter.speed;
    let gx = item.col as f32 * jitter.frequency;
    let gy = item.row as f32 * jitter.frequency;
    let nx = value_noise_2d(gx + jt, gy - jt * 0.7, JITTER_SEED_X);
    let ny = value_noise_2d(gx - jt * 0.6, gy + jt, JITTER_SEED_Y);
    Vec2::new(nx * 2.0 - 1.0, ny * 2.0 - 1.0) * jitter.amplitude
}

/// Item indices ordered farthest first
pub fn back_to_front(items: &[GridItem]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| items[b].transformed.z().total_cmp(&items[a].transformed.z()));
    order
}
