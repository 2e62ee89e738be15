//! Deterministic hash-based value noise
//!
//! Everything here is a pure function of its inputs so the same grid cell at
//! the same logical time always produces the same value.

use std::f32::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::smoothstep;

/// Lattice points per 2π period of the 1-D noise
pub const NOISE_PERIOD_POINTS: i32 = 8;

/// Integer hash of a 2-D lattice point
#[inline]
pub fn hash2(x: i32, y: i32, seed: u32) -> u32 {
    let mut h = seed ^ 0x9E37_79B9;
    h ^= (x as u32).wrapping_mul(0x85EB_CA6B);
    h = h.rotate_left(13).wrapping_mul(0xC2B2_AE35);
    h ^= (y as u32).wrapping_mul(0x27D4_EB2F);
    h = h.rotate_left(17).wrapping_mul(0x1656_67B1);
    h ^= h >> 15;
    h = h.wrapping_mul(0x2C1B_3C6D);
    h ^ (h >> 12)
}

/// Map a hash to [0, 1]
#[inline]
pub fn hash_to_unit(h: u32) -> f32 {
    (h >> 8) as f32 / (1u32 << 24) as f32
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Periodic 1-D value noise over a phase in radians, in [0, 1]
pub fn periodic_noise(phase: f32, seed: u32) -> f32 {
    let x = phase / TAU * NOISE_PERIOD_POINTS as f32;
    if !x.is_finite() {
        return 0.5;
    }
    let x0 = x.floor();
    let t = smoothstep(x - x0);
    let i0 = (x0 as i64).rem_euclid(NOISE_PERIOD_POINTS as i64) as i32;
    let i1 = (i0 + 1) % NOISE_PERIOD_POINTS;
    lerp(
        hash_to_unit(hash2(i0, 0, seed)),
        hash_to_unit(hash2(i1, 0, seed)),
        t,
    )
}

/// 2-D value noise in [0, 1]
pub fn value_noise_2d(x: f32, y: f32, seed: u32) -> f32 {
    if !x.is_finite() || !y.is_finite() {
        return 0.5;
    }
    let x0 = x.floor();
    let y0 = y.floor();
    let u = smoothstep(x - x0);
    let v = smoothstep(y - y0);
    let (xi, yi) = (x0 as i32, y0 as i32);

    let n00 = hash_to_unit(hash2(xi, yi, seed));
    let n10 = hash_to_unit(hash2(xi.wrapping_add(1), yi, seed));
    let n01 = hash_to_unit(hash2(xi, yi.wrapping_add(1), seed));
    let n11 = hash_to_unit(hash2(xi.wrapping_add(1), yi.wrapping_add(1), seed));

    lerp(lerp(n00, n10, u), lerp(n01, n11, u), v)
}

/// Stable per-cell random value in [0, 1)
///
/// Seeded from the cell coordinates only, never from time.
pub fn cell_random(row: u32, col: u32) -> f32 {
    let seed = ((hash2(row as i32, col as i32, 0x5EED) as u64) << 32) | ((row as u64) << 16 ^ col as u64);
    let mut rng = Pcg32::seed_from_u64(seed);
    rng.random::<f32>()
}
