//! Animation curves
//!
//! A curve is evaluated in one of three shapes:
//! - `sample`: periodic over 2π, driven by `t + spatial_phase`
//! - `ease`: a [0, 1] -> [0, 1] easing for position lobes and falloff
//! - `response`: a one-shot bell/impulse over collision progress
//!
//! All outputs are pure functions of their inputs.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use serde::{Deserialize, Serialize};

use super::noise::periodic_noise;
use crate::smoothstep;

/// Peak of the unnormalized elastic ease-out
const ELASTIC_PEAK: f32 = 1.3731;
/// Seed shared by every noise-curve evaluation
const CURVE_NOISE_SEED: u32 = 0xC0FF_EE11;
/// How far the noise easing strays from linear
const NOISE_EASE_BLEND: f32 = 0.25;

/// Named animation curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum Curve {
    #[default]
    Sine,
    Bounce,
    Elastic,
    Snap,
    Smooth,
    Noise,
}

impl Curve {
    pub const ALL: [Curve; 6] = [
        Curve::Sine,
        Curve::Bounce,
        Curve::Elastic,
        Curve::Snap,
        Curve::Smooth,
        Curve::Noise,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Curve::Sine => "sine",
            Curve::Bounce => "bounce",
            Curve::Elastic => "elastic",
            Curve::Snap => "snap",
            Curve::Smooth => "smooth",
            Curve::Noise => "noise",
        }
    }

    /// Look up a curve by name; unknown names fall back to sine
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "bounce" => Curve::Bounce,
            "elastic" => Curve::Elastic,
            "snap" => Curve::Snap,
            "smooth" => Curve::Smooth,
            "noise" => Curve::Noise,
            _ => Curve::Sine,
        }
    }

    /// Periodic value in [0, 1] for a phase in radians
    ///
    /// `noise_intensity` only affects `Noise`: 0 pins it to 0.5, 1 is full noise.
    pub fn sample(self, phase: f32, noise_intensity: f32) -> f32 {
        let v = match self {
            Curve::Sine => (phase.sin() + 1.0) * 0.5,
            Curve::Snap => {
                if phase.sin() >= 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Curve::Noise => {
                let n = periodic_noise(phase, CURVE_NOISE_SEED);
                0.5 + (n - 0.5) * noise_intensity.clamp(0.0, 1.0)
            }
            Curve::Bounce | Curve::Elastic | Curve::Smooth => self.ease(triangle(phase)),
        };
        if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.5 }
    }

    /// Easing on the unit interval, endpoints pinned to 0 and 1
    pub fn ease(self, u: f32) -> f32 {
        let u = if u.is_finite() { u.clamp(0.0, 1.0) } else { 0.0 };
        match self {
            Curve::Sine => u,
            Curve::Bounce => bounce_out(u),
            Curve::Elastic => (elastic_out(u) / ELASTIC_PEAK).clamp(0.0, 1.0),
            Curve::Snap => {
                if u >= 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            Curve::Smooth => ease_in_out_cubic(u),
            Curve::Noise => {
                if u <= 0.0 || u >= 1.0 {
                    return u;
                }
                let n = periodic_noise(u * TAU, CURVE_NOISE_SEED);
                (u + (n - 0.5) * NOISE_EASE_BLEND).clamp(0.0, 1.0)
            }
        }
    }

    /// One-shot response over `progress` in [0, 1]
    ///
    /// Starts at 0 (Snap starts held at 1) and has decayed to ~0 by progress 1.
    /// Elastic may swing below zero on the rebound.
    pub fn response(self, progress: f32) -> f32 {
        let p = if progress.is_finite() { progress.clamp(0.0, 1.0) } else { 1.0 };
        match self {
            Curve::Sine => (PI * p).sin(),
            Curve::Bounce => (3.0 * PI * p).sin().abs() * (1.0 - p),
            Curve::Elastic => 2f32.powf(-6.0 * p) * (5.0 * PI * p).sin(),
            Curve::Snap => {
                if p < 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            Curve::Smooth => smoothstep(1.0 - (2.0 * p - 1.0).abs()),
            Curve::Noise => {
                let n = periodic_noise(p * TAU, CURVE_NOISE_SEED);
                (PI * p).sin() * (0.5 + 0.5 * n)
            }
        }
    }
}

impl From<String> for Curve {
    fn from(name: String) -> Self {
        Curve::from_name(&name)
    }
}

impl From<Curve> for &'static str {
    fn from(curve: Curve) -> Self {
        curve.as_str()
    }
}

/// 0 at the sine trough, 1 at the sine crest, linear in between
#[inline]
fn triangle(phase: f32) -> f32 {
    let u = ((phase + FRAC_PI_2) / TAU).rem_euclid(1.0);
    1.0 - (2.0 * u - 1.0).abs()
}

fn bounce_out(x: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;
    if x < 1.0 / D1 {
        N1 * x * x
    } else if x < 2.0 / D1 {
        let x = x - 1.5 / D1;
        N1 * x * x + 0.75
    } else if x < 2.5 / D1 {
        let x = x - 2.25 / D1;
        N1 * x * x + 0.9375
    } else {
        let x = x - 2.625 / D1;
        N1 * x * x + 0.984375
    }
}

fn elastic_out(x: f32) -> f32 {
    const C4: f32 = TAU / 3.0;
    if x <= 0.0 {
        0.0
    } else if x >= 1.0 {
        1.0
    } else {
        2f32.powf(-10.0 * x) * ((10.0 * x - 0.75) * C4).sin() + 1.0
    }
}

fn ease_in_out_cubic(x: f32) -> f32 {
    if x < 0.5 {
        4.0 * x * x * x
    } else {
        1.0 - (-2.0 * x + 2.0).powi(3) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sine_reference_points() {
        assert!((Curve::Sine.sample(0.0, 1.0) - 0.5).abs() < 1e-6);
        assert!((Curve::Sine.sample(FRAC_PI_2, 1.0) - 1.0).abs() < 1e-6);
        assert!(Curve::Sine.sample(-FRAC_PI_2, 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_samples_in_unit_range_and_periodic() {
        for curve in Curve::ALL {
            for i in 0..400 {
                let p = i as f32 * 0.05 - 10.0;
                let v = curve.sample(p, 1.0);
                assert!((0.0..=1.0).contains(&v), "{curve:?} at {p} = {v}");
                let w = curve.sample(p + TAU, 1.0);
                // Snap may flip right at a zero crossing
                if curve != Curve::Snap {
                    assert!((v - w).abs() < 1e-3, "{curve:?} not periodic at {p}");
                }
            }
        }
    }

    #[test]
    fn test_pure() {
        for curve in Curve::ALL {
            assert_eq!(curve.sample(1.234, 0.7), curve.sample(1.234, 0.7));
            assert_eq!(curve.response(0.3), curve.response(0.3));
        }
    }

    #[test]
    fn test_unknown_name_is_sine() {
        assert_eq!(Curve::from_name("wobble"), Curve::Sine);
        assert_eq!(Curve::from_name(" Bounce "), Curve::Bounce);
        for curve in Curve::ALL {
            assert_eq!(Curve::from_name(curve.as_str()), curve);
        }
    }

    #[test]
    fn test_serde_names_and_fallback() {
        let curve: Curve = serde_json::from_str("\"elastic\"").unwrap();
        assert_eq!(curve, Curve::Elastic);
        let curve: Curve = serde_json::from_str("\"mystery\"").unwrap();
        assert_eq!(curve, Curve::Sine);
        assert_eq!(serde_json::to_string(&Curve::Smooth).unwrap(), "\"smooth\"");
    }

    #[test]
    fn test_noise_intensity_zero_is_flat() {
        for i in 0..50 {
            let v = Curve::Noise.sample(i as f32 * 0.3, 0.0);
            assert!((v - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_ease_endpoints() {
        for curve in Curve::ALL {
            assert!(curve.ease(0.0).abs() < 1e-6, "{curve:?}");
            let end = curve.ease(1.0);
            assert!((0.0..=1.0).contains(&end));
        }
        assert_eq!(Curve::Bounce.ease(1.0), 1.0);
        assert_eq!(Curve::Smooth.ease(1.0), 1.0);
        assert!((Curve::Smooth.ease(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_elastic_overshoots_then_settles() {
        let peak = (1..100)
            .map(|i| Curve::Elastic.ease(i as f32 / 100.0))
            .fold(0.0f32, f32::max);
        let settled = Curve::Elastic.ease(0.99);
        assert!(peak > settled + 0.1);
        assert!(peak <= 1.0);
    }

    #[test]
    fn test_response_starts_and_ends_at_rest() {
        for curve in Curve::ALL {
            if curve == Curve::Snap {
                continue;
            }
            assert!(curve.response(0.0).abs() < 1e-5, "{curve:?} start");
            assert!(curve.response(1.0).abs() < 1e-3, "{curve:?} end");
        }
        assert_eq!(Curve::Snap.response(0.1), 1.0);
        assert_eq!(Curve::Snap.response(0.9), 0.0);
        assert!((Curve::Sine.response(0.5) - 1.0).abs() < 1e-6);
        assert!((Curve::Smooth.response(0.5) - 1.0).abs() < 1e-6);
    }
}
