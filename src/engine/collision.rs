//! Collision detection between animated glyphs
//!
//! Every glyph is a circle. The spatial hash narrows the candidate pairs,
//! then exact circle math confirms the overlap and measures it. Canvas
//! edges are optional walls.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::spatial_hash::SpatialHash;
use crate::consts::HASH_CELL_FACTOR;

/// Below this center distance two circles are treated as coincident
const COINCIDENT_EPSILON: f32 = 1e-6;

/// Collision circle of one item
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub radius: f32,
    /// Non-solid bodies (blank glyphs) never collide
    pub solid: bool,
}

/// Canvas edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallEdge {
    Left,
    Right,
    Top,
    Bottom,
}

impl WallEdge {
    pub const ALL: [WallEdge; 4] = [WallEdge::Left, WallEdge::Right, WallEdge::Top, WallEdge::Bottom];

    /// Unit normal pointing into the canvas (y grows downward)
    pub fn inward_normal(self) -> Vec2 {
        match self {
            WallEdge::Left => Vec2::X,
            WallEdge::Right => Vec2::NEG_X,
            WallEdge::Top => Vec2::Y,
            WallEdge::Bottom => Vec2::NEG_Y,
        }
    }
}

/// One detected overlap
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// `normal` is the unit vector from `a` toward `b`
    Item {
        a: usize,
        b: usize,
        normal: Vec2,
        penetration: f32,
    },
    /// `normal` points into the canvas
    Wall {
        index: usize,
        edge: WallEdge,
        normal: Vec2,
        penetration: f32,
    },
}

impl Contact {
    pub fn penetration(&self) -> f32 {
        match self {
            Contact::Item { penetration, .. } | Contact::Wall { penetration, .. } => *penetration,
        }
    }
}

/// Overlap of two circles: unit normal from `a` to `b` and penetration depth
///
/// Coincident centers get the +X normal.
pub fn circle_circle(a: Vec2, ra: f32, b: Vec2, rb: f32) -> Option<(Vec2, f32)> {
    let delta = b - a;
    let dist = delta.length();
    let reach = ra + rb;
    if dist.is_nan() || reach.is_nan() || dist >= reach {
        return None;
    }
    let normal = if dist > COINCIDENT_EPSILON {
        delta / dist
    } else {
        Vec2::X
    };
    Some((normal, reach - dist))
}

/// How far a circle pokes through one canvas edge, if at all
pub fn circle_wall(pos: Vec2, radius: f32, extent: Vec2, edge: WallEdge) -> Option<f32> {
    let penetration = match edge {
        WallEdge::Left => radius - pos.x,
        WallEdge::Right => pos.x + radius - extent.x,
        WallEdge::Top => radius - pos.y,
        WallEdge::Bottom => pos.y + radius - extent.y,
    };
    (penetration > 0.0).then_some(penetration)
}

/// Broad + narrow phase detector with reusable buffers
#[derive(Debug, Default)]
pub struct CollisionDetector {
    hash: SpatialHash,
    candidates: Vec<usize>,
    contacts: Vec<Contact>,
}

impl CollisionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Size hash cells from the glyph size; resets the table when it changes
    pub fn configure(&mut self, font_size: f32, extent: Vec2) {
        self.hash.configure(font_size * HASH_CELL_FACTOR, extent);
    }

    /// All contacts for the current body positions
    ///
    /// Each unordered item pair is tested at most once. Contacts come out in
    /// ascending index order.
    pub fn detect(&mut self, bodies: &[Body], extent: Vec2, wall_bounce: bool) -> &[Contact] {
        self.contacts.clear();
        self.hash.clear();

        for (i, body) in bodies.iter().enumerate() {
            if body.solid {
                self.hash.insert(i, body.pos, body.radius);
            }
        }

        for (i, body) in bodies.iter().enumerate() {
            if !body.solid {
                continue;
            }

            self.hash.query_into(body.pos, body.radius * 2.0, &mut self.candidates);
            for &j in &self.candidates {
                // Lower index owns the pair
                if j <= i {
                    continue;
                }
                let other = &bodies[j];
                if let Some((normal, penetration)) = circle_circle(body.pos, body.radius, other.pos, other.radius) {
                    self.contacts.push(Contact::Item {
                        a: i,
                        b: j,
                        normal,
                        penetration,
                    });
                }
            }

            if wall_bounce {
                for edge in WallEdge::ALL {
                    if let Some(penetration) = circle_wall(body.pos, body.radius, extent, edge) {
                        self.contacts.push(Contact::Wall {
                            index: i,
                            edge,
                            normal: edge.inward_normal(),
                            penetration,
                        });
                    }
                }
            }
        }

        log::trace!("Collision pass: {} bodies, {} contacts", bodies.len(), self.contacts.len());
        &self.contacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn body(x: f32, y: f32, radius: f32) -> Body {
        Body {
            pos: Vec2::new(x, y),
            radius,
            solid: true,
        }
    }

    fn detector() -> CollisionDetector {
        let mut d = CollisionDetector::new();
        // 10px glyphs -> 30px cells
        d.configure(10.0, Vec2::new(200.0, 200.0));
        d
    }

    #[test]
    fn test_two_overlapping_items() {
        let mut d = detector();
        let bodies = [body(100.0, 100.0, 10.0), body(101.0, 100.0, 10.0)];
        let contacts = d.detect(&bodies, Vec2::new(200.0, 200.0), false).to_vec();
        assert_eq!(contacts.len(), 1);
        match contacts[0] {
            Contact::Item { a, b, normal, penetration } => {
                assert_eq!((a, b), (0, 1));
                assert!((penetration - 19.0).abs() < 1e-4);
                assert!((normal - Vec2::X).length() < 1e-6);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_nan_positions_never_touch() {
        assert!(circle_circle(Vec2::new(f32::NAN, 0.0), 10.0, Vec2::ZERO, 10.0).is_none());
        assert!(circle_circle(Vec2::ZERO, f32::NAN, Vec2::ONE, 10.0).is_none());
        assert!(circle_circle(Vec2::ZERO, 10.0, Vec2::ONE, 10.0).is_some());
    }

    #[test]
    fn test_separated_items_no_contact() {
        let mut d = detector();
        let bodies = [body(50.0, 50.0, 10.0), body(71.0, 50.0, 10.0)];
        assert!(d.detect(&bodies, Vec2::new(200.0, 200.0), false).is_empty());
        // Exactly touching is not an overlap
        let bodies = [body(50.0, 50.0, 10.0), body(70.0, 50.0, 10.0)];
        assert!(d.detect(&bodies, Vec2::new(200.0, 200.0), false).is_empty());
    }

    #[test]
    fn test_left_wall() {
        let mut d = detector();
        let bodies = [body(5.0, 100.0, 10.0)];
        let contacts = d.detect(&bodies, Vec2::new(200.0, 200.0), true).to_vec();
        assert_eq!(contacts.len(), 1);
        match contacts[0] {
            Contact::Wall { index, edge, normal, penetration } => {
                assert_eq!(index, 0);
                assert_eq!(edge, WallEdge::Left);
                assert_eq!(normal, Vec2::new(1.0, 0.0));
                assert!((penetration - 5.0).abs() < 1e-6);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_walls_ignored_without_bounce() {
        let mut d = detector();
        let bodies = [body(5.0, 100.0, 10.0)];
        assert!(d.detect(&bodies, Vec2::new(200.0, 200.0), false).is_empty());
    }

    #[test]
    fn test_corner_hits_two_walls() {
        let mut d = detector();
        let bodies = [body(195.0, 198.0, 10.0)];
        let contacts = d.detect(&bodies, Vec2::new(200.0, 200.0), true).to_vec();
        let edges: Vec<WallEdge> = contacts
            .iter()
            .filter_map(|c| match c {
                Contact::Wall { edge, .. } => Some(*edge),
                _ => None,
            })
            .collect();
        assert_eq!(edges, vec![WallEdge::Right, WallEdge::Bottom]);
        assert!((contacts[1].penetration() - 8.0).abs() < 1e-5);
    }

    #[test]
    fn test_non_solid_bodies_skipped() {
        let mut d = detector();
        let mut bodies = [body(100.0, 100.0, 10.0), body(101.0, 100.0, 10.0)];
        bodies[1].solid = false;
        assert!(d.detect(&bodies, Vec2::new(200.0, 200.0), true).is_empty());
    }

    #[test]
    fn test_cluster_pairs_reported_once() {
        let mut d = detector();
        let bodies = [
            body(100.0, 100.0, 10.0),
            body(105.0, 100.0, 10.0),
            body(100.0, 105.0, 10.0),
        ];
        let contacts = d.detect(&bodies, Vec2::new(200.0, 200.0), false).to_vec();
        let pairs: Vec<(usize, usize)> = contacts
            .iter()
            .filter_map(|c| match c {
                Contact::Item { a, b, .. } => Some((*a, *b)),
                _ => None,
            })
            .collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_matches_brute_force() {
        let mut d = detector();
        let bodies: Vec<Body> = (0..60)
            .map(|i| {
                let f = i as f32;
                body((f * 37.0) % 200.0, (f * 53.0) % 200.0, 6.0 + (i % 5) as f32)
            })
            .collect();
        let mut found: Vec<(usize, usize)> = d
            .detect(&bodies, Vec2::new(200.0, 200.0), false)
            .iter()
            .filter_map(|c| match c {
                Contact::Item { a, b, .. } => Some((*a, *b)),
                _ => None,
            })
            .collect();
        found.sort_unstable();

        let mut expected = Vec::new();
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                if circle_circle(bodies[i].pos, bodies[i].radius, bodies[j].pos, bodies[j].radius).is_some() {
                    expected.push((i, j));
                }
            }
        }
        assert_eq!(found, expected);
    }

    proptest! {
        #[test]
        fn prop_circle_normal_antisymmetric(
            ax in 0.0f32..100.0, ay in 0.0f32..100.0,
            bx in 0.0f32..100.0, by in 0.0f32..100.0,
            ra in 1.0f32..50.0, rb in 1.0f32..50.0,
        ) {
            let (a, b) = (Vec2::new(ax, ay), Vec2::new(bx, by));
            prop_assume!(a.distance(b) > 1e-3);
            let ab = circle_circle(a, ra, b, rb);
            let ba = circle_circle(b, rb, a, ra);
            prop_assert_eq!(ab.is_some(), ba.is_some());
            if let (Some((n_ab, p_ab)), Some((n_ba, p_ba))) = (ab, ba) {
                prop_assert_eq!(n_ab, -n_ba);
                prop_assert_eq!(p_ab, p_ba);
                prop_assert!((n_ab.length() - 1.0).abs() < 1e-4);
            }
        }
    }
}
