//! Collision response
//!
//! Each item owns at most one deflection at a time. A deflection starts when
//! a contact is recorded, follows the response curve over its duration and
//! then deactivates. States are keyed by item index, so they are meaningless
//! after the layout is regenerated and must be cleared then.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::clock::seconds_to_clock;
use super::collision::{Contact, WallEdge};
use super::curves::Curve;
use super::layout::GridItem;
use crate::consts::DEFLECTION_PAD_FACTOR;
use crate::settings::CollisionSettings;

/// What an item collided with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionPartner {
    Item(usize),
    Wall(WallEdge),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionKind {
    Item,
    Wall,
}

/// Deflection state of one item
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CollisionState {
    pub active: bool,
    /// Clock units
    pub start_time: f32,
    /// Clock units
    pub duration: f32,
    /// Unit deflection direction
    pub normal: Vec2,
    /// Penetration at impact
    pub penetration: f32,
    pub strength: f32,
    pub partner: Option<CollisionPartner>,
}

impl CollisionState {
    pub fn kind(&self) -> Option<CollisionKind> {
        self.partner.map(|p| match p {
            CollisionPartner::Item(_) => CollisionKind::Item,
            CollisionPartner::Wall(_) => CollisionKind::Wall,
        })
    }

    /// Active and not yet past its duration at `now`
    pub fn is_running(&self, now: f32) -> bool {
        let elapsed = now - self.start_time;
        self.active && elapsed < self.duration
    }

    /// Deflection at `now`, or `None` once the duration has elapsed
    pub fn offset_at(&self, now: f32, curve: Curve, font_size: f32) -> Option<Vec2> {
        if !self.is_running(now) {
            return None;
        }
        let elapsed = now - self.start_time;
        let progress = (elapsed / self.duration).clamp(0.0, 1.0);
        let reach = (self.penetration + font_size * DEFLECTION_PAD_FACTOR) * self.strength;
        let offset = self.normal * reach * curve.response(progress);
        Some(if offset.is_finite() { offset } else { Vec2::ZERO })
    }
}

#[derive(Debug, Default)]
pub struct CollisionResolver {
    states: Vec<CollisionState>,
}

impl CollisionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every state (collision disabled or layout regenerated)
    pub fn clear(&mut self) {
        if self.states.iter().any(|s| s.active) {
            log::debug!("Clearing {} collision states", self.active_count());
        }
        self.states.clear();
    }

    pub fn state(&self, index: usize) -> Option<&CollisionState> {
        self.states.get(index)
    }

    pub fn active_count(&self) -> usize {
        self.states.iter().filter(|s| s.active).count()
    }

    /// Start deflections for new contacts
    ///
    /// Item contacts deflect both members with mirrored normals. A contact
    /// only replaces a running deflection if it penetrates deeper; an expired
    /// one is always replaced.
    pub fn record(&mut self, contacts: &[Contact], now: f32, settings: &CollisionSettings) {
        let duration = seconds_to_clock(settings.duration);
        for contact in contacts {
            match *contact {
                Contact::Item { a, b, normal, penetration } => {
                    self.trigger(a, -normal, penetration, CollisionPartner::Item(b), now, duration, settings.strength);
                    self.trigger(b, normal, penetration, CollisionPartner::Item(a), now, duration, settings.strength);
                }
                Contact::Wall { index, edge, normal, penetration } => {
                    self.trigger(index, normal, penetration, CollisionPartner::Wall(edge), now, duration, settings.strength);
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn trigger(
        &mut self,
        index: usize,
        normal: Vec2,
        penetration: f32,
        partner: CollisionPartner,
        now: f32,
        duration: f32,
        strength: f32,
    ) {
        if index >= self.states.len() {
            self.states.resize(index + 1, CollisionState::default());
        }
        let state = &mut self.states[index];
        if state.is_running(now) && penetration <= state.penetration {
            return;
        }
        *state = CollisionState {
            active: true,
            start_time: now,
            duration,
            normal,
            penetration,
            strength,
            partner: Some(partner),
        };
    }

    /// Advance every state to `now` and write the items' collision offsets
    ///
    /// States whose duration has elapsed deactivate and leave a zero offset.
    pub fn update(&mut self, items: &mut [GridItem], now: f32, curve: Curve, font_size: f32) {
        for (index, item) in items.iter_mut().enumerate() {
            item.collision_offset = Vec2::ZERO;
            let Some(state) = self.states.get_mut(index) else {
                continue;
            };
            match state.offset_at(now, curve, font_size) {
                Some(offset) => item.collision_offset = offset,
                None => state.active = false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::CLOCK_UNITS_PER_SECOND;

    fn items(n: usize) -> Vec<GridItem> {
        (0..n)
            .map(|i| GridItem::new("x", 0, i as u32, 1, n as u32, Vec2::splat(50.0), Vec2::ZERO))
            .collect()
    }

    fn settings(duration: f32) -> CollisionSettings {
        CollisionSettings {
            enabled: true,
            wall_bounce: true,
            strength: 1.0,
            duration,
        }
    }

    fn item_contact(penetration: f32) -> Contact {
        Contact::Item {
            a: 0,
            b: 1,
            normal: Vec2::X,
            penetration,
        }
    }

    #[test]
    fn test_item_contact_mirrors_normals() {
        let mut resolver = CollisionResolver::new();
        resolver.record(&[item_contact(4.0)], 0.0, &settings(1.0));
        let a = resolver.state(0).unwrap();
        let b = resolver.state(1).unwrap();
        assert_eq!(a.normal, -b.normal);
        assert_eq!(a.normal, Vec2::NEG_X);
        assert_eq!(a.kind(), Some(CollisionKind::Item));
        assert_eq!(a.partner, Some(CollisionPartner::Item(1)));
        assert_eq!(b.partner, Some(CollisionPartner::Item(0)));
        assert_eq!(a.duration, CLOCK_UNITS_PER_SECOND);
    }

    #[test]
    fn test_deeper_contact_supersedes() {
        let mut resolver = CollisionResolver::new();
        resolver.record(&[item_contact(4.0)], 0.0, &settings(1.0));
        resolver.record(&[item_contact(2.0)], 5.0, &settings(1.0));
        assert_eq!(resolver.state(0).unwrap().start_time, 0.0);
        assert_eq!(resolver.state(0).unwrap().penetration, 4.0);

        resolver.record(&[item_contact(6.0)], 7.0, &settings(1.0));
        assert_eq!(resolver.state(0).unwrap().start_time, 7.0);
        assert_eq!(resolver.state(0).unwrap().penetration, 6.0);
    }

    #[test]
    fn test_inactive_state_is_replaced_by_any_contact() {
        let mut resolver = CollisionResolver::new();
        let mut it = items(2);
        resolver.record(&[item_contact(9.0)], 0.0, &settings(0.1));
        resolver.update(&mut it, 100.0, Curve::Sine, 10.0);
        assert_eq!(resolver.active_count(), 0);
        resolver.record(&[item_contact(1.0)], 100.0, &settings(0.1));
        assert_eq!(resolver.active_count(), 2);
    }

    #[test]
    fn test_shallower_contact_restarts_expired_deflection() {
        let mut resolver = CollisionResolver::new();
        let mut it = items(2);
        // 0.5 s = 30 clock units; still flagged active until the next update
        resolver.record(&[item_contact(8.0)], 0.0, &settings(0.5));
        resolver.record(&[item_contact(4.0)], 30.0, &settings(0.5));
        resolver.update(&mut it, 30.0, Curve::Snap, 10.0);

        assert_eq!(resolver.active_count(), 2);
        let state = resolver.state(0).unwrap();
        assert_eq!(state.start_time, 30.0);
        assert_eq!(state.penetration, 4.0);
        assert_ne!(it[0].collision_offset, Vec2::ZERO);
    }

    #[test]
    fn test_deactivates_exactly_at_duration() {
        let mut resolver = CollisionResolver::new();
        let mut it = items(2);
        // 0.5 s = 30 clock units
        resolver.record(&[item_contact(4.0)], 10.0, &settings(0.5));

        resolver.update(&mut it, 39.999, Curve::Snap, 10.0);
        assert_eq!(resolver.active_count(), 2);

        resolver.update(&mut it, 40.0, Curve::Snap, 10.0);
        assert_eq!(resolver.active_count(), 0);
        assert_eq!(it[0].collision_offset, Vec2::ZERO);
        assert_eq!(it[1].collision_offset, Vec2::ZERO);
    }

    #[test]
    fn test_offset_follows_response_curve() {
        let mut resolver = CollisionResolver::new();
        let mut it = items(2);
        resolver.record(&[item_contact(4.0)], 0.0, &settings(1.0));
        // Halfway: sine response peaks at 1
        resolver.update(&mut it, 30.0, Curve::Sine, 10.0);
        // (4 + 10 * 0.3) * 1.0 * 1.0
        assert!((it[0].collision_offset - Vec2::new(-7.0, 0.0)).length() < 1e-4);
        assert!((it[1].collision_offset - Vec2::new(7.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_wall_contact() {
        let mut resolver = CollisionResolver::new();
        let mut it = items(1);
        let contact = Contact::Wall {
            index: 0,
            edge: WallEdge::Left,
            normal: Vec2::X,
            penetration: 5.0,
        };
        let mut s = settings(1.0);
        s.strength = 2.0;
        resolver.record(&[contact], 0.0, &s);
        let state = resolver.state(0).unwrap();
        assert_eq!(state.kind(), Some(CollisionKind::Wall));
        resolver.update(&mut it, 30.0, Curve::Sine, 10.0);
        // (5 + 3) * 2
        assert!((it[0].collision_offset.x - 16.0).abs() < 1e-4);
    }

    #[test]
    fn test_nan_clock_is_not_running() {
        let state = CollisionState {
            active: true,
            duration: 30.0,
            ..Default::default()
        };
        assert!(state.is_running(29.0));
        assert!(!state.is_running(30.0));
        assert!(!state.is_running(f32::NAN));
        assert!(state.offset_at(f32::NAN, Curve::Sine, 10.0).is_none());
    }

    #[test]
    fn test_zero_duration_never_deflects() {
        let mut resolver = CollisionResolver::new();
        let mut it = items(2);
        resolver.record(&[item_contact(4.0)], 0.0, &settings(0.0));
        resolver.update(&mut it, 0.0, Curve::Snap, 10.0);
        assert_eq!(resolver.active_count(), 0);
        assert_eq!(it[0].collision_offset, Vec2::ZERO);
    }

    #[test]
    fn test_clear() {
        let mut resolver = CollisionResolver::new();
        resolver.record(&[item_contact(4.0)], 0.0, &settings(1.0));
        resolver.clear();
        assert_eq!(resolver.active_count(), 0);
        assert!(resolver.state(0).is_none());
    }
}
