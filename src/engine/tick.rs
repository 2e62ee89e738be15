//! One pipeline pass per animation tick
//!
//! layout (cached) -> spatial phase (cached) -> transform per item ->
//! collision detect/resolve -> merge offsets. The engine owns the item arena;
//! it is the single writer and nothing re-enters it during a tick.

use glam::Vec2;

use super::collision::{Body, CollisionDetector};
use super::layout::{GridItem, LayoutCache};
use super::phase::PhaseCache;
use super::response::CollisionResolver;
use super::transform::{back_to_front, compute_transform};
use crate::consts::COLLISION_RADIUS_FACTOR;
use crate::settings::{Settings, Tokenization};

/// Inputs from the host for a single tick
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    /// Display units from the tokenizer
    pub units: &'a [String],
    pub tokenization: Tokenization,
    /// Canvas size in px
    pub canvas: Vec2,
    /// Logical clock value (see `clock`)
    pub time: f32,
}

#[derive(Debug, Default)]
pub struct Engine {
    layout: LayoutCache,
    phases: PhaseCache,
    detector: CollisionDetector,
    resolver: CollisionResolver,
    bodies: Vec<Body>,
    last_time: Option<f32>,
    last_contacts: usize,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one full pipeline pass and return the updated items
    pub fn tick(&mut self, frame: &FrameInput, settings: &Settings) -> &[GridItem] {
        let time = if frame.time.is_finite() { frame.time } else { 0.0 };

        if self
            .layout
            .ensure(frame.units, frame.tokenization, &settings.grid, frame.canvas)
        {
            // Item indices changed meaning
            self.resolver.clear();
        }
        let generation = self.layout.generation();
        self.phases
            .ensure(self.layout.items_mut(), &settings.sequence, generation);

        // A clock that jumps backwards starts a new run
        if self.last_time.is_some_and(|last| time < last) {
            log::debug!("Clock moved backwards to {time}, dropping collision states");
            self.resolver.clear();
        }
        self.last_time = Some(time);

        for item in self.layout.items_mut() {
            item.transformed = compute_transform(item, time, settings, frame.canvas);
            item.collision_offset = Vec2::ZERO;
        }

        if settings.collision.enabled {
            self.resolve_collisions(time, settings, frame.canvas);
        } else {
            self.resolver.clear();
            self.last_contacts = 0;
        }

        self.layout.items()
    }

    fn resolve_collisions(&mut self, time: f32, settings: &Settings, canvas: Vec2) {
        let font_size = settings.grid.font_size;
        let items = self.layout.items_mut();

        self.bodies.clear();
        self.bodies.extend(items.iter().map(|item| Body {
            pos: item.transformed.pos,
            radius: font_size * COLLISION_RADIUS_FACTOR * item.transformed.scale,
            solid: !item.is_blank(),
        }));

        self.detector.configure(font_size, canvas);
        let contacts = self
            .detector
            .detect(&self.bodies, canvas, settings.collision.wall_bounce);
        self.last_contacts = contacts.len();
        self.resolver.record(contacts, time, &settings.collision);
        self.resolver
            .update(items, time, settings.position.curve, font_size);

        for item in items.iter_mut() {
            item.transformed.pos += item.collision_offset;
            item.transformed = item.transformed.sanitized();
        }
    }

    pub fn items(&self) -> &[GridItem] {
        self.layout.items()
    }

    /// Indices in drawing order: back-to-front when depth sorting is on
    pub fn draw_order(&self, settings: &Settings) -> Vec<usize> {
        if settings.depth.enabled && settings.depth.sort {
            back_to_front(self.layout.items())
        } else {
            (0..self.layout.items().len()).collect()
        }
    }

    pub fn layout_generation(&self) -> u64 {
        self.layout.generation()
    }

    /// Items currently deflecting
    pub fn active_collisions(&self) -> usize {
        self.resolver.active_count()
    }

    /// Contacts found in the last tick
    pub fn contact_count(&self) -> usize {
        self.last_contacts
    }

    /// Drop all cached layout, phase and collision state
    pub fn reset(&mut self) {
        self.layout.invalidate();
        self.phases.invalidate();
        self.resolver.clear();
        self.last_time = None;
        self.last_contacts = 0;
    }
}
