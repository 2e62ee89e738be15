//! Procedural layout and motion engine
//!
//! Everything here is synchronous and driven by the caller:
//! - Pure functions of the logical clock value (no wall-clock reads)
//! - Caches keyed on structural inputs only
//! - Stable item order (row-major layout index)
//! - No rendering, font or export dependencies

pub mod clock;
pub mod collision;
pub mod curves;
pub mod layout;
pub mod noise;
pub mod phase;
pub mod response;
pub mod spatial_hash;
pub mod tick;
pub mod transform;

pub use clock::{AnimationClock, frame_time, seconds_to_clock};
pub use collision::{Body, CollisionDetector, Contact, WallEdge, circle_circle, circle_wall};
pub use curves::Curve;
pub use layout::{GridItem, LayoutCache, LayoutKey, build_layout};
pub use phase::{PhaseCache, spatial_phase};
pub use response::{CollisionKind, CollisionPartner, CollisionResolver, CollisionState};
pub use spatial_hash::SpatialHash;
pub use tick::{Engine, FrameInput};
pub use transform::{Depth, Transform, back_to_front, compute_transform};
