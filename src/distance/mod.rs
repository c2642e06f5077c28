//! Pairwise ground-plane distances and the sliding-window violation engine.

mod coordinates;
mod engine;
mod matrix;

pub use coordinates::PeopleCoordinates;
pub use engine::{SocialDistanceConfig, SocialDistanceEngine, ViolatorPair, ViolatorPairs};
pub use matrix::DistanceMatrix;

/// Identity assigned by the external tracker. Stable across frames for the
/// same physical person and never reused within a session; this crate only
/// observes ids, it never creates or retires them.
pub type TrackId = i32;
