//! # social-distance-rs
//!
//! Social distance monitoring for fixed, calibrated overhead video.
//!
//! Given per-frame tracked people (integer identity + image foot point,
//! supplied by an external detector/tracker), this crate projects the foot
//! points onto the ground plane using camera calibration and flags pairs of
//! people that stay closer than a distance threshold for a sufficient
//! fraction of a trailing frame window.
//!
//! ## Features
//!
//! - Closed-form bidirectional image <-> ground-plane conversion from
//!   intrinsic/extrinsic calibration parameters
//! - Per-frame pairwise distance matrices with memoized violator-pair sets
//! - Sliding-window violation rule with a percentage-of-window criterion
//! - Loaders for TownCentre-style calibration and ground-truth files
//!
//! ## Example
//!
//! ```rust,ignore
//! use social_distance_rs::{
//!     CoordinateConverter, PeopleCoordinates, SocialDistanceConfig,
//!     SocialDistanceEngine,
//! };
//!
//! let converter = CoordinateConverter::from_map(&calibration)?;
//! let mut engine = SocialDistanceEngine::new(SocialDistanceConfig::default())?;
//!
//! for (frame_index, tracked) in frames.iter().enumerate() {
//!     let positions = tracked
//!         .iter()
//!         .map(|t| converter.to_scene(&t.foot))
//!         .collect::<Result<Vec<_>, _>>()?;
//!     let ids = tracked.iter().map(|t| t.id).collect();
//!     let people = PeopleCoordinates::new(ids, positions)?;
//!     let (all_pairs, new_pairs) = engine.record_frame(frame_index, &people)?;
//! }
//! ```

// Public modules
pub mod camera;
pub mod dataset;
pub mod distance;
pub mod monitor;

// Re-exports for convenience
pub use camera::{CameraParameters, CoordinateConverter, Distortion, ImagePoint, ScenePoint};
pub use dataset::{
    BoundingBox, CalibrationFile, CalibrationSource, GroundTruthFile, TrackSource, TrackedEntity,
};
pub use distance::{
    DistanceMatrix, PeopleCoordinates, SocialDistanceConfig, SocialDistanceEngine, TrackId,
    ViolatorPair, ViolatorPairs,
};
pub use monitor::{FrameSummary, SocialDistanceMonitor};

// Error types
pub use crate::error::{Error, Result};

mod error {
    use thiserror::Error;

    /// Errors that can occur in the social distance pipeline
    #[derive(Error, Debug)]
    pub enum Error {
        #[error("invalid configuration: {0}")]
        Configuration(String),

        #[error("degenerate projection: {0}")]
        DegenerateProjection(String),

        #[error("out-of-order frame: frame {got} recorded after frame {last}")]
        OutOfOrderFrame { last: usize, got: usize },

        #[error("invalid frame data: {0}")]
        InvalidFrameData(String),

        #[error("IO error: {0}")]
        IoError(#[from] std::io::Error),
    }

    /// Result type for social distance operations
    pub type Result<T> = std::result::Result<T, Error>;
}
