//! Dataset access: capability interfaces and TownCentre-style file loaders.
//!
//! The core components never touch files themselves; they consume the values
//! these narrow interfaces supply. A calibration source hands over the
//! named-float parameter mapping, a track source hands over per-frame tracked
//! entities. File-backed implementations for the TownCentre dataset layout
//! live in this module.

mod calibration_file;
mod groundtruth_file;

pub use calibration_file::CalibrationFile;
pub use groundtruth_file::GroundTruthFile;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::camera::ImagePoint;
use crate::distance::TrackId;
use crate::Result;

/// Supplies a camera calibration mapping of named floats.
pub trait CalibrationSource {
    /// The calibration values keyed by field name.
    fn camera_parameters(&self) -> Result<HashMap<String, f64>>;
}

/// Supplies per-frame tracked entities, e.g. from a ground-truth file or an
/// external tracker's output.
pub trait TrackSource {
    /// Number of frames covered by this source.
    fn num_frames(&self) -> usize;

    /// Entities tracked in the given frame; empty when the frame has none.
    fn tracked_entities(&self, frame_index: usize) -> &[TrackedEntity];
}

/// Axis-aligned image-space bounding box, corners at (x1, y1) and (x2, y2).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    /// Create a box from its corner coordinates.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Midpoint of the bottom edge, where a standing person touches the
    /// ground.
    pub fn bottom_center(&self) -> ImagePoint {
        ImagePoint::new((self.x1 + self.x2) / 2.0, self.y2)
    }
}

/// One tracked person in one frame, as supplied by a detector/tracker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackedEntity {
    /// Tracker-assigned identity.
    pub id: TrackId,
    /// Body bounding box on the image.
    pub body: BoundingBox,
    /// Foot point on the image, normally the box's bottom center.
    pub foot: ImagePoint,
}

impl TrackedEntity {
    /// Create an entity with an explicit foot point.
    pub fn new(id: TrackId, body: BoundingBox, foot: ImagePoint) -> Self {
        Self { id, body, foot }
    }

    /// Create an entity whose foot point is the box's bottom center.
    pub fn from_body(id: TrackId, body: BoundingBox) -> Self {
        Self {
            id,
            foot: body.bottom_center(),
            body,
        }
    }
}
