//! Per-frame composition of the coordinate converter and the violation engine.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::camera::CoordinateConverter;
use crate::dataset::{CalibrationSource, TrackedEntity};
use crate::distance::{
    PeopleCoordinates, SocialDistanceConfig, SocialDistanceEngine, TrackId, ViolatorPairs,
};
use crate::{CameraParameters, Error, Result};

/// Violation results for one processed frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSummary {
    pub frame_index: usize,
    /// All pairs in sustained violation at this frame.
    pub violator_pairs: ViolatorPairs,
    /// Pairs violating here but not at the previous frame.
    pub new_violator_pairs: ViolatorPairs,
    /// Identities appearing in at least one violating pair.
    pub violators: BTreeSet<TrackId>,
}

/// Drives the frame loop: tracked entities in, violation summaries out.
///
/// For each frame the monitor converts every entity's image foot point to a
/// ground-plane position, feeds the snapshot to the violation engine and
/// collects the frame's violator sets. Entities whose foot point has no
/// ground-plane projection are skipped with a warning, so one person standing
/// on the horizon line cannot abort a whole frame.
pub struct SocialDistanceMonitor {
    converter: CoordinateConverter,
    engine: SocialDistanceEngine,
}

impl SocialDistanceMonitor {
    /// Compose a monitor from already-built parts.
    pub fn new(converter: CoordinateConverter, engine: SocialDistanceEngine) -> Self {
        Self { converter, engine }
    }

    /// Build a monitor from a calibration source and an engine configuration.
    pub fn from_calibration(
        source: &dyn CalibrationSource,
        config: SocialDistanceConfig,
    ) -> Result<Self> {
        let parameters = CameraParameters::from_map(&source.camera_parameters()?)?;
        Ok(Self::new(
            CoordinateConverter::new(parameters),
            SocialDistanceEngine::new(config)?,
        ))
    }

    /// Process one frame of tracked entities.
    ///
    /// Frames must be fed in increasing index order; see
    /// [`SocialDistanceEngine::record_frame`] for the ordering and
    /// idempotency rules.
    pub fn process_frame(
        &mut self,
        frame_index: usize,
        entities: &[TrackedEntity],
    ) -> Result<FrameSummary> {
        let mut ids = Vec::with_capacity(entities.len());
        let mut positions = Vec::with_capacity(entities.len());

        for entity in entities {
            match self.converter.to_scene(&entity.foot) {
                Ok(scene) => {
                    ids.push(entity.id);
                    positions.push(scene);
                }
                Err(Error::DegenerateProjection(reason)) => {
                    log::warn!(
                        "frame {}: skipping track {}: {}",
                        frame_index,
                        entity.id,
                        reason
                    );
                }
                Err(other) => return Err(other),
            }
        }

        let people = PeopleCoordinates::new(ids, positions)?;
        let (violator_pairs, new_violator_pairs) =
            self.engine.record_frame(frame_index, &people)?;
        let violators = self.engine.current_violators_set(frame_index)?;

        Ok(FrameSummary {
            frame_index,
            violator_pairs,
            new_violator_pairs,
            violators,
        })
    }

    /// The monitor's coordinate converter.
    pub fn converter(&self) -> &CoordinateConverter {
        &self.converter
    }

    /// The monitor's violation engine, for point queries.
    pub fn engine(&self) -> &SocialDistanceEngine {
        &self.engine
    }

    /// Mutable access to the engine, e.g. for memoized pair queries.
    pub fn engine_mut(&mut self) -> &mut SocialDistanceEngine {
        &mut self.engine
    }
}
