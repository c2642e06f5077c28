//! Per-frame snapshot of tracked people on the ground plane.

use std::collections::HashSet;

use super::TrackId;
use crate::camera::ScenePoint;
use crate::{Error, Result};

/// Tracked identities and their ground-plane positions for one frame.
///
/// Both sequences are parallel: `positions[i]` is where `ids[i]` stands.
#[derive(Debug, Clone, PartialEq)]
pub struct PeopleCoordinates {
    ids: Vec<TrackId>,
    positions: Vec<ScenePoint>,
}

impl PeopleCoordinates {
    /// Create a snapshot from parallel id/position sequences.
    ///
    /// Fails with [`Error::InvalidFrameData`] when the sequence lengths
    /// differ or an id appears twice.
    pub fn new(ids: Vec<TrackId>, positions: Vec<ScenePoint>) -> Result<Self> {
        if ids.len() != positions.len() {
            return Err(Error::InvalidFrameData(format!(
                "{} ids but {} positions",
                ids.len(),
                positions.len()
            )));
        }

        let mut seen = HashSet::with_capacity(ids.len());
        for &id in &ids {
            if !seen.insert(id) {
                return Err(Error::InvalidFrameData(format!(
                    "duplicate track id {} in frame snapshot",
                    id
                )));
            }
        }

        Ok(Self { ids, positions })
    }

    /// A snapshot with nobody in it.
    pub fn empty() -> Self {
        Self {
            ids: Vec::new(),
            positions: Vec::new(),
        }
    }

    /// Number of people in the snapshot.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the snapshot contains no people.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The tracked identities, in input order.
    pub fn ids(&self) -> &[TrackId] {
        &self.ids
    }

    /// The ground-plane positions, parallel to [`Self::ids`].
    pub fn positions(&self) -> &[ScenePoint] {
        &self.positions
    }
}
