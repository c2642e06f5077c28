//! Sliding-window social distance violation engine.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::coordinates::PeopleCoordinates;
use super::matrix::DistanceMatrix;
use super::TrackId;
use crate::{Error, Result};

/// An unordered pair of distinct identities in violation, normalized so that
/// `first < second`; `(a, b)` and `(b, a)` are the same pair.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ViolatorPair {
    pub first: TrackId,
    pub second: TrackId,
}

impl ViolatorPair {
    /// Create a normalized pair.
    pub fn new(a: TrackId, b: TrackId) -> Self {
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    /// Whether the pair involves the given identity.
    pub fn contains(&self, id: TrackId) -> bool {
        self.first == id || self.second == id
    }
}

/// Set of violating pairs for one frame.
pub type ViolatorPairs = BTreeSet<ViolatorPair>;

/// Configuration for [`SocialDistanceEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SocialDistanceConfig {
    /// Scene-unit distance below which two people are "close" in one frame.
    /// The comparison is strict: exactly the threshold is not a violation.
    pub distance_threshold: f64,

    /// Number of most-recent frames, including the current one, considered
    /// when deciding sustained violation.
    pub window_size: usize,

    /// Minimum fraction of the window's recorded frames that must show
    /// closeness for a pair to be flagged, in (0, 1].
    pub violation_fraction: f64,
}

impl SocialDistanceConfig {
    /// Create a configuration with the given parameters.
    pub fn new(distance_threshold: f64, window_size: usize, violation_fraction: f64) -> Self {
        Self {
            distance_threshold,
            window_size,
            violation_fraction,
        }
    }
}

impl Default for SocialDistanceConfig {
    fn default() -> Self {
        Self {
            distance_threshold: 2.0,
            window_size: 5,
            violation_fraction: 0.8,
        }
    }
}

/// Turns a stream of per-frame people snapshots into, per frame, the set of
/// identity pairs in sustained close-proximity violation.
///
/// The engine owns a growing frame-indexed history of distance matrices and
/// memoized violator-pair sets; entries are computed once and never mutated.
/// History is retained for the engine's lifetime, which suits offline
/// analysis of a fixed-length video.
///
/// A pair is flagged at frame `f` when, over the trailing window of
/// `window_size` frame indices ending at `f`, the number of recorded frames
/// where the pair's distance was strictly below the threshold reaches
/// `violation_fraction` of the number of recorded frames in the window.
/// Window frames where the pair did not co-occur contribute no closeness
/// sample but still count in the denominator, so a pair only recently
/// tracked together is flagged only once it has been close for nearly the
/// whole window.
pub struct SocialDistanceEngine {
    config: SocialDistanceConfig,
    matrix_history: HashMap<usize, DistanceMatrix>,
    violator_history: HashMap<usize, ViolatorPairs>,
    last_recorded: Option<usize>,
}

impl SocialDistanceEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: SocialDistanceConfig) -> Result<Self> {
        if !config.distance_threshold.is_finite() || config.distance_threshold <= 0.0 {
            return Err(Error::Configuration(format!(
                "distance_threshold must be a positive finite number, got {}",
                config.distance_threshold
            )));
        }
        if config.window_size == 0 {
            return Err(Error::Configuration(
                "window_size must be at least 1".to_string(),
            ));
        }
        if !(config.violation_fraction > 0.0 && config.violation_fraction <= 1.0) {
            return Err(Error::Configuration(format!(
                "violation_fraction must be in (0, 1], got {}",
                config.violation_fraction
            )));
        }

        Ok(Self {
            config,
            matrix_history: HashMap::new(),
            violator_history: HashMap::new(),
            last_recorded: None,
        })
    }

    /// The engine's configuration.
    pub fn config(&self) -> &SocialDistanceConfig {
        &self.config
    }

    /// Record one frame's people snapshot and return its violator sets.
    ///
    /// Computes the frame's pairwise distance matrix and violator-pair set,
    /// returning `(all_current, newly_appeared)` pairs. Recording the most
    /// recent index again is an idempotent no-op for the stored matrix;
    /// recording an index lower than the most recent fails with
    /// [`Error::OutOfOrderFrame`]. Skipped-over indices are allowed and are
    /// simply absent from window denominators.
    pub fn record_frame(
        &mut self,
        frame_index: usize,
        people: &PeopleCoordinates,
    ) -> Result<(ViolatorPairs, ViolatorPairs)> {
        if let Some(last) = self.last_recorded {
            if frame_index < last {
                return Err(Error::OutOfOrderFrame {
                    last,
                    got: frame_index,
                });
            }
        }

        if !self.matrix_history.contains_key(&frame_index) {
            self.matrix_history
                .insert(frame_index, DistanceMatrix::from_coordinates(people));
            self.last_recorded = Some(frame_index);
        }

        let all = self.current_violator_pairs(frame_index)?.clone();
        let new = self.new_current_violator_pairs(frame_index)?;

        log::debug!(
            "frame {}: {} people, {} violator pairs ({} new)",
            frame_index,
            people.len(),
            all.len(),
            new.len()
        );

        Ok((all, new))
    }

    /// All pairs in sustained violation at the given frame. Memoized: the
    /// set is computed once per frame index and the cached set is returned
    /// on every later call.
    ///
    /// Fails with [`Error::InvalidFrameData`] when no distance matrix was
    /// recorded for the frame.
    pub fn current_violator_pairs(&mut self, frame_index: usize) -> Result<&ViolatorPairs> {
        if !self.violator_history.contains_key(&frame_index) {
            let pairs = self.compute_violator_pairs(frame_index)?;
            self.violator_history.insert(frame_index, pairs);
        }
        Ok(&self.violator_history[&frame_index])
    }

    /// Pairs violating at this frame that were not violating at the previous
    /// frame index. Not memoized; a cheap set difference.
    ///
    /// Frame 0 returns the same set as [`Self::current_violator_pairs`]. A
    /// previous frame that was never recorded contributes an empty set.
    pub fn new_current_violator_pairs(&mut self, frame_index: usize) -> Result<ViolatorPairs> {
        let current = self.current_violator_pairs(frame_index)?.clone();
        if frame_index == 0 {
            return Ok(current);
        }
        if !self.matrix_history.contains_key(&(frame_index - 1)) {
            return Ok(current);
        }

        let previous = self.current_violator_pairs(frame_index - 1)?.clone();
        Ok(current.difference(&previous).copied().collect())
    }

    /// Identities appearing in at least one violating pair at the frame.
    pub fn current_violators_set(&mut self, frame_index: usize) -> Result<BTreeSet<TrackId>> {
        Ok(flatten_pairs(self.current_violator_pairs(frame_index)?))
    }

    /// Identities appearing in at least one newly-violating pair.
    pub fn new_current_violators_set(&mut self, frame_index: usize) -> Result<BTreeSet<TrackId>> {
        Ok(flatten_pairs(&self.new_current_violator_pairs(frame_index)?))
    }

    /// Distance between two identities at a frame, or `None` when the frame
    /// was never recorded or either identity was not present in it.
    pub fn distance_for(&self, frame_index: usize, id1: TrackId, id2: TrackId) -> Option<f64> {
        self.matrix_history.get(&frame_index)?.distance(id1, id2)
    }

    /// The stored distance matrix for a frame, if recorded.
    pub fn distance_matrix(&self, frame_index: usize) -> Option<&DistanceMatrix> {
        self.matrix_history.get(&frame_index)
    }

    fn compute_violator_pairs(&self, frame_index: usize) -> Result<ViolatorPairs> {
        let matrix = self.matrix_history.get(&frame_index).ok_or_else(|| {
            Error::InvalidFrameData(format!(
                "no distance matrix recorded for frame {}",
                frame_index
            ))
        })?;

        let window_start = frame_index.saturating_sub(self.config.window_size - 1);
        let window: Vec<usize> = (window_start..=frame_index)
            .filter(|index| self.matrix_history.contains_key(index))
            .collect();
        // The current frame is recorded, so the window is never empty.
        let window_length = window.len() as f64;

        let mut ids: Vec<TrackId> = matrix.ids().collect();
        ids.sort_unstable();

        let mut pairs = ViolatorPairs::new();
        for (i, &id1) in ids.iter().enumerate() {
            for &id2 in &ids[i + 1..] {
                let violations = window
                    .iter()
                    .filter_map(|index| self.matrix_history[index].distance(id1, id2))
                    .filter(|&distance| distance < self.config.distance_threshold)
                    .count();

                if violations as f64 / window_length >= self.config.violation_fraction {
                    pairs.insert(ViolatorPair::new(id1, id2));
                }
            }
        }

        Ok(pairs)
    }
}

fn flatten_pairs(pairs: &ViolatorPairs) -> BTreeSet<TrackId> {
    pairs
        .iter()
        .flat_map(|pair| [pair.first, pair.second])
        .collect()
}
