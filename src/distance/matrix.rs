//! Symmetric per-frame distance matrix over tracked identities.

use std::collections::HashMap;

use nalgebra::DMatrix;

use super::coordinates::PeopleCoordinates;
use super::TrackId;

/// Euclidean ground-plane distances between every pair of identities present
/// in one frame, with a lookup from identity to matrix index.
///
/// Immutable once built. The diagonal is zero by construction and never
/// queried by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    index_map: HashMap<TrackId, usize>,
    matrix: DMatrix<f64>,
}

impl DistanceMatrix {
    /// Build the matrix for one frame snapshot, O(n^2) in the people count.
    pub fn from_coordinates(people: &PeopleCoordinates) -> Self {
        let index_map: HashMap<TrackId, usize> = people
            .ids()
            .iter()
            .enumerate()
            .map(|(index, &id)| (id, index))
            .collect();

        let n = people.len();
        let positions = people.positions();
        let mut matrix = DMatrix::zeros(n, n);
        for i in 0..n {
            for j in (i + 1)..n {
                let distance = (positions[i] - positions[j]).norm();
                matrix[(i, j)] = distance;
                matrix[(j, i)] = distance;
            }
        }

        Self { index_map, matrix }
    }

    /// Distance between two identities, or `None` if either was not present
    /// in this frame.
    pub fn distance(&self, id1: TrackId, id2: TrackId) -> Option<f64> {
        let i = *self.index_map.get(&id1)?;
        let j = *self.index_map.get(&id2)?;
        Some(self.matrix[(i, j)])
    }

    /// Distances from one identity to everyone in the frame, in matrix-row
    /// order, or `None` if the identity was not present.
    pub fn distances_from(&self, id: TrackId) -> Option<Vec<f64>> {
        let i = *self.index_map.get(&id)?;
        Some(self.matrix.row(i).iter().copied().collect())
    }

    /// Whether the identity was present in this frame.
    pub fn contains(&self, id: TrackId) -> bool {
        self.index_map.contains_key(&id)
    }

    /// Identities present in this frame (arbitrary order).
    pub fn ids(&self) -> impl Iterator<Item = TrackId> + '_ {
        self.index_map.keys().copied()
    }

    /// Number of identities in this frame.
    pub fn len(&self) -> usize {
        self.index_map.len()
    }

    /// Whether the frame had no identities.
    pub fn is_empty(&self) -> bool {
        self.index_map.is_empty()
    }
}
