//! Parser for TownCentre ground-truth track files.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::{BoundingBox, TrackSource, TrackedEntity};
use crate::distance::TrackId;
use crate::{Error, Result};

/// Hand-labeled per-frame tracks in the TownCentre `.top` CSV layout:
///
/// `person,frame,headValid,bodyValid,hx1,hy1,hx2,hy2,bx1,by1,bx2,by2`
///
/// Only the identity, frame number and body box are consumed; the body box's
/// bottom center becomes the entity's foot point.
#[derive(Debug, Clone)]
pub struct GroundTruthFile {
    frames: BTreeMap<usize, Vec<TrackedEntity>>,
    num_frames: usize,
}

impl GroundTruthFile {
    /// Read and parse a ground-truth file.
    ///
    /// Rows with too few columns or unparsable numbers are skipped.
    pub fn load<P: AsRef<Path>>(file_path: P) -> Result<Self> {
        let path = file_path.as_ref().to_string_lossy().to_string();
        let file = File::open(&file_path).map_err(|e| {
            Error::IoError(std::io::Error::new(
                e.kind(),
                format!("failed to open ground-truth file '{}': {}", path, e),
            ))
        })?;

        let reader = BufReader::new(file);
        let mut frames: BTreeMap<usize, Vec<TrackedEntity>> = BTreeMap::new();
        let mut num_frames = 0;

        for line_result in reader.lines() {
            let line = line_result.map_err(Error::IoError)?;
            let parts: Vec<&str> = line.split(',').collect();

            if parts.len() < 12 {
                continue; // Skip malformed lines
            }

            let Ok(id) = parts[0].trim().parse::<TrackId>() else {
                continue;
            };
            let Ok(frame) = parts[1].trim().parse::<usize>() else {
                continue;
            };

            let mut body = [0.0f64; 4];
            let mut valid = true;
            for (slot, part) in body.iter_mut().zip(&parts[8..12]) {
                match part.trim().parse::<f64>() {
                    Ok(value) => *slot = value,
                    Err(_) => {
                        valid = false;
                        break;
                    }
                }
            }
            if !valid {
                continue;
            }

            let entity = TrackedEntity::from_body(
                id,
                BoundingBox::new(body[0], body[1], body[2], body[3]),
            );
            frames.entry(frame).or_default().push(entity);
            num_frames = num_frames.max(frame + 1);
        }

        Ok(Self { frames, num_frames })
    }

    /// Frame indices that contain at least one entity, ascending.
    pub fn frame_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.frames.keys().copied()
    }

    /// Total number of labeled entities across all frames.
    pub fn num_entities(&self) -> usize {
        self.frames.values().map(Vec::len).sum()
    }
}

impl TrackSource for GroundTruthFile {
    fn num_frames(&self) -> usize {
        self.num_frames
    }

    fn tracked_entities(&self, frame_index: usize) -> &[TrackedEntity] {
        self.frames
            .get(&frame_index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
