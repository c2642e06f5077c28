//! Calibration parameters consumed by the coordinate converter.

use std::collections::HashMap;

use nalgebra::{Quaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Radial-tangential distortion coefficients.
///
/// Carried through from the calibration file as input data; the closed-form
/// ground-plane conversion does not apply distortion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Distortion {
    /// Radial coefficient k1.
    pub k1: f64,
    /// Radial coefficient k2.
    pub k2: f64,
    /// Tangential coefficient p1.
    pub p1: f64,
    /// Tangential coefficient p2.
    pub p2: f64,
}

/// Intrinsic and extrinsic parameters of a single calibrated camera.
///
/// Built from a mapping of named floats as produced by a calibration loader
/// (see [`crate::dataset::CalibrationSource`]). The rotation quaternion is
/// stored exactly as supplied; it is not re-normalized before the rotation
/// matrix is derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraParameters {
    /// Focal length in x (pixels).
    pub fx: f64,
    /// Focal length in y (pixels).
    pub fy: f64,
    /// Principal point x (pixels).
    pub cx: f64,
    /// Principal point y (pixels).
    pub cy: f64,
    /// Camera translation relative to the scene origin.
    pub translation: Vector3<f64>,
    /// Camera rotation quaternion, used as given.
    pub rotation: Quaternion<f64>,
    /// Distortion coefficients (unused by the conversion math).
    pub distortion: Distortion,
}

/// Key names of the required calibration fields.
const REQUIRED_KEYS: [&str; 11] = [
    "FocalLengthX",
    "FocalLengthY",
    "PrincipalPointX",
    "PrincipalPointY",
    "TranslationX",
    "TranslationY",
    "TranslationZ",
    "RotationX",
    "RotationY",
    "RotationZ",
    "RotationW",
];

impl CameraParameters {
    /// Build camera parameters from a named-float calibration mapping.
    ///
    /// # Arguments
    /// * `map` - Parsed calibration values keyed by field name
    ///
    /// # Returns
    /// An error naming the first missing required field; extra fields beyond
    /// the distortion coefficients are ignored.
    pub fn from_map(map: &HashMap<String, f64>) -> Result<Self> {
        for key in REQUIRED_KEYS {
            if !map.contains_key(key) {
                return Err(Error::Configuration(format!(
                    "missing camera parameter '{}'",
                    key
                )));
            }
        }

        let get = |key: &str| map[key];

        Ok(Self {
            fx: get("FocalLengthX"),
            fy: get("FocalLengthY"),
            cx: get("PrincipalPointX"),
            cy: get("PrincipalPointY"),
            translation: Vector3::new(
                get("TranslationX"),
                get("TranslationY"),
                get("TranslationZ"),
            ),
            // nalgebra quaternion order is (w, i, j, k)
            rotation: Quaternion::new(
                get("RotationW"),
                get("RotationX"),
                get("RotationY"),
                get("RotationZ"),
            ),
            distortion: Distortion {
                k1: map.get("DistortionK1").copied().unwrap_or(0.0),
                k2: map.get("DistortionK2").copied().unwrap_or(0.0),
                p1: map.get("DistortionP1").copied().unwrap_or(0.0),
                p2: map.get("DistortionP2").copied().unwrap_or(0.0),
            },
        })
    }
}
