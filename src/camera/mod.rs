//! Camera calibration and image/scene coordinate conversion.
//!
//! A single fixed overhead camera observes a ground plane at Z = 0. Given the
//! camera's intrinsic parameters (focal lengths, principal point) and
//! extrinsic pose (translation + rotation quaternion), [`CoordinateConverter`]
//! maps image pixels to ground-plane scene coordinates and back.

mod converter;
mod parameters;

pub use converter::CoordinateConverter;
pub use parameters::{CameraParameters, Distortion};

/// 2D pixel coordinate on the image.
pub type ImagePoint = nalgebra::Point2<f64>;

/// 3D scene coordinate. Points produced by image-to-scene conversion always
/// lie on the ground plane (Z = 0).
pub type ScenePoint = nalgebra::Point3<f64>;
