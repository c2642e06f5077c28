//! Closed-form conversion between image pixels and ground-plane coordinates.

use std::collections::HashMap;

use nalgebra::{Matrix3, Matrix4, Quaternion, Vector3, Vector4};

use super::parameters::CameraParameters;
use super::{ImagePoint, ScenePoint};
use crate::{Error, Result};

/// Homogeneous components smaller than this are treated as a zero denominator.
const DEPTH_EPSILON: f64 = 1e-12;

/// Bidirectional mapping between image pixels and ground-plane scene
/// coordinates for a single fixed, calibrated camera.
///
/// All matrices are built once at construction; conversions are pure `&self`
/// calls, so a converter can be shared freely across threads for read-only
/// use.
///
/// Image-to-scene conversion solves the pinhole projection equations
/// restricted to the Z = 0 plane: the projection of a ground-plane point is
/// `K * [r1 r2 t] * [X, Y, 1]^T`, so the pixel-to-ground mapping is the
/// inverse of that 3x3 homography, with the recovered homogeneous component
/// acting as the camera-space depth of the viewing ray's plane intersection.
#[derive(Debug, Clone)]
pub struct CoordinateConverter {
    parameters: CameraParameters,
    camera_matrix: Matrix3<f64>,
    projection_matrix: Matrix4<f64>,
    transformation_matrix: Matrix4<f64>,
    ground_homography: Matrix3<f64>,
    /// `None` when the camera views the ground plane edge-on.
    ground_homography_inv: Option<Matrix3<f64>>,
}

impl CoordinateConverter {
    /// Create a converter from already-validated camera parameters.
    pub fn new(parameters: CameraParameters) -> Self {
        let camera_matrix = Matrix3::new(
            parameters.fx, 0.0, parameters.cx,
            0.0, parameters.fy, parameters.cy,
            0.0, 0.0, 1.0,
        );

        let mut projection_matrix = Matrix4::zeros();
        projection_matrix
            .fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&camera_matrix);
        projection_matrix[(3, 3)] = 1.0;

        let rotation = rotation_matrix(&parameters.rotation);

        let mut transformation_matrix = Matrix4::zeros();
        transformation_matrix
            .fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&rotation);
        transformation_matrix
            .fixed_view_mut::<3, 1>(0, 3)
            .copy_from(&parameters.translation);
        transformation_matrix[(3, 3)] = 1.0;

        // Projection of a Z = 0 point reduces to this 3x3 homography.
        let ground_homography = Matrix3::from_columns(&[
            camera_matrix * rotation.column(0).into_owned(),
            camera_matrix * rotation.column(1).into_owned(),
            camera_matrix * parameters.translation,
        ]);
        let ground_homography_inv = ground_homography.try_inverse();

        Self {
            parameters,
            camera_matrix,
            projection_matrix,
            transformation_matrix,
            ground_homography,
            ground_homography_inv,
        }
    }

    /// Create a converter straight from a named-float calibration mapping.
    ///
    /// Fails with [`Error::Configuration`] when a required field is absent.
    pub fn from_map(map: &HashMap<String, f64>) -> Result<Self> {
        Ok(Self::new(CameraParameters::from_map(map)?))
    }

    /// Convert an image pixel to the ground-plane scene point its viewing ray
    /// passes through.
    ///
    /// The returned point always has Z = 0. Fails with
    /// [`Error::DegenerateProjection`] when the camera's viewing geometry is
    /// parallel to the ground plane (singular homography) or the pixel lies
    /// on the horizon line (zero denominator).
    pub fn to_scene(&self, image_point: &ImagePoint) -> Result<ScenePoint> {
        let inverse = self.ground_homography_inv.as_ref().ok_or_else(|| {
            Error::DegenerateProjection(
                "camera views the ground plane edge-on; every viewing ray is parallel to it"
                    .to_string(),
            )
        })?;

        let back_projected = inverse * Vector3::new(image_point.x, image_point.y, 1.0);
        if back_projected.z.abs() < DEPTH_EPSILON {
            return Err(Error::DegenerateProjection(format!(
                "image point ({}, {}) lies on the horizon line",
                image_point.x, image_point.y
            )));
        }

        Ok(ScenePoint::new(
            back_projected.x / back_projected.z,
            back_projected.y / back_projected.z,
            0.0,
        ))
    }

    /// Project a scene point onto the image.
    ///
    /// Applies the camera pose transform, then the projection matrix, then
    /// perspective division. Fails with [`Error::DegenerateProjection`] when
    /// the projected depth is zero.
    pub fn to_image(&self, scene_point: &ScenePoint) -> Result<ImagePoint> {
        let homogeneous = Vector4::new(scene_point.x, scene_point.y, scene_point.z, 1.0);
        let camera_point = self.transformation_matrix * homogeneous;
        let projected = self.projection_matrix * camera_point;

        if projected.z.abs() < DEPTH_EPSILON {
            return Err(Error::DegenerateProjection(format!(
                "scene point ({}, {}, {}) projects to zero depth",
                scene_point.x, scene_point.y, scene_point.z
            )));
        }

        Ok(ImagePoint::new(
            projected.x / projected.z,
            projected.y / projected.z,
        ))
    }

    /// The calibration parameters this converter was built from.
    pub fn parameters(&self) -> &CameraParameters {
        &self.parameters
    }

    /// The 3x3 intrinsic matrix.
    pub fn camera_matrix(&self) -> &Matrix3<f64> {
        &self.camera_matrix
    }

    /// The 4x4 projection matrix (intrinsics embedded with a homogeneous 1).
    pub fn projection_matrix(&self) -> &Matrix4<f64> {
        &self.projection_matrix
    }

    /// The 4x4 camera pose matrix (rotation + translation).
    pub fn transformation_matrix(&self) -> &Matrix4<f64> {
        &self.transformation_matrix
    }

    /// The 3x3 ground-plane homography `K * [r1 r2 t]`.
    pub fn ground_homography(&self) -> &Matrix3<f64> {
        &self.ground_homography
    }
}

/// Rotation matrix from a quaternion, using the components exactly as given.
///
/// The quaternion is deliberately not normalized first; calibration files
/// supply it and the conversion must reproduce their projection verbatim.
fn rotation_matrix(q: &Quaternion<f64>) -> Matrix3<f64> {
    let (x, y, z, w) = (q.i, q.j, q.k, q.w);
    Matrix3::new(
        1.0 - 2.0 * y * y - 2.0 * z * z,
        2.0 * x * y - 2.0 * z * w,
        2.0 * x * z + 2.0 * y * w,
        2.0 * x * y + 2.0 * z * w,
        1.0 - 2.0 * x * x - 2.0 * z * z,
        2.0 * y * z - 2.0 * x * w,
        2.0 * x * z - 2.0 * y * w,
        2.0 * y * z + 2.0 * x * w,
        1.0 - 2.0 * x * x - 2.0 * y * y,
    )
}
