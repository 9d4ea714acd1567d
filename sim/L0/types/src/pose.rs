//! Rigid transforms.
//!
//! [`Pose`] is the single transform type shared by the simulation scene, the
//! collision backend and the kinematic model. It is a translation followed by
//! a rotation, i.e. `p_world = rotation * p_local + position`.

use std::ops::Mul;

use nalgebra::{Isometry3, Point3, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Position and orientation of a frame relative to a parent frame.
///
/// # Example
///
/// ```
/// use sim_types::Pose;
/// use nalgebra::Point3;
///
/// let pose = Pose::from_position(Point3::new(1.0, 2.0, 3.0));
/// let world = pose.transform_point(&Point3::new(1.0, 0.0, 0.0));
/// assert_eq!(world, Point3::new(2.0, 2.0, 3.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose {
    /// Translation part.
    pub position: Point3<f64>,
    /// Rotation part.
    pub rotation: UnitQuaternion<f64>,
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose {
    /// The identity transform.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            position: Point3::origin(),
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Pure translation.
    #[must_use]
    pub fn from_position(position: Point3<f64>) -> Self {
        Self {
            position,
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Pure rotation.
    #[must_use]
    pub fn from_rotation(rotation: UnitQuaternion<f64>) -> Self {
        Self {
            position: Point3::origin(),
            rotation,
        }
    }

    /// Translation and rotation.
    #[must_use]
    pub const fn from_position_rotation(
        position: Point3<f64>,
        rotation: UnitQuaternion<f64>,
    ) -> Self {
        Self { position, rotation }
    }

    /// Create a pose from an isometry.
    #[must_use]
    pub fn from_isometry(iso: Isometry3<f64>) -> Self {
        Self {
            position: Point3::from(iso.translation.vector),
            rotation: iso.rotation,
        }
    }

    /// Convert to an isometry.
    #[must_use]
    pub fn to_isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(self.position.coords.into(), self.rotation)
    }

    /// Transform a point from the local frame into the parent frame.
    #[must_use]
    pub fn transform_point(&self, local: &Point3<f64>) -> Point3<f64> {
        self.position + self.rotation * local.coords
    }

    /// Rotate a vector from the local frame into the parent frame.
    #[must_use]
    pub fn transform_vector(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * local
    }

    /// Transform a point from the parent frame into the local frame.
    #[must_use]
    pub fn inverse_transform_point(&self, parent: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation.inverse() * (parent - self.position))
    }

    /// Compute the inverse pose.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let inv_rotation = self.rotation.inverse();
        Self {
            position: Point3::from(-(inv_rotation * self.position.coords)),
            rotation: inv_rotation,
        }
    }

    /// Compose two poses: `self * other`.
    ///
    /// `other` is expressed in the frame described by `self`.
    #[must_use]
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            position: self.transform_point(&other.position),
            rotation: self.rotation * other.rotation,
        }
    }

    /// Check if the pose contains `NaN` or `Inf` values.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.coords.iter().all(|x| x.is_finite())
            && self.rotation.coords.iter().all(|x| x.is_finite())
    }

    /// Compare two poses up to `epsilon` in translation and rotation angle.
    ///
    /// `q` and `-q` describe the same rotation and compare equal.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.position - other.position).norm() <= epsilon
            && self.rotation.angle_to(&other.rotation) <= epsilon
    }
}

impl Mul for Pose {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.compose(&rhs)
    }
}

impl Mul<&Pose> for &Pose {
    type Output = Pose;

    fn mul(self, rhs: &Pose) -> Pose {
        self.compose(rhs)
    }
}

impl From<Isometry3<f64>> for Pose {
    fn from(iso: Isometry3<f64>) -> Self {
        Self::from_isometry(iso)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_compose_matches_isometry() {
        let a = Pose::from_position_rotation(
            Point3::new(1.0, 2.0, 3.0),
            UnitQuaternion::from_euler_angles(0.1, 0.2, 0.3),
        );
        let b = Pose::from_position_rotation(
            Point3::new(-0.5, 0.0, 2.0),
            UnitQuaternion::from_euler_angles(-0.4, 0.0, 1.0),
        );

        let composed = a * b;
        let expected = Pose::from_isometry(a.to_isometry() * b.to_isometry());
        assert!(composed.approx_eq(&expected, 1e-12));
    }

    #[test]
    fn test_inverse_roundtrip() {
        let pose = Pose::from_position_rotation(
            Point3::new(1.0, -2.0, 0.5),
            UnitQuaternion::from_euler_angles(0.3, -0.2, FRAC_PI_2),
        );

        let identity = pose * pose.inverse();
        assert!(identity.approx_eq(&Pose::identity(), 1e-12));

        let p = Point3::new(0.2, 0.4, 0.8);
        let back = pose.inverse_transform_point(&pose.transform_point(&p));
        assert_relative_eq!(back, p, epsilon = 1e-12);
    }

    #[test]
    fn test_transform_point_rotation() {
        let pose = Pose::from_position_rotation(
            Point3::new(1.0, 0.0, 0.0),
            UnitQuaternion::from_euler_angles(0.0, 0.0, FRAC_PI_2),
        );

        let world = pose.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(world.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(world.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_approx_eq_antipodal_quaternion() {
        let q = UnitQuaternion::from_euler_angles(0.1, 0.2, 0.3);
        let neg = UnitQuaternion::new_unchecked(-q.into_inner());
        let a = Pose::from_rotation(q);
        let b = Pose::from_rotation(neg);
        assert!(a.approx_eq(&b, 1e-12));
    }
}
