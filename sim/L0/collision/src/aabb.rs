//! Axis-aligned bounding boxes.

use nalgebra::{Point3, Vector3};
use sim_types::Pose;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// X-axis.
    X,
    /// Y-axis.
    Y,
    /// Z-axis.
    Z,
}

impl Axis {
    /// Get all three axes.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::X, Self::Y, Self::Z]
    }

    /// Component of a point along this axis.
    #[must_use]
    pub fn of(self, p: &Point3<f64>) -> f64 {
        match self {
            Self::X => p.x,
            Self::Y => p.y,
            Self::Z => p.z,
        }
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3<f64>,
    /// Maximum corner of the bounding box.
    pub max: Point3<f64>,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::new(Point3::origin(), Point3::origin())
    }
}

impl Aabb {
    /// Create a new AABB from minimum and maximum corners.
    #[must_use]
    pub const fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with the given half-extents.
    #[must_use]
    pub fn from_center(center: Point3<f64>, half_extents: Vector3<f64>) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Smallest AABB containing all points. `None` for an empty set.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3<f64>>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut aabb = Self::new(first, first);
        for p in iter {
            aabb.min = aabb.min.inf(p);
            aabb.max = aabb.max.sup(p);
        }
        Some(aabb)
    }

    /// Smallest AABB containing both boxes.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Check if this AABB overlaps with another AABB.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Check if a point lies inside or on the boundary.
    #[must_use]
    pub fn contains_point(&self, p: &Point3<f64>) -> bool {
        Axis::all()
            .into_iter()
            .all(|axis| axis.of(p) >= axis.of(&self.min) && axis.of(p) <= axis.of(&self.max))
    }

    /// Expand this AABB by a margin on all sides.
    #[must_use]
    pub fn expanded(&self, margin: f64) -> Self {
        let m = Vector3::repeat(margin);
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// Get the extent (size) along a specific axis.
    #[must_use]
    pub fn extent(&self, axis: Axis) -> f64 {
        axis.of(&self.max) - axis.of(&self.min)
    }

    /// Axis with the largest extent. Ties favor X, then Y.
    #[must_use]
    pub fn longest_axis(&self) -> Axis {
        let extent = self.max - self.min;
        if extent.x >= extent.y && extent.x >= extent.z {
            Axis::X
        } else if extent.y >= extent.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        Point3::from((self.min.coords + self.max.coords) * 0.5)
    }

    /// Half extents.
    #[must_use]
    pub fn half_extents(&self) -> Vector3<f64> {
        (self.max - self.min) * 0.5
    }

    /// Bound of this box after applying `pose`.
    ///
    /// Uses the absolute rotation matrix, so the result is tight for the
    /// rotated box but not for the underlying geometry.
    #[must_use]
    pub fn transformed(&self, pose: &Pose) -> Self {
        let center = pose.transform_point(&self.center());
        let abs_rot = pose.rotation.to_rotation_matrix().matrix().abs();
        Self::from_center(center, abs_rot * self.half_extents())
    }
}
