//! Composite collision objects.

use std::sync::Arc;

use sim_types::Pose;

use crate::aabb::Aabb;
use crate::error::{CollisionError, Result};
use crate::geometry::CollisionGeometry;

/// A named bundle of collision shapes placed at a world pose.
///
/// Shapes are shared behind [`Arc`], so moving an object to a new pose with
/// [`Self::with_pose`] or [`Self::set_pose`] never copies geometry.
#[derive(Debug, Clone)]
pub struct CollisionObject {
    name: String,
    pose: Pose,
    shapes: Vec<Arc<CollisionGeometry>>,
    shape_poses: Vec<Pose>,
}

impl CollisionObject {
    /// Create an object.
    ///
    /// `shape_poses[i]` is the pose of `shapes[i]` in the object frame.
    pub fn new(
        name: impl Into<String>,
        pose: Pose,
        shapes: Vec<Arc<CollisionGeometry>>,
        shape_poses: Vec<Pose>,
    ) -> Result<Self> {
        let name = name.into();
        if shapes.len() != shape_poses.len() {
            return Err(CollisionError::ShapeCountMismatch {
                name,
                shapes: shapes.len(),
                poses: shape_poses.len(),
            });
        }
        if shapes.is_empty() {
            return Err(CollisionError::EmptyObject(name));
        }
        Ok(Self {
            name,
            pose,
            shapes,
            shape_poses,
        })
    }

    /// Object name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// World pose of the object frame.
    #[must_use]
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Move the object.
    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    /// Copy of this object at another pose, sharing its shapes.
    #[must_use]
    pub fn with_pose(&self, pose: Pose) -> Self {
        Self {
            name: self.name.clone(),
            pose,
            shapes: self.shapes.clone(),
            shape_poses: self.shape_poses.clone(),
        }
    }

    /// Shapes in insertion order.
    #[must_use]
    pub fn shapes(&self) -> &[Arc<CollisionGeometry>] {
        &self.shapes
    }

    /// Shape poses in the object frame.
    #[must_use]
    pub fn shape_poses(&self) -> &[Pose] {
        &self.shape_poses
    }

    /// Number of shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Always false; objects carry at least one shape.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// World pose of shape `index`.
    #[must_use]
    pub fn world_shape_pose(&self, index: usize) -> Option<Pose> {
        self.shape_poses.get(index).map(|p| self.pose * *p)
    }

    /// World-space bounding box of all shapes.
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        self.shapes
            .iter()
            .zip(&self.shape_poses)
            .map(|(shape, local)| shape.local_aabb().transformed(&(self.pose * *local)))
            .reduce(|acc, b| acc.merged(&b))
            .unwrap_or_default()
    }
}
