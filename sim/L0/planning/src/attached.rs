//! Objects rigidly carried by a link of an articulation.

use sim_collision::CollisionObject;
use sim_types::Pose;

/// A collision object attached to a link.
///
/// The authoritative pose is the one relative to the carrier link; the
/// object's world pose is a cache refreshed by [`Self::update_pose`].
#[derive(Debug, Clone)]
pub struct AttachedBody {
    object: CollisionObject,
    articulation: String,
    link_index: usize,
    pose: Pose,
    touch_links: Vec<String>,
}

impl AttachedBody {
    /// Attach `object` to link `link_index` of `articulation` at `pose`
    /// relative to the link.
    pub fn new(
        object: CollisionObject,
        articulation: impl Into<String>,
        link_index: usize,
        pose: Pose,
        touch_links: Vec<String>,
    ) -> Self {
        Self {
            object,
            articulation: articulation.into(),
            link_index,
            pose,
            touch_links,
        }
    }

    /// Object name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.object.name()
    }

    /// The carried collision object, posed at the last update.
    #[must_use]
    pub fn object(&self) -> &CollisionObject {
        &self.object
    }

    /// Name of the carrying articulation.
    #[must_use]
    pub fn articulation(&self) -> &str {
        &self.articulation
    }

    /// Index of the carrier link in the articulation.
    #[must_use]
    pub fn link_index(&self) -> usize {
        self.link_index
    }

    /// Pose relative to the carrier link.
    #[must_use]
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Set the pose relative to the carrier link.
    ///
    /// The world pose is refreshed on the next [`Self::update_pose`].
    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    /// Links the object may touch without counting as a collision.
    #[must_use]
    pub fn touch_links(&self) -> &[String] {
        &self.touch_links
    }

    /// Cached world pose.
    #[must_use]
    pub fn global_pose(&self) -> &Pose {
        self.object.pose()
    }

    /// Recompute the world pose from the carrier link's world pose.
    pub fn update_pose(&mut self, link_global_pose: &Pose) {
        self.object.set_pose(link_global_pose * &self.pose);
    }

    /// Give back the collision object.
    #[must_use]
    pub fn into_object(self) -> CollisionObject {
        self.object
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, UnitQuaternion};
    use sim_collision::CollisionGeometry;
    use std::f64::consts::FRAC_PI_2;
    use std::sync::Arc;

    fn cup() -> CollisionObject {
        CollisionObject::new(
            "cup_5",
            Pose::identity(),
            vec![Arc::new(CollisionGeometry::sphere(0.05))],
            vec![Pose::identity()],
        )
        .unwrap()
    }

    #[test]
    fn test_update_pose_composes_link_pose() {
        let relative = Pose::from_position(Point3::new(0.0, 0.0, 0.1));
        let mut body = AttachedBody::new(cup(), "arm_0", 3, relative, vec!["hand".into()]);
        let link = Pose::from_position_rotation(
            Point3::new(1.0, 0.0, 0.0),
            UnitQuaternion::from_euler_angles(FRAC_PI_2, 0.0, 0.0),
        );
        body.update_pose(&link);
        // Rolling 90 degrees about X turns +Z into -Y.
        assert_relative_eq!(
            body.global_pose().position,
            Point3::new(1.0, -0.1, 0.0),
            epsilon = 1e-12
        );
        assert_eq!(body.name(), "cup_5");
        assert_eq!(body.touch_links(), &["hand".to_string()]);
    }

    #[test]
    fn test_set_pose_waits_for_update() {
        let mut body = AttachedBody::new(cup(), "arm_0", 0, Pose::identity(), Vec::new());
        body.set_pose(Pose::from_position(Point3::new(0.0, 1.0, 0.0)));
        assert_eq!(*body.global_pose(), Pose::identity());
        body.update_pose(&Pose::identity());
        assert_relative_eq!(body.global_pose().position.y, 1.0);
    }
}
