//! Articulated mechanisms: a tree of links connected by joints.

use nalgebra::{DVector, Vector3};
use sim_types::{JointLimits, JointType, Pose};

use crate::entity::{RigidBodyComponent, RigidBodyKind};
use crate::error::{Result, SceneError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Joint connecting a link to its parent.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimJoint {
    /// Joint name.
    pub name: String,
    /// Joint type.
    pub joint_type: JointType,
    /// Child frame expressed in the parent frame at zero configuration.
    pub origin: Pose,
    /// Motion axis in the child frame.
    pub axis: Vector3<f64>,
    /// Joint limits.
    pub limits: JointLimits,
}

impl SimJoint {
    /// Create a fixed joint at the identity.
    pub fn fixed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            joint_type: JointType::Fixed,
            origin: Pose::identity(),
            axis: Vector3::z(),
            limits: JointLimits::unlimited(),
        }
    }

    /// Create a revolute joint about `axis`.
    pub fn revolute(name: impl Into<String>, axis: Vector3<f64>, limits: JointLimits) -> Self {
        Self {
            name: name.into(),
            joint_type: JointType::Revolute,
            origin: Pose::identity(),
            axis,
            limits,
        }
    }

    /// Create a continuous joint about `axis`.
    pub fn continuous(name: impl Into<String>, axis: Vector3<f64>) -> Self {
        Self {
            name: name.into(),
            joint_type: JointType::Continuous,
            origin: Pose::identity(),
            axis,
            limits: JointLimits::unlimited(),
        }
    }

    /// Create a prismatic joint along `axis`.
    pub fn prismatic(name: impl Into<String>, axis: Vector3<f64>, limits: JointLimits) -> Self {
        Self {
            name: name.into(),
            joint_type: JointType::Prismatic,
            origin: Pose::identity(),
            axis,
            limits,
        }
    }

    /// Set the joint origin.
    #[must_use]
    pub fn with_origin(mut self, origin: Pose) -> Self {
        self.origin = origin;
        self
    }
}

/// One link of an articulation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimLink {
    /// Link name, unique within its articulation.
    pub name: String,
    /// Identifier unique within one scene instance.
    pub per_scene_id: u64,
    /// World pose.
    pub pose: Pose,
    /// Parent link index, `None` for the root.
    pub parent: Option<usize>,
    /// Joint to the parent. Ignored for the root.
    pub joint: SimJoint,
    /// Rigid-body component carrying the link's collision shapes.
    pub component: RigidBodyComponent,
}

impl SimLink {
    /// Create a root link.
    pub fn root(name: impl Into<String>, per_scene_id: u64) -> Self {
        let name = name.into();
        Self {
            joint: SimJoint::fixed(format!("{name}_root_joint")),
            component: RigidBodyComponent::new(name.clone(), RigidBodyKind::ArticulationLink),
            name,
            per_scene_id,
            pose: Pose::identity(),
            parent: None,
        }
    }

    /// Create a child link attached to `parent` through `joint`.
    pub fn child(name: impl Into<String>, per_scene_id: u64, parent: usize, joint: SimJoint) -> Self {
        let name = name.into();
        Self {
            component: RigidBodyComponent::new(name.clone(), RigidBodyKind::ArticulationLink),
            name,
            per_scene_id,
            pose: Pose::identity(),
            parent: Some(parent),
            joint,
        }
    }

    /// Set the world pose.
    #[must_use]
    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.pose = pose;
        self
    }

    /// Set the rigid-body component.
    #[must_use]
    pub fn with_component(mut self, component: RigidBodyComponent) -> Self {
        self.component = component;
        self
    }

    /// Check if this is the articulation root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// An articulated mechanism.
///
/// Links are stored in topological order: `links()[0]` is the root and every
/// link's parent precedes it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimArticulation {
    name: String,
    links: Vec<SimLink>,
    qpos: Vec<f64>,
}

impl SimArticulation {
    /// Create an articulation from its root link.
    pub fn new(name: impl Into<String>, mut root: SimLink) -> Self {
        root.parent = None;
        Self {
            name: name.into(),
            links: vec![root],
            qpos: Vec::new(),
        }
    }

    /// Append a link. Returns its index.
    ///
    /// The joint value for a new movable joint starts at zero.
    pub fn add_link(&mut self, link: SimLink) -> Result<usize> {
        let Some(parent) = link.parent else {
            return Err(SceneError::MissingParent(link.name));
        };
        if parent >= self.links.len() {
            return Err(SceneError::InvalidParent {
                link: link.name,
                parent,
                available: self.links.len(),
            });
        }
        if link.joint.joint_type.is_movable() {
            self.qpos
                .extend(std::iter::repeat_n(0.0, link.joint.joint_type.dof()));
        }
        self.links.push(link);
        Ok(self.links.len() - 1)
    }

    /// Articulation name. Not necessarily unique within a scene.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All links, root first.
    #[must_use]
    pub fn links(&self) -> &[SimLink] {
        &self.links
    }

    /// Mutable access to a link, e.g. to update its world pose.
    pub fn link_mut(&mut self, index: usize) -> Option<&mut SimLink> {
        self.links.get_mut(index)
    }

    /// Root link.
    #[must_use]
    pub fn root(&self) -> &SimLink {
        &self.links[0]
    }

    /// Joints that contribute to the configuration vector, in link order.
    pub fn active_joints(&self) -> impl Iterator<Item = &SimJoint> {
        self.links
            .iter()
            .skip(1)
            .map(|link| &link.joint)
            .filter(|joint| joint.joint_type.is_movable())
    }

    /// Degrees of freedom.
    #[must_use]
    pub fn dof(&self) -> usize {
        self.qpos.len()
    }

    /// Current joint configuration, ordered as [`Self::active_joints`].
    #[must_use]
    pub fn qpos(&self) -> DVector<f64> {
        DVector::from_column_slice(&self.qpos)
    }

    /// Current joint configuration as a slice.
    #[must_use]
    pub fn qpos_slice(&self) -> &[f64] {
        &self.qpos
    }

    /// Overwrite the joint configuration.
    pub fn set_qpos(&mut self, qpos: &[f64]) -> Result<()> {
        if qpos.len() != self.qpos.len() {
            return Err(SceneError::QposSizeMismatch {
                articulation: self.name.clone(),
                expected: self.qpos.len(),
                actual: qpos.len(),
            });
        }
        self.qpos.copy_from_slice(qpos);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn two_joint_arm() -> SimArticulation {
        let mut arm = SimArticulation::new("arm", SimLink::root("base", 1));
        arm.add_link(SimLink::child(
            "upper",
            2,
            0,
            SimJoint::revolute("shoulder", Vector3::z(), JointLimits::position(-1.0, 1.0)),
        ))
        .unwrap();
        arm.add_link(SimLink::child("mount", 3, 1, SimJoint::fixed("mount_joint")))
            .unwrap();
        arm.add_link(SimLink::child(
            "lower",
            4,
            2,
            SimJoint::continuous("elbow", Vector3::y()),
        ))
        .unwrap();
        arm
    }

    #[test]
    fn test_active_joints_skip_fixed() {
        let arm = two_joint_arm();
        let names: Vec<_> = arm.active_joints().map(|j| j.name.as_str()).collect();
        assert_eq!(names, vec!["shoulder", "elbow"]);
        assert_eq!(arm.dof(), 2);
        assert_eq!(arm.root().name, "base");
    }

    #[test]
    fn test_set_qpos() {
        let mut arm = two_joint_arm();
        arm.set_qpos(&[0.5, -0.25]).unwrap();
        assert_eq!(arm.qpos_slice(), &[0.5, -0.25]);

        let err = arm.set_qpos(&[1.0]).unwrap_err();
        assert!(matches!(
            err,
            SceneError::QposSizeMismatch {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_parent() {
        let mut arm = SimArticulation::new("arm", SimLink::root("base", 1));
        let err = arm
            .add_link(SimLink::child("floating", 2, 5, SimJoint::fixed("j")))
            .unwrap_err();
        assert!(matches!(err, SceneError::InvalidParent { parent: 5, .. }));

        let mut orphan = SimLink::root("orphan", 3);
        orphan.parent = None;
        assert!(matches!(
            arm.add_link(orphan),
            Err(SceneError::MissingParent(_))
        ));
    }
}
