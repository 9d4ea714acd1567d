//! Articulated kinematic model with forward kinematics.

use hashbrown::HashMap;
use nalgebra::{DVector, Point3, Unit, UnitQuaternion, Vector3};
use sim_collision::CollisionObject;
use sim_types::{JointLimits, JointType, Pose};
use tracing::debug;

use crate::error::{KinematicsError, Result};

/// A link of the kinematic tree.
#[derive(Debug, Clone)]
pub(crate) struct KinLink {
    pub(crate) name: String,
    /// Index into the model's joints, `None` for the root.
    pub(crate) parent_joint: Option<usize>,
}

/// A joint of the kinematic tree, fixed joints included.
#[derive(Debug, Clone)]
pub(crate) struct KinJoint {
    pub(crate) name: String,
    pub(crate) joint_type: JointType,
    pub(crate) parent_link: usize,
    /// Child frame in the parent frame at zero configuration.
    pub(crate) origin: Pose,
    pub(crate) axis: Unit<Vector3<f64>>,
    pub(crate) limits: JointLimits,
    /// Position in the configuration vector for movable joints.
    pub(crate) qpos_index: Option<usize>,
}

impl KinJoint {
    /// Relative motion of the child frame for joint value `q`.
    fn motion(&self, q: f64) -> Pose {
        match self.joint_type {
            JointType::Revolute | JointType::Continuous => {
                Pose::from_rotation(UnitQuaternion::from_axis_angle(&self.axis, q))
            }
            JointType::Prismatic => Pose::from_position(Point3::from(self.axis.into_inner() * q)),
            JointType::Fixed => Pose::identity(),
        }
    }
}

/// Kinematic model of one articulation.
///
/// Built by [`crate::ModelLoader`]. Links and joints are exposed in the
/// order requested at load time; the configuration vector follows the joint
/// order. Every configuration or base pose change re-runs forward kinematics
/// and moves the attached collision objects.
#[derive(Debug, Clone)]
pub struct ArticulatedModel {
    pub(crate) name: String,
    pub(crate) links: Vec<KinLink>,
    pub(crate) joints: Vec<KinJoint>,
    /// Joint indices in configuration order.
    pub(crate) active_joints: Vec<usize>,
    /// Link indices, every parent before its children.
    pub(crate) fk_order: Vec<usize>,
    pub(crate) link_lookup: HashMap<String, usize>,
    pub(crate) qpos: DVector<f64>,
    pub(crate) link_poses: Vec<Pose>,
    pub(crate) base_pose: Pose,
    pub(crate) gravity: Vector3<f64>,
    pub(crate) collision_links: Vec<(usize, CollisionObject)>,
    pub(crate) disabled_pairs: Vec<(String, String)>,
    pub(crate) move_group_end_effector: Option<usize>,
    pub(crate) move_group_joints: Vec<usize>,
}

impl ArticulatedModel {
    /// Articulation name from the description.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Degrees of freedom.
    #[must_use]
    pub fn dof(&self) -> usize {
        self.qpos.len()
    }

    /// Current joint configuration.
    #[must_use]
    pub fn qpos(&self) -> &DVector<f64> {
        &self.qpos
    }

    /// Set the joint configuration and update every link pose.
    pub fn set_qpos(&mut self, qpos: &[f64]) -> Result<()> {
        if qpos.len() != self.qpos.len() {
            return Err(KinematicsError::QposSizeMismatch {
                expected: self.qpos.len(),
                actual: qpos.len(),
            });
        }
        self.qpos.copy_from_slice(qpos);
        self.update_kinematics();
        Ok(())
    }

    /// Link names.
    #[must_use]
    pub fn link_names(&self) -> Vec<&str> {
        self.links.iter().map(|l| l.name.as_str()).collect()
    }

    /// Movable joint names in configuration order.
    #[must_use]
    pub fn joint_names(&self) -> Vec<&str> {
        self.active_joints
            .iter()
            .map(|&j| self.joints[j].name.as_str())
            .collect()
    }

    /// Movable joint types in configuration order.
    #[must_use]
    pub fn joint_types(&self) -> Vec<JointType> {
        self.active_joints
            .iter()
            .map(|&j| self.joints[j].joint_type)
            .collect()
    }

    /// `[lower, upper]` position limits in configuration order.
    ///
    /// Continuous joints report `[-inf, inf]`.
    #[must_use]
    pub fn joint_limits(&self) -> Vec<[f64; 2]> {
        self.active_joints
            .iter()
            .map(|&j| {
                let limits = &self.joints[j].limits;
                [limits.lower, limits.upper]
            })
            .collect()
    }

    /// Full limits (position, velocity, effort) in configuration order.
    #[must_use]
    pub fn joint_limits_full(&self) -> Vec<JointLimits> {
        self.active_joints
            .iter()
            .map(|&j| self.joints[j].limits)
            .collect()
    }

    /// Index of a link by name.
    #[must_use]
    pub fn link_index(&self, name: &str) -> Option<usize> {
        self.link_lookup.get(name).copied()
    }

    /// Configuration index of a movable joint by name.
    #[must_use]
    pub fn joint_index(&self, name: &str) -> Option<usize> {
        self.joints
            .iter()
            .find(|j| j.name == name)
            .and_then(|j| j.qpos_index)
    }

    /// World pose of a link.
    #[must_use]
    pub fn link_pose(&self, index: usize) -> Option<Pose> {
        self.link_poses.get(index).copied()
    }

    /// World pose of a link by name.
    #[must_use]
    pub fn link_pose_by_name(&self, name: &str) -> Option<Pose> {
        self.link_index(name).and_then(|i| self.link_pose(i))
    }

    /// World pose of the root link frame.
    #[must_use]
    pub fn base_pose(&self) -> &Pose {
        &self.base_pose
    }

    /// Move the whole articulation and update every link pose.
    pub fn set_base_pose(&mut self, pose: Pose) {
        self.base_pose = pose;
        self.update_kinematics();
    }

    /// Gravity vector the model was built with.
    #[must_use]
    pub fn gravity(&self) -> &Vector3<f64> {
        &self.gravity
    }

    /// Configuration indices of the movable joints on the path from the root
    /// to `end_effector`, root to tip. Does not change the move group.
    pub fn move_group_chain(&self, end_effector: &str) -> Result<Vec<usize>> {
        let link = self
            .link_index(end_effector)
            .ok_or_else(|| KinematicsError::UnknownLink(end_effector.to_string()))?;

        let mut chain = Vec::new();
        let mut current = self.links[link].parent_joint;
        while let Some(j) = current {
            let joint = &self.joints[j];
            if let Some(q) = joint.qpos_index {
                chain.push(q);
            }
            current = self.links[joint.parent_link].parent_joint;
        }
        chain.reverse();
        Ok(chain)
    }

    /// Select the move group by its end-effector link.
    ///
    /// The group is every movable joint on the path from the root to
    /// `end_effector`.
    pub fn set_move_group(&mut self, end_effector: &str) -> Result<()> {
        let chain = self.move_group_chain(end_effector)?;
        let link = self
            .link_index(end_effector)
            .ok_or_else(|| KinematicsError::UnknownLink(end_effector.to_string()))?;

        debug!(model = %self.name, end_effector, joints = ?chain, "set move group");
        self.move_group_end_effector = Some(link);
        self.move_group_joints = chain;
        Ok(())
    }

    /// End-effector link of the current move group, if one was selected.
    #[must_use]
    pub fn move_group_end_effector(&self) -> Option<&str> {
        self.move_group_end_effector
            .map(|i| self.links[i].name.as_str())
    }

    /// Configuration indices of the move-group joints, root to tip.
    ///
    /// Before [`Self::set_move_group`] this is every movable joint.
    #[must_use]
    pub fn move_group_joint_indices(&self) -> &[usize] {
        &self.move_group_joints
    }

    /// Collision objects attached to links, with the link names.
    pub fn collision_links(&self) -> impl Iterator<Item = (&str, &CollisionObject)> {
        self.collision_links
            .iter()
            .map(|(link, obj)| (self.links[*link].name.as_str(), obj))
    }

    /// Collision object of a link, if it has one.
    #[must_use]
    pub fn collision_link(&self, name: &str) -> Option<&CollisionObject> {
        let index = self.link_index(name)?;
        self.collision_links
            .iter()
            .find(|(link, _)| *link == index)
            .map(|(_, obj)| obj)
    }

    /// Link pairs exempted from collision checking by the semantic description.
    #[must_use]
    pub fn disabled_collision_pairs(&self) -> &[(String, String)] {
        &self.disabled_pairs
    }

    /// Recompute link poses and move collision objects.
    pub(crate) fn update_kinematics(&mut self) {
        for &link in &self.fk_order {
            let pose = match self.links[link].parent_joint {
                None => self.base_pose,
                Some(j) => {
                    let joint = &self.joints[j];
                    let q = joint.qpos_index.map_or(0.0, |i| self.qpos[i]);
                    self.link_poses[joint.parent_link] * joint.origin * joint.motion(q)
                }
            };
            self.link_poses[link] = pose;
        }

        for (link, obj) in &mut self.collision_links {
            obj.set_pose(self.link_poses[*link]);
        }
    }
}
