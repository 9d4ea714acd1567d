//! Intermediate representation types for URDF data.
//!
//! These mirror the kinematic part of the URDF XML schema: links, joints,
//! origins, axes and limits. Geometry, inertia and visuals are not modelled;
//! collision geometry reaches the planner through a separate path.

use nalgebra::{Point3, UnitQuaternion, Vector3};
use sim_types::{JointLimits, JointType, Pose};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Normalize an axis; zero-length or non-finite axes are kept as given so
/// model construction can reject them.
#[inline]
fn normalize_axis(v: Vector3<f64>) -> Vector3<f64> {
    let n = v.norm();
    if n.is_finite() && n > 1e-10 { v / n } else { v }
}

// ============================================================================
// Origin (Pose)
// ============================================================================

/// Origin/pose specification in URDF.
///
/// Represents the `<origin>` element with xyz position and rpy rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UrdfOrigin {
    /// Position (xyz) in meters.
    pub xyz: Vector3<f64>,
    /// Rotation as roll-pitch-yaw (rpy) in radians.
    pub rpy: Vector3<f64>,
}

impl Default for UrdfOrigin {
    fn default() -> Self {
        Self {
            xyz: Vector3::zeros(),
            rpy: Vector3::zeros(),
        }
    }
}

impl UrdfOrigin {
    /// Create a new origin at position with identity rotation.
    #[must_use]
    pub fn from_xyz(x: f64, y: f64, z: f64) -> Self {
        Self {
            xyz: Vector3::new(x, y, z),
            rpy: Vector3::zeros(),
        }
    }

    /// Create from position and rpy.
    #[must_use]
    pub fn new(xyz: Vector3<f64>, rpy: Vector3<f64>) -> Self {
        Self { xyz, rpy }
    }

    /// Create from a pose.
    #[must_use]
    pub fn from_pose(pose: &Pose) -> Self {
        let (roll, pitch, yaw) = pose.rotation.euler_angles();
        Self {
            xyz: pose.position.coords,
            rpy: Vector3::new(roll, pitch, yaw),
        }
    }

    /// Get the position as a point.
    #[must_use]
    pub fn position(&self) -> Point3<f64> {
        Point3::from(self.xyz)
    }

    /// Convert rpy to quaternion.
    ///
    /// URDF uses fixed-axis XYZ (roll about X, then pitch about Y, then yaw about Z).
    #[must_use]
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_euler_angles(self.rpy.x, self.rpy.y, self.rpy.z)
    }

    /// Convert to a pose.
    #[must_use]
    pub fn to_pose(&self) -> Pose {
        Pose::from_position_rotation(self.position(), self.rotation())
    }

    /// Check if this is the identity transform.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.xyz == Vector3::zeros() && self.rpy == Vector3::zeros()
    }
}

// ============================================================================
// Link
// ============================================================================

/// A link in the kinematic tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UrdfLink {
    /// Link name (required, must be unique).
    pub name: String,
}

impl UrdfLink {
    /// Create a new link.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

// ============================================================================
// Joint
// ============================================================================

/// Joint type from URDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UrdfJointType {
    /// Revolute joint with limits.
    Revolute,
    /// Continuous (unlimited revolute) joint.
    Continuous,
    /// Prismatic (sliding) joint.
    Prismatic,
    /// Fixed (welded) joint.
    Fixed,
    /// Floating (6-DOF) joint.
    Floating,
    /// Planar (2D translation + rotation) joint.
    Planar,
}

impl UrdfJointType {
    /// Parse joint type from its `type` attribute.
    #[must_use]
    pub fn from_urdf_str(s: &str) -> Option<Self> {
        match s {
            "revolute" => Some(Self::Revolute),
            "continuous" => Some(Self::Continuous),
            "prismatic" => Some(Self::Prismatic),
            "fixed" => Some(Self::Fixed),
            "floating" => Some(Self::Floating),
            "planar" => Some(Self::Planar),
            _ => None,
        }
    }

    /// The `type` attribute value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Revolute => "revolute",
            Self::Continuous => "continuous",
            Self::Prismatic => "prismatic",
            Self::Fixed => "fixed",
            Self::Floating => "floating",
            Self::Planar => "planar",
        }
    }

    /// Get degrees of freedom for this joint type.
    #[must_use]
    pub const fn dof(self) -> usize {
        match self {
            Self::Fixed => 0,
            Self::Revolute | Self::Continuous | Self::Prismatic => 1,
            Self::Planar => 3,
            Self::Floating => 6,
        }
    }

    /// Single-axis joint type, if this is one.
    #[must_use]
    pub const fn to_joint_type(self) -> Option<JointType> {
        match self {
            Self::Revolute => Some(JointType::Revolute),
            Self::Continuous => Some(JointType::Continuous),
            Self::Prismatic => Some(JointType::Prismatic),
            Self::Fixed => Some(JointType::Fixed),
            Self::Floating | Self::Planar => None,
        }
    }
}

impl From<JointType> for UrdfJointType {
    fn from(jt: JointType) -> Self {
        match jt {
            JointType::Fixed => Self::Fixed,
            JointType::Revolute => Self::Revolute,
            JointType::Continuous => Self::Continuous,
            JointType::Prismatic => Self::Prismatic,
        }
    }
}

/// Joint limits from `<limit>` element.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UrdfJointLimit {
    /// Lower position limit (rad or m).
    pub lower: f64,
    /// Upper position limit (rad or m).
    pub upper: f64,
    /// Maximum effort (N or Nm).
    pub effort: f64,
    /// Maximum velocity (rad/s or m/s).
    pub velocity: f64,
}

impl Default for UrdfJointLimit {
    fn default() -> Self {
        Self {
            lower: 0.0,
            upper: 0.0,
            effort: 0.0,
            velocity: 0.0,
        }
    }
}

impl UrdfJointLimit {
    /// Create symmetric limits.
    #[must_use]
    pub fn symmetric(limit: f64, effort: f64, velocity: f64) -> Self {
        Self {
            lower: -limit,
            upper: limit,
            effort,
            velocity,
        }
    }

    /// Unbounded position range, as implied by continuous joints.
    #[must_use]
    pub fn unbounded(effort: f64, velocity: f64) -> Self {
        Self {
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
            effort,
            velocity,
        }
    }
}

impl From<JointLimits> for UrdfJointLimit {
    fn from(l: JointLimits) -> Self {
        Self {
            lower: l.lower,
            upper: l.upper,
            effort: l.effort,
            velocity: l.velocity,
        }
    }
}

impl From<UrdfJointLimit> for JointLimits {
    fn from(l: UrdfJointLimit) -> Self {
        Self::new(l.lower, l.upper, l.velocity, l.effort)
    }
}

/// A joint connecting two links.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UrdfJoint {
    /// Joint name (required, must be unique).
    pub name: String,
    /// Joint type.
    pub joint_type: UrdfJointType,
    /// Parent link name.
    pub parent: String,
    /// Child link name.
    pub child: String,
    /// Origin of joint frame relative to parent link frame.
    pub origin: UrdfOrigin,
    /// Joint axis in joint frame (default: z-axis).
    pub axis: Vector3<f64>,
    /// Joint limits (required for revolute and prismatic).
    pub limit: Option<UrdfJointLimit>,
}

impl UrdfJoint {
    /// Create a new joint.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        joint_type: UrdfJointType,
        parent: impl Into<String>,
        child: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            joint_type,
            parent: parent.into(),
            child: child.into(),
            origin: UrdfOrigin::default(),
            axis: Vector3::z(), // URDF default axis
            limit: None,
        }
    }

    /// Set the joint origin.
    #[must_use]
    pub fn with_origin(mut self, origin: UrdfOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Set the joint axis.
    #[must_use]
    pub fn with_axis(mut self, axis: Vector3<f64>) -> Self {
        self.axis = normalize_axis(axis);
        self
    }

    /// Set the joint limits.
    #[must_use]
    pub fn with_limit(mut self, limit: UrdfJointLimit) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Effective position limits.
    ///
    /// Continuous joints are unbounded regardless of any `<limit>` bounds,
    /// and fixed joints pin the position to zero.
    #[must_use]
    pub fn effective_limits(&self) -> JointLimits {
        let given = self.limit.unwrap_or_default();
        match self.joint_type {
            UrdfJointType::Continuous => {
                UrdfJointLimit::unbounded(given.effort, given.velocity).into()
            }
            UrdfJointType::Fixed => JointLimits::new(0.0, 0.0, 0.0, 0.0),
            _ => match self.limit {
                Some(limit) => limit.into(),
                None => JointLimits::unlimited(),
            },
        }
    }
}

// ============================================================================
// Robot
// ============================================================================

/// A complete URDF robot model.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UrdfRobot {
    /// Robot name.
    pub name: String,
    /// All links in the robot.
    pub links: Vec<UrdfLink>,
    /// All joints in the robot.
    pub joints: Vec<UrdfJoint>,
}

impl UrdfRobot {
    /// Create a new robot with just a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            links: Vec::new(),
            joints: Vec::new(),
        }
    }

    /// Add a link.
    #[must_use]
    pub fn with_link(mut self, link: UrdfLink) -> Self {
        self.links.push(link);
        self
    }

    /// Add a joint.
    #[must_use]
    pub fn with_joint(mut self, joint: UrdfJoint) -> Self {
        self.joints.push(joint);
        self
    }

    /// Get a link by name.
    #[must_use]
    pub fn link(&self, name: &str) -> Option<&UrdfLink> {
        self.links.iter().find(|l| l.name == name)
    }

    /// Get a joint by name.
    #[must_use]
    pub fn joint(&self, name: &str) -> Option<&UrdfJoint> {
        self.joints.iter().find(|j| j.name == name)
    }

    /// Joint whose child is `link`.
    #[must_use]
    pub fn parent_joint(&self, link: &str) -> Option<&UrdfJoint> {
        self.joints.iter().find(|j| j.child == link)
    }

    /// Get all link names.
    pub fn link_names(&self) -> impl Iterator<Item = &str> {
        self.links.iter().map(|l| l.name.as_str())
    }

    /// Get all joint names.
    pub fn joint_names(&self) -> impl Iterator<Item = &str> {
        self.joints.iter().map(|j| j.name.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_origin_default() {
        let origin = UrdfOrigin::default();
        assert!(origin.is_identity());
    }

    #[test]
    fn test_origin_rotation() {
        let origin = UrdfOrigin::new(
            Vector3::zeros(),
            Vector3::new(0.0, 0.0, std::f64::consts::FRAC_PI_2),
        );
        let rot = origin.rotation();
        let rotated = rot * Vector3::x();
        assert_relative_eq!(rotated.x, 0.0, epsilon = 1e-10);
        assert_relative_eq!(rotated.y, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_origin_pose_roundtrip() {
        let pose = Pose::from_position_rotation(
            Point3::new(0.1, -0.2, 0.3),
            UnitQuaternion::from_euler_angles(0.4, -0.5, 0.6),
        );
        let back = UrdfOrigin::from_pose(&pose).to_pose();
        assert!(back.approx_eq(&pose, 1e-12));
    }

    #[test]
    fn test_joint_type_conversion() {
        assert_eq!(
            UrdfJointType::from_urdf_str("revolute"),
            Some(UrdfJointType::Revolute)
        );
        assert_eq!(UrdfJointType::from_urdf_str("invalid"), None);
        assert_eq!(UrdfJointType::Planar.to_joint_type(), None);
        assert_eq!(UrdfJointType::Planar.dof(), 3);
        assert_eq!(
            UrdfJointType::from(JointType::Continuous).to_joint_type(),
            Some(JointType::Continuous)
        );
    }

    #[test]
    fn test_effective_limits() {
        let continuous = UrdfJoint::new("c", UrdfJointType::Continuous, "a", "b")
            .with_limit(UrdfJointLimit::symmetric(1.0, 5.0, 2.0));
        let limits = continuous.effective_limits();
        assert!(limits.lower.is_infinite() && limits.lower < 0.0);
        assert!(limits.upper.is_infinite());
        assert_relative_eq!(limits.velocity, 2.0);

        let revolute = UrdfJoint::new("r", UrdfJointType::Revolute, "a", "b")
            .with_limit(UrdfJointLimit::symmetric(1.0, 5.0, 2.0));
        assert_relative_eq!(revolute.effective_limits().lower, -1.0);
    }

    #[test]
    fn test_robot_builder() {
        let robot = UrdfRobot::new("test_robot")
            .with_link(UrdfLink::new("base_link"))
            .with_link(UrdfLink::new("link1"))
            .with_joint(UrdfJoint::new(
                "joint1",
                UrdfJointType::Revolute,
                "base_link",
                "link1",
            ));

        assert_eq!(robot.name, "test_robot");
        assert_eq!(robot.links.len(), 2);
        assert!(robot.link("base_link").is_some());
        assert_eq!(robot.parent_joint("link1").unwrap().name, "joint1");
        assert!(robot.parent_joint("base_link").is_none());
    }
}
