//! Construction of kinematic models from URDF/SRDF text.

use hashbrown::{HashMap, HashSet};
use nalgebra::{DVector, Unit, Vector3};
use sim_collision::CollisionObject;
use sim_types::{JointType, Pose};
use sim_urdf::{UrdfJoint, UrdfRobot, ValidationResult, parse_srdf_str, parse_urdf_str, validate};
use tracing::debug;

use crate::error::{KinematicsError, Result};
use crate::model::{ArticulatedModel, KinJoint, KinLink};

/// Joint axes shorter than this cannot be normalized.
const AXIS_EPSILON: f64 = 1e-9;

/// Kinematic model loader with configuration options.
#[derive(Debug, Clone)]
pub struct ModelLoader {
    /// Gravity vector stored on the model (default: `(0, 0, -9.81)`).
    pub gravity: Vector3<f64>,
    /// Link order to expose, defaults to depth-first tree order.
    pub link_order: Option<Vec<String>>,
    /// Movable joint order, defaults to depth-first tree order.
    pub joint_order: Option<Vec<String>>,
    /// World pose of the root link.
    pub base_pose: Pose,
    /// Collision objects to attach to links, by link name.
    pub collision_links: Vec<(String, CollisionObject)>,
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self {
            gravity: Vector3::new(0.0, 0.0, -9.81),
            link_order: None,
            joint_order: None,
            base_pose: Pose::identity(),
            collision_links: Vec::new(),
        }
    }
}

impl ModelLoader {
    /// Create a new loader with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gravity vector.
    #[must_use]
    pub fn with_gravity(mut self, gravity: Vector3<f64>) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the exposed link order.
    #[must_use]
    pub fn with_link_order<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.link_order = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Set the configuration order of the movable joints.
    #[must_use]
    pub fn with_joint_order<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.joint_order = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Set the world pose of the root link.
    #[must_use]
    pub fn with_base_pose(mut self, pose: Pose) -> Self {
        self.base_pose = pose;
        self
    }

    /// Attach collision objects to links.
    #[must_use]
    pub fn with_collision_links(mut self, links: Vec<(String, CollisionObject)>) -> Self {
        self.collision_links = links;
        self
    }

    /// Build a model from URDF text and optional SRDF text.
    ///
    /// Pass an empty string when there is no semantic description.
    ///
    /// # Errors
    ///
    /// Returns an error if either document fails to parse, the tree is
    /// invalid, a joint is floating or planar, the requested orders do not
    /// match the description, or a referenced link does not exist.
    pub fn load_str(&self, urdf: &str, srdf: &str) -> Result<ArticulatedModel> {
        let robot = parse_urdf_str(urdf)?;
        let validation = validate(&robot)?;
        let mut model = self.build(&robot, &validation)?;

        let semantic = parse_srdf_str(srdf)?;
        for entry in semantic.disabled_collisions {
            for link in [&entry.link1, &entry.link2] {
                if model.link_index(link).is_none() {
                    return Err(KinematicsError::UnknownLink(link.clone()));
                }
            }
            model.disabled_pairs.push((entry.link1, entry.link2));
        }

        debug!(
            model = %model.name,
            links = model.links.len(),
            dof = model.dof(),
            collision_links = model.collision_links.len(),
            disabled_pairs = model.disabled_pairs.len(),
            "loaded articulated model"
        );
        Ok(model)
    }

    fn build(&self, robot: &UrdfRobot, validation: &ValidationResult) -> Result<ArticulatedModel> {
        let joint_map: HashMap<&str, &UrdfJoint> =
            robot.joints.iter().map(|j| (j.name.as_str(), j)).collect();

        let link_names = match &self.link_order {
            Some(order) => {
                if !is_permutation(&validation.sorted_links, order) {
                    return Err(KinematicsError::LinkOrderMismatch {
                        expected: validation.sorted_links.clone(),
                        given: order.clone(),
                    });
                }
                order.clone()
            }
            None => validation.sorted_links.clone(),
        };
        let link_lookup: HashMap<String, usize> = link_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        let index_of = |name: &str| {
            link_lookup
                .get(name)
                .copied()
                .ok_or_else(|| KinematicsError::UnknownLink(name.to_string()))
        };

        let mut links: Vec<KinLink> = link_names
            .iter()
            .map(|name| KinLink {
                name: name.clone(),
                parent_joint: None,
            })
            .collect();

        // One joint per non-root link, in tree order.
        let mut joints = Vec::with_capacity(validation.sorted_links.len().saturating_sub(1));
        let mut fk_order = Vec::with_capacity(validation.sorted_links.len());
        for link_name in &validation.sorted_links {
            let child = index_of(link_name)?;
            fk_order.push(child);

            let Some(joint_name) = validation.link_parent_joint.get(link_name) else {
                continue;
            };
            let joint = joint_map
                .get(joint_name.as_str())
                .ok_or_else(|| KinematicsError::UnknownLink(link_name.clone()))?;
            let joint_type =
                joint
                    .joint_type
                    .to_joint_type()
                    .ok_or_else(|| KinematicsError::UnsupportedJointType {
                        joint: joint.name.clone(),
                        joint_type: joint.joint_type.as_str(),
                    })?;

            links[child].parent_joint = Some(joints.len());
            joints.push(KinJoint {
                name: joint.name.clone(),
                joint_type,
                parent_link: index_of(&joint.parent)?,
                origin: joint.origin.to_pose(),
                axis: joint_axis(joint, joint_type)?,
                limits: joint.effective_limits(),
                qpos_index: None,
            });
        }

        let movable: Vec<String> = joints
            .iter()
            .filter(|j| j.joint_type.is_movable())
            .map(|j| j.name.clone())
            .collect();
        let joint_names = match &self.joint_order {
            Some(order) => {
                if !is_permutation(&movable, order) {
                    return Err(KinematicsError::JointOrderMismatch {
                        expected: movable,
                        given: order.clone(),
                    });
                }
                order.clone()
            }
            None => movable,
        };

        let mut active_joints = Vec::with_capacity(joint_names.len());
        for (qpos_index, name) in joint_names.iter().enumerate() {
            if let Some(j) = joints.iter().position(|j| &j.name == name) {
                joints[j].qpos_index = Some(qpos_index);
                active_joints.push(j);
            }
        }

        let mut collision_links = Vec::with_capacity(self.collision_links.len());
        for (link, object) in &self.collision_links {
            collision_links.push((index_of(link)?, object.clone()));
        }

        let dof = active_joints.len();
        let mut model = ArticulatedModel {
            name: robot.name.clone(),
            link_poses: vec![Pose::identity(); links.len()],
            links,
            joints,
            active_joints,
            fk_order,
            link_lookup,
            qpos: DVector::zeros(dof),
            base_pose: self.base_pose,
            gravity: self.gravity,
            collision_links,
            disabled_pairs: Vec::new(),
            move_group_end_effector: None,
            move_group_joints: (0..dof).collect(),
        };
        model.update_kinematics();
        Ok(model)
    }
}

/// Unit axis of a joint. Fixed joints never move, so their axis is not
/// checked.
fn joint_axis(joint: &UrdfJoint, joint_type: JointType) -> Result<Unit<Vector3<f64>>> {
    let axis = if joint.axis.iter().all(|v| v.is_finite()) {
        Unit::try_new(joint.axis, AXIS_EPSILON)
    } else {
        None
    };
    match axis {
        Some(axis) => Ok(axis),
        None if !joint_type.is_movable() => Ok(Vector3::x_axis()),
        None => Err(KinematicsError::DegenerateAxis {
            joint: joint.name.clone(),
            axis: [joint.axis.x, joint.axis.y, joint.axis.z],
        }),
    }
}

/// Whether `given` holds exactly the names in `expected`, each once.
fn is_permutation(expected: &[String], given: &[String]) -> bool {
    if expected.len() != given.len() {
        return false;
    }
    let expected: HashSet<&str> = expected.iter().map(String::as_str).collect();
    let mut seen = HashSet::with_capacity(given.len());
    given
        .iter()
        .all(|name| expected.contains(name.as_str()) && seen.insert(name.as_str()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use sim_collision::CollisionGeometry;
    use sim_types::JointType;
    use std::f64::consts::{FRAC_PI_2, PI};
    use std::sync::Arc;

    /// base -(shoulder, z)-> upper -(elbow, y)-> lower -(fixed)-> tool
    const ARM: &str = r#"
        <robot name="arm">
            <link name="base"/>
            <link name="upper"/>
            <link name="lower"/>
            <link name="tool"/>
            <joint name="shoulder" type="revolute">
                <parent link="base"/>
                <child link="upper"/>
                <origin xyz="0 0 1"/>
                <axis xyz="0 0 1"/>
                <limit lower="-3.14" upper="3.14" effort="10" velocity="2"/>
            </joint>
            <joint name="elbow" type="revolute">
                <parent link="upper"/>
                <child link="lower"/>
                <origin xyz="1 0 0"/>
                <axis xyz="0 1 0"/>
                <limit lower="-1" upper="1" effort="10" velocity="2"/>
            </joint>
            <joint name="mount" type="fixed">
                <parent link="lower"/>
                <child link="tool"/>
                <origin xyz="1 0 0"/>
            </joint>
        </robot>
    "#;

    fn ball(name: &str) -> CollisionObject {
        CollisionObject::new(
            name,
            Pose::identity(),
            vec![Arc::new(CollisionGeometry::sphere(0.1))],
            vec![Pose::identity()],
        )
        .unwrap()
    }

    #[test]
    fn test_default_orders() {
        let model = ModelLoader::new().load_str(ARM, "").unwrap();
        assert_eq!(model.name(), "arm");
        assert_eq!(model.link_names(), vec!["base", "upper", "lower", "tool"]);
        assert_eq!(model.joint_names(), vec!["shoulder", "elbow"]);
        assert_eq!(
            model.joint_types(),
            vec![JointType::Revolute, JointType::Revolute]
        );
        assert_eq!(model.dof(), 2);
        assert_eq!(model.move_group_joint_indices(), &[0, 1]);
        assert_relative_eq!(model.gravity().z, -9.81);
    }

    #[test]
    fn test_forward_kinematics() {
        let mut model = ModelLoader::new().load_str(ARM, "").unwrap();

        let tool = model.link_pose_by_name("tool").unwrap();
        assert_relative_eq!(tool.position, Point3::new(2.0, 0.0, 1.0), epsilon = 1e-12);

        model.set_qpos(&[FRAC_PI_2, 0.0]).unwrap();
        let tool = model.link_pose_by_name("tool").unwrap();
        assert_relative_eq!(tool.position, Point3::new(0.0, 2.0, 1.0), epsilon = 1e-12);

        // Pitching the elbow down by 90 degrees about +y drops the tool.
        model.set_qpos(&[0.0, FRAC_PI_2]).unwrap();
        let tool = model.link_pose_by_name("tool").unwrap();
        assert_relative_eq!(tool.position, Point3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_base_pose_moves_everything() {
        let base = Pose::from_position(Point3::new(0.0, 0.0, 5.0));
        let mut model = ModelLoader::new()
            .with_base_pose(base)
            .load_str(ARM, "")
            .unwrap();
        let tool = model.link_pose_by_name("tool").unwrap();
        assert_relative_eq!(tool.position.z, 6.0, epsilon = 1e-12);

        model.set_base_pose(Pose::identity());
        let tool = model.link_pose_by_name("tool").unwrap();
        assert_relative_eq!(tool.position.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_custom_orders() {
        let model = ModelLoader::new()
            .with_link_order(["tool", "lower", "upper", "base"])
            .with_joint_order(["elbow", "shoulder"])
            .load_str(ARM, "")
            .unwrap();
        assert_eq!(model.link_index("tool"), Some(0));
        assert_eq!(model.joint_index("elbow"), Some(0));
        assert_eq!(model.joint_index("mount"), None);
        assert_eq!(model.joint_limits(), vec![[-1.0, 1.0], [-3.14, 3.14]]);
    }

    #[test]
    fn test_order_mismatch() {
        let result = ModelLoader::new()
            .with_link_order(["base", "upper", "lower"])
            .load_str(ARM, "");
        assert!(matches!(result, Err(KinematicsError::LinkOrderMismatch { .. })));

        let result = ModelLoader::new()
            .with_joint_order(["shoulder", "shoulder"])
            .load_str(ARM, "");
        assert!(matches!(result, Err(KinematicsError::JointOrderMismatch { .. })));
    }

    #[test]
    fn test_move_group_chain() {
        let mut model = ModelLoader::new()
            .with_joint_order(["elbow", "shoulder"])
            .load_str(ARM, "")
            .unwrap();
        model.set_move_group("tool").unwrap();
        assert_eq!(model.move_group_end_effector(), Some("tool"));
        // Root to tip: shoulder (index 1) then elbow (index 0).
        assert_eq!(model.move_group_joint_indices(), &[1, 0]);

        model.set_move_group("upper").unwrap();
        assert_eq!(model.move_group_joint_indices(), &[1]);

        assert_eq!(model.move_group_chain("lower").unwrap(), vec![1, 0]);
        assert_eq!(model.move_group_end_effector(), Some("upper"));
        assert_eq!(model.move_group_joint_indices(), &[1]);

        assert!(matches!(
            model.set_move_group("gripper"),
            Err(KinematicsError::UnknownLink(_))
        ));
    }

    #[test]
    fn test_collision_links_follow_fk() {
        let mut model = ModelLoader::new()
            .with_collision_links(vec![("lower".to_string(), ball("lower"))])
            .load_str(ARM, "")
            .unwrap();
        model.set_qpos(&[PI, 0.0]).unwrap();
        let obj = model.collision_link("lower").unwrap();
        assert_relative_eq!(obj.pose().position, Point3::new(-1.0, 0.0, 1.0), epsilon = 1e-12);
        assert_eq!(model.collision_links().count(), 1);
    }

    #[test]
    fn test_collision_link_must_exist() {
        let result = ModelLoader::new()
            .with_collision_links(vec![("wrist".to_string(), ball("wrist"))])
            .load_str(ARM, "");
        assert!(matches!(result, Err(KinematicsError::UnknownLink(name)) if name == "wrist"));
    }

    #[test]
    fn test_disabled_pairs_from_srdf() {
        let srdf = r#"
            <robot name="arm">
                <disable_collisions link1="base" link2="upper" reason="Adjacent"/>
            </robot>
        "#;
        let model = ModelLoader::new().load_str(ARM, srdf).unwrap();
        assert_eq!(
            model.disabled_collision_pairs(),
            &[("base".to_string(), "upper".to_string())]
        );

        let bad = r#"<robot name="arm"><disable_collisions link1="base" link2="nope"/></robot>"#;
        assert!(matches!(
            ModelLoader::new().load_str(ARM, bad),
            Err(KinematicsError::UnknownLink(_))
        ));
    }

    #[test]
    fn test_qpos_size_checked() {
        let mut model = ModelLoader::new().load_str(ARM, "").unwrap();
        assert!(matches!(
            model.set_qpos(&[0.0]),
            Err(KinematicsError::QposSizeMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_floating_joint_rejected() {
        let urdf = r#"
            <robot name="free">
                <link name="world"/>
                <link name="body"/>
                <joint name="float" type="floating">
                    <parent link="world"/>
                    <child link="body"/>
                </joint>
            </robot>
        "#;
        assert!(matches!(
            ModelLoader::new().load_str(urdf, ""),
            Err(KinematicsError::UnsupportedJointType { joint_type: "floating", .. })
        ));
    }

    #[test]
    fn test_zero_axis_rejected() {
        let urdf = r#"
            <robot name="bent">
                <link name="base"/>
                <link name="arm"/>
                <joint name="hinge" type="revolute">
                    <parent link="base"/>
                    <child link="arm"/>
                    <axis xyz="0 0 0"/>
                    <limit lower="-1" upper="1" effort="1" velocity="1"/>
                </joint>
            </robot>
        "#;
        assert!(matches!(
            ModelLoader::new().load_str(urdf, ""),
            Err(KinematicsError::DegenerateAxis { ref joint, .. }) if joint == "hinge"
        ));

        let welded = urdf.replace("revolute", "fixed");
        assert!(ModelLoader::new().load_str(&welded, "").is_ok());
    }

    #[test]
    fn test_prismatic_and_continuous() {
        let urdf = r#"
            <robot name="slider">
                <link name="rail"/>
                <link name="cart"/>
                <link name="wheel"/>
                <joint name="slide" type="prismatic">
                    <parent link="rail"/>
                    <child link="cart"/>
                    <axis xyz="1 0 0"/>
                    <limit lower="0" upper="2" effort="1" velocity="1"/>
                </joint>
                <joint name="spin" type="continuous">
                    <parent link="cart"/>
                    <child link="wheel"/>
                    <origin xyz="0 0 1"/>
                </joint>
            </robot>
        "#;
        let mut model = ModelLoader::new().load_str(urdf, "").unwrap();
        model.set_qpos(&[1.5, 10.0]).unwrap();
        let wheel = model.link_pose_by_name("wheel").unwrap();
        assert_relative_eq!(wheel.position, Point3::new(1.5, 0.0, 1.0), epsilon = 1e-12);
        let limits = model.joint_limits();
        assert_eq!(limits[1], [f64::NEG_INFINITY, f64::INFINITY]);
    }
}
