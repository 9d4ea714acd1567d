//! Kinematic and semantic descriptions of simulated articulations.
//!
//! The kinematic model constructor consumes URDF/SRDF text. Collision
//! geometry is not exported; it is converted separately and handed to the
//! constructor as collision links.

use sim_scene::{SceneError, SimArticulation};
use sim_urdf::{
    DisabledCollision, SrdfRobot, UrdfJoint, UrdfJointLimit, UrdfJointType, UrdfLink, UrdfOrigin,
    UrdfRobot, validate, write_srdf, write_urdf,
};

use crate::error::Result;

/// URDF description of an articulation's kinematic tree.
///
/// One link per simulation link and one joint per non-root link, carrying
/// the joint's type, origin, axis and limits.
///
/// # Errors
///
/// Returns an error if a link has no valid parent or names repeat.
pub fn kinematic_chain_urdf(art: &SimArticulation) -> Result<String> {
    let links = art.links();
    let mut robot = UrdfRobot::new(art.name());
    robot.links = links.iter().map(|link| UrdfLink::new(&link.name)).collect();

    for link in links.iter().skip(1) {
        let parent = link
            .parent
            .and_then(|index| links.get(index))
            .ok_or_else(|| SceneError::MissingParent(link.name.clone()))?;
        let joint = &link.joint;
        let mut urdf_joint = UrdfJoint::new(
            &joint.name,
            UrdfJointType::from(joint.joint_type),
            &parent.name,
            &link.name,
        )
        .with_origin(UrdfOrigin::from_pose(&joint.origin));
        if joint.joint_type.is_movable() {
            urdf_joint = urdf_joint
                .with_axis(joint.axis)
                .with_limit(UrdfJointLimit::from(joint.limits));
        }
        robot.joints.push(urdf_joint);
    }

    validate(&robot)?;
    Ok(write_urdf(&robot))
}

/// SRDF description disabling collisions between adjacent links.
#[must_use]
pub fn semantic_srdf(art: &SimArticulation) -> String {
    let links = art.links();
    let mut srdf = SrdfRobot::new(art.name());
    srdf.disabled_collisions = links
        .iter()
        .filter_map(|link| {
            let parent = links.get(link.parent?)?;
            Some(DisabledCollision::new(&parent.name, &link.name, "Adjacent"))
        })
        .collect();
    write_srdf(&srdf)
}
