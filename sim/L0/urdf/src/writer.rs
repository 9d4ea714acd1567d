//! URDF XML writer.

use crate::types::{UrdfJoint, UrdfJointType, UrdfRobot};
use crate::xml::{XmlWriter, escape_attr, format_vector3};

/// Serialize a robot to URDF XML.
///
/// Links are written before joints, each in declaration order. Floats use
/// Rust's shortest round-trip formatting, so parsing the output reproduces
/// the input exactly.
#[must_use]
pub fn write_urdf(robot: &UrdfRobot) -> String {
    let mut w = XmlWriter::new();
    w.write_line(r#"<?xml version="1.0"?>"#);
    w.open(&format!(r#"<robot name="{}">"#, escape_attr(&robot.name)));

    for link in &robot.links {
        w.write_line(&format!(r#"<link name="{}"/>"#, escape_attr(&link.name)));
    }
    for joint in &robot.joints {
        write_joint(&mut w, joint);
    }

    w.close("</robot>");
    w.finish()
}

fn write_joint(w: &mut XmlWriter, joint: &UrdfJoint) {
    w.open(&format!(
        r#"<joint name="{}" type="{}">"#,
        escape_attr(&joint.name),
        joint.joint_type.as_str()
    ));
    w.write_line(&format!(r#"<parent link="{}"/>"#, escape_attr(&joint.parent)));
    w.write_line(&format!(r#"<child link="{}"/>"#, escape_attr(&joint.child)));
    if !joint.origin.is_identity() {
        w.write_line(&format!(
            r#"<origin xyz="{}" rpy="{}"/>"#,
            format_vector3(&joint.origin.xyz),
            format_vector3(&joint.origin.rpy)
        ));
    }
    if joint.joint_type != UrdfJointType::Fixed {
        w.write_line(&format!(r#"<axis xyz="{}"/>"#, format_vector3(&joint.axis)));
    }
    if let Some(limit) = joint.limit {
        if joint.joint_type == UrdfJointType::Continuous {
            w.write_line(&format!(
                r#"<limit effort="{}" velocity="{}"/>"#,
                limit.effort, limit.velocity
            ));
        } else {
            w.write_line(&format!(
                r#"<limit lower="{}" upper="{}" effort="{}" velocity="{}"/>"#,
                limit.lower, limit.upper, limit.effort, limit.velocity
            ));
        }
    }
    w.close("</joint>");
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::parser::parse_urdf_str;
    use crate::types::{UrdfJointLimit, UrdfLink, UrdfOrigin};
    use nalgebra::Vector3;

    fn arm() -> UrdfRobot {
        UrdfRobot::new("arm & co")
            .with_link(UrdfLink::new("base"))
            .with_link(UrdfLink::new("upper"))
            .with_link(UrdfLink::new("wheel"))
            .with_joint(
                UrdfJoint::new("shoulder", UrdfJointType::Revolute, "base", "upper")
                    .with_origin(UrdfOrigin::new(
                        Vector3::new(0.0, 0.0, 0.3),
                        Vector3::new(0.1, 0.2, 0.3),
                    ))
                    .with_axis(Vector3::y())
                    .with_limit(UrdfJointLimit::symmetric(2.5, 10.0, 1.5)),
            )
            .with_joint(
                UrdfJoint::new("spin", UrdfJointType::Continuous, "upper", "wheel")
                    .with_limit(UrdfJointLimit::unbounded(1.0, 2.0)),
            )
    }

    #[test]
    fn test_write_then_parse() {
        let robot = arm();
        let xml = write_urdf(&robot);
        assert!(xml.contains("arm &amp; co"));

        let parsed = parse_urdf_str(&xml).unwrap();
        assert_eq!(parsed.name, robot.name);
        assert_eq!(parsed.links, robot.links);

        let shoulder = parsed.joint("shoulder").unwrap();
        assert_eq!(shoulder.origin, robot.joints[0].origin);
        assert_eq!(shoulder.axis, Vector3::y());
        assert_eq!(shoulder.limit, robot.joints[0].limit);
    }

    #[test]
    fn test_continuous_limits_omit_bounds() {
        let xml = write_urdf(&arm());
        assert!(xml.contains(r#"<limit effort="1" velocity="2"/>"#));
        assert!(!xml.contains("inf"));

        let parsed = parse_urdf_str(&xml).unwrap();
        let limits = parsed.joint("spin").unwrap().effective_limits();
        assert_eq!(limits.upper, f64::INFINITY);
        assert_eq!(limits.velocity, 2.0);
    }
}
