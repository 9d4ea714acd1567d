//! URDF XML parser.
//!
//! Parses URDF XML into the intermediate representation types. Link
//! contents (inertia, visuals, collision geometry) are skipped.

use std::io::BufRead;

use nalgebra::Vector3;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use crate::error::{Result, UrdfError};
use crate::types::{UrdfJoint, UrdfJointLimit, UrdfJointType, UrdfLink, UrdfOrigin, UrdfRobot};
use crate::xml::{get_attribute, get_attribute_opt, parse_float_attr, parse_vector3, skip_element};

/// Parse a URDF string into a robot model.
///
/// # Errors
///
/// Returns an error if the XML is malformed or missing required elements.
pub fn parse_urdf_str(xml: &str) -> Result<UrdfRobot> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    parse_urdf_reader(&mut reader)
}

fn parse_urdf_reader<R: BufRead>(reader: &mut Reader<R>) -> Result<UrdfRobot> {
    let mut buf = Vec::new();
    let mut robot: Option<UrdfRobot> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"robot" => {
                robot = Some(parse_robot(reader, e)?);
            }
            Ok(Event::Empty(ref e)) if e.name().as_ref() == b"robot" => {
                robot = Some(UrdfRobot::new(get_attribute(e, "name")?));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(UrdfError::XmlParse(e.to_string())),
        }
        buf.clear();
    }

    robot.ok_or_else(|| UrdfError::missing_element("robot", "URDF document"))
}

fn parse_robot<R: BufRead>(reader: &mut Reader<R>, start: &BytesStart) -> Result<UrdfRobot> {
    let name = get_attribute(start, "name")?;
    let mut robot = UrdfRobot::new(name);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let elem_name = e.name().as_ref().to_vec();
                match elem_name.as_slice() {
                    b"link" => {
                        robot.links.push(UrdfLink::new(get_attribute(e, "name")?));
                        skip_element(reader, &elem_name)?;
                    }
                    b"joint" => {
                        let joint = parse_joint(reader, e)?;
                        robot.joints.push(joint);
                    }
                    // Skip material, gazebo, transmission, and other elements
                    _ => {
                        debug!(element = %String::from_utf8_lossy(&elem_name), "skipping URDF element");
                        skip_element(reader, &elem_name)?;
                    }
                }
            }
            Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"link" {
                    robot.links.push(UrdfLink::new(get_attribute(e, "name")?));
                }
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"robot" => break,
            Ok(Event::Eof) => return Err(UrdfError::XmlParse("unexpected EOF in robot".into())),
            Ok(_) => {}
            Err(e) => return Err(UrdfError::XmlParse(e.to_string())),
        }
        buf.clear();
    }

    Ok(robot)
}

/// Parse origin element attributes.
fn parse_origin(e: &BytesStart) -> Result<UrdfOrigin> {
    let xyz = get_attribute_opt(e, "xyz")
        .map(|s| parse_vector3(&s))
        .transpose()?
        .unwrap_or_else(Vector3::zeros);

    let rpy = get_attribute_opt(e, "rpy")
        .map(|s| parse_vector3(&s))
        .transpose()?
        .unwrap_or_else(Vector3::zeros);

    Ok(UrdfOrigin::new(xyz, rpy))
}

fn parse_joint<R: BufRead>(reader: &mut Reader<R>, start: &BytesStart) -> Result<UrdfJoint> {
    let name = get_attribute(start, "name")?;
    let type_str = get_attribute(start, "type")?;
    let joint_type = UrdfJointType::from_urdf_str(&type_str)
        .ok_or_else(|| UrdfError::UnknownJointType(type_str))?;

    let mut parent: Option<String> = None;
    let mut child: Option<String> = None;
    let mut origin = UrdfOrigin::default();
    let mut axis = Vector3::z();
    let mut limit: Option<UrdfJointLimit> = None;

    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e) | Event::Empty(ref e)) => match e.name().as_ref() {
                b"parent" => parent = Some(get_attribute(e, "link")?),
                b"child" => child = Some(get_attribute(e, "link")?),
                b"origin" => origin = parse_origin(e)?,
                b"axis" => {
                    if let Some(xyz) = get_attribute_opt(e, "xyz") {
                        axis = parse_vector3(&xyz)?;
                    }
                }
                b"limit" => limit = Some(parse_joint_limit(e)?),
                _ => {}
            },
            Ok(Event::End(ref e)) if e.name().as_ref() == b"joint" => break,
            Ok(Event::Eof) => return Err(UrdfError::XmlParse("unexpected EOF in joint".into())),
            Ok(_) => {}
            Err(e) => return Err(UrdfError::XmlParse(e.to_string())),
        }
        buf.clear();
    }

    let parent =
        parent.ok_or_else(|| UrdfError::missing_element("parent", format!("joint '{name}'")))?;
    let child =
        child.ok_or_else(|| UrdfError::missing_element("child", format!("joint '{name}'")))?;

    let mut joint = UrdfJoint::new(name, joint_type, parent, child)
        .with_origin(origin)
        .with_axis(axis);

    if let Some(l) = limit {
        joint = joint.with_limit(l);
    }

    Ok(joint)
}

fn parse_joint_limit(e: &BytesStart) -> Result<UrdfJointLimit> {
    Ok(UrdfJointLimit {
        lower: parse_float_attr(e, "lower")?.unwrap_or(0.0),
        upper: parse_float_attr(e, "upper")?.unwrap_or(0.0),
        effort: parse_float_attr(e, "effort")?.unwrap_or(0.0),
        velocity: parse_float_attr(e, "velocity")?.unwrap_or(0.0),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_links_skipping_contents() {
        let xml = r#"
            <robot name="test_robot">
                <link name="base_link">
                    <inertial>
                        <mass value="1.0"/>
                        <inertia ixx="0.1" iyy="0.1" izz="0.1"/>
                    </inertial>
                    <collision>
                        <geometry><box size="1 1 1"/></geometry>
                    </collision>
                </link>
                <link name="link1"/>
                <material name="grey"><color rgba="0.5 0.5 0.5 1"/></material>
            </robot>
        "#;

        let robot = parse_urdf_str(xml).expect("should parse");
        assert_eq!(robot.name, "test_robot");
        assert_eq!(robot.link_names().collect::<Vec<_>>(), vec!["base_link", "link1"]);
    }

    #[test]
    fn test_parse_joint() {
        let xml = r#"
            <robot name="test">
                <link name="base"/>
                <link name="child"/>
                <joint name="joint1" type="revolute">
                    <parent link="base"/>
                    <child link="child"/>
                    <origin xyz="0 0 0.5" rpy="0 0 1.5707963267948966"/>
                    <axis xyz="0 0 2"/>
                    <limit lower="-1.57" upper="1.57" effort="10" velocity="1"/>
                </joint>
            </robot>
        "#;

        let robot = parse_urdf_str(xml).expect("should parse");
        let joint = robot.joint("joint1").expect("joint1 should exist");
        assert_eq!(joint.joint_type, UrdfJointType::Revolute);
        assert_eq!(joint.parent, "base");
        assert_eq!(joint.child, "child");
        assert_relative_eq!(joint.axis.z, 1.0, epsilon = 1e-10);
        assert_relative_eq!(joint.origin.xyz.z, 0.5, epsilon = 1e-10);
        assert_relative_eq!(joint.origin.rpy.z, std::f64::consts::FRAC_PI_2, epsilon = 1e-10);

        let limit = joint.limit.as_ref().expect("should have limit");
        assert_relative_eq!(limit.lower, -1.57, epsilon = 1e-10);
        assert_relative_eq!(limit.upper, 1.57, epsilon = 1e-10);
        assert_relative_eq!(limit.velocity, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_continuous_joint_is_unbounded() {
        let xml = r#"
            <robot name="test">
                <link name="a"/>
                <link name="b"/>
                <joint name="wheel" type="continuous">
                    <parent link="a"/>
                    <child link="b"/>
                    <limit effort="3" velocity="4"/>
                </joint>
            </robot>
        "#;
        let robot = parse_urdf_str(xml).unwrap();
        let limits = robot.joint("wheel").unwrap().effective_limits();
        assert_eq!(limits.lower, f64::NEG_INFINITY);
        assert_eq!(limits.upper, f64::INFINITY);
        assert_relative_eq!(limits.effort, 3.0);
    }

    #[test]
    fn test_missing_robot_name() {
        let xml = r#"<robot><link name="base"/></robot>"#;
        assert!(parse_urdf_str(xml).is_err());
    }

    #[test]
    fn test_missing_robot() {
        assert!(matches!(
            parse_urdf_str("<model/>"),
            Err(UrdfError::MissingElement { element: "robot", .. })
        ));
    }

    #[test]
    fn test_invalid_limit_value() {
        let xml = r#"
            <robot name="test">
                <link name="a"/>
                <link name="b"/>
                <joint name="j" type="prismatic">
                    <parent link="a"/>
                    <child link="b"/>
                    <limit lower="zero" upper="1"/>
                </joint>
            </robot>
        "#;
        assert!(matches!(
            parse_urdf_str(xml),
            Err(UrdfError::InvalidAttribute { attribute: "lower", .. })
        ));
    }

    #[test]
    fn test_unknown_joint_type() {
        let xml = r#"
            <robot name="test">
                <link name="a"/>
                <link name="b"/>
                <joint name="j" type="unknown">
                    <parent link="a"/>
                    <child link="b"/>
                </joint>
            </robot>
        "#;
        let result = parse_urdf_str(xml);
        assert!(matches!(result, Err(UrdfError::UnknownJointType(_))));
    }
}
