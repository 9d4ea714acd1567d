//! Kinematic structure validation.

use hashbrown::{HashMap, HashSet};

use crate::error::{Result, UrdfError};
use crate::types::UrdfRobot;

/// Validation result containing the root link and kinematic structure.
#[derive(Debug)]
pub struct ValidationResult {
    /// The root link name (link with no parent joint).
    pub root_link: String,
    /// Map from link name to its parent joint name.
    pub link_parent_joint: HashMap<String, String>,
    /// Map from link name to its child joint names.
    pub link_child_joints: HashMap<String, Vec<String>>,
    /// Topologically sorted link names (root first, depth-first).
    pub sorted_links: Vec<String>,
}

/// Validate a URDF robot model.
///
/// This checks:
/// - All joints reference valid links
/// - No duplicate link or joint names
/// - Exactly one root link (no parent)
/// - No kinematic loops, and every link is reachable from the root
///
/// # Errors
///
/// Returns an error if validation fails.
pub fn validate(robot: &UrdfRobot) -> Result<ValidationResult> {
    check_duplicates(robot)?;

    let link_names: HashSet<&str> = robot.links.iter().map(|l| l.name.as_str()).collect();

    let mut link_parent_joint: HashMap<String, String> = HashMap::new();
    let mut link_child_joints: HashMap<String, Vec<String>> = robot
        .links
        .iter()
        .map(|l| (l.name.clone(), Vec::new()))
        .collect();

    for joint in &robot.joints {
        if !link_names.contains(joint.parent.as_str()) {
            return Err(UrdfError::undefined_link(
                &joint.parent,
                format!("joint {}", joint.name),
            ));
        }
        if !link_names.contains(joint.child.as_str()) {
            return Err(UrdfError::undefined_link(
                &joint.child,
                format!("joint {}", joint.name),
            ));
        }

        if link_parent_joint.contains_key(&joint.child) {
            return Err(UrdfError::KinematicLoop(format!(
                "link '{}' has multiple parent joints",
                joint.child
            )));
        }
        link_parent_joint.insert(joint.child.clone(), joint.name.clone());

        link_child_joints
            .entry(joint.parent.clone())
            .or_default()
            .push(joint.name.clone());
    }

    let root_links: Vec<&str> = robot
        .links
        .iter()
        .filter(|l| !link_parent_joint.contains_key(&l.name))
        .map(|l| l.name.as_str())
        .collect();

    let root_link = match root_links.as_slice() {
        [] => return Err(UrdfError::NoRootLink),
        [root] => (*root).to_string(),
        _ => {
            return Err(UrdfError::MultipleRootLinks(
                root_links.iter().map(|s| (*s).to_string()).collect(),
            ));
        }
    };

    let sorted_links = topological_sort(robot, &root_link, &link_child_joints)?;
    if sorted_links.len() != robot.links.len() {
        // With a single root this only happens when a cycle is detached from it.
        let unreachable = robot
            .links
            .iter()
            .find(|l| !sorted_links.contains(&l.name))
            .map(|l| l.name.clone())
            .unwrap_or_default();
        return Err(UrdfError::KinematicLoop(format!(
            "link '{unreachable}' is not reachable from root '{root_link}'"
        )));
    }

    Ok(ValidationResult {
        root_link,
        link_parent_joint,
        link_child_joints,
        sorted_links,
    })
}

fn check_duplicates(robot: &UrdfRobot) -> Result<()> {
    let mut link_names = HashSet::new();
    for link in &robot.links {
        if !link_names.insert(&link.name) {
            return Err(UrdfError::DuplicateLink(link.name.clone()));
        }
    }

    let mut joint_names = HashSet::new();
    for joint in &robot.joints {
        if !joint_names.insert(&joint.name) {
            return Err(UrdfError::DuplicateJoint(joint.name.clone()));
        }
    }

    Ok(())
}

/// Pre-order depth-first walk from the root, children in declaration order.
fn topological_sort(
    robot: &UrdfRobot,
    root: &str,
    link_child_joints: &HashMap<String, Vec<String>>,
) -> Result<Vec<String>> {
    let joint_to_child: HashMap<&str, &str> = robot
        .joints
        .iter()
        .map(|j| (j.name.as_str(), j.child.as_str()))
        .collect();

    let mut sorted = Vec::with_capacity(robot.links.len());
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack = vec![root];

    while let Some(link) = stack.pop() {
        if !visited.insert(link) {
            return Err(UrdfError::KinematicLoop(format!(
                "cycle detected involving link '{link}'"
            )));
        }
        sorted.push(link.to_string());

        if let Some(child_joints) = link_child_joints.get(link) {
            // Reverse so the first declared child is visited first.
            for joint_name in child_joints.iter().rev() {
                if let Some(&child) = joint_to_child.get(joint_name.as_str()) {
                    stack.push(child);
                }
            }
        }
    }

    Ok(sorted)
}
