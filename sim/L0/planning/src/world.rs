//! The planning world: articulations, obstacles and attached objects.

use hashbrown::{HashMap, HashSet};
use sim_collision::CollisionObject;
use sim_kinematics::{ArticulatedModel, KinematicsError};
use sim_types::Pose;
use tracing::debug;

use crate::acm::AllowedCollisionMatrix;
use crate::attached::AttachedBody;
use crate::error::{PlanningError, Result};

const ARTICULATION: &str = "articulation";
const NORMAL_OBJECT: &str = "normal object";
const ATTACHED_OBJECT: &str = "attached object";

/// Planner-side mirror of a simulation scene.
///
/// Articulations, normal (standalone) objects and attached objects live in
/// three maps keyed by unique name. A name is never used in more than one of
/// them: inserting under a name held by another map fails with
/// [`PlanningError::NameConflict`]. Re-inserting into the same map replaces
/// the entry.
#[derive(Debug, Clone, Default)]
pub struct PlanningWorld {
    articulations: HashMap<String, ArticulatedModel>,
    planned: HashSet<String>,
    normal_objects: HashMap<String, CollisionObject>,
    attached_bodies: HashMap<String, AttachedBody>,
    acm: AllowedCollisionMatrix,
}

impl PlanningWorld {
    /// Create an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Kind of the entry holding `name`, if any.
    fn kind_of(&self, name: &str) -> Option<&'static str> {
        if self.articulations.contains_key(name) {
            Some(ARTICULATION)
        } else if self.normal_objects.contains_key(name) {
            Some(NORMAL_OBJECT)
        } else if self.attached_bodies.contains_key(name) {
            Some(ATTACHED_OBJECT)
        } else {
            None
        }
    }

    fn check_name(&self, name: &str, kind: &'static str) -> Result<()> {
        match self.kind_of(name) {
            Some(existing) if existing != kind => Err(PlanningError::name_conflict(name, existing)),
            _ => Ok(()),
        }
    }

    // ------------------------------------------------------------------
    // Articulations
    // ------------------------------------------------------------------

    /// Add or replace an articulation. New articulations are not planned.
    ///
    /// Link pairs disabled by the model's semantic description become
    /// allowed collisions.
    pub fn add_articulation(&mut self, name: impl Into<String>, model: ArticulatedModel) -> Result<()> {
        let name = name.into();
        self.check_name(&name, ARTICULATION)?;
        for (link1, link2) in model.disabled_collision_pairs() {
            self.acm.set_entry(link1, link2, true);
        }
        debug!(articulation = %name, dof = model.dof(), "add articulation");
        self.articulations.insert(name, model);
        Ok(())
    }

    /// Articulation by name.
    #[must_use]
    pub fn get_articulation(&self, name: &str) -> Option<&ArticulatedModel> {
        self.articulations.get(name)
    }

    /// Mutable articulation by name.
    pub fn get_articulation_mut(&mut self, name: &str) -> Option<&mut ArticulatedModel> {
        self.articulations.get_mut(name)
    }

    /// Whether an articulation exists.
    #[must_use]
    pub fn has_articulation(&self, name: &str) -> bool {
        self.articulations.contains_key(name)
    }

    /// Remove an articulation together with the objects attached to it.
    pub fn remove_articulation(&mut self, name: &str) -> Option<ArticulatedModel> {
        let model = self.articulations.remove(name)?;
        self.planned.remove(name);
        let carried: Vec<String> = self
            .attached_bodies
            .iter()
            .filter(|(_, body)| body.articulation() == name)
            .map(|(n, _)| n.clone())
            .collect();
        for body in carried {
            debug!(object = %body, articulation = %name, "drop attached object with its articulation");
            self.attached_bodies.remove(&body);
            self.acm.remove_name(&body);
        }
        Some(model)
    }

    /// Articulation names, sorted.
    #[must_use]
    pub fn articulation_names(&self) -> Vec<String> {
        sorted_keys(&self.articulations)
    }

    /// Mark an articulation as planned or not.
    pub fn set_articulation_planned(&mut self, name: &str, planned: bool) -> Result<()> {
        if !self.articulations.contains_key(name) {
            return Err(PlanningError::ArticulationNotFound(name.to_string()));
        }
        if planned {
            self.planned.insert(name.to_string());
        } else {
            self.planned.remove(name);
        }
        Ok(())
    }

    /// Whether an articulation is planned.
    #[must_use]
    pub fn is_articulation_planned(&self, name: &str) -> bool {
        self.planned.contains(name)
    }

    /// Planned articulation names, sorted.
    #[must_use]
    pub fn planned_articulation_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.planned.iter().cloned().collect();
        names.sort();
        names
    }

    /// Planned articulations with their names, sorted by name.
    #[must_use]
    pub fn get_planned_articulations(&self) -> Vec<(&str, &ArticulatedModel)> {
        let mut planned: Vec<(&str, &ArticulatedModel)> = self
            .articulations
            .iter()
            .filter(|(name, _)| self.planned.contains(name.as_str()))
            .map(|(name, model)| (name.as_str(), model))
            .collect();
        planned.sort_by(|a, b| a.0.cmp(b.0));
        planned
    }

    /// Set an articulation's joint configuration.
    ///
    /// Objects attached to it follow their carrier links.
    pub fn set_qpos(&mut self, name: &str, qpos: &[f64]) -> Result<()> {
        let model = self
            .articulations
            .get_mut(name)
            .ok_or_else(|| PlanningError::ArticulationNotFound(name.to_string()))?;
        model.set_qpos(qpos)?;

        let model = &self.articulations[name];
        for body in self
            .attached_bodies
            .values_mut()
            .filter(|body| body.articulation() == name)
        {
            if let Some(link_pose) = model.link_pose(body.link_index()) {
                body.update_pose(&link_pose);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Normal objects
    // ------------------------------------------------------------------

    /// Add or replace a normal object.
    pub fn add_normal_object(&mut self, name: impl Into<String>, object: CollisionObject) -> Result<()> {
        let name = name.into();
        self.check_name(&name, NORMAL_OBJECT)?;
        self.normal_objects.insert(name, object);
        Ok(())
    }

    /// Normal object by name.
    #[must_use]
    pub fn get_normal_object(&self, name: &str) -> Option<&CollisionObject> {
        self.normal_objects.get(name)
    }

    /// Whether a normal object exists.
    #[must_use]
    pub fn has_normal_object(&self, name: &str) -> bool {
        self.normal_objects.contains_key(name)
    }

    /// Remove a normal object.
    pub fn remove_normal_object(&mut self, name: &str) -> Option<CollisionObject> {
        self.normal_objects.remove(name)
    }

    /// Normal object names, sorted.
    #[must_use]
    pub fn normal_object_names(&self) -> Vec<String> {
        sorted_keys(&self.normal_objects)
    }

    // ------------------------------------------------------------------
    // Attached objects
    // ------------------------------------------------------------------

    /// Attach a normal object to link `link_index` of an articulation.
    ///
    /// `pose` is the object pose relative to the link. Collisions between
    /// the object and `touch_links` become allowed.
    pub fn attach_object(
        &mut self,
        name: &str,
        articulation: &str,
        link_index: usize,
        pose: Pose,
        touch_links: Vec<String>,
    ) -> Result<()> {
        let model = self
            .articulations
            .get(articulation)
            .ok_or_else(|| PlanningError::ArticulationNotFound(articulation.to_string()))?;
        let link_pose = model
            .link_pose(link_index)
            .ok_or_else(|| KinematicsError::UnknownLink(format!("#{link_index} of {articulation}")))?;
        let object = self
            .normal_objects
            .remove(name)
            .ok_or_else(|| PlanningError::ObjectNotFound(name.to_string()))?;

        self.acm
            .set_entries(name, touch_links.iter().map(String::as_str), true);
        let mut body = AttachedBody::new(object, articulation, link_index, pose, touch_links);
        body.update_pose(&link_pose);
        debug!(object = %name, articulation, link_index, "attach object");
        self.attached_bodies.insert(name.to_string(), body);
        Ok(())
    }

    /// Detach an object.
    ///
    /// Unless `also_remove` is set, it becomes a normal object at its current
    /// world pose.
    pub fn detach_object(&mut self, name: &str, also_remove: bool) -> Result<()> {
        let body = self
            .attached_bodies
            .remove(name)
            .ok_or_else(|| PlanningError::ObjectNotFound(name.to_string()))?;
        for link in body.touch_links() {
            self.acm.remove_entry(name, link);
        }
        if !also_remove {
            self.normal_objects.insert(name.to_string(), body.into_object());
        }
        debug!(object = %name, also_remove, "detach object");
        Ok(())
    }

    /// Attached object by name.
    #[must_use]
    pub fn get_attached_object(&self, name: &str) -> Option<&AttachedBody> {
        self.attached_bodies.get(name)
    }

    /// Mutable attached object by name.
    pub fn get_attached_object_mut(&mut self, name: &str) -> Option<&mut AttachedBody> {
        self.attached_bodies.get_mut(name)
    }

    /// Whether the named object is currently attached.
    #[must_use]
    pub fn is_normal_object_attached(&self, name: &str) -> bool {
        self.attached_bodies.contains_key(name)
    }

    /// Attached object names, sorted.
    #[must_use]
    pub fn attached_object_names(&self) -> Vec<String> {
        sorted_keys(&self.attached_bodies)
    }

    /// World pose of the link carrying an attached object.
    #[must_use]
    pub fn attached_link_global_pose(&self, name: &str) -> Option<Pose> {
        let body = self.attached_bodies.get(name)?;
        self.articulations
            .get(body.articulation())?
            .link_pose(body.link_index())
    }

    /// Refresh the world pose of one attached object from its carrier link.
    pub fn update_attached_body_pose(&mut self, name: &str) -> Result<()> {
        let link_pose = self
            .attached_link_global_pose(name)
            .ok_or_else(|| PlanningError::ObjectNotFound(name.to_string()))?;
        if let Some(body) = self.attached_bodies.get_mut(name) {
            body.update_pose(&link_pose);
        }
        Ok(())
    }

    /// Refresh the world pose of every attached object.
    pub fn update_attached_bodies_pose(&mut self) {
        let articulations = &self.articulations;
        for body in self.attached_bodies.values_mut() {
            if let Some(link_pose) = articulations
                .get(body.articulation())
                .and_then(|model| model.link_pose(body.link_index()))
            {
                body.update_pose(&link_pose);
            }
        }
    }

    // ------------------------------------------------------------------
    // Allowed collisions
    // ------------------------------------------------------------------

    /// The allowed-collision matrix.
    #[must_use]
    pub fn get_allowed_collision_matrix(&self) -> &AllowedCollisionMatrix {
        &self.acm
    }

    /// Mutable allowed-collision matrix.
    pub fn get_allowed_collision_matrix_mut(&mut self) -> &mut AllowedCollisionMatrix {
        &mut self.acm
    }
}

fn sorted_keys<V>(map: &HashMap<String, V>) -> Vec<String> {
    let mut names: Vec<String> = map.keys().cloned().collect();
    names.sort();
    names
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use sim_collision::CollisionGeometry;
    use sim_kinematics::ModelLoader;
    use std::f64::consts::FRAC_PI_2;
    use std::sync::Arc;

    const ARM: &str = r#"
        <robot name="arm">
            <link name="base"/>
            <link name="hand"/>
            <joint name="yaw" type="revolute">
                <parent link="base"/>
                <child link="hand"/>
                <origin xyz="1 0 0"/>
                <axis xyz="0 0 1"/>
                <limit lower="-3" upper="3" effort="1" velocity="1"/>
            </joint>
        </robot>
    "#;

    const ARM_SRDF: &str = r#"
        <robot name="arm">
            <disable_collisions link1="base" link2="hand" reason="Adjacent"/>
        </robot>
    "#;

    fn arm() -> ArticulatedModel {
        ModelLoader::new().load_str(ARM, ARM_SRDF).unwrap()
    }

    fn ball(name: &str) -> CollisionObject {
        CollisionObject::new(
            name,
            Pose::from_position(Point3::new(5.0, 0.0, 0.0)),
            vec![Arc::new(CollisionGeometry::sphere(0.1))],
            vec![Pose::identity()],
        )
        .unwrap()
    }

    #[test]
    fn test_names_unique_across_maps() {
        let mut world = PlanningWorld::new();
        world.add_articulation("arm_0", arm()).unwrap();
        world.add_normal_object("ball_1", ball("ball_1")).unwrap();

        let err = world.add_normal_object("arm_0", ball("arm_0")).unwrap_err();
        assert!(matches!(err, PlanningError::NameConflict { existing: "articulation", .. }));
        let err = world.add_articulation("ball_1", arm()).unwrap_err();
        assert!(matches!(err, PlanningError::NameConflict { existing: "normal object", .. }));

        // Replacing within the same map is fine.
        world.add_normal_object("ball_1", ball("ball_1")).unwrap();
        assert_eq!(world.normal_object_names(), vec!["ball_1"]);
    }

    #[test]
    fn test_planned_flags() {
        let mut world = PlanningWorld::new();
        world.add_articulation("b_2", arm()).unwrap();
        world.add_articulation("a_1", arm()).unwrap();
        assert!(world.get_planned_articulations().is_empty());

        world.set_articulation_planned("b_2", true).unwrap();
        world.set_articulation_planned("a_1", true).unwrap();
        let names: Vec<&str> = world.get_planned_articulations().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["a_1", "b_2"]);

        world.set_articulation_planned("a_1", false).unwrap();
        assert_eq!(world.planned_articulation_names(), vec!["b_2"]);

        assert!(matches!(
            world.set_articulation_planned("c_3", true),
            Err(PlanningError::ArticulationNotFound(_))
        ));
    }

    #[test]
    fn test_srdf_pairs_reach_acm() {
        let mut world = PlanningWorld::new();
        world.add_articulation("arm_0", arm()).unwrap();
        assert_eq!(
            world.get_allowed_collision_matrix().get_entry("hand", "base"),
            Some(true)
        );
    }

    #[test]
    fn test_attach_follows_link() {
        let mut world = PlanningWorld::new();
        world.add_articulation("arm_0", arm()).unwrap();
        world.add_normal_object("cup_7", ball("cup_7")).unwrap();

        let relative = Pose::from_position(Point3::new(0.2, 0.0, 0.0));
        world
            .attach_object("cup_7", "arm_0", 1, relative, vec!["hand".into()])
            .unwrap();
        assert!(world.is_normal_object_attached("cup_7"));
        assert!(!world.has_normal_object("cup_7"));
        assert_eq!(
            world.get_allowed_collision_matrix().get_entry("cup_7", "hand"),
            Some(true)
        );

        let body = world.get_attached_object("cup_7").unwrap();
        assert_relative_eq!(body.global_pose().position, Point3::new(1.2, 0.0, 0.0), epsilon = 1e-12);

        world.set_qpos("arm_0", &[FRAC_PI_2]).unwrap();
        let body = world.get_attached_object("cup_7").unwrap();
        assert_relative_eq!(body.global_pose().position, Point3::new(1.0, 0.2, 0.0), epsilon = 1e-12);

        // The name stays reserved while attached.
        assert!(world.add_normal_object("cup_7", ball("cup_7")).is_err());

        world.detach_object("cup_7", false).unwrap();
        let object = world.get_normal_object("cup_7").unwrap();
        assert_relative_eq!(object.pose().position, Point3::new(1.0, 0.2, 0.0), epsilon = 1e-12);
        assert!(!world.get_allowed_collision_matrix().has_entry("cup_7", "hand"));
    }

    #[test]
    fn test_attach_errors() {
        let mut world = PlanningWorld::new();
        world.add_articulation("arm_0", arm()).unwrap();
        world.add_normal_object("cup_7", ball("cup_7")).unwrap();

        assert!(matches!(
            world.attach_object("mug_8", "arm_0", 1, Pose::identity(), Vec::new()),
            Err(PlanningError::ObjectNotFound(_))
        ));
        assert!(matches!(
            world.attach_object("cup_7", "arm_9", 1, Pose::identity(), Vec::new()),
            Err(PlanningError::ArticulationNotFound(_))
        ));
        assert!(matches!(
            world.attach_object("cup_7", "arm_0", 5, Pose::identity(), Vec::new()),
            Err(PlanningError::Kinematics(_))
        ));
        // Failed attaches leave the object in place.
        assert!(world.has_normal_object("cup_7"));
        assert!(matches!(
            world.detach_object("cup_7", true),
            Err(PlanningError::ObjectNotFound(_))
        ));
    }

    #[test]
    fn test_remove_articulation_drops_carried_objects() {
        let mut world = PlanningWorld::new();
        world.add_articulation("arm_0", arm()).unwrap();
        world.set_articulation_planned("arm_0", true).unwrap();
        world.add_normal_object("cup_7", ball("cup_7")).unwrap();
        world
            .attach_object("cup_7", "arm_0", 1, Pose::identity(), Vec::new())
            .unwrap();

        assert!(world.remove_articulation("arm_0").is_some());
        assert!(world.attached_object_names().is_empty());
        assert!(world.planned_articulation_names().is_empty());
        assert!(world.remove_articulation("arm_0").is_none());
    }
}
