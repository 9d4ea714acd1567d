//! Building a planning world from a scene snapshot.

use hashbrown::HashSet;
use sim_kinematics::{ArticulatedModel, ModelLoader};
use sim_scene::{SimArticulation, SimScene};
use tracing::{debug, info};

use crate::config::ConversionConfig;
use crate::convert::convert_component;
use crate::error::{PlanningError, Result};
use crate::export::{kinematic_chain_urdf, semantic_srdf};
use crate::identity::{articulation_name, entity_name};
use crate::world::PlanningWorld;

/// Builds a [`PlanningWorld`] mirroring a [`SimScene`].
///
/// # Example
///
/// ```
/// use sim_planning::WorldBuilder;
/// use sim_scene::{SimArticulation, SimLink, SimScene};
///
/// let arm = SimArticulation::new("arm", SimLink::root("base", 1));
/// let scene = SimScene::new().with_articulation(arm.clone());
///
/// let world = WorldBuilder::new(&scene)
///     .with_planned_articulation(&arm)
///     .build()
///     .expect("should build");
/// assert!(world.is_articulation_planned("arm_1"));
/// ```
#[derive(Debug, Clone)]
pub struct WorldBuilder<'a> {
    scene: &'a SimScene,
    planned: HashSet<String>,
    conversion: ConversionConfig,
}

impl<'a> WorldBuilder<'a> {
    /// Create a builder for `scene` with no planned articulations.
    #[must_use]
    pub fn new(scene: &'a SimScene) -> Self {
        Self {
            scene,
            planned: HashSet::new(),
            conversion: ConversionConfig::default(),
        }
    }

    /// Mark an articulation as under planning control.
    #[must_use]
    pub fn with_planned_articulation(mut self, art: &SimArticulation) -> Self {
        self.planned.insert(articulation_name(art));
        self
    }

    /// Set the shape conversion settings.
    #[must_use]
    pub fn with_conversion_config(mut self, config: ConversionConfig) -> Self {
        self.conversion = config;
        self
    }

    /// Build the world.
    ///
    /// # Errors
    ///
    /// Returns an error if a shape cannot be converted, an actor has no
    /// rigid-body component, a kinematic model cannot be built, names clash,
    /// or a planned articulation is not part of the scene.
    pub fn build(&self) -> Result<PlanningWorld> {
        self.conversion.validate()?;
        let mut world = PlanningWorld::new();

        for art in &self.scene.articulations {
            let name = articulation_name(art);
            let model = self.build_articulation(art)?;
            world.add_articulation(&name, model)?;
        }

        for name in &self.planned {
            world.set_articulation_planned(name, true)?;
        }

        for actor in &self.scene.actors {
            let component =
                actor
                    .rigid_component()
                    .ok_or_else(|| PlanningError::MissingCollisionComponent {
                        entity: actor.name.clone(),
                        components: actor
                            .component_type_names()
                            .into_iter()
                            .map(str::to_string)
                            .collect(),
                    })?;
            match convert_component(component, actor, &self.conversion)? {
                Some(object) => world.add_normal_object(entity_name(actor), object)?,
                None => debug!(actor = %actor.name, "actor has no collision shapes, skipped"),
            }
        }

        info!(
            articulations = world.articulation_names().len(),
            planned = self.planned.len(),
            objects = world.normal_object_names().len(),
            "built planning world"
        );
        Ok(world)
    }

    fn build_articulation(&self, art: &SimArticulation) -> Result<ArticulatedModel> {
        let mut collision_links = Vec::new();
        for link in art.links() {
            match convert_component(&link.component, link, &self.conversion)? {
                Some(object) => collision_links.push((link.name.clone(), object)),
                None => debug!(
                    articulation = art.name(),
                    link = %link.name,
                    "link has no collision shapes, skipped"
                ),
            }
        }

        let mut model = ModelLoader::new()
            .with_gravity(self.scene.gravity)
            .with_link_order(art.links().iter().map(|link| link.name.clone()))
            .with_joint_order(art.active_joints().map(|joint| joint.name.clone()))
            .with_base_pose(art.root().pose)
            .with_collision_links(collision_links)
            .load_str(&kinematic_chain_urdf(art)?, &semantic_srdf(art))?;
        model.set_qpos(art.qpos_slice())?;
        Ok(model)
    }
}

/// Build a planning world for `scene` with `planned` under planning control.
pub fn build_planning_world(scene: &SimScene, planned: &[&SimArticulation]) -> Result<PlanningWorld> {
    planned
        .iter()
        .fold(WorldBuilder::new(scene), |builder, art| {
            builder.with_planned_articulation(art)
        })
        .build()
}
