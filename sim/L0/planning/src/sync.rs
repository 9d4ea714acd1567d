//! Keeping a built planning world in step with the simulation.
//!
//! Only poses move: joint configurations, normal object world poses and
//! attached object relative poses. Geometry is never rebuilt. A scene whose
//! articulations or actors differ from the ones the world holds, in either
//! direction, means the world is stale and must be rebuilt; entities
//! processed before the failure keep their new poses.

use hashbrown::HashSet;
use sim_collision::CollisionObject;
use sim_scene::SimScene;
use tracing::{debug, warn};

use crate::config::SyncConfig;
use crate::error::{PlanningError, Result};
use crate::identity::{articulation_name, entity_name};
use crate::world::PlanningWorld;

/// Copy the scene's current poses into `world`.
///
/// Actors whose rigid-body component has no shapes are skipped, as they are
/// when the world is built.
///
/// # Errors
///
/// Returns [`PlanningError::StaleWorld`] if an articulation or actor of the
/// scene has no counterpart in the world, or the world holds one the scene
/// no longer has.
pub fn update_from_simulation(
    world: &mut PlanningWorld,
    scene: &SimScene,
    config: &SyncConfig,
) -> Result<()> {
    let mut seen_articulations = HashSet::with_capacity(scene.articulations.len());
    for art in &scene.articulations {
        let name = articulation_name(art);
        if !world.has_articulation(&name) {
            warn!(articulation = %name, "articulation missing from planning world");
            return Err(PlanningError::stale_world(name, "articulation"));
        }
        world.set_qpos(&name, art.qpos_slice())?;
        debug!(articulation = %name, qpos = ?art.qpos_slice(), "synced articulation");
        seen_articulations.insert(name);
    }

    let mut seen_objects = HashSet::with_capacity(scene.actors.len());
    for actor in &scene.actors {
        let name = entity_name(actor);
        if actor
            .rigid_component()
            .is_some_and(|component| !component.has_shapes())
        {
            continue;
        }

        if world.is_normal_object_attached(&name) {
            if config.update_attached_objects {
                let link_pose = world
                    .attached_link_global_pose(&name)
                    .ok_or_else(|| PlanningError::ObjectNotFound(name.clone()))?;
                if let Some(body) = world.get_attached_object_mut(&name) {
                    body.set_pose(link_pose.inverse() * actor.pose);
                }
            }
            world.update_attached_body_pose(&name)?;
            debug!(object = %name, "synced attached object");
        } else if let Some(object) = world.get_normal_object(&name) {
            let moved = CollisionObject::new(
                name.clone(),
                actor.pose,
                object.shapes().to_vec(),
                object.shape_poses().to_vec(),
            )?;
            world.add_normal_object(name.clone(), moved)?;
            debug!(object = %name, "synced normal object");
        } else {
            warn!(object = %name, "object missing from planning world");
            return Err(PlanningError::stale_world(name, "object"));
        }
        seen_objects.insert(name);
    }

    if let Some(name) = world
        .articulation_names()
        .into_iter()
        .find(|name| !seen_articulations.contains(name))
    {
        warn!(articulation = %name, "articulation removed from scene");
        return Err(PlanningError::stale_world(name, "articulation"));
    }

    if let Some(name) = world
        .normal_object_names()
        .into_iter()
        .chain(world.attached_object_names())
        .find(|name| !seen_objects.contains(name))
    {
        warn!(object = %name, "object removed from scene");
        return Err(PlanningError::stale_world(name, "object"));
    }

    Ok(())
}
