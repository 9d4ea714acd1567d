//! Unique, stable names for scene objects.
//!
//! User-assigned names may repeat (several copies of one asset), so the
//! scene's per-instance id is appended. Names are unique among the objects
//! coexisting in one scene; they are not meant to be unique across scenes.

use sim_scene::{SceneObject, SimArticulation, SimEntity};

use crate::error::{PlanningError, Result};

/// Resolve the planning-world name of a scene object.
///
/// An articulation is named after its root link's id. Only articulations and
/// standalone entities have planning-world names; links are named by the
/// articulation that owns them.
pub fn object_name<'a>(object: impl Into<SceneObject<'a>>) -> Result<String> {
    match object.into() {
        SceneObject::Articulation(art) => Ok(articulation_name(art)),
        SceneObject::Entity(entity) => Ok(entity_name(entity)),
        other @ SceneObject::Link(_) => Err(PlanningError::UnsupportedEntityType {
            name: other.name().to_string(),
            kind: other.kind_name(),
        }),
    }
}

/// Name of an articulation.
#[must_use]
pub fn articulation_name(art: &SimArticulation) -> String {
    format!("{}_{}", art.name(), art.root().per_scene_id)
}

/// Name of a standalone entity.
#[must_use]
pub fn entity_name(entity: &SimEntity) -> String {
    format!("{}_{}", entity.name, entity.per_scene_id)
}
