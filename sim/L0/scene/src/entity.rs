//! Standalone scene entities and their rigid-body components.

use sim_types::Pose;

use crate::shape::CollisionShape;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the simulator drives a rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RigidBodyKind {
    /// Never moves.
    #[default]
    Static,
    /// Integrated by the physics engine.
    Dynamic,
    /// Moved by user code only.
    Kinematic,
    /// A link of an articulation.
    ArticulationLink,
}

/// Rigid-body component: the body's collision shapes.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RigidBodyComponent {
    /// Component name. For articulation links this is the link name.
    pub name: String,
    /// Body kind.
    pub kind: RigidBodyKind,
    /// Collision shapes in body-local coordinates.
    pub collision_shapes: Vec<CollisionShape>,
}

impl RigidBodyComponent {
    /// Create a component with no shapes.
    pub fn new(name: impl Into<String>, kind: RigidBodyKind) -> Self {
        Self {
            name: name.into(),
            kind,
            collision_shapes: Vec::new(),
        }
    }

    /// Append a collision shape.
    #[must_use]
    pub fn with_shape(mut self, shape: CollisionShape) -> Self {
        self.collision_shapes.push(shape);
        self
    }

    /// Check if the component carries any collision geometry.
    #[must_use]
    pub fn has_shapes(&self) -> bool {
        !self.collision_shapes.is_empty()
    }
}

/// A component attached to an entity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntityComponent {
    /// Rigid body with collision shapes.
    Rigid(RigidBodyComponent),
    /// Any other component (render, audio, scripts, ...).
    Other {
        /// Simulator-side type name.
        type_name: String,
    },
}

/// A standalone (non-articulated) entity in the scene.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimEntity {
    /// User-assigned name. Not necessarily unique.
    pub name: String,
    /// Identifier unique within one scene instance.
    pub per_scene_id: u64,
    /// World pose.
    pub pose: Pose,
    /// Attached components.
    pub components: Vec<EntityComponent>,
}

impl SimEntity {
    /// Create an entity with no components.
    pub fn new(name: impl Into<String>, per_scene_id: u64, pose: Pose) -> Self {
        Self {
            name: name.into(),
            per_scene_id,
            pose,
            components: Vec::new(),
        }
    }

    /// Attach a component.
    #[must_use]
    pub fn with_component(mut self, component: EntityComponent) -> Self {
        self.components.push(component);
        self
    }

    /// Attach a rigid-body component.
    #[must_use]
    pub fn with_rigid_body(self, component: RigidBodyComponent) -> Self {
        self.with_component(EntityComponent::Rigid(component))
    }

    /// First rigid-body component, if any.
    #[must_use]
    pub fn rigid_component(&self) -> Option<&RigidBodyComponent> {
        self.components.iter().find_map(|c| match c {
            EntityComponent::Rigid(rigid) => Some(rigid),
            EntityComponent::Other { .. } => None,
        })
    }

    /// Simulator-side type names of all components, for diagnostics.
    #[must_use]
    pub fn component_type_names(&self) -> Vec<&str> {
        self.components
            .iter()
            .map(|c| match c {
                EntityComponent::Rigid(_) => "rigid_body",
                EntityComponent::Other { type_name } => type_name.as_str(),
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::shape::ShapeGeometry;

    #[test]
    fn test_rigid_component_lookup() {
        let entity = SimEntity::new("cup", 7, Pose::identity())
            .with_component(EntityComponent::Other {
                type_name: "render_body".to_string(),
            })
            .with_rigid_body(
                RigidBodyComponent::new("cup", RigidBodyKind::Dynamic)
                    .with_shape(CollisionShape::new(ShapeGeometry::sphere(0.05))),
            );

        let rigid = entity.rigid_component().unwrap();
        assert!(rigid.has_shapes());
        assert_eq!(entity.component_type_names(), vec!["render_body", "rigid_body"]);
    }

    #[test]
    fn test_missing_rigid_component() {
        let entity = SimEntity::new("light", 3, Pose::identity()).with_component(
            EntityComponent::Other {
                type_name: "point_light".to_string(),
            },
        );
        assert!(entity.rigid_component().is_none());
    }
}
