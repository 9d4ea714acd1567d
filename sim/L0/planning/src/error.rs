//! Error types for planning-world conversion, synchronization and setup.

use sim_collision::CollisionError;
use sim_kinematics::KinematicsError;
use sim_scene::SceneError;
use sim_urdf::UrdfError;
use thiserror::Error;

/// Errors raised while bridging a simulation scene to a planning world.
#[derive(Debug, Error)]
pub enum PlanningError {
    /// A mesh shape carries a non-unit scale.
    #[error("{shape} with scale {scale:?} is not supported, only unit scale (tolerance {tolerance})")]
    UnsupportedScale {
        /// Shape type name.
        shape: String,
        /// The offending scale.
        scale: [f64; 3],
        /// Tolerance the scale was checked against.
        tolerance: f64,
    },

    /// A known shape kind with no planning counterpart.
    #[error("shape type '{shape}' is not supported by the planning world")]
    UnsupportedShape {
        /// Shape type name.
        shape: String,
    },

    /// A shape kind the converter does not recognize.
    #[error("unknown shape type '{type_name}'")]
    UnknownShapeType {
        /// Type name reported by the scene.
        type_name: String,
    },

    /// Identity resolution asked to name something that is neither an
    /// articulation nor a standalone entity.
    #[error("cannot name '{name}': unsupported entity type {kind}")]
    UnsupportedEntityType {
        /// User-assigned name.
        name: String,
        /// Kind of object.
        kind: &'static str,
    },

    /// A standalone entity has no rigid-body component.
    #[error("entity '{entity}' has no rigid-body collision component (components: {components:?})")]
    MissingCollisionComponent {
        /// Entity name.
        entity: String,
        /// Component types present on the entity.
        components: Vec<String>,
    },

    /// The scene no longer matches the world it was built from.
    #[error("{kind} '{name}' is not in the planning world, rebuild the world")]
    StaleWorld {
        /// Resolved name of the scene object.
        name: String,
        /// `"articulation"` or `"object"`.
        kind: &'static str,
    },

    /// The world does not have exactly one planned articulation.
    #[error("expected exactly one planned articulation, found {} ({planned:?})", planned.len())]
    InvalidPlanningSetup {
        /// Names of the planned articulations.
        planned: Vec<String>,
    },

    /// Move-group link is not a link of the planned articulation.
    #[error("move group '{link}' is not a link of '{articulation}'")]
    UnknownMoveGroup {
        /// Requested link.
        link: String,
        /// Planned articulation.
        articulation: String,
    },

    /// Velocity/acceleration limit vectors do not fit the move group.
    #[error(
        "limit sizes do not match: velocity {velocity}, acceleration {acceleration}, \
         move group {move_group}, joints {joints}"
    )]
    LimitSizeMismatch {
        /// Velocity limit count.
        velocity: usize,
        /// Acceleration limit count.
        acceleration: usize,
        /// Move-group joint count.
        move_group: usize,
        /// Total joint count.
        joints: usize,
    },

    /// A name is already used by another world entry.
    #[error("name '{name}' is already used by {existing}")]
    NameConflict {
        /// The contested name.
        name: String,
        /// Kind of the existing entry.
        existing: &'static str,
    },

    /// No articulation with this name.
    #[error("articulation not found: {0}")]
    ArticulationNotFound(String),

    /// No normal or attached object with this name.
    #[error("object not found: {0}")]
    ObjectNotFound(String),

    /// Invalid configuration.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },

    /// Collision backend error.
    #[error(transparent)]
    Collision(#[from] CollisionError),

    /// Kinematic model error.
    #[error(transparent)]
    Kinematics(#[from] KinematicsError),

    /// Description export or parse error.
    #[error(transparent)]
    Urdf(#[from] UrdfError),

    /// Scene error.
    #[error(transparent)]
    Scene(#[from] SceneError),
}

impl PlanningError {
    /// Create a stale-world error.
    #[must_use]
    pub fn stale_world(name: impl Into<String>, kind: &'static str) -> Self {
        Self::StaleWorld {
            name: name.into(),
            kind,
        }
    }

    /// Create a name-conflict error.
    #[must_use]
    pub fn name_conflict(name: impl Into<String>, existing: &'static str) -> Self {
        Self::NameConflict {
            name: name.into(),
            existing,
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Check if the world must be rebuilt.
    #[must_use]
    pub fn is_stale_world(&self) -> bool {
        matches!(self, Self::StaleWorld { .. })
    }

    /// Check if this is a geometry conversion error.
    #[must_use]
    pub fn is_geometry_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedScale { .. }
                | Self::UnsupportedShape { .. }
                | Self::UnknownShapeType { .. }
        )
    }

    /// Check if planner setup preconditions were violated.
    #[must_use]
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidPlanningSetup { .. }
                | Self::UnknownMoveGroup { .. }
                | Self::LimitSizeMismatch { .. }
        )
    }

    /// Check if this is a configuration error.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }
}

/// Result type for planning operations.
pub type Result<T> = std::result::Result<T, PlanningError>;
