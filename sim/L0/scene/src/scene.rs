//! The scene snapshot: articulations, standalone actors and gravity.

use nalgebra::Vector3;

use crate::articulation::{SimArticulation, SimLink};
use crate::entity::SimEntity;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Borrowed handle to anything that lives in a scene.
#[derive(Debug, Clone, Copy)]
pub enum SceneObject<'a> {
    /// An articulated mechanism.
    Articulation(&'a SimArticulation),
    /// A standalone entity.
    Entity(&'a SimEntity),
    /// A single link of an articulation.
    Link(&'a SimLink),
}

impl SceneObject<'_> {
    /// User-assigned name of the object.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Articulation(art) => art.name(),
            Self::Entity(entity) => &entity.name,
            Self::Link(link) => &link.name,
        }
    }

    /// Short description of the object kind, for diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Articulation(_) => "articulation",
            Self::Entity(_) => "entity",
            Self::Link(_) => "articulation link",
        }
    }
}

impl<'a> From<&'a SimArticulation> for SceneObject<'a> {
    fn from(art: &'a SimArticulation) -> Self {
        Self::Articulation(art)
    }
}

impl<'a> From<&'a SimEntity> for SceneObject<'a> {
    fn from(entity: &'a SimEntity) -> Self {
        Self::Entity(entity)
    }
}

impl<'a> From<&'a SimLink> for SceneObject<'a> {
    fn from(link: &'a SimLink) -> Self {
        Self::Link(link)
    }
}

/// A snapshot of the simulation scene.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimScene {
    /// Articulated mechanisms.
    pub articulations: Vec<SimArticulation>,
    /// Standalone entities.
    pub actors: Vec<SimEntity>,
    /// Gravity vector in world coordinates.
    pub gravity: Vector3<f64>,
}

impl Default for SimScene {
    fn default() -> Self {
        Self {
            articulations: Vec::new(),
            actors: Vec::new(),
            gravity: Vector3::new(0.0, 0.0, -9.81),
        }
    }
}

impl SimScene {
    /// Create an empty scene with standard gravity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set gravity.
    #[must_use]
    pub fn with_gravity(mut self, gravity: Vector3<f64>) -> Self {
        self.gravity = gravity;
        self
    }

    /// Add an articulation.
    #[must_use]
    pub fn with_articulation(mut self, articulation: SimArticulation) -> Self {
        self.articulations.push(articulation);
        self
    }

    /// Add a standalone entity.
    #[must_use]
    pub fn with_actor(mut self, actor: SimEntity) -> Self {
        self.actors.push(actor);
        self
    }

    /// Find an articulation by the id of its root link.
    #[must_use]
    pub fn articulation_by_root_id(&self, id: u64) -> Option<&SimArticulation> {
        self.articulations
            .iter()
            .find(|art| art.root().per_scene_id == id)
    }

    /// Mutable lookup of an articulation by the id of its root link.
    pub fn articulation_by_root_id_mut(&mut self, id: u64) -> Option<&mut SimArticulation> {
        self.articulations
            .iter_mut()
            .find(|art| art.root().per_scene_id == id)
    }

    /// Find an actor by its id.
    #[must_use]
    pub fn actor_by_id(&self, id: u64) -> Option<&SimEntity> {
        self.actors.iter().find(|actor| actor.per_scene_id == id)
    }

    /// Mutable lookup of an actor by its id.
    pub fn actor_by_id_mut(&mut self, id: u64) -> Option<&mut SimEntity> {
        self.actors.iter_mut().find(|actor| actor.per_scene_id == id)
    }
}
