//! Simulation scene object model.
//!
//! A [`SimScene`] is a snapshot of what the physics engine knows about the
//! world: articulated mechanisms ([`SimArticulation`]), standalone bodies
//! ([`SimEntity`]) and the collision shapes attached to both. It is the
//! input of the planning-world bridge in `sim-planning`.
//!
//! # Conventions
//!
//! - Every entity and link carries a `per_scene_id` that is unique within one
//!   scene instance. User names are not unique.
//! - Capsule and cylinder shapes extend along their local X axis.
//! - Articulation links are stored root first in topological order.
//!
//! # Example
//!
//! ```
//! use sim_scene::{
//!     CollisionShape, RigidBodyComponent, RigidBodyKind, ShapeGeometry, SimEntity, SimScene,
//! };
//! use sim_types::Pose;
//!
//! let ball = SimEntity::new("ball", 3, Pose::identity()).with_rigid_body(
//!     RigidBodyComponent::new("ball", RigidBodyKind::Dynamic)
//!         .with_shape(CollisionShape::new(ShapeGeometry::sphere(0.1))),
//! );
//! let scene = SimScene::new().with_actor(ball);
//! assert_eq!(scene.actors.len(), 1);
//! ```

#![doc(html_root_url = "https://docs.rs/sim-scene/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(clippy::missing_const_for_fn, clippy::missing_errors_doc)]

mod articulation;
mod entity;
mod error;
mod scene;
mod shape;

pub use articulation::{SimArticulation, SimJoint, SimLink};
pub use entity::{EntityComponent, RigidBodyComponent, RigidBodyKind, SimEntity};
pub use error::{Result, SceneError};
pub use scene::{SceneObject, SimScene};
pub use shape::{CollisionShape, ShapeGeometry};
