//! Planning world built from, and kept in step with, a simulation scene.
//!
//! A simulation scene stores articulations, standalone bodies and their
//! collision shapes in its own conventions. A motion planner needs a mirror
//! of that scene with unique names and planner-native geometry. This crate
//! provides that mirror:
//!
//! - [`convert_shape`] / [`convert_component`] turn scene collision shapes
//!   into [`CollisionObject`](sim_collision::CollisionObject)s, fixing the
//!   capsule/cylinder long-axis convention on the way.
//! - [`object_name`] gives every articulation and standalone body a name
//!   unique within its scene.
//! - [`WorldBuilder`] builds a [`PlanningWorld`] from a scene snapshot,
//!   exporting each articulation as URDF/SRDF for the kinematic model.
//! - [`update_from_simulation`] copies poses from the live scene into an
//!   existing world without touching geometry.
//! - [`configure_move_group`] / [`SimPlanner`] resolve the single planned
//!   articulation's move group, limits and wrapping joints.
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.
//!
//! # Example
//!
//! ```
//! use nalgebra::Vector3;
//! use sim_planning::{PlannerConfig, SimPlanner, SyncConfig, WorldBuilder};
//! use sim_scene::{SimArticulation, SimJoint, SimLink, SimScene};
//! use sim_types::JointLimits;
//!
//! let mut arm = SimArticulation::new("arm", SimLink::root("base", 1));
//! let yaw = SimJoint::revolute("yaw", Vector3::z(), JointLimits::position(-1.0, 1.0));
//! arm.add_link(SimLink::child("hand", 2, 0, yaw)).expect("valid parent");
//! let mut scene = SimScene::new().with_articulation(arm.clone());
//!
//! let world = WorldBuilder::new(&scene)
//!     .with_planned_articulation(&arm)
//!     .build()
//!     .expect("should build");
//! let mut planner = SimPlanner::new(world, &PlannerConfig::new("hand")).expect("one planned arm");
//! assert_eq!(planner.move_group().move_group_joint_indices(), &[0]);
//!
//! scene.articulations[0].set_qpos(&[0.5]).expect("one joint");
//! planner
//!     .update_from_simulation(&scene, &SyncConfig::default())
//!     .expect("world matches scene");
//! ```

#![doc(html_root_url = "https://docs.rs/sim-planning/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::missing_errors_doc,
    clippy::doc_markdown,
)]

mod acm;
mod attached;
mod builder;
mod config;
mod convert;
mod error;
mod export;
mod identity;
mod planner;
mod sync;
mod world;

pub use acm::AllowedCollisionMatrix;
pub use attached::AttachedBody;
pub use builder::{WorldBuilder, build_planning_world};
pub use config::{ConversionConfig, PlannerConfig, SyncConfig};
pub use convert::{ComponentOwner, convert_component, convert_shape, long_axis_correction};
pub use error::{PlanningError, Result};
pub use export::{kinematic_chain_urdf, semantic_srdf};
pub use identity::{articulation_name, entity_name, object_name};
pub use planner::{MoveGroupConfig, SimPlanner, configure_move_group, equivalent_joint_mask};
pub use sync::update_from_simulation;
pub use world::PlanningWorld;
