//! Collision geometry in planner conventions.
//!
//! This crate is the geometry side of a planning world: primitive shapes,
//! convex polytopes, BVH-backed triangle meshes and composite
//! [`CollisionObject`]s. It builds and poses geometry; it does not run
//! collision or distance queries.
//!
//! # Conventions
//!
//! - Capsules and cylinders extend along local Z.
//! - Boxes are given by full side lengths.
//! - A [`CollisionObject`] places each shape at `pose * shape_poses[i]`.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use sim_collision::{CollisionGeometry, CollisionObject};
//! use sim_types::Pose;
//! use nalgebra::Vector3;
//!
//! let table = CollisionObject::new(
//!     "table",
//!     Pose::identity(),
//!     vec![Arc::new(CollisionGeometry::cuboid(Vector3::new(1.0, 0.6, 0.05)))],
//!     vec![Pose::identity()],
//! )
//! .unwrap();
//! assert_eq!(table.shapes().len(), 1);
//! ```

#![doc(html_root_url = "https://docs.rs/sim-collision/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation, // u32 triangle indices
)]

mod aabb;
mod bvh;
mod error;
mod geometry;
mod object;

pub use aabb::{Aabb, Axis};
pub use bvh::{Bvh, BvhModel, BvhPrimitive};
pub use error::{CollisionError, Result};
pub use geometry::{CollisionGeometry, ConvexPolytope};
pub use object::CollisionObject;
