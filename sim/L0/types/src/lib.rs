//! Core types shared by the simulation scene and the planning world.
//!
//! - [`Pose`] - Rigid transform (translation + rotation)
//! - [`JointType`] - Kind of joint connecting two links
//! - [`JointLimits`] - Position, velocity and effort bounds
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. Everything here is
//! plain data built on `nalgebra`.
//!
//! # Coordinate System
//!
//! Consistent with the CortenForge ecosystem:
//!
//! - X: right
//! - Y: forward
//! - Z: up
//! - Right-handed
//!
//! # Example
//!
//! ```
//! use sim_types::{JointLimits, JointType, Pose};
//! use nalgebra::Point3;
//!
//! let base = Pose::from_position(Point3::new(0.0, 0.0, 1.0));
//! assert_eq!(base.position.z, 1.0);
//!
//! let limits = JointLimits::position(-1.0, 1.0);
//! assert!(limits.contains(0.5));
//! assert_eq!(JointType::Revolute.dof(), 1);
//! ```

#![doc(html_root_url = "https://docs.rs/sim-types/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,          // mul_add style changes aren't always clearer
)]

mod joint;
mod pose;

pub use joint::{JointLimits, JointType};
pub use pose::Pose;
