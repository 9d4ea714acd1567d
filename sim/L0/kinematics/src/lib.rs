//! Kinematic models of articulated robots.
//!
//! An [`ArticulatedModel`] is built from a URDF description (plus an optional
//! SRDF for collision exemptions) by a [`ModelLoader`]. It holds the joint
//! configuration, computes link poses by forward kinematics and carries the
//! collision objects attached to links, moving them whenever the
//! configuration or base pose changes.
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.
//!
//! # Example
//!
//! ```
//! use sim_kinematics::ModelLoader;
//!
//! let urdf = r#"
//!     <robot name="pendulum">
//!         <link name="pivot"/>
//!         <link name="bob"/>
//!         <joint name="swing" type="revolute">
//!             <parent link="pivot"/>
//!             <child link="bob"/>
//!             <axis xyz="0 1 0"/>
//!             <limit lower="-1" upper="1" effort="1" velocity="1"/>
//!         </joint>
//!     </robot>
//! "#;
//!
//! let mut model = ModelLoader::new().load_str(urdf, "").expect("should load");
//! model.set_qpos(&[0.5]).expect("one joint");
//! assert_eq!(model.joint_names(), vec!["swing"]);
//! ```

#![doc(html_root_url = "https://docs.rs/sim-kinematics/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::missing_errors_doc,
    clippy::doc_markdown,
)]

mod error;
mod loader;
mod model;

pub use error::{KinematicsError, Result};
pub use loader::ModelLoader;
pub use model::ArticulatedModel;
