//! URDF and SRDF robot descriptions.
//!
//! This crate reads and writes the kinematic part of
//! [URDF](http://wiki.ros.org/urdf) (Unified Robot Description Format) and
//! the collision-exemption part of SRDF (Semantic Robot Description Format).
//! The planning bridge exports a simulated articulation through
//! [`write_urdf`] / [`write_srdf`], and the kinematic model constructor reads
//! them back with [`parse_urdf_str`] / [`parse_srdf_str`].
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.
//!
//! # Example
//!
//! ```
//! use sim_urdf::{parse_urdf_str, validate};
//!
//! let urdf = r#"
//!     <robot name="simple">
//!         <link name="base_link"/>
//!         <link name="arm"/>
//!         <joint name="shoulder" type="revolute">
//!             <parent link="base_link"/>
//!             <child link="arm"/>
//!             <limit lower="-1" upper="1" effort="10" velocity="2"/>
//!         </joint>
//!     </robot>
//! "#;
//!
//! let robot = parse_urdf_str(urdf).expect("should parse");
//! let structure = validate(&robot).expect("should validate");
//! assert_eq!(structure.root_link, "base_link");
//! ```
//!
//! # Supported URDF Elements
//!
//! - `<link name="...">` - contents are skipped
//! - `<joint>` with `<parent>`, `<child>`, `<origin>`, `<axis>`, `<limit>`
//! - Joint types: `fixed`, `revolute`, `continuous`, `prismatic`
//!   (`floating` and `planar` parse but have no single-axis counterpart)
//!
//! # Supported SRDF Elements
//!
//! - `<disable_collisions link1="..." link2="..." reason="..."/>`

#![doc(html_root_url = "https://docs.rs/sim-urdf/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::missing_errors_doc,
    clippy::doc_markdown,
)]

mod error;
mod parser;
mod srdf;
mod types;
mod validation;
mod writer;
mod xml;

pub use error::{Result, UrdfError};
pub use parser::parse_urdf_str;
pub use srdf::{DisabledCollision, SrdfRobot, parse_srdf_str, write_srdf};
pub use types::{UrdfJoint, UrdfJointLimit, UrdfJointType, UrdfLink, UrdfOrigin, UrdfRobot};
pub use validation::{ValidationResult, validate};
pub use writer::write_urdf;
