//! Error types for kinematic model construction and use.

use sim_urdf::UrdfError;
use thiserror::Error;

/// Errors raised by the kinematic model.
#[derive(Debug, Error)]
pub enum KinematicsError {
    /// The description failed to parse or validate.
    #[error(transparent)]
    Urdf(#[from] UrdfError),

    /// A joint type without a single-axis model.
    #[error("joint '{joint}' has unsupported type '{joint_type}'")]
    UnsupportedJointType {
        /// Joint name.
        joint: String,
        /// URDF type name.
        joint_type: &'static str,
    },

    /// A movable joint whose axis has no direction.
    #[error("joint '{joint}' has degenerate axis {axis:?}")]
    DegenerateAxis {
        /// Joint name.
        joint: String,
        /// Axis as given in the description.
        axis: [f64; 3],
    },

    /// User link order is not a permutation of the description's links.
    #[error("link order {given:?} does not match the links in the description {expected:?}")]
    LinkOrderMismatch {
        /// Links in the description.
        expected: Vec<String>,
        /// Order provided by the caller.
        given: Vec<String>,
    },

    /// User joint order is not a permutation of the movable joints.
    #[error("joint order {given:?} does not match the movable joints in the description {expected:?}")]
    JointOrderMismatch {
        /// Movable joints in the description.
        expected: Vec<String>,
        /// Order provided by the caller.
        given: Vec<String>,
    },

    /// A link name that does not exist in the model.
    #[error("unknown link '{0}'")]
    UnknownLink(String),

    /// Joint configuration has the wrong length.
    #[error("expected {expected} joint values, got {actual}")]
    QposSizeMismatch {
        /// Degrees of freedom.
        expected: usize,
        /// Provided values.
        actual: usize,
    },
}

/// Result type for kinematics operations.
pub type Result<T> = std::result::Result<T, KinematicsError>;
