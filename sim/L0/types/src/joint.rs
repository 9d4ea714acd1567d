//! Joint types and limits.

use std::f64::consts::TAU;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Type of joint connecting two links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JointType {
    /// Fixed joint - no relative motion allowed.
    #[default]
    Fixed,
    /// Revolute joint - bounded rotation around a single axis.
    Revolute,
    /// Continuous joint - unbounded rotation around a single axis.
    Continuous,
    /// Prismatic joint - translation along a single axis.
    Prismatic,
}

impl JointType {
    /// Get the number of degrees of freedom for this joint type.
    #[must_use]
    pub const fn dof(self) -> usize {
        match self {
            Self::Fixed => 0,
            Self::Revolute | Self::Continuous | Self::Prismatic => 1,
        }
    }

    /// Check if this joint rotates about its axis.
    #[must_use]
    pub const fn is_revolute(self) -> bool {
        matches!(self, Self::Revolute | Self::Continuous)
    }

    /// Check if this joint moves at all.
    #[must_use]
    pub const fn is_movable(self) -> bool {
        self.dof() > 0
    }

    /// The URDF `type` attribute for this joint.
    #[must_use]
    pub const fn as_urdf_str(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Revolute => "revolute",
            Self::Continuous => "continuous",
            Self::Prismatic => "prismatic",
        }
    }

    /// Parse a URDF `type` attribute.
    ///
    /// Returns `None` for joint kinds without a counterpart here
    /// (`floating`, `planar`).
    #[must_use]
    pub fn from_urdf_str(s: &str) -> Option<Self> {
        match s {
            "fixed" => Some(Self::Fixed),
            "revolute" => Some(Self::Revolute),
            "continuous" => Some(Self::Continuous),
            "prismatic" => Some(Self::Prismatic),
            _ => None,
        }
    }
}

impl fmt::Display for JointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_urdf_str())
    }
}

/// Position, velocity and effort limits for a joint.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointLimits {
    /// Minimum position (angle for revolute, distance for prismatic).
    pub lower: f64,
    /// Maximum position.
    pub upper: f64,
    /// Maximum velocity magnitude.
    pub velocity: f64,
    /// Maximum effort (force/torque) magnitude.
    pub effort: f64,
}

impl Default for JointLimits {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl JointLimits {
    /// Create limits with specified bounds.
    #[must_use]
    pub fn new(lower: f64, upper: f64, velocity: f64, effort: f64) -> Self {
        Self {
            lower,
            upper,
            velocity,
            effort,
        }
    }

    /// Create position limits with unbounded velocity and effort.
    #[must_use]
    pub fn position(lower: f64, upper: f64) -> Self {
        Self {
            lower,
            upper,
            ..Self::unlimited()
        }
    }

    /// Create unlimited joint limits.
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
            velocity: f64::INFINITY,
            effort: f64::INFINITY,
        }
    }

    /// Width of the position range, `upper - lower`.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.upper - self.lower
    }

    /// Whether the position range covers more than one full turn.
    #[must_use]
    pub fn exceeds_full_turn(&self) -> bool {
        self.span() > TAU
    }

    /// Check if a position lies within `[lower, upper]`.
    #[must_use]
    pub fn contains(&self, position: f64) -> bool {
        position >= self.lower && position <= self.upper
    }

    /// Clamp a position into `[lower, upper]`.
    #[must_use]
    pub fn clamp(&self, position: f64) -> f64 {
        position.clamp(self.lower, self.upper)
    }

    /// Check whether both position bounds are finite.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite()
    }
}
