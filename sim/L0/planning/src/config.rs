//! Configuration for conversion, synchronization and planner setup.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{PlanningError, Result};

/// Shape conversion settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConversionConfig {
    /// Absolute tolerance for the unit-scale check on mesh shapes.
    pub scale_tolerance: f64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            scale_tolerance: 1e-5,
        }
    }
}

impl ConversionConfig {
    /// Set the unit-scale tolerance.
    #[must_use]
    pub fn with_scale_tolerance(mut self, tolerance: f64) -> Self {
        self.scale_tolerance = tolerance;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.scale_tolerance.is_finite() || self.scale_tolerance < 0.0 {
            return Err(PlanningError::invalid_config(
                "scale_tolerance must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

/// World synchronization settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SyncConfig {
    /// Recompute attached objects' link-relative poses from the scene.
    ///
    /// When false, attached objects keep their relative pose and only follow
    /// their carrier link.
    pub update_attached_objects: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            update_attached_objects: true,
        }
    }
}

impl SyncConfig {
    /// Set whether attached objects take their pose from the scene.
    #[must_use]
    pub fn with_update_attached_objects(mut self, update: bool) -> Self {
        self.update_attached_objects = update;
        self
    }
}

/// Planner setup for one move group.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlannerConfig {
    /// End-effector link of the move group.
    pub move_group: String,
    /// Per move-group joint velocity limits, all ones when absent.
    pub joint_vel_limits: Option<Vec<f64>>,
    /// Per move-group joint acceleration limits, all ones when absent.
    pub joint_acc_limits: Option<Vec<f64>>,
}

impl PlannerConfig {
    /// Create a configuration for the given end-effector link.
    pub fn new(move_group: impl Into<String>) -> Self {
        Self {
            move_group: move_group.into(),
            ..Self::default()
        }
    }

    /// Set the velocity limits.
    #[must_use]
    pub fn with_joint_vel_limits(mut self, limits: Vec<f64>) -> Self {
        self.joint_vel_limits = Some(limits);
        self
    }

    /// Set the acceleration limits.
    #[must_use]
    pub fn with_joint_acc_limits(mut self, limits: Vec<f64>) -> Self {
        self.joint_acc_limits = Some(limits);
        self
    }

    /// Validate the configuration.
    ///
    /// Sizes are checked against the move group later, once it is resolved.
    pub fn validate(&self) -> Result<()> {
        if self.move_group.is_empty() {
            return Err(PlanningError::invalid_config("move_group cannot be empty"));
        }
        for (name, limits) in [
            ("joint_vel_limits", &self.joint_vel_limits),
            ("joint_acc_limits", &self.joint_acc_limits),
        ] {
            if let Some(limits) = limits {
                if limits.iter().any(|v| !v.is_finite() || *v <= 0.0) {
                    return Err(PlanningError::invalid_config(format!(
                        "{name} must be positive and finite"
                    )));
                }
            }
        }
        Ok(())
    }
}
