//! Planner setup for the single planned articulation.

use hashbrown::HashMap;
use sim_kinematics::ArticulatedModel;
use sim_scene::SimScene;
use sim_types::{JointLimits, JointType};
use tracing::debug;

use crate::config::{PlannerConfig, SyncConfig};
use crate::error::{PlanningError, Result};
use crate::sync::update_from_simulation;
use crate::world::PlanningWorld;

/// Marks joints that wrap around: revolute joints whose range exceeds one
/// full turn.
///
/// Types and limits are paired element by element.
#[must_use]
pub fn equivalent_joint_mask(joint_types: &[JointType], joint_limits: &[[f64; 2]]) -> Vec<bool> {
    joint_types
        .iter()
        .zip(joint_limits)
        .map(|(joint_type, &[lower, upper])| {
            joint_type.is_revolute() && JointLimits::position(lower, upper).exceeds_full_turn()
        })
        .collect()
}

/// Planner-ready view of the planned articulation and its move group.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveGroupConfig {
    articulation_name: String,
    move_group: String,
    move_group_link_id: usize,
    move_group_joint_indices: Vec<usize>,
    link_name_to_index: HashMap<String, usize>,
    joint_name_to_index: HashMap<String, usize>,
    joint_types: Vec<JointType>,
    joint_limits: Vec<[f64; 2]>,
    joint_vel_limits: Vec<f64>,
    joint_acc_limits: Vec<f64>,
    equiv_joint_mask: Vec<bool>,
}

impl MoveGroupConfig {
    /// World name of the planned articulation.
    #[must_use]
    pub fn articulation_name(&self) -> &str {
        &self.articulation_name
    }

    /// End-effector link.
    #[must_use]
    pub fn move_group(&self) -> &str {
        &self.move_group
    }

    /// Index of the end-effector link.
    #[must_use]
    pub fn move_group_link_id(&self) -> usize {
        self.move_group_link_id
    }

    /// Configuration indices actuated for planning, root to tip.
    #[must_use]
    pub fn move_group_joint_indices(&self) -> &[usize] {
        &self.move_group_joint_indices
    }

    /// Link name to link index.
    #[must_use]
    pub fn link_name_to_index(&self) -> &HashMap<String, usize> {
        &self.link_name_to_index
    }

    /// Joint name to configuration index.
    #[must_use]
    pub fn joint_name_to_index(&self) -> &HashMap<String, usize> {
        &self.joint_name_to_index
    }

    /// Type of every joint.
    #[must_use]
    pub fn joint_types(&self) -> &[JointType] {
        &self.joint_types
    }

    /// `[lower, upper]` of every joint.
    #[must_use]
    pub fn joint_limits(&self) -> &[[f64; 2]] {
        &self.joint_limits
    }

    /// Velocity limit per move-group joint.
    #[must_use]
    pub fn joint_vel_limits(&self) -> &[f64] {
        &self.joint_vel_limits
    }

    /// Acceleration limit per move-group joint.
    #[must_use]
    pub fn joint_acc_limits(&self) -> &[f64] {
        &self.joint_acc_limits
    }

    /// Per joint, whether values a full turn apart are the same configuration.
    #[must_use]
    pub fn equiv_joint_mask(&self) -> &[bool] {
        &self.equiv_joint_mask
    }
}

/// Resolve the move group of the world's single planned articulation.
///
/// Selects the move group on the articulation's kinematic model.
///
/// # Errors
///
/// - [`PlanningError::InvalidPlanningSetup`] unless exactly one articulation
///   is planned
/// - [`PlanningError::UnknownMoveGroup`] if the end-effector is not one of
///   its links
/// - [`PlanningError::LimitSizeMismatch`] if the limit vectors do not match
///   the move group
pub fn configure_move_group(
    world: &mut PlanningWorld,
    config: &PlannerConfig,
) -> Result<MoveGroupConfig> {
    config.validate()?;

    let mut planned = world.planned_articulation_names();
    if planned.len() != 1 {
        return Err(PlanningError::InvalidPlanningSetup { planned });
    }
    let articulation_name = planned.swap_remove(0);
    let model = world
        .get_articulation_mut(&articulation_name)
        .ok_or_else(|| PlanningError::ArticulationNotFound(articulation_name.clone()))?;

    let link_name_to_index = name_index_map(model.link_names());
    let joint_name_to_index = name_index_map(model.joint_names());
    let Some(&move_group_link_id) = link_name_to_index.get(config.move_group.as_str()) else {
        return Err(PlanningError::UnknownMoveGroup {
            link: config.move_group.clone(),
            articulation: articulation_name,
        });
    };

    let move_group_joint_indices = model.move_group_chain(&config.move_group)?;
    let joint_types = model.joint_types();
    let joint_limits = model.joint_limits();

    let group_size = move_group_joint_indices.len();
    let joint_vel_limits = config
        .joint_vel_limits
        .clone()
        .unwrap_or_else(|| vec![1.0; group_size]);
    let joint_acc_limits = config
        .joint_acc_limits
        .clone()
        .unwrap_or_else(|| vec![1.0; group_size]);
    check_limit_sizes(&joint_vel_limits, &joint_acc_limits, group_size, joint_limits.len())?;
    model.set_move_group(&config.move_group)?;

    let equiv_joint_mask = equivalent_joint_mask(&joint_types, &joint_limits);
    debug!(
        articulation = %articulation_name,
        move_group = %config.move_group,
        joints = ?move_group_joint_indices,
        equiv = ?equiv_joint_mask,
        "configured move group"
    );

    Ok(MoveGroupConfig {
        articulation_name,
        move_group: config.move_group.clone(),
        move_group_link_id,
        move_group_joint_indices,
        link_name_to_index,
        joint_name_to_index,
        joint_types,
        joint_limits,
        joint_vel_limits,
        joint_acc_limits,
        equiv_joint_mask,
    })
}

fn name_index_map(names: Vec<&str>) -> HashMap<String, usize> {
    names
        .into_iter()
        .enumerate()
        .map(|(i, name)| (name.to_string(), i))
        .collect()
}

fn check_limit_sizes(vel: &[f64], acc: &[f64], move_group: usize, joints: usize) -> Result<()> {
    if vel.len() == acc.len() && acc.len() == move_group && move_group <= joints {
        Ok(())
    } else {
        Err(PlanningError::LimitSizeMismatch {
            velocity: vel.len(),
            acceleration: acc.len(),
            move_group,
            joints,
        })
    }
}

/// A planning world bound to one planned articulation and move group.
///
/// Owns the world; the simulation pushes poses in through
/// [`Self::update_from_simulation`].
#[derive(Debug, Clone)]
pub struct SimPlanner {
    world: PlanningWorld,
    move_group: MoveGroupConfig,
}

impl SimPlanner {
    /// Configure the move group and take ownership of the world.
    pub fn new(mut world: PlanningWorld, config: &PlannerConfig) -> Result<Self> {
        let move_group = configure_move_group(&mut world, config)?;
        Ok(Self { world, move_group })
    }

    /// Copy the scene's current poses into the world.
    pub fn update_from_simulation(&mut self, scene: &SimScene, config: &SyncConfig) -> Result<()> {
        update_from_simulation(&mut self.world, scene, config)
    }

    /// The planning world.
    #[must_use]
    pub fn world(&self) -> &PlanningWorld {
        &self.world
    }

    /// Mutable planning world, e.g. to attach objects.
    pub fn world_mut(&mut self) -> &mut PlanningWorld {
        &mut self.world
    }

    /// The resolved move group.
    #[must_use]
    pub fn move_group(&self) -> &MoveGroupConfig {
        &self.move_group
    }

    /// Kinematic model of the planned articulation.
    #[must_use]
    pub fn articulation(&self) -> Option<&ArticulatedModel> {
        self.world
            .get_articulation(self.move_group.articulation_name())
    }

    /// Release the world.
    #[must_use]
    pub fn into_world(self) -> PlanningWorld {
        self.world
    }
}
