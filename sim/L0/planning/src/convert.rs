//! Scene collision shapes to planning collision geometry.
//!
//! The scene puts the long axis of capsules and cylinders along local X; the
//! planning geometry puts it along local Z. The converted shape pose carries
//! a fixed quarter turn about Y to bridge the two.

use std::f64::consts::FRAC_PI_2;
use std::sync::Arc;

use nalgebra::{UnitQuaternion, Vector3};
use sim_collision::{BvhModel, CollisionGeometry, CollisionObject, ConvexPolytope};
use sim_scene::{CollisionShape, RigidBodyComponent, ShapeGeometry, SimEntity, SimLink};
use sim_types::Pose;

use crate::config::ConversionConfig;
use crate::error::{PlanningError, Result};
use crate::identity::entity_name;

/// Rotation taking the planning long axis (Z) onto the scene long axis (X).
#[must_use]
pub fn long_axis_correction() -> Pose {
    Pose::from_rotation(UnitQuaternion::from_euler_angles(0.0, FRAC_PI_2, 0.0))
}

/// Convert one scene shape into planning geometry and its pose in the body
/// frame.
///
/// # Errors
///
/// - [`PlanningError::UnsupportedScale`] for a mesh whose scale is not unit
/// - [`PlanningError::UnsupportedShape`] for planes
/// - [`PlanningError::UnknownShapeType`] for shape kinds without a descriptor
pub fn convert_shape(
    shape: &CollisionShape,
    config: &ConversionConfig,
) -> Result<(Arc<CollisionGeometry>, Pose)> {
    let pose = shape.local_pose;
    let (geometry, pose) = match &shape.geometry {
        ShapeGeometry::Box { half_size } => (CollisionGeometry::cuboid(half_size * 2.0), pose),
        ShapeGeometry::Sphere { radius } => (CollisionGeometry::sphere(*radius), pose),
        ShapeGeometry::Capsule {
            radius,
            half_length,
        } => (
            CollisionGeometry::capsule(*radius, half_length * 2.0),
            pose * long_axis_correction(),
        ),
        ShapeGeometry::Cylinder {
            radius,
            half_length,
        } => (
            CollisionGeometry::cylinder(*radius, half_length * 2.0),
            pose * long_axis_correction(),
        ),
        ShapeGeometry::ConvexMesh {
            vertices,
            triangles,
            scale,
        } => {
            check_unit_scale(&shape.geometry, scale, config)?;
            let polytope = ConvexPolytope::new(vertices.clone(), triangles.clone())?;
            (CollisionGeometry::Convex(polytope), pose)
        }
        ShapeGeometry::TriangleMesh {
            vertices,
            triangles,
            scale,
        } => {
            check_unit_scale(&shape.geometry, scale, config)?;
            let mut model = BvhModel::new();
            model.begin_model()?;
            model.add_sub_model(vertices, triangles)?;
            model.end_model()?;
            (CollisionGeometry::Bvh(model), pose)
        }
        ShapeGeometry::Plane => {
            return Err(PlanningError::UnsupportedShape {
                shape: shape.geometry.type_name().to_string(),
            });
        }
        ShapeGeometry::Other { type_name } => {
            return Err(PlanningError::UnknownShapeType {
                type_name: type_name.clone(),
            });
        }
    };
    Ok((Arc::new(geometry), pose))
}

fn check_unit_scale(
    geometry: &ShapeGeometry,
    scale: &Vector3<f64>,
    config: &ConversionConfig,
) -> Result<()> {
    let deviation = (scale - Vector3::repeat(1.0)).amax();
    if deviation.is_nan() || deviation > config.scale_tolerance {
        return Err(PlanningError::UnsupportedScale {
            shape: geometry.type_name().to_string(),
            scale: [scale.x, scale.y, scale.z],
            tolerance: config.scale_tolerance,
        });
    }
    Ok(())
}

/// The body a rigid-body component belongs to.
#[derive(Debug, Clone, Copy)]
pub enum ComponentOwner<'a> {
    /// An articulation link, named by its link name.
    Link(&'a SimLink),
    /// A standalone entity, named by its resolved unique name.
    Entity(&'a SimEntity),
}

impl ComponentOwner<'_> {
    /// Name of the resulting collision object.
    #[must_use]
    pub fn object_name(&self) -> String {
        match self {
            Self::Link(link) => link.name.clone(),
            Self::Entity(entity) => entity_name(entity),
        }
    }

    /// Current world pose of the body.
    #[must_use]
    pub fn pose(&self) -> Pose {
        match self {
            Self::Link(link) => link.pose,
            Self::Entity(entity) => entity.pose,
        }
    }
}

impl<'a> From<&'a SimLink> for ComponentOwner<'a> {
    fn from(link: &'a SimLink) -> Self {
        Self::Link(link)
    }
}

impl<'a> From<&'a SimEntity> for ComponentOwner<'a> {
    fn from(entity: &'a SimEntity) -> Self {
        Self::Entity(entity)
    }
}

/// Convert every shape of a component into one collision object at the
/// owner's world pose.
///
/// Returns `None` when the component has no shapes. Shape order is kept.
pub fn convert_component<'a>(
    component: &RigidBodyComponent,
    owner: impl Into<ComponentOwner<'a>>,
    config: &ConversionConfig,
) -> Result<Option<CollisionObject>> {
    if !component.has_shapes() {
        return Ok(None);
    }

    let owner = owner.into();
    let (shapes, shape_poses): (Vec<_>, Vec<_>) = component
        .collision_shapes
        .iter()
        .map(|shape| convert_shape(shape, config))
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .unzip();

    let object = CollisionObject::new(owner.object_name(), owner.pose(), shapes, shape_poses)?;
    Ok(Some(object))
}
