//! Planner-side collision primitives.
//!
//! Capsules and cylinders extend along their local Z axis.

use nalgebra::{Point3, Vector3};

use crate::aabb::Aabb;
use crate::bvh::{BvhModel, validate_triangles};
use crate::error::{CollisionError, Result};

/// A convex polytope given by its vertices and triangulated faces.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexPolytope {
    vertices: Vec<Point3<f64>>,
    faces: Vec<[u32; 3]>,
}

impl ConvexPolytope {
    /// Create a polytope, validating face indices.
    ///
    /// Convexity itself is not checked; the vertices are taken as the hull.
    pub fn new(vertices: Vec<Point3<f64>>, faces: Vec<[u32; 3]>) -> Result<Self> {
        if faces.is_empty() {
            return Err(CollisionError::EmptyModel("convex polytope"));
        }
        validate_triangles(vertices.len(), &faces)?;
        Ok(Self { vertices, faces })
    }

    /// Hull vertices.
    #[must_use]
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Triangulated faces.
    #[must_use]
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// Vertex with the largest projection onto `direction`.
    #[must_use]
    pub fn support(&self, direction: &Vector3<f64>) -> Option<Point3<f64>> {
        self.vertices
            .iter()
            .max_by(|a, b| {
                a.coords
                    .dot(direction)
                    .partial_cmp(&b.coords.dot(direction))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .copied()
    }

    /// Local bounding box.
    #[must_use]
    pub fn local_aabb(&self) -> Aabb {
        Aabb::from_points(&self.vertices).unwrap_or_default()
    }
}

/// Collision geometry in the planner's conventions.
#[derive(Debug, Clone)]
pub enum CollisionGeometry {
    /// Box with full side lengths.
    Box {
        /// Side lengths along X, Y, Z.
        side: Vector3<f64>,
    },
    /// Sphere.
    Sphere {
        /// Radius.
        radius: f64,
    },
    /// Capsule along local Z.
    Capsule {
        /// Radius.
        radius: f64,
        /// Length of the cylindrical shaft.
        lz: f64,
    },
    /// Cylinder along local Z.
    Cylinder {
        /// Radius.
        radius: f64,
        /// Full length.
        lz: f64,
    },
    /// Convex polytope.
    Convex(ConvexPolytope),
    /// Triangle mesh with a bounding volume hierarchy.
    Bvh(BvhModel),
}

impl CollisionGeometry {
    /// Box with full side lengths.
    #[must_use]
    pub fn cuboid(side: Vector3<f64>) -> Self {
        Self::Box { side }
    }

    /// Sphere.
    #[must_use]
    pub fn sphere(radius: f64) -> Self {
        Self::Sphere { radius }
    }

    /// Capsule along local Z.
    #[must_use]
    pub fn capsule(radius: f64, lz: f64) -> Self {
        Self::Capsule { radius, lz }
    }

    /// Cylinder along local Z.
    #[must_use]
    pub fn cylinder(radius: f64, lz: f64) -> Self {
        Self::Cylinder { radius, lz }
    }

    /// Short name of the geometry kind.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Box { .. } => "box",
            Self::Sphere { .. } => "sphere",
            Self::Capsule { .. } => "capsule",
            Self::Cylinder { .. } => "cylinder",
            Self::Convex(_) => "convex",
            Self::Bvh(_) => "bvh",
        }
    }

    /// Bounding box in the shape frame.
    #[must_use]
    pub fn local_aabb(&self) -> Aabb {
        match self {
            Self::Box { side } => Aabb::from_center(Point3::origin(), side * 0.5),
            Self::Sphere { radius } => Aabb::from_center(Point3::origin(), Vector3::repeat(*radius)),
            Self::Capsule { radius, lz } => Aabb::from_center(
                Point3::origin(),
                Vector3::new(*radius, *radius, lz * 0.5 + radius),
            ),
            Self::Cylinder { radius, lz } => {
                Aabb::from_center(Point3::origin(), Vector3::new(*radius, *radius, lz * 0.5))
            }
            Self::Convex(polytope) => polytope.local_aabb(),
            Self::Bvh(model) => model.local_aabb(),
        }
    }
}
