//! Collision shapes as the simulator reports them.
//!
//! Capsules and cylinders use the simulator's convention: the long axis is
//! the shape's local X axis.

use nalgebra::{Point3, Vector3};
use sim_types::Pose;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Geometry of a single simulator collision shape.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ShapeGeometry {
    /// Axis-aligned box.
    Box {
        /// Half extents along local X, Y, Z.
        half_size: Vector3<f64>,
    },
    /// Sphere centered at the shape origin.
    Sphere {
        /// Radius.
        radius: f64,
    },
    /// Capsule along local X.
    Capsule {
        /// Radius of the hemispherical caps and the shaft.
        radius: f64,
        /// Half the length of the cylindrical shaft.
        half_length: f64,
    },
    /// Cylinder along local X.
    Cylinder {
        /// Radius.
        radius: f64,
        /// Half the length along the axis.
        half_length: f64,
    },
    /// Convex hull given as a triangulated vertex set.
    ConvexMesh {
        /// Hull vertices in the shape frame, before scaling.
        vertices: Vec<Point3<f64>>,
        /// Triangle vertex indices.
        triangles: Vec<[u32; 3]>,
        /// Per-axis scale applied by the simulator.
        scale: Vector3<f64>,
    },
    /// Arbitrary (possibly non-convex) triangle mesh.
    TriangleMesh {
        /// Mesh vertices in the shape frame, before scaling.
        vertices: Vec<Point3<f64>>,
        /// Triangle vertex indices.
        triangles: Vec<[u32; 3]>,
        /// Per-axis scale applied by the simulator.
        scale: Vector3<f64>,
    },
    /// Infinite plane through the shape origin with normal along local X.
    Plane,
    /// A shape kind the simulator reports without a typed descriptor.
    Other {
        /// Simulator-side type name.
        type_name: String,
    },
}

impl ShapeGeometry {
    /// Create a box from its half extents.
    #[must_use]
    pub fn cuboid(half_size: Vector3<f64>) -> Self {
        Self::Box { half_size }
    }

    /// Create a sphere.
    #[must_use]
    pub fn sphere(radius: f64) -> Self {
        Self::Sphere { radius }
    }

    /// Create a capsule along local X.
    #[must_use]
    pub fn capsule(radius: f64, half_length: f64) -> Self {
        Self::Capsule {
            radius,
            half_length,
        }
    }

    /// Create a cylinder along local X.
    #[must_use]
    pub fn cylinder(radius: f64, half_length: f64) -> Self {
        Self::Cylinder {
            radius,
            half_length,
        }
    }

    /// Create an unscaled convex mesh.
    #[must_use]
    pub fn convex_mesh(vertices: Vec<Point3<f64>>, triangles: Vec<[u32; 3]>) -> Self {
        Self::ConvexMesh {
            vertices,
            triangles,
            scale: Vector3::repeat(1.0),
        }
    }

    /// Create an unscaled triangle mesh.
    #[must_use]
    pub fn triangle_mesh(vertices: Vec<Point3<f64>>, triangles: Vec<[u32; 3]>) -> Self {
        Self::TriangleMesh {
            vertices,
            triangles,
            scale: Vector3::repeat(1.0),
        }
    }

    /// Simulator-side name of the shape kind.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Box { .. } => "box",
            Self::Sphere { .. } => "sphere",
            Self::Capsule { .. } => "capsule",
            Self::Cylinder { .. } => "cylinder",
            Self::ConvexMesh { .. } => "convex_mesh",
            Self::TriangleMesh { .. } => "triangle_mesh",
            Self::Plane => "plane",
            Self::Other { type_name } => type_name,
        }
    }

    /// Mesh scale, for mesh shapes.
    #[must_use]
    pub fn scale(&self) -> Option<Vector3<f64>> {
        match self {
            Self::ConvexMesh { scale, .. } | Self::TriangleMesh { scale, .. } => Some(*scale),
            _ => None,
        }
    }
}

/// A collision shape attached to a rigid body.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CollisionShape {
    /// Shape geometry.
    pub geometry: ShapeGeometry,
    /// Pose of the shape frame in the body frame.
    pub local_pose: Pose,
}

impl CollisionShape {
    /// Create a shape at the body origin.
    #[must_use]
    pub fn new(geometry: ShapeGeometry) -> Self {
        Self {
            geometry,
            local_pose: Pose::identity(),
        }
    }

    /// Set the shape's pose in the body frame.
    #[must_use]
    pub fn with_local_pose(mut self, local_pose: Pose) -> Self {
        self.local_pose = local_pose;
        self
    }
}
