//! Error types for collision geometry construction.

use thiserror::Error;

/// Errors raised while building collision geometry.
#[derive(Debug, Error)]
pub enum CollisionError {
    /// A triangle references a vertex that does not exist.
    #[error("triangle {triangle} references vertex {index}, but only {vertex_count} vertices exist")]
    InvalidTriangleIndex {
        /// Triangle index.
        triangle: usize,
        /// Offending vertex index.
        index: u32,
        /// Number of vertices available.
        vertex_count: usize,
    },

    /// A BVH model call was made in the wrong state.
    #[error("BVH model: cannot {operation} while {state}")]
    BvhState {
        /// Attempted operation.
        operation: &'static str,
        /// Current model state.
        state: &'static str,
    },

    /// A mesh or polytope has no triangles.
    #[error("{0} has no triangles")]
    EmptyModel(&'static str),

    /// Shapes and shape poses differ in length.
    #[error("collision object '{name}' has {shapes} shapes but {poses} shape poses")]
    ShapeCountMismatch {
        /// Object name.
        name: String,
        /// Number of shapes.
        shapes: usize,
        /// Number of poses.
        poses: usize,
    },

    /// A collision object was created without shapes.
    #[error("collision object '{0}' has no shapes")]
    EmptyObject(String),
}

impl CollisionError {
    /// Create a BVH state error.
    #[must_use]
    pub fn bvh_state(operation: &'static str, state: &'static str) -> Self {
        Self::BvhState { operation, state }
    }

    /// Create an invalid triangle index error.
    #[must_use]
    pub fn invalid_triangle(triangle: usize, index: u32, vertex_count: usize) -> Self {
        Self::InvalidTriangleIndex {
            triangle,
            index,
            vertex_count,
        }
    }
}

/// Result type for collision operations.
pub type Result<T> = std::result::Result<T, CollisionError>;
