//! Bounding volume hierarchies over triangle meshes.
//!
//! [`Bvh`] is a median-split AABB tree. [`BvhModel`] wraps it with the
//! incremental `begin_model` / `add_sub_model` / `end_model` construction
//! protocol used for triangle-mesh collision geometry.
//!
//! # Algorithm
//!
//! The tree is built top-down:
//! 1. Compute the AABB of all primitives
//! 2. Find the axis with maximum extent
//! 3. Sort primitives by centroid along that axis
//! 4. Split at median and recurse

use nalgebra::Point3;
use tracing::debug;

use crate::aabb::Aabb;
use crate::error::{CollisionError, Result};

/// A primitive stored in the BVH.
#[derive(Debug, Clone)]
pub struct BvhPrimitive {
    /// Axis-aligned bounding box of this primitive.
    pub aabb: Aabb,
    /// Index into the original primitive array (e.g., triangle index).
    pub index: usize,
}

impl BvhPrimitive {
    /// Create a new primitive.
    #[must_use]
    pub fn new(aabb: Aabb, index: usize) -> Self {
        Self { aabb, index }
    }

    /// Create a primitive from a triangle.
    #[must_use]
    pub fn from_triangle(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>, index: usize) -> Self {
        let min = v0.inf(&v1).inf(&v2);
        let max = v0.sup(&v1).sup(&v2);
        Self::new(Aabb::new(min, max), index)
    }

    /// Get the centroid of this primitive's AABB.
    #[must_use]
    pub fn centroid(&self) -> Point3<f64> {
        self.aabb.center()
    }
}

#[derive(Debug, Clone)]
enum BvhNode {
    Internal {
        aabb: Aabb,
        left: usize,
        right: usize,
    },
    Leaf {
        aabb: Aabb,
        first_primitive: usize,
        primitive_count: usize,
    },
}

impl BvhNode {
    fn aabb(&self) -> &Aabb {
        match self {
            Self::Internal { aabb, .. } | Self::Leaf { aabb, .. } => aabb,
        }
    }
}

/// Bounding Volume Hierarchy for spatial queries over primitives.
#[derive(Debug, Clone)]
pub struct Bvh {
    /// The tree nodes (index 0 is the root).
    nodes: Vec<BvhNode>,
    /// The primitives, reordered during construction.
    primitives: Vec<BvhPrimitive>,
    max_primitives_per_leaf: usize,
}

impl Default for Bvh {
    fn default() -> Self {
        Self::new()
    }
}

impl Bvh {
    /// Create an empty BVH.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            primitives: Vec::new(),
            max_primitives_per_leaf: 4,
        }
    }

    /// Set the maximum number of primitives per leaf node. Default is 4.
    #[must_use]
    pub fn with_max_primitives_per_leaf(mut self, max: usize) -> Self {
        self.max_primitives_per_leaf = max.max(1);
        self
    }

    /// Build a BVH from a list of primitives.
    #[must_use]
    pub fn build(primitives: Vec<BvhPrimitive>) -> Self {
        Self::new().build_from(primitives)
    }

    /// Build the BVH from primitives, consuming the builder.
    #[must_use]
    pub fn build_from(mut self, mut primitives: Vec<BvhPrimitive>) -> Self {
        self.nodes.clear();
        if primitives.is_empty() {
            self.primitives.clear();
            return self;
        }

        self.nodes.reserve(primitives.len() * 2);
        let len = primitives.len();
        self.build_recursive(&mut primitives, 0, len);
        self.primitives = primitives;
        self
    }

    /// Returns the index of the created node.
    fn build_recursive(&mut self, primitives: &mut [BvhPrimitive], start: usize, end: usize) -> usize {
        let count = end - start;
        let aabb = Self::compute_bounds(&primitives[start..end]);

        if count <= self.max_primitives_per_leaf {
            let node_idx = self.nodes.len();
            self.nodes.push(BvhNode::Leaf {
                aabb,
                first_primitive: start,
                primitive_count: count,
            });
            return node_idx;
        }

        let axis = aabb.longest_axis();
        primitives[start..end].sort_by(|a, b| {
            axis.of(&a.centroid())
                .partial_cmp(&axis.of(&b.centroid()))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mid = start + count / 2;

        // Children are filled in once built.
        let node_idx = self.nodes.len();
        self.nodes.push(BvhNode::Internal {
            aabb,
            left: 0,
            right: 0,
        });

        let left_idx = self.build_recursive(primitives, start, mid);
        let right_idx = self.build_recursive(primitives, mid, end);

        if let BvhNode::Internal { left, right, .. } = &mut self.nodes[node_idx] {
            *left = left_idx;
            *right = right_idx;
        }

        node_idx
    }

    fn compute_bounds(primitives: &[BvhPrimitive]) -> Aabb {
        primitives
            .iter()
            .map(|p| p.aabb)
            .reduce(|acc, b| acc.merged(&b))
            .unwrap_or_default()
    }

    /// Query the BVH for primitives that may overlap with the given AABB.
    ///
    /// Returns original indices of the overlapping primitives.
    #[must_use]
    pub fn query(&self, query_aabb: &Aabb) -> Vec<usize> {
        let mut results = Vec::new();
        if !self.nodes.is_empty() {
            self.query_recursive(0, query_aabb, &mut results);
        }
        results
    }

    fn query_recursive(&self, node_idx: usize, query_aabb: &Aabb, results: &mut Vec<usize>) {
        let node = &self.nodes[node_idx];
        if !node.aabb().overlaps(query_aabb) {
            return;
        }

        match node {
            BvhNode::Internal { left, right, .. } => {
                self.query_recursive(*left, query_aabb, results);
                self.query_recursive(*right, query_aabb, results);
            }
            BvhNode::Leaf {
                first_primitive,
                primitive_count,
                ..
            } => {
                let leaf = &self.primitives[*first_primitive..*first_primitive + *primitive_count];
                results.extend(
                    leaf.iter()
                        .filter(|p| p.aabb.overlaps(query_aabb))
                        .map(|p| p.index),
                );
            }
        }
    }

    /// Bounding box of the whole tree, if non-empty.
    #[must_use]
    pub fn root_aabb(&self) -> Option<Aabb> {
        self.nodes.first().map(|n| *n.aabb())
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of primitives.
    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    /// Check if the tree holds no primitives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

/// Check that every triangle index refers to an existing vertex.
pub(crate) fn validate_triangles(vertex_count: usize, triangles: &[[u32; 3]]) -> Result<()> {
    for (t, tri) in triangles.iter().enumerate() {
        if let Some(&bad) = tri.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(CollisionError::invalid_triangle(t, bad, vertex_count));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuildState {
    Empty,
    Building,
    Processed,
}

impl BuildState {
    const fn describe(self) -> &'static str {
        match self {
            Self::Empty => "no model has been started",
            Self::Building => "a model is being built",
            Self::Processed => "the model is finished",
        }
    }
}

/// Triangle mesh collision geometry backed by a [`Bvh`].
///
/// Built with an explicit protocol:
///
/// ```
/// use sim_collision::BvhModel;
/// use nalgebra::Point3;
///
/// let mut model = BvhModel::new();
/// model.begin_model().unwrap();
/// model
///     .add_sub_model(
///         &[Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
///         &[[0, 1, 2]],
///     )
///     .unwrap();
/// model.end_model().unwrap();
/// assert_eq!(model.num_triangles(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct BvhModel {
    vertices: Vec<Point3<f64>>,
    triangles: Vec<[u32; 3]>,
    bvh: Bvh,
    state: BuildState,
}

impl Default for BvhModel {
    fn default() -> Self {
        Self::new()
    }
}

impl BvhModel {
    /// Create an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            triangles: Vec::new(),
            bvh: Bvh::new(),
            state: BuildState::Empty,
        }
    }

    /// Build a finished model from a single vertex/triangle set.
    pub fn from_mesh(vertices: &[Point3<f64>], triangles: &[[u32; 3]]) -> Result<Self> {
        let mut model = Self::new();
        model.begin_model()?;
        model.add_sub_model(vertices, triangles)?;
        model.end_model()?;
        Ok(model)
    }

    /// Start a new model, discarding any previous content.
    pub fn begin_model(&mut self) -> Result<()> {
        if self.state == BuildState::Building {
            return Err(CollisionError::bvh_state("begin a model", self.state.describe()));
        }
        self.vertices.clear();
        self.triangles.clear();
        self.bvh = Bvh::new();
        self.state = BuildState::Building;
        Ok(())
    }

    /// Append a sub-mesh. Its triangle indices are local to `vertices`.
    pub fn add_sub_model(&mut self, vertices: &[Point3<f64>], triangles: &[[u32; 3]]) -> Result<()> {
        if self.state != BuildState::Building {
            return Err(CollisionError::bvh_state("add a sub-model", self.state.describe()));
        }
        validate_triangles(vertices.len(), triangles)?;

        let offset = u32::try_from(self.vertices.len())
            .map_err(|_| CollisionError::invalid_triangle(self.triangles.len(), u32::MAX, self.vertices.len()))?;
        self.vertices.extend_from_slice(vertices);
        self.triangles
            .extend(triangles.iter().map(|t| [t[0] + offset, t[1] + offset, t[2] + offset]));
        Ok(())
    }

    /// Finish the model and build its hierarchy.
    pub fn end_model(&mut self) -> Result<()> {
        if self.state != BuildState::Building {
            return Err(CollisionError::bvh_state("end a model", self.state.describe()));
        }
        if self.triangles.is_empty() {
            return Err(CollisionError::EmptyModel("BVH model"));
        }

        let primitives = self
            .triangles
            .iter()
            .enumerate()
            .map(|(i, t)| {
                BvhPrimitive::from_triangle(
                    self.vertices[t[0] as usize],
                    self.vertices[t[1] as usize],
                    self.vertices[t[2] as usize],
                    i,
                )
            })
            .collect();
        self.bvh = Bvh::build(primitives);
        self.state = BuildState::Processed;

        debug!(
            vertices = self.vertices.len(),
            triangles = self.triangles.len(),
            nodes = self.bvh.node_count(),
            "built BVH model"
        );
        Ok(())
    }

    /// Check if `end_model` has completed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state == BuildState::Processed
    }

    /// Mesh vertices.
    #[must_use]
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Mesh triangles, indices into [`Self::vertices`].
    #[must_use]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Number of vertices.
    #[must_use]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// The hierarchy. Empty until the model is finished.
    #[must_use]
    pub fn bvh(&self) -> &Bvh {
        &self.bvh
    }

    /// Triangles whose bounds overlap `aabb`, in the model frame.
    #[must_use]
    pub fn query(&self, aabb: &Aabb) -> Vec<usize> {
        self.bvh.query(aabb)
    }

    /// Local bounding box.
    #[must_use]
    pub fn local_aabb(&self) -> Aabb {
        self.bvh
            .root_aabb()
            .or_else(|| Aabb::from_points(&self.vertices))
            .unwrap_or_default()
    }
}
