//! `Mesh` struct: the durable polygon-soup representation of a solid, and the
//! Boolean operations that combine two of them through scratch BSP trees.

use crate::errors::ValidationError;
use crate::float_types::{
    Real,
    parry3d::bounding_volume::{Aabb, BoundingVolume},
};
use crate::mesh::{
    bsp::{FragmentBudget, Node},
    plane::Plane,
    polygon::Polygon,
    vertex::Vertex,
};
use crate::traits::CSG;
use nalgebra::{Matrix4, Point3, partial_max, partial_min};
use std::{fmt::Debug, sync::OnceLock};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub mod bsp;
pub mod manifold;
pub mod plane;
pub mod polygon;
pub mod shapes;
pub mod vertex;

/// A solid: a closed, consistently wound set of polygons bounding a volume.
///
/// This is the only durable representation — BSP trees built during Boolean
/// operations are scratch data that never outlive the call. Every operation
/// returns a new `Mesh` and leaves its operands untouched.
#[derive(Clone, Debug)]
pub struct Mesh<S: Clone + Send + Sync + Debug> {
    /// 3D polygons bounding the solid
    pub polygons: Vec<Polygon<S>>,

    /// Lazily calculated AABB that spans `polygons`.
    pub bounding_box: OnceLock<Aabb>,

    /// Metadata
    pub metadata: Option<S>,
}

impl<S: Clone + Send + Sync + Debug> Mesh<S> {
    /// Build a Mesh from an existing polygon list
    pub fn from_polygons(polygons: &[Polygon<S>]) -> Self {
        let mut mesh = Mesh::new();
        mesh.polygons = polygons.to_vec();
        mesh
    }

    /// Split polygons into (may_touch, cannot_touch) using bounding-box tests
    fn partition_polys(
        polys: &[Polygon<S>],
        other_bb: &Aabb,
    ) -> (Vec<Polygon<S>>, Vec<Polygon<S>>) {
        let mut maybe = Vec::new();
        let mut never = Vec::new();
        for p in polys {
            if p.bounding_box().intersects(other_bb) {
                maybe.push(p.clone());
            } else {
                never.push(p.clone());
            }
        }
        (maybe, never)
    }

    /// Helper to collect all vertices from the Mesh.
    #[cfg(not(feature = "parallel"))]
    pub fn vertices(&self) -> Vec<Vertex> {
        self.polygons
            .iter()
            .flat_map(|p| p.vertices.clone())
            .collect()
    }

    /// Parallel helper to collect all vertices from the Mesh.
    #[cfg(feature = "parallel")]
    pub fn vertices(&self) -> Vec<Vertex> {
        self.polygons
            .par_iter()
            .flat_map(|p| p.vertices.clone())
            .collect()
    }

    /// Triangulate each polygon in the Mesh returning a Mesh containing triangles
    #[cfg(not(feature = "parallel"))]
    pub fn triangulate(&self) -> Mesh<S> {
        let triangles = self
            .polygons
            .iter()
            .flat_map(|poly| {
                poly.triangulate()
                    .into_iter()
                    .map(move |tri| Polygon::new(tri.to_vec(), poly.metadata.clone()))
            })
            .collect::<Vec<_>>();

        Mesh::from_polygons(&triangles)
    }

    /// Triangulate each polygon in the Mesh returning a Mesh containing triangles
    #[cfg(feature = "parallel")]
    pub fn triangulate(&self) -> Mesh<S> {
        let triangles = self
            .polygons
            .par_iter()
            .flat_map(|poly| {
                poly.triangulate()
                    .into_par_iter()
                    .map(move |tri| Polygon::new(tri.to_vec(), poly.metadata.clone()))
            })
            .collect::<Vec<_>>();

        Mesh::from_polygons(&triangles)
    }

    /// Renormalize all polygons in this Mesh by re-computing each polygon's
    /// plane and assigning that plane's normal to all vertices.
    pub fn renormalize(&mut self) {
        for poly in &mut self.polygons {
            poly.set_new_normal();
        }
    }

    /// Union under a fragment budget: exceeding `fragment_limit` aborts with
    /// [`ValidationError::FragmentBudget`] rather than splitting indefinitely.
    ///
    /// Faces whose bounding boxes cannot touch the other operand bypass the
    /// clipping entirely; only potentially intersecting faces are clipped.
    /// Clipping always runs against trees built from the other operand's
    /// *complete* polygon list — a tree built from a face subset does not
    /// bound the solid (an empty tree clips nothing), which would corrupt
    /// results whenever one operand contains the other.
    pub fn try_union(
        &self,
        other: &Mesh<S>,
        fragment_limit: usize,
    ) -> Result<Mesh<S>, ValidationError> {
        let mut budget = FragmentBudget::new(fragment_limit);

        // avoid splitting obvious non-intersecting faces
        let (a_clip, a_passthru) =
            Self::partition_polys(&self.polygons, &other.bounding_box());
        let (b_clip, b_passthru) =
            Self::partition_polys(&other.polygons, &self.bounding_box());

        // clip targets: the whole solids
        let mut a_solid = Node::new();
        a_solid.build_within(&self.polygons, &mut budget)?;
        let mut b_solid = Node::new();
        b_solid.build_within(&other.polygons, &mut budget)?;

        let mut a = Node::new();
        a.build_within(&a_clip, &mut budget)?;
        let mut b = Node::new();
        b.build_within(&b_clip, &mut budget)?;

        a.clip_to_within(&b_solid, &mut budget)?;
        b.clip_to_within(&a_solid, &mut budget)?;
        b.invert();
        b.clip_to_within(&a_solid, &mut budget)?;
        b.invert();
        a.build_within(&b.all_polygons(), &mut budget)?;

        // combine results and untouched faces
        let mut final_polys = a.all_polygons();
        final_polys.extend(a_passthru);
        final_polys.extend(b_passthru);

        Ok(Mesh {
            polygons: final_polys,
            bounding_box: OnceLock::new(),
            metadata: self.metadata.clone(),
        })
    }

    /// Difference (`self` − `other`) under a fragment budget.
    pub fn try_difference(
        &self,
        other: &Mesh<S>,
        fragment_limit: usize,
    ) -> Result<Mesh<S>, ValidationError> {
        let mut budget = FragmentBudget::new(fragment_limit);

        // avoid splitting obvious non-intersecting faces
        let (a_clip, a_passthru) =
            Self::partition_polys(&self.polygons, &other.bounding_box());
        let (b_clip, _b_passthru) =
            Self::partition_polys(&other.polygons, &self.bounding_box());

        // clip targets: the whole solids. a_solid mirrors the inversion
        // applied to a so both stand for the complement while b is clipped.
        let mut a_solid = Node::new();
        a_solid.build_within(&self.polygons, &mut budget)?;
        let mut b_solid = Node::new();
        b_solid.build_within(&other.polygons, &mut budget)?;

        let mut a = Node::new();
        a.build_within(&a_clip, &mut budget)?;
        let mut b = Node::new();
        b.build_within(&b_clip, &mut budget)?;

        a.invert();
        a_solid.invert();
        a.clip_to_within(&b_solid, &mut budget)?;
        b.clip_to_within(&a_solid, &mut budget)?;
        b.invert();
        b.clip_to_within(&a_solid, &mut budget)?;
        b.invert();
        a.build_within(&b.all_polygons(), &mut budget)?;
        a.invert();

        // combine results and untouched faces
        let mut final_polys = a.all_polygons();
        final_polys.extend(a_passthru);

        Ok(Mesh {
            polygons: final_polys,
            bounding_box: OnceLock::new(),
            metadata: self.metadata.clone(),
        })
    }

    /// Intersection under a fragment budget.
    pub fn try_intersection(
        &self,
        other: &Mesh<S>,
        fragment_limit: usize,
    ) -> Result<Mesh<S>, ValidationError> {
        let mut budget = FragmentBudget::new(fragment_limit);

        let mut a = Node::new();
        a.build_within(&self.polygons, &mut budget)?;
        let mut b = Node::new();
        b.build_within(&other.polygons, &mut budget)?;

        a.invert();
        b.clip_to_within(&a, &mut budget)?;
        b.invert();
        a.clip_to_within(&b, &mut budget)?;
        b.clip_to_within(&a, &mut budget)?;
        a.build_within(&b.all_polygons(), &mut budget)?;
        a.invert();

        Ok(Mesh {
            polygons: a.all_polygons(),
            bounding_box: OnceLock::new(),
            metadata: self.metadata.clone(),
        })
    }

    /// Flatten to a deduplicated vertex table plus per-face index lists, the
    /// form mesh exporters consume. Vertices are merged by quantized position.
    pub fn to_vertices_and_polygons(&self) -> (Vec<Point3<Real>>, Vec<Vec<usize>>) {
        const QUANTIZATION_FACTOR: Real = 1e7;

        let quantize = |p: &Point3<Real>| {
            (
                (p.x * QUANTIZATION_FACTOR).round() as i64,
                (p.y * QUANTIZATION_FACTOR).round() as i64,
                (p.z * QUANTIZATION_FACTOR).round() as i64,
            )
        };

        let mut index_of: hashbrown::HashMap<(i64, i64, i64), usize> =
            hashbrown::HashMap::new();
        let mut vertices = Vec::new();
        let mut faces = Vec::with_capacity(self.polygons.len());

        for poly in &self.polygons {
            let face = poly
                .vertices
                .iter()
                .map(|v| {
                    *index_of.entry(quantize(&v.pos)).or_insert_with(|| {
                        vertices.push(v.pos);
                        vertices.len() - 1
                    })
                })
                .collect();
            faces.push(face);
        }

        (vertices, faces)
    }
}

impl<S: Clone + Send + Sync + Debug> CSG for Mesh<S> {
    /// Returns a new empty Mesh
    fn new() -> Self {
        Mesh {
            polygons: Vec::new(),
            bounding_box: OnceLock::new(),
            metadata: None,
        }
    }

    /// Return a new Mesh representing union of the two Meshes.
    ///
    /// ```text
    /// let c = a.union(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |       +----+
    ///     +----+--+    |       +----+       |
    ///          |   b   |            |   c   |
    ///          |       |            |       |
    ///          +-------+            +-------+
    /// ```
    fn union(&self, other: &Mesh<S>) -> Mesh<S> {
        self.try_union(other, usize::MAX)
            .expect("unlimited fragment budget")
    }

    /// Return a new Mesh representing difference of the two Meshes.
    ///
    /// ```text
    /// let c = a.difference(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |    +--+
    ///     +----+--+    |       +----+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    fn difference(&self, other: &Mesh<S>) -> Mesh<S> {
        self.try_difference(other, usize::MAX)
            .expect("unlimited fragment budget")
    }

    /// Return a new Mesh representing intersection of the two Meshes.
    ///
    /// ```text
    /// let c = a.intersection(b);
    ///     +-------+
    ///     |       |
    ///     |   a   |
    ///     |    +--+----+   =   +--+
    ///     +----+--+    |       +--+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    fn intersection(&self, other: &Mesh<S>) -> Mesh<S> {
        self.try_intersection(other, usize::MAX)
            .expect("unlimited fragment budget")
    }

    /// Return a new Mesh representing space in this Mesh excluding the space
    /// in the other Mesh plus the space in the other Mesh excluding this one.
    fn xor(&self, other: &Mesh<S>) -> Mesh<S> {
        // A \ B
        let a_sub_b = self.difference(other);

        // B \ A
        let b_sub_a = other.difference(self);

        a_sub_b.union(&b_sub_a)
    }

    /// Apply an arbitrary 3D transform (as a 4x4 matrix) to the mesh.
    ///
    /// Positions are mapped through `mat`; normals through the inverse
    /// transpose of its rotation-scaling part, so rotations carry normals
    /// along correctly.
    fn transform(&self, mat: &Matrix4<Real>) -> Mesh<S> {
        let mat_inv_transpose = mat
            .try_inverse()
            .expect("Matrix not invertible?")
            .transpose();
        let mut mesh = self.clone();

        for poly in &mut mesh.polygons {
            for vert in &mut poly.vertices {
                // Position
                let homog_pos = mat * vert.pos.to_homogeneous();
                vert.pos =
                    Point3::from_homogeneous(homog_pos).expect("Invalid homogeneous point");

                // Normal
                vert.normal = mat_inv_transpose.transform_vector(&vert.normal).normalize();
            }

            // keep the cached plane consistent with the new vertex positions
            poly.plane = Plane::from_vertices(&poly.vertices);
        }

        // invalidate the old cached bounding box
        mesh.bounding_box = OnceLock::new();

        mesh
    }

    /// Returns an [`Aabb`] indicating the 3D bounds of all `polygons`.
    fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            // Track overall min/max in x, y, z among all 3D polygons
            let mut min_x = Real::MAX;
            let mut min_y = Real::MAX;
            let mut min_z = Real::MAX;
            let mut max_x = -Real::MAX;
            let mut max_y = -Real::MAX;
            let mut max_z = -Real::MAX;

            for poly in &self.polygons {
                for v in &poly.vertices {
                    min_x = *partial_min(&min_x, &v.pos.x).unwrap_or(&min_x);
                    min_y = *partial_min(&min_y, &v.pos.y).unwrap_or(&min_y);
                    min_z = *partial_min(&min_z, &v.pos.z).unwrap_or(&min_z);

                    max_x = *partial_max(&max_x, &v.pos.x).unwrap_or(&max_x);
                    max_y = *partial_max(&max_y, &v.pos.y).unwrap_or(&max_y);
                    max_z = *partial_max(&max_z, &v.pos.z).unwrap_or(&max_z);
                }
            }

            // If still uninitialized (e.g., no polygons), return a trivial AABB at origin
            if min_x > max_x {
                return Aabb::new(Point3::origin(), Point3::origin());
            }

            Aabb::new(
                Point3::new(min_x, min_y, min_z),
                Point3::new(max_x, max_y, max_z),
            )
        })
    }

    /// Invalidates object's cached bounding box.
    fn invalidate_bounding_box(&mut self) {
        self.bounding_box = OnceLock::new();
    }

    /// Invert this Mesh (flip inside vs. outside)
    fn inverse(&self) -> Mesh<S> {
        let mut mesh = self.clone();
        for p in &mut mesh.polygons {
            p.flip();
        }
        mesh
    }
}
