//! A `Polygon` is a flat, convex ring of `Vertex`s lying on a cached `Plane`.

use crate::float_types::Real;
use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::mesh::plane::Plane;
use crate::mesh::vertex::Vertex;
use nalgebra::Point3;

/// A convex polygon defined by an ordered ring of vertices (≥3, coplanar),
/// with its supporting plane cached, and an optional metadata value that
/// rides along through splits and Boolean operations.
///
/// Vertex order determines the outward orientation (right-hand rule).
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<S: Clone> {
    pub vertices: Vec<Vertex>,

    /// The supporting plane, derived from `vertices` at construction and
    /// kept consistent with them thereafter.
    pub plane: Plane,

    pub metadata: Option<S>,
}

impl<S: Clone + Send + Sync> Polygon<S> {
    /// Build a polygon from a vertex ring; the supporting plane is computed
    /// from the ring. No validation beyond plane derivation is performed:
    /// non-coplanar or inconsistently wound input yields undefined but
    /// non-crashing geometry downstream.
    pub fn new(vertices: Vec<Vertex>, metadata: Option<S>) -> Self {
        let plane = Plane::from_vertices(&vertices);
        Polygon {
            vertices,
            plane,
            metadata,
        }
    }

    /// Reverse the polygon's orientation: reverse the vertex ring, flip every
    /// vertex normal, and invert the cached plane.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.vertices.iter_mut().for_each(Vertex::flip);
        self.plane.flip();
    }

    /// Fan-triangulate this polygon into `[Vertex; 3]` triangles.
    ///
    /// Valid for the convex polygons this crate operates on; every triangle
    /// shares the first vertex.
    pub fn triangulate(&self) -> Vec<[Vertex; 3]> {
        if self.vertices.len() < 3 {
            return Vec::new();
        }
        (1..self.vertices.len() - 1)
            .map(|i| {
                [
                    self.vertices[0].clone(),
                    self.vertices[i].clone(),
                    self.vertices[i + 1].clone(),
                ]
            })
            .collect()
    }

    /// Recompute the supporting plane from the current vertex ring and assign
    /// its normal to every vertex (flat shading).
    pub fn set_new_normal(&mut self) {
        self.plane = Plane::from_vertices(&self.vertices);
        let normal = self.plane.normal();
        self.vertices.iter_mut().for_each(|v| v.normal = normal);
    }

    /// Axis-aligned bounding box spanning this polygon's vertices.
    pub fn bounding_box(&self) -> Aabb {
        let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
        let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
        for v in &self.vertices {
            mins.x = mins.x.min(v.pos.x);
            mins.y = mins.y.min(v.pos.y);
            mins.z = mins.z.min(v.pos.z);
            maxs.x = maxs.x.max(v.pos.x);
            maxs.y = maxs.y.max(v.pos.y);
            maxs.z = maxs.z.max(v.pos.z);
        }
        Aabb::new(mins, maxs)
    }
}
