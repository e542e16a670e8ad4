//! Test support library
//! Provides various helper functions & utilities for tests.

use solidcsg::{
    float_types::Real,
    mesh::{Mesh, polygon::Polygon, vertex::Vertex},
};
use nalgebra::{Point3, Vector3};

/// Returns the approximate bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]`
/// for a set of polygons.
#[allow(dead_code)]
pub fn bounding_box(polygons: &[Polygon<()>]) -> [Real; 6] {
    let mut min_x = Real::MAX;
    let mut min_y = Real::MAX;
    let mut min_z = Real::MAX;
    let mut max_x = Real::MIN;
    let mut max_y = Real::MIN;
    let mut max_z = Real::MIN;

    for poly in polygons {
        for v in &poly.vertices {
            let p = v.pos;
            if p.x < min_x {
                min_x = p.x;
            }
            if p.y < min_y {
                min_y = p.y;
            }
            if p.z < min_z {
                min_z = p.z;
            }
            if p.x > max_x {
                max_x = p.x;
            }
            if p.y > max_y {
                max_y = p.y;
            }
            if p.z > max_z {
                max_z = p.z;
            }
        }
    }

    [min_x, min_y, min_z, max_x, max_y, max_z]
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
#[allow(dead_code)]
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Helper to make a simple Polygon in 3D with given vertices.
#[allow(dead_code)]
pub fn make_polygon_3d(points: &[[Real; 3]]) -> Polygon<()> {
    let mut verts = Vec::new();
    for p in points {
        let pos = Point3::new(p[0], p[1], p[2]);
        // For simplicity, just store an arbitrary normal; Polygon::new re-computes the plane anyway.
        let normal = Vector3::z();
        verts.push(Vertex::new(pos, normal));
    }
    Polygon::new(verts, None)
}

/// Signed volume of a closed mesh via the divergence theorem: sum of
/// `dot(v0, cross(v1, v2)) / 6` over the triangulated surface. Positive for
/// an outward-wound solid, negative for an inverted one.
#[allow(dead_code)]
pub fn signed_volume(mesh: &Mesh<()>) -> Real {
    let tri = mesh.triangulate();
    let mut volume = 0.0;
    for poly in &tri.polygons {
        let a = poly.vertices[0].pos.coords;
        let b = poly.vertices[1].pos.coords;
        let c = poly.vertices[2].pos.coords;
        volume += a.dot(&b.cross(&c)) / 6.0;
    }
    volume
}

/// Area-weighted sum of outward face normals. Zero (up to float error) for
/// any closed surface, regardless of T-junctions.
#[allow(dead_code)]
pub fn normal_integral(mesh: &Mesh<()>) -> Vector3<Real> {
    let tri = mesh.triangulate();
    let mut sum = Vector3::zeros();
    for poly in &tri.polygons {
        let a = poly.vertices[0].pos.coords;
        let b = poly.vertices[1].pos.coords;
        let c = poly.vertices[2].pos.coords;
        sum += (b - a).cross(&(c - a)) * 0.5;
    }
    sum
}
