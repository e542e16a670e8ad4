//! Oriented planes: point/polygon classification and polygon splitting.
//!
//! The four classification outcomes form a closed set of OR-able bits:
//! a polygon's classification is the OR of its vertices' classifications,
//! so `FRONT | BACK == SPANNING`.

use crate::float_types::{EPSILON, Real};
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector3};

pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// An oriented plane in 3D, satisfying `normal · p = w` for points `p` on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    /// Unit normal vector of the plane
    pub normal: Vector3<Real>,
    /// Distance from origin along `normal`
    pub w: Real,
}

impl Plane {
    /// Create a plane from a normal vector and distance from origin.
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Self {
        Plane {
            normal: normal.normalize(),
            w,
        }
    }

    /// Create a plane from three points. The normal direction follows the
    /// right-hand rule: `(b - a) × (c - a)`.
    pub fn from_points(a: Point3<Real>, b: Point3<Real>, c: Point3<Real>) -> Self {
        let normal = (b - a).cross(&(c - a));

        if normal.norm_squared() < Real::EPSILON * Real::EPSILON {
            // Degenerate triangle, fall back to the XY plane
            return Plane {
                normal: Vector3::z(),
                w: 0.0,
            };
        }

        let normal = normal.normalize();
        let w = normal.dot(&a.coords);
        Plane { normal, w }
    }

    /// Create the supporting plane of a polygon's vertex ring.
    ///
    /// The plane is taken from the first three vertices and then oriented to
    /// agree with the ring's winding (Newell's method), which guards against
    /// a near-collinear leading triple on polygons with more vertices.
    pub fn from_vertices(vertices: &[Vertex]) -> Self {
        if vertices.len() < 3 {
            return Plane {
                normal: Vector3::z(),
                w: 0.0,
            };
        }

        let mut plane =
            Self::from_points(vertices[0].pos, vertices[1].pos, vertices[2].pos);

        let newell = vertices
            .iter()
            .zip(vertices.iter().cycle().skip(1))
            .fold(Vector3::zeros(), |acc, (curr, next)| {
                acc + curr.pos.coords.cross(&next.pos.coords)
            });

        if plane.normal.dot(&newell) < 0.0 {
            plane.flip();
        }
        plane
    }

    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    pub const fn offset(&self) -> Real {
        self.w
    }

    /// Flip the plane in place (reverse normal and distance).
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Return a flipped copy of this plane.
    pub fn flipped(&self) -> Self {
        Plane {
            normal: -self.normal,
            w: -self.w,
        }
    }

    /// Classify a point as [`FRONT`], [`BACK`] or [`COPLANAR`] by its signed
    /// distance to the plane, within [`EPSILON`].
    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        let distance = self.normal.dot(&point.coords) - self.w;
        if distance > EPSILON {
            FRONT
        } else if distance < -EPSILON {
            BACK
        } else {
            COPLANAR
        }
    }

    /// Classify a polygon with respect to this plane: the OR of its vertex
    /// classifications, so a mixed polygon comes back as [`SPANNING`].
    pub fn classify_polygon<S: Clone>(&self, polygon: &Polygon<S>) -> i8 {
        polygon
            .vertices
            .iter()
            .fold(COPLANAR, |acc, v| acc | self.orient_point(&v.pos))
    }

    /// Split `polygon` by this plane, returning four buckets:
    /// `(coplanar_front, coplanar_back, front, back)`.
    ///
    /// Coplanar polygons are routed to the bucket whose side their own normal
    /// points toward. Spanning polygons are walked edge-by-edge: every edge
    /// crossing the plane is cut at the exact intersection by interpolating
    /// both position and normal, and the cut vertex is appended to *both*
    /// sides, which keeps adjacent fragments gap-free. Fragments left with
    /// fewer than 3 vertices are dropped.
    #[allow(clippy::type_complexity)]
    pub fn split_polygon<S: Clone>(
        &self,
        polygon: &Polygon<S>,
    ) -> (
        Vec<Polygon<S>>,
        Vec<Polygon<S>>,
        Vec<Polygon<S>>,
        Vec<Polygon<S>>,
    ) {
        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();

        let types: Vec<i8> = polygon
            .vertices
            .iter()
            .map(|v| self.orient_point(&v.pos))
            .collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            },
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),

            // SPANNING (or any other mixed combination): do the split
            _ => {
                let mut split_front = Vec::<Vertex>::new();
                let mut split_back = Vec::<Vertex>::new();

                for i in 0..polygon.vertices.len() {
                    // j wraps around to the first vertex after the last
                    let j = (i + 1) % polygon.vertices.len();
                    let type_i = types[i];
                    let type_j = types[j];
                    let vertex_i = &polygon.vertices[i];
                    let vertex_j = &polygon.vertices[j];

                    if type_i != BACK {
                        split_front.push(vertex_i.clone());
                    }
                    if type_i != FRONT {
                        split_back.push(vertex_i.clone());
                    }

                    // The edge i → j crosses the plane: interpolate the
                    // intersection and feed it to both sides.
                    if (type_i | type_j) == SPANNING {
                        let denom = self.normal.dot(&(vertex_j.pos - vertex_i.pos));
                        if denom.abs() > EPSILON {
                            let t =
                                (self.w - self.normal.dot(&vertex_i.pos.coords)) / denom;
                            let vertex_new = vertex_i.interpolate(vertex_j, t);
                            split_front.push(vertex_new.clone());
                            split_back.push(vertex_new);
                        }
                    }
                }

                // Fragments keep the parent polygon's plane: recomputing it
                // from split vertices drifts under accumulated interpolation.
                if split_front.len() >= 3 {
                    front.push(Polygon {
                        vertices: split_front,
                        plane: polygon.plane.clone(),
                        metadata: polygon.metadata.clone(),
                    });
                }
                if split_back.len() >= 3 {
                    back.push(Polygon {
                        vertices: split_back,
                        plane: polygon.plane.clone(),
                        metadata: polygon.metadata.clone(),
                    });
                }
            },
        }

        (coplanar_front, coplanar_back, front, back)
    }
}
